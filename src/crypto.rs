//! Cryptographic primitives for chainbalances
//!
//! SHA-256 digests and ECDSA over secp256k1. Public keys travel as raw affine
//! coordinates and signatures as raw `(r, s)` pairs, matching the block file
//! layout.

use crate::error::ChainError;
use once_cell::sync::Lazy;
use rand::rngs::OsRng;
use secp256k1::{
    constants::{SECRET_KEY_SIZE, UNCOMPRESSED_PUBLIC_KEY_SIZE},
    ecdsa, All, Message, PublicKey, Secp256k1, SecretKey,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A thread-safe, lazily initialized Secp256k1 context.
static SECP256K1_CONTEXT: Lazy<Secp256k1<All>> = Lazy::new(Secp256k1::new);

/// Output of the hash function used for block and transaction identity.
pub type Sha256Hash = [u8; 32];

pub const ZERO_HASH: Sha256Hash = [0u8; 32];

/// Tag byte of an uncompressed SEC1 point.
const UNCOMPRESSED_TAG: u8 = 0x04;

pub fn digest(bytes: &[u8]) -> Sha256Hash {
    Sha256::digest(bytes).into()
}

pub fn is_zero(bytes: &[u8; 32]) -> bool {
    bytes.iter().all(|b| *b == 0)
}

/// True when `hash`, read as a big-endian unsigned integer, is strictly
/// less than `target`.
pub fn hash_below_target(hash: &Sha256Hash, target: &Sha256Hash) -> bool {
    // Lexicographic order on equal-length byte arrays is big-endian order.
    hash < target
}

/// A point on secp256k1, stored as its two affine coordinates.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Pubkey {
    pub x: [u8; 32],
    pub y: [u8; 32],
}

impl Pubkey {
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        let bytes: [u8; UNCOMPRESSED_PUBLIC_KEY_SIZE] = public_key.serialize_uncompressed();
        let mut x = [0u8; 32];
        let mut y = [0u8; 32];
        x.copy_from_slice(&bytes[1..33]);
        y.copy_from_slice(&bytes[33..65]);
        Pubkey { x, y }
    }

    /// Fails when the coordinates are not a point on the curve.
    pub fn to_public_key(&self) -> Result<PublicKey, ChainError> {
        let mut bytes = [0u8; UNCOMPRESSED_PUBLIC_KEY_SIZE];
        bytes[0] = UNCOMPRESSED_TAG;
        bytes[1..33].copy_from_slice(&self.x);
        bytes[33..65].copy_from_slice(&self.y);
        PublicKey::from_slice(&bytes)
            .map_err(|e| ChainError::Crypto(format!("Invalid public key: {}", e)))
    }

    pub fn x_hex(&self) -> String {
        hex::encode(self.x)
    }

    pub fn xy_hex(&self) -> String {
        format!("{}{}", hex::encode(self.x), hex::encode(self.y))
    }
}

/// An ECDSA signature as its two scalars. All-zero means "unsigned".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature {
    pub r: [u8; 32],
    pub s: [u8; 32],
}

impl Signature {
    pub fn is_zero(&self) -> bool {
        is_zero(&self.r) && is_zero(&self.s)
    }

    fn from_ecdsa(signature: &ecdsa::Signature) -> Self {
        let compact = signature.serialize_compact();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&compact[..32]);
        s.copy_from_slice(&compact[32..]);
        Signature { r, s }
    }

    fn to_ecdsa(self) -> Option<ecdsa::Signature> {
        let mut compact = [0u8; 64];
        compact[..32].copy_from_slice(&self.r);
        compact[32..].copy_from_slice(&self.s);
        let mut signature = ecdsa::Signature::from_compact(&compact).ok()?;
        // Signers outside libsecp256k1 do not always emit low-S signatures.
        signature.normalize_s();
        Some(signature)
    }
}

#[derive(Debug, Clone)]
pub struct KeyPair {
    pub secret_key: SecretKey,
    pub public_key: PublicKey,
}

impl KeyPair {
    /// Generates a new random KeyPair using the OS random number generator.
    pub fn generate() -> Self {
        Self::from_secret_key(SecretKey::new(&mut OsRng))
    }

    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        let public_key = PublicKey::from_secret_key(&SECP256K1_CONTEXT, &secret_key);
        KeyPair {
            secret_key,
            public_key,
        }
    }

    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Self, ChainError> {
        let secret_key = SecretKey::from_slice(bytes).map_err(|e| {
            if bytes.len() != SECRET_KEY_SIZE {
                ChainError::Crypto(format!(
                    "Secret key must be {} bytes, got {}",
                    SECRET_KEY_SIZE,
                    bytes.len()
                ))
            } else {
                ChainError::Crypto(format!("Invalid secret key bytes: {}", e))
            }
        })?;

        Ok(Self::from_secret_key(secret_key))
    }

    pub fn pubkey(&self) -> Pubkey {
        Pubkey::from_public_key(&self.public_key)
    }

    pub fn secret_hex(&self) -> String {
        hex::encode(self.secret_key.secret_bytes())
    }

    /// Signs a precomputed digest.
    pub fn sign_digest(&self, digest: &Sha256Hash) -> Signature {
        let message = Message::from_digest(*digest);
        let signature = SECP256K1_CONTEXT.sign_ecdsa(&message, &self.secret_key);
        Signature::from_ecdsa(&signature)
    }
}

/// Verifies `signature` over `digest` with `pubkey`. Off-curve keys and
/// malformed signatures simply fail to verify.
pub fn verify_signature(digest: &Sha256Hash, signature: &Signature, pubkey: &Pubkey) -> bool {
    let Ok(public_key) = pubkey.to_public_key() else {
        return false;
    };
    let Some(signature) = signature.to_ecdsa() else {
        return false;
    };
    let message = Message::from_digest(*digest);
    SECP256K1_CONTEXT
        .verify_ecdsa(&message, &signature, &public_key)
        .is_ok()
}
