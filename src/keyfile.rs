//! JSON key files written by `genkey`

use crate::crypto::{KeyPair, Pubkey};
use crate::error::{ChainError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeyHex {
    pub x: String,
    pub y: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyFile {
    pub secret_key: String,
    pub public_key: PublicKeyHex,
}

impl KeyFile {
    pub fn from_keypair(keypair: &KeyPair) -> Self {
        let pubkey = keypair.pubkey();
        KeyFile {
            secret_key: keypair.secret_hex(),
            public_key: PublicKeyHex {
                x: hex::encode(pubkey.x),
                y: hex::encode(pubkey.y),
            },
        }
    }

    /// Rebuilds the key pair and checks it against the stored public point.
    pub fn keypair(&self) -> Result<KeyPair> {
        let secret = hex::decode(&self.secret_key)
            .map_err(|e| ChainError::KeyFile(format!("Invalid secret key hex: {}", e)))?;
        let keypair = KeyPair::from_secret_bytes(&secret)?;

        let stored = Pubkey {
            x: decode_coordinate(&self.public_key.x)?,
            y: decode_coordinate(&self.public_key.y)?,
        };
        if stored != keypair.pubkey() {
            return Err(ChainError::KeyFile(
                "Public key does not match secret key".to_string(),
            ));
        }
        Ok(keypair)
    }

    /// Writes the key file; refuses to replace an existing file unless
    /// `overwrite` is set.
    pub fn save(&self, path: &Path, overwrite: bool) -> Result<()> {
        if path.exists() && !overwrite {
            return Err(ChainError::KeyFile(format!(
                "{} already exists",
                path.display()
            )));
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

fn decode_coordinate(hex_str: &str) -> Result<[u8; 32]> {
    let bytes = hex::decode(hex_str)
        .map_err(|e| ChainError::KeyFile(format!("Invalid coordinate hex: {}", e)))?;
    bytes.try_into().map_err(|b: Vec<u8>| {
        ChainError::KeyFile(format!("Coordinate must be 32 bytes, got {}", b.len()))
    })
}
