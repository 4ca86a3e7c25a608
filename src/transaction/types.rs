/// Transaction record for chainbalances
use crate::codec;
use crate::crypto::{self, KeyPair, Pubkey, Sha256Hash, Signature, ZERO_HASH};
use serde::{Deserialize, Serialize};

/// A single-input, single-output transfer of one coin.
///
/// Field order is the on-disk order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub height: u32,
    /// Hash of the transaction whose output is spent; zero for a reward.
    pub prev_transaction_hash: Sha256Hash,
    pub dest_pubkey: Pubkey,
    pub src_signature: Signature,
}

impl Transaction {
    /// An unsigned, input-less reward paying `dest`.
    pub fn reward(height: u32, dest: Pubkey) -> Self {
        Transaction {
            height,
            prev_transaction_hash: ZERO_HASH,
            dest_pubkey: dest,
            src_signature: Signature::default(),
        }
    }

    /// An unsigned spend of `prev_transaction_hash`; call [`Transaction::sign`]
    /// with the key owning the spent output.
    pub fn spend(height: u32, prev_transaction_hash: Sha256Hash, dest: Pubkey) -> Self {
        Transaction {
            height,
            prev_transaction_hash,
            dest_pubkey: dest,
            src_signature: Signature::default(),
        }
    }

    /// The zero-filled slot a block carries when it has no normal transaction.
    pub fn empty(height: u32) -> Self {
        Transaction {
            height,
            ..Transaction::default()
        }
    }

    /// True when the transaction spends an earlier output.
    pub fn has_input(&self) -> bool {
        !crypto::is_zero(&self.prev_transaction_hash)
    }

    pub fn encode(&self) -> Vec<u8> {
        // A fixed-layout record of arrays and integers always encodes.
        codec::encode(self).unwrap_or_default()
    }

    pub fn hash(&self) -> Sha256Hash {
        crypto::digest(&self.encode())
    }

    pub fn hash_str(&self) -> String {
        hex::encode(self.hash())
    }

    /// Digest covered by `src_signature`: the record with its signature zeroed.
    pub fn signing_digest(&self) -> Sha256Hash {
        let unsigned = Transaction {
            src_signature: Signature::default(),
            ..*self
        };
        unsigned.hash()
    }

    pub fn sign(&mut self, keypair: &KeyPair) {
        self.src_signature = keypair.sign_digest(&self.signing_digest());
    }
}
