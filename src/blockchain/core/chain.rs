use crate::codec;
use crate::crypto::{self, Sha256Hash};
use crate::error::Result;
use crate::transaction::Transaction;
use serde::{Deserialize, Serialize};

/// If a block has height 0, it must have this specific hash.
pub const GENESIS_BLOCK_HASH: Sha256Hash = [
    0x00, 0x00, 0x00, 0x0e, 0x5a, 0xc9, 0x8c, 0x78, 0x98, 0x00, 0x70, 0x2a, 0xd2, 0xa6, 0xf3, 0xca,
    0x51, 0x0d, 0x40, 0x9d, 0x6c, 0xca, 0x89, 0x2e, 0xd1, 0xc7, 0x51, 0x98, 0xe0, 0x4b, 0xde, 0xec,
];

/// Every non-genesis block hash must be numerically below this value.
pub const TARGET_HASH: Sha256Hash = [
    0x00, 0x00, 0x00, 0x10, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// The fixed consensus constants a run validates against.
///
/// Built once at startup and only ever borrowed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsensusParams {
    genesis_hash: Sha256Hash,
    target: Sha256Hash,
}

impl ConsensusParams {
    /// Params for a private network, e.g. one generated by a test.
    pub fn new(genesis_hash: Sha256Hash, target: Sha256Hash) -> Self {
        ConsensusParams {
            genesis_hash,
            target,
        }
    }

    pub fn genesis_hash(&self) -> &Sha256Hash {
        &self.genesis_hash
    }

    pub fn target(&self) -> &Sha256Hash {
        &self.target
    }
}

impl Default for ConsensusParams {
    fn default() -> Self {
        ConsensusParams::new(GENESIS_BLOCK_HASH, TARGET_HASH)
    }
}

/// One block record. Field order is the on-disk order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub height: u32,
    pub prev_block_hash: Sha256Hash,
    pub nonce: [u8; 32],
    pub reward_tx: Transaction,
    /// Always present on the wire; zero-filled when the block spends nothing.
    pub normal_tx: Transaction,
}

impl Block {
    /// A block carrying only a reward for `reward_tx.dest_pubkey`.
    pub fn new(height: u32, prev_block_hash: Sha256Hash, reward_tx: Transaction) -> Self {
        Block {
            height,
            prev_block_hash,
            nonce: [0u8; 32],
            reward_tx,
            normal_tx: Transaction::empty(height),
        }
    }

    pub fn with_normal_tx(mut self, normal_tx: Transaction) -> Self {
        self.normal_tx = normal_tx;
        self
    }

    pub fn with_nonce(mut self, nonce: [u8; 32]) -> Self {
        self.nonce = nonce;
        self
    }

    pub fn is_genesis(&self) -> bool {
        self.height == 0
    }

    /// The normal transaction, if this block carries one.
    pub fn normal_tx(&self) -> Option<&Transaction> {
        self.normal_tx.has_input().then_some(&self.normal_tx)
    }

    pub fn encode(&self) -> Vec<u8> {
        codec::encode(self).unwrap_or_default()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        codec::decode(bytes)
    }

    pub fn hash(&self) -> Sha256Hash {
        crypto::digest(&self.encode())
    }

    pub fn hash_str(&self) -> String {
        hex::encode(self.hash())
    }
}
