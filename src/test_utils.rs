//! Builders for small private networks used by unit tests.

use crate::blockchain::{Block, ConsensusParams};
use crate::crypto::{KeyPair, Sha256Hash};
use crate::transaction::Transaction;

/// Accepts every hash except the maximum one.
pub const OPEN_TARGET: Sha256Hash = [0xff; 32];

pub struct TestNet {
    pub params: ConsensusParams,
    pub genesis: Block,
}

impl TestNet {
    /// A network whose genesis block pays key 1.
    pub fn new() -> Self {
        let genesis = Block::new(0, [0u8; 32], Transaction::reward(0, Self::key(1).pubkey()));
        TestNet {
            params: ConsensusParams::new(genesis.hash(), OPEN_TARGET),
            genesis,
        }
    }

    pub fn key(seed: u8) -> KeyPair {
        KeyPair::from_secret_bytes(&[seed; 32]).expect("seed is a valid secret key")
    }

    /// A reward-only block on top of `parent`, paying key `reward_seed`.
    pub fn child(&self, parent: &Block, reward_seed: u8) -> Block {
        self.block_on(parent.hash(), parent.height + 1, reward_seed)
    }

    pub fn block_on(&self, prev_block_hash: Sha256Hash, height: u32, reward_seed: u8) -> Block {
        Block::new(
            height,
            prev_block_hash,
            Transaction::reward(height, Self::key(reward_seed).pubkey()),
        )
    }

    /// A child of `parent` that also spends `spent`, signed by key
    /// `signer_seed` and paying key `dest_seed`.
    pub fn spending_child(
        &self,
        parent: &Block,
        reward_seed: u8,
        spent: &Transaction,
        signer_seed: u8,
        dest_seed: u8,
    ) -> Block {
        let height = parent.height + 1;
        let mut spend = Transaction::spend(height, spent.hash(), Self::key(dest_seed).pubkey());
        spend.sign(&Self::key(signer_seed));
        self.child(parent, reward_seed).with_normal_tx(spend)
    }
}
