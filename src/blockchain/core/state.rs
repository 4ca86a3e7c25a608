use super::selection::LongestChain;
use super::validation::find_spent_output;
use crate::crypto::Pubkey;
use crate::error::{ChainError, Result};
use std::collections::HashMap;

/// Net coin balance per public key, replayed from one chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BalanceLedger {
    balances: HashMap<Pubkey, i64>,
}

impl BalanceLedger {
    /// Replays the chain from genesis: every reward credits its destination,
    /// every spend credits its destination and debits the owner of the spent
    /// output.
    pub fn replay(chain: &LongestChain<'_>) -> Result<Self> {
        let mut ledger = BalanceLedger::default();
        let nodes = chain.nodes();

        for (position, node) in nodes.iter().enumerate() {
            let block = node.block();
            ledger.apply(&block.reward_tx.dest_pubkey, 1);

            if let Some(normal_tx) = block.normal_tx() {
                let earlier = nodes[..position].iter().rev().copied();
                let spent = find_spent_output(earlier, &normal_tx.prev_transaction_hash)
                    .ok_or_else(|| {
                        ChainError::InvalidChain(format!(
                            "block {} at height {} spends unknown transaction {}",
                            hex::encode(node.hash()),
                            node.height(),
                            hex::encode(normal_tx.prev_transaction_hash)
                        ))
                    })?;
                ledger.apply(&normal_tx.dest_pubkey, 1);
                ledger.apply(&spent.dest_pubkey, -1);
            }
        }

        Ok(ledger)
    }

    fn apply(&mut self, pubkey: &Pubkey, amount: i64) {
        *self.balances.entry(*pubkey).or_insert(0) += amount;
    }

    /// Balance of `pubkey`; keys never mentioned on the chain hold 0.
    pub fn get_balance(&self, pubkey: &Pubkey) -> i64 {
        self.balances.get(pubkey).copied().unwrap_or(0)
    }

    pub fn contains(&self, pubkey: &Pubkey) -> bool {
        self.balances.contains_key(pubkey)
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    /// Entries ordered by key, for reproducible output.
    pub fn sorted(&self) -> Vec<(Pubkey, i64)> {
        let mut entries: Vec<(Pubkey, i64)> =
            self.balances.iter().map(|(k, v)| (*k, *v)).collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    pub fn total(&self) -> i64 {
        self.balances.values().sum()
    }
}
