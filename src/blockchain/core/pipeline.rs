use super::chain::{Block, ConsensusParams};
use super::selection::{select_longest_chain, SelectionPolicy};
use super::state::BalanceLedger;
use super::tree::{BlockTree, OrphanPolicy};
use super::validation::validate_block;
use crate::crypto::Sha256Hash;
use crate::error::Result;
use log::{debug, info};
use rayon::prelude::*;

/// Knobs that change how the engine treats the block set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineOptions {
    pub selection: SelectionPolicy,
    pub orphans: OrphanPolicy,
}

/// Result of one run over a block set.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub ledger: BalanceLedger,
    pub chain_height: u32,
    pub tip_hash: Sha256Hash,
    pub received: usize,
    pub rejected: usize,
    pub admitted: usize,
    pub invalidated: usize,
}

/// Validates `blocks`, builds the tree, picks the longest valid chain and
/// replays it.
pub fn evaluate_blocks(
    blocks: Vec<Block>,
    params: &ConsensusParams,
    options: &EngineOptions,
) -> Result<Evaluation> {
    let received = blocks.len();

    // Structural checks need no other block, so they run in parallel.
    let verdicts: Vec<_> = blocks
        .par_iter()
        .map(|block| validate_block(block, params))
        .collect();

    let mut accepted = Vec::with_capacity(received);
    for (block, verdict) in blocks.into_iter().zip(verdicts) {
        match verdict {
            Ok(()) => accepted.push(block),
            Err(fault) => debug!(
                "Rejected block {} at height {}: {}",
                block.hash_str(),
                block.height,
                fault
            ),
        }
    }
    let rejected = received - accepted.len();
    info!(
        "Structural validation: {} of {} blocks accepted",
        accepted.len(),
        received
    );

    let mut tree = BlockTree::build(accepted, options.orphans);
    let invalidated = tree.validate_ancestry();
    info!(
        "Block tree: {} nodes admitted, {} valid after ancestry checks",
        tree.len(),
        tree.valid_count()
    );

    let chain = select_longest_chain(&tree, options.selection)?;
    info!(
        "Selected chain of height {} ending at {}",
        chain.height(),
        hex::encode(chain.tip_hash())
    );

    let ledger = BalanceLedger::replay(&chain)?;
    info!("Replayed {} blocks into {} balances", chain.len(), ledger.len());

    Ok(Evaluation {
        chain_height: chain.height(),
        tip_hash: chain.tip_hash(),
        ledger,
        received,
        rejected,
        admitted: tree.len(),
        invalidated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChainError;
    use crate::test_utils::TestNet;

    #[test]
    fn test_counts_follow_each_phase() {
        let net = TestNet::new();
        let b1 = net.child(&net.genesis, 2);
        let bad_sig = net.spending_child(&b1, 3, &net.genesis.reward_tx, 8, 4);
        let orphan = net.block_on([0x55; 32], 1, 5);
        let mut malformed = net.child(&net.genesis, 6);
        malformed.reward_tx.height = 9;

        let evaluation = evaluate_blocks(
            vec![net.genesis.clone(), b1.clone(), bad_sig, orphan, malformed],
            &net.params,
            &EngineOptions::default(),
        )
        .unwrap();

        assert_eq!(evaluation.received, 5);
        assert_eq!(evaluation.rejected, 1);
        assert_eq!(evaluation.admitted, 4);
        assert_eq!(evaluation.invalidated, 1);
        assert_eq!(evaluation.chain_height, 1);
        assert_eq!(evaluation.tip_hash, b1.hash());
    }

    #[test]
    fn test_rejected_orphans_are_not_admitted() {
        let net = TestNet::new();
        let orphan = net.block_on([0x55; 32], 1, 5);
        let options = EngineOptions {
            orphans: OrphanPolicy::Reject,
            ..EngineOptions::default()
        };

        let evaluation =
            evaluate_blocks(vec![net.genesis.clone(), orphan], &net.params, &options).unwrap();
        assert_eq!(evaluation.admitted, 1);
        assert_eq!(evaluation.chain_height, 0);
    }

    #[test]
    fn test_no_genesis_is_fatal() {
        let net = TestNet::new();
        let b1 = net.child(&net.genesis, 2);

        let result = evaluate_blocks(vec![b1], &net.params, &EngineOptions::default());
        assert!(matches!(result, Err(ChainError::NoValidChain { admitted: 1 })));
    }

    #[test]
    fn test_wrong_genesis_is_fatal() {
        let net = TestNet::new();
        let result = evaluate_blocks(
            vec![net.genesis.clone()],
            &ConsensusParams::default(),
            &EngineOptions::default(),
        );
        assert!(matches!(result, Err(ChainError::NoValidChain { admitted: 0 })));
    }
}
