use super::chain::{Block, ConsensusParams};
use super::tree::{BlockTree, BlockchainNode, NodeId};
use crate::crypto::{hash_below_target, Sha256Hash};
use crate::error::BlockFault;
use crate::transaction::Transaction;

/// Checks that need nothing but the block itself. Pure, so callers may run it
/// on many blocks in parallel.
pub fn validate_block(block: &Block, params: &ConsensusParams) -> Result<(), BlockFault> {
    let hash = block.hash();
    if block.is_genesis() {
        if &hash != params.genesis_hash() {
            return Err(BlockFault::GenesisHashMismatch);
        }
    } else if !hash_below_target(&hash, params.target()) {
        return Err(BlockFault::AboveTarget);
    }

    block.reward_tx.validate_height(block.height)?;
    if let Some(normal_tx) = block.normal_tx() {
        normal_tx.validate_height(block.height)?;
    }

    block.reward_tx.validate_reward_shape()
}

/// First transaction, searching `nodes` in order, whose hash is `tx_hash`.
pub fn find_spent_output<'a>(
    nodes: impl IntoIterator<Item = &'a BlockchainNode>,
    tx_hash: &Sha256Hash,
) -> Option<&'a Transaction> {
    nodes
        .into_iter()
        .find_map(|node| node.transaction_with_hash(tx_hash))
}

/// Checks the node's spend against its strict ancestors: the spent output
/// must exist, the owner must have signed, and no ancestor may have spent it
/// already.
pub fn check_ancestry(tree: &BlockTree, id: NodeId) -> Result<(), BlockFault> {
    let node = tree.get(id);
    let Some(normal_tx) = node.block().normal_tx() else {
        return Ok(());
    };
    let input = &normal_tx.prev_transaction_hash;

    let spent = find_spent_output(tree.ancestors(id), input)
        .ok_or(BlockFault::SpentOutputNotFound)?;
    normal_tx.validate_spend_signature(spent)?;

    let already_spent = tree
        .ancestors(id)
        .any(|ancestor| &ancestor.block().normal_tx.prev_transaction_hash == input);
    if already_spent {
        return Err(BlockFault::DoubleSpend);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::OrphanPolicy;
    use crate::test_utils::TestNet;

    #[test]
    fn test_genesis_must_match_constant() {
        let net = TestNet::new();
        assert!(validate_block(&net.genesis, &net.params).is_ok());

        let other_genesis = net.genesis.clone().with_nonce([1u8; 32]);
        assert_eq!(
            validate_block(&other_genesis, &net.params),
            Err(BlockFault::GenesisHashMismatch)
        );
        // The real network's genesis hash rejects the test genesis.
        assert_eq!(
            validate_block(&net.genesis, &ConsensusParams::default()),
            Err(BlockFault::GenesisHashMismatch)
        );
    }

    #[test]
    fn test_non_genesis_must_be_below_target() {
        let net = TestNet::new();
        let child = net.child(&net.genesis, 2);
        assert!(validate_block(&child, &net.params).is_ok());

        let impossible = ConsensusParams::new(*net.params.genesis_hash(), [0u8; 32]);
        assert_eq!(
            validate_block(&child, &impossible),
            Err(BlockFault::AboveTarget)
        );
    }

    #[test]
    fn test_transaction_heights_must_match() {
        let net = TestNet::new();
        let mut child = net.child(&net.genesis, 2);
        child.reward_tx.height = 5;
        assert!(matches!(
            validate_block(&child, &net.params),
            Err(BlockFault::TransactionHeightMismatch { .. })
        ));

        let mut spending = net.spending_child(&net.genesis, 2, &net.genesis.reward_tx, 1, 3);
        spending.normal_tx.height = 0;
        assert!(matches!(
            validate_block(&spending, &net.params),
            Err(BlockFault::TransactionHeightMismatch { .. })
        ));
    }

    #[test]
    fn test_reward_must_be_unsigned_without_input() {
        let net = TestNet::new();
        let mut child = net.child(&net.genesis, 2);
        child.reward_tx.src_signature.r[5] = 1;
        assert_eq!(
            validate_block(&child, &net.params),
            Err(BlockFault::RewardSigned)
        );

        let mut child = net.child(&net.genesis, 2);
        child.reward_tx.prev_transaction_hash = [1u8; 32];
        assert_eq!(
            validate_block(&child, &net.params),
            Err(BlockFault::RewardHasInput)
        );
    }

    #[test]
    fn test_structural_validation_is_idempotent() {
        let net = TestNet::new();
        let child = net.child(&net.genesis, 2);
        let first = validate_block(&child, &net.params);
        for _ in 0..3 {
            assert_eq!(validate_block(&child, &net.params), first);
        }
    }

    #[test]
    fn test_valid_spend_passes() {
        let net = TestNet::new();
        let b1 = net.spending_child(&net.genesis, 2, &net.genesis.reward_tx, 1, 3);

        let tree = BlockTree::build([net.genesis.clone(), b1], OrphanPolicy::Admit);
        assert!(check_ancestry(&tree, NodeId::from_index(1)).is_ok());
    }

    #[test]
    fn test_spend_of_unknown_output_fails() {
        let net = TestNet::new();
        let stray = crate::transaction::Transaction::reward(7, TestNet::key(9).pubkey());
        let b1 = net.spending_child(&net.genesis, 2, &stray, 9, 3);

        let tree = BlockTree::build([net.genesis.clone(), b1], OrphanPolicy::Admit);
        assert_eq!(
            check_ancestry(&tree, NodeId::from_index(1)),
            Err(BlockFault::SpentOutputNotFound)
        );
    }

    #[test]
    fn test_spend_signed_by_wrong_key_fails() {
        let net = TestNet::new();
        // Key 4 does not own the genesis reward.
        let b1 = net.spending_child(&net.genesis, 2, &net.genesis.reward_tx, 4, 3);

        let tree = BlockTree::build([net.genesis.clone(), b1], OrphanPolicy::Admit);
        assert_eq!(
            check_ancestry(&tree, NodeId::from_index(1)),
            Err(BlockFault::BadSignature)
        );
    }

    #[test]
    fn test_second_spend_on_same_path_fails() {
        let net = TestNet::new();
        let b1 = net.spending_child(&net.genesis, 2, &net.genesis.reward_tx, 1, 3);
        let b2 = net.spending_child(&b1, 4, &net.genesis.reward_tx, 1, 5);

        let mut tree = BlockTree::build([net.genesis.clone(), b1, b2], OrphanPolicy::Admit);
        assert!(check_ancestry(&tree, NodeId::from_index(1)).is_ok());
        assert_eq!(
            check_ancestry(&tree, NodeId::from_index(2)),
            Err(BlockFault::DoubleSpend)
        );

        assert_eq!(tree.validate_ancestry(), 1);
        assert!(tree.get(NodeId::from_index(1)).is_valid());
        assert!(!tree.get(NodeId::from_index(2)).is_valid());
    }

    #[test]
    fn test_spend_on_sibling_branch_is_not_a_double_spend() {
        let net = TestNet::new();
        let left = net.spending_child(&net.genesis, 2, &net.genesis.reward_tx, 1, 3);
        let right = net.spending_child(&net.genesis, 4, &net.genesis.reward_tx, 1, 5);

        let mut tree = BlockTree::build([net.genesis.clone(), left, right], OrphanPolicy::Admit);
        assert_eq!(tree.validate_ancestry(), 0);
        assert_eq!(tree.valid_count(), 3);
    }

    #[test]
    fn test_ancestry_validation_only_narrows() {
        let net = TestNet::new();
        let b1 = net.spending_child(&net.genesis, 2, &net.genesis.reward_tx, 4, 3);
        let orphan = net.block_on([0x11; 32], 1, 6);

        let mut tree = BlockTree::build([net.genesis.clone(), b1, orphan], OrphanPolicy::Admit);
        let before: Vec<bool> = tree.nodes().iter().map(|n| n.is_valid()).collect();
        tree.validate_ancestry();
        let after: Vec<bool> = tree.nodes().iter().map(|n| n.is_valid()).collect();

        for (was, is) in before.iter().zip(&after) {
            assert!(*was || !*is);
        }
        assert_eq!(after, vec![true, false, false]);
    }
}
