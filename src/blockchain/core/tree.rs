use super::chain::Block;
use super::validation::check_ancestry;
use crate::crypto::Sha256Hash;
use crate::error::BlockFault;
use crate::transaction::Transaction;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What to do with a block whose parent hash matches no admitted block.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum OrphanPolicy {
    /// Keep the block as a parentless node that is invalid from the start.
    #[default]
    Admit,
    /// Leave the block out of the tree entirely.
    Reject,
}

/// Position of a node in the tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }

    #[cfg(test)]
    pub(crate) fn from_index(index: usize) -> Self {
        NodeId(index)
    }
}

#[derive(Debug, Clone)]
pub struct BlockchainNode {
    block: Block,
    hash: Sha256Hash,
    reward_tx_hash: Sha256Hash,
    normal_tx_hash: Option<Sha256Hash>,
    parent: Option<NodeId>,
    valid: bool,
    fault: Option<BlockFault>,
}

impl BlockchainNode {
    fn new(block: Block, parent: Option<NodeId>) -> Self {
        BlockchainNode {
            hash: block.hash(),
            reward_tx_hash: block.reward_tx.hash(),
            normal_tx_hash: block.normal_tx().map(|tx| tx.hash()),
            block,
            parent,
            valid: true,
            fault: None,
        }
    }

    pub fn block(&self) -> &Block {
        &self.block
    }

    pub fn hash(&self) -> &Sha256Hash {
        &self.hash
    }

    pub fn height(&self) -> u32 {
        self.block.height
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// The first reason this node was invalidated.
    pub fn fault(&self) -> Option<BlockFault> {
        self.fault
    }

    /// The transaction in this block whose hash is `tx_hash`, if any. An
    /// empty normal-transaction slot never matches.
    pub fn transaction_with_hash(&self, tx_hash: &Sha256Hash) -> Option<&Transaction> {
        if &self.reward_tx_hash == tx_hash {
            return Some(&self.block.reward_tx);
        }
        match &self.normal_tx_hash {
            Some(hash) if hash == tx_hash => Some(&self.block.normal_tx),
            _ => None,
        }
    }

    /// Flags only ever go from valid to invalid; the first fault is kept.
    fn invalidate(&mut self, fault: BlockFault) {
        if self.valid {
            self.valid = false;
            self.fault = Some(fault);
        }
    }
}

/// Arena owning every admitted block. Parents are referenced by index and
/// are always admitted before their children.
#[derive(Debug, Default)]
pub struct BlockTree {
    nodes: Vec<BlockchainNode>,
    by_hash: HashMap<Sha256Hash, NodeId>,
    orphans: OrphanPolicy,
}

impl BlockTree {
    pub fn new(orphans: OrphanPolicy) -> Self {
        BlockTree {
            orphans,
            ..BlockTree::default()
        }
    }

    /// Admits structurally valid blocks in ascending height order. Blocks of
    /// equal height keep their relative input order.
    pub fn build(blocks: impl IntoIterator<Item = Block>, orphans: OrphanPolicy) -> Self {
        let mut blocks: Vec<Block> = blocks.into_iter().collect();
        blocks.sort_by_key(|b| b.height);

        let mut tree = BlockTree::new(orphans);
        for block in blocks {
            tree.admit(block);
        }
        tree
    }

    /// Links `block` to the first admitted node carrying its parent hash.
    /// Returns `None` only when the orphan policy drops the block.
    pub fn admit(&mut self, block: Block) -> Option<NodeId> {
        let id = NodeId(self.nodes.len());

        if block.is_genesis() {
            return Some(self.push(id, BlockchainNode::new(block, None)));
        }

        let Some(parent_id) = self.by_hash.get(&block.prev_block_hash).copied() else {
            return match self.orphans {
                OrphanPolicy::Admit => {
                    let mut node = BlockchainNode::new(block, None);
                    node.invalidate(BlockFault::Orphan);
                    debug!("Admitted orphan {} at height {}", hex::encode(node.hash), node.height());
                    Some(self.push(id, node))
                }
                OrphanPolicy::Reject => {
                    debug!("Dropped orphan {} at height {}", block.hash_str(), block.height);
                    None
                }
            };
        };

        let parent_height = self.nodes[parent_id.0].height();
        let mut node = BlockchainNode::new(block, Some(parent_id));
        if parent_height.checked_add(1) != Some(node.height()) {
            node.invalidate(BlockFault::HeightGap {
                parent: parent_height,
                child: node.height(),
            });
        }
        Some(self.push(id, node))
    }

    fn push(&mut self, id: NodeId, node: BlockchainNode) -> NodeId {
        if self.by_hash.contains_key(&node.hash) {
            warn!(
                "Duplicate block {}; children will link to the first copy",
                hex::encode(node.hash)
            );
        } else {
            self.by_hash.insert(node.hash, id);
        }
        self.nodes.push(node);
        id
    }

    /// Runs the ancestry rules on every node and applies the verdicts.
    /// Returns how many nodes were newly invalidated.
    pub fn validate_ancestry(&mut self) -> usize {
        // Verdicts come from the untouched tree so the order of evaluation
        // never matters.
        let verdicts: Vec<(NodeId, BlockFault)> = self
            .ids()
            .filter_map(|id| check_ancestry(self, id).err().map(|fault| (id, fault)))
            .collect();

        let mut invalidated = 0;
        for (id, fault) in verdicts {
            let node = &mut self.nodes[id.0];
            if node.valid {
                debug!(
                    "Invalidated {} at height {}: {}",
                    hex::encode(node.hash),
                    node.height(),
                    fault
                );
                invalidated += 1;
            }
            node.invalidate(fault);
        }
        invalidated
    }

    pub fn get(&self, id: NodeId) -> &BlockchainNode {
        &self.nodes[id.0]
    }

    pub fn nodes(&self) -> &[BlockchainNode] {
        &self.nodes
    }

    /// Node ids in admission order.
    pub fn ids(&self) -> impl DoubleEndedIterator<Item = NodeId> + ExactSizeIterator {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn valid_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.valid).count()
    }

    /// Strict ancestors of `id`, parent first.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.get(id).parent,
        }
    }
}

pub struct Ancestors<'a> {
    tree: &'a BlockTree,
    next: Option<NodeId>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a BlockchainNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.tree.get(self.next?);
        self.next = node.parent;
        Some(node)
    }
}
