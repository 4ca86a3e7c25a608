use super::tree::{BlockTree, BlockchainNode, NodeId};
use crate::crypto::Sha256Hash;
use crate::error::{ChainError, Result};
use serde::{Deserialize, Serialize};

/// How the selector settles on one leaf.
///
/// Candidates are always scanned from the most recently admitted node
/// backwards. With height-sorted admission (as [`BlockTree::build`] does)
/// both policies land on a leaf of the same height. Only `Longest` still
/// guarantees the tallest chain when nodes are admitted out of height order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionPolicy {
    /// Take the first fully valid candidate in scan order.
    FirstValid,
    /// Take the tallest fully valid candidate; ties go to scan order.
    #[default]
    Longest,
}

/// Path from genesis (index 0) to the selected leaf. Borrows the tree, so it
/// can never outlive the arena.
#[derive(Debug, Clone)]
pub struct LongestChain<'a> {
    nodes: Vec<&'a BlockchainNode>,
}

impl<'a> LongestChain<'a> {
    /// Walks from `leaf` up to its root.
    pub fn from_leaf(tree: &'a BlockTree, leaf: NodeId) -> Self {
        let mut nodes: Vec<&BlockchainNode> = std::iter::once(tree.get(leaf))
            .chain(tree.ancestors(leaf))
            .collect();
        nodes.reverse();
        LongestChain { nodes }
    }

    pub fn height(&self) -> u32 {
        self.tip().height()
    }

    pub fn tip(&self) -> &'a BlockchainNode {
        // from_leaf always yields at least the leaf itself
        self.nodes[self.nodes.len() - 1]
    }

    pub fn tip_hash(&self) -> Sha256Hash {
        *self.tip().hash()
    }

    pub fn nodes(&self) -> &[&'a BlockchainNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a BlockchainNode> + '_ {
        self.nodes.iter().copied()
    }
}

/// Whether the path from each node to its root is valid throughout and ends
/// at a height-0 block, indexed like the arena.
fn complete_paths(tree: &BlockTree) -> Vec<bool> {
    let mut complete = Vec::with_capacity(tree.len());
    // Parents precede children in admission order.
    for node in tree.nodes() {
        let ok = node.is_valid()
            && match node.parent() {
                Some(parent) => complete[parent.index()],
                None => node.height() == 0,
            };
        complete.push(ok);
    }
    complete
}

pub fn select_longest_chain(tree: &BlockTree, policy: SelectionPolicy) -> Result<LongestChain<'_>> {
    let complete = complete_paths(tree);
    let mut candidates = tree.ids().rev().filter(|id| complete[id.index()]);

    let leaf = match policy {
        SelectionPolicy::FirstValid => candidates.next(),
        SelectionPolicy::Longest => candidates.fold(None, |best: Option<NodeId>, id| match best {
            Some(b) if tree.get(b).height() >= tree.get(id).height() => Some(b),
            _ => Some(id),
        }),
    };

    leaf.map(|id| LongestChain::from_leaf(tree, id))
        .ok_or(ChainError::NoValidChain {
            admitted: tree.len(),
        })
}
