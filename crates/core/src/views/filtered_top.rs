use cindertree_protocol::{Category, ExcludeKey, ExcludeSet};

use crate::model::{FrameNode, FrameTree};

/// Per-node "top of stack as currently viewed" counts for one exclusion
/// set. Owned separately from the tree, so the same tree can be evaluated
/// under several filters side by side without cross-contamination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackTopView {
    as_viewed: Vec<u64>,
}

impl StackTopView {
    pub fn as_viewed(&self, id: usize) -> u64 {
        self.as_viewed.get(id).copied().unwrap_or(0)
    }

    /// Sum over all nodes. Equals the sum of every node's base count for
    /// any exclusion set — hiding moves credit, never loses it.
    pub fn total(&self) -> u64 {
        self.as_viewed.iter().sum()
    }
}

/// Whether the exclusion set hides this node.
///
/// Category and type keys are independent axes checked in OR: excluding
/// either the broad category or the specific `{category}:{type}` hides
/// the node. The synthetic root never matches any key.
pub fn is_node_excluded(node: &FrameNode, excludes: &ExcludeSet) -> bool {
    if node.category == Category::Root {
        return false;
    }
    excludes.iter().any(|key| match key {
        ExcludeKey::Init => node.is_init,
        ExcludeKey::Inlinable => node.is_inlinable,
        ExcludeKey::Category(category) => *category == node.category,
        ExcludeKey::Kind(category, kind) => *category == node.category && *kind == node.kind,
    })
}

/// Recompute every node's true top-of-stack count under an arbitrary
/// exclusion set, in one post-order pass.
///
/// A hidden node's samples bubble to its parent — through arbitrarily
/// long chains of hidden nodes, regardless of how their categories
/// interleave — until the nearest visible ancestor absorbs them. A
/// visible node absorbs everything beneath it and stops the bubble, so
/// every sample's credit lands on exactly one node.
pub fn filtered_stack_top(tree: &FrameTree, excludes: &ExcludeSet) -> StackTopView {
    let mut as_viewed = vec![0u64; tree.len()];
    if !tree.is_empty() {
        set_stack_top(tree, 0, excludes, &mut as_viewed);
    }
    StackTopView { as_viewed }
}

/// Returns the sample count the parent must absorb because this node is
/// hidden (0 for visible nodes).
fn set_stack_top(
    tree: &FrameTree,
    id: usize,
    excludes: &ExcludeSet,
    as_viewed: &mut [u64],
) -> u64 {
    let Some(node) = tree.node(id) else {
        return 0;
    };
    let mut total = node.top_base;
    for &child in &node.children {
        total += set_stack_top(tree, child, excludes, as_viewed);
    }
    if is_node_excluded(node, excludes) {
        as_viewed[id] = 0;
        total
    } else {
        as_viewed[id] = total;
        0
    }
}
