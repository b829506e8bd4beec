use std::cmp::Ordering;
use std::collections::HashMap;

use cindertree_protocol::{Category, ExcludeSet};

use super::filtered_top::is_node_excluded;
use crate::model::FrameTree;

/// A node's displayed value under the exclusion set: hidden nodes inherit
/// the summed value of their visible descendants; visible nodes report
/// their own (zoom-placeholder-aware) value.
pub fn node_value(tree: &FrameTree, id: usize, excludes: &ExcludeSet) -> u64 {
    let Some(node) = tree.node(id) else {
        return 0;
    };
    if is_node_excluded(node, excludes) {
        node.children
            .iter()
            .map(|&child| node_value(tree, child, excludes))
            .sum()
    } else {
        node.display_value()
    }
}

/// The nearest visible descendants of a node: hidden children are
/// replaced by their own visible children, flattening arbitrary chains of
/// hidden nodes into one flat list of next-visible frames. Structural
/// mirror of the sample bubbling in `filtered_top`.
pub fn visible_children(tree: &FrameTree, id: usize, excludes: &ExcludeSet) -> Vec<usize> {
    let mut out = Vec::new();
    push_visible(tree, id, excludes, &mut out);
    out
}

fn push_visible(tree: &FrameTree, id: usize, excludes: &ExcludeSet, out: &mut Vec<usize>) {
    let Some(node) = tree.node(id) else {
        return;
    };
    for &child in &node.children {
        let Some(child_node) = tree.node(child) else {
            continue;
        };
        if is_node_excluded(child_node, excludes) {
            push_visible(tree, child, excludes, out);
        } else {
            out.push(child);
        }
    }
}

/// Per-node sort annotations for one exclusion set: each visible node's
/// own display value, and the summed value of the sibling group it lands
/// in under its nearest visible ancestor.
///
/// Ranking by group sum keeps many small same-type frames — e.g. one
/// dependency's frames scattered under hidden wrappers — together in the
/// display order, so toggling visibility does not jar their relative
/// ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedValues {
    group: Vec<u64>,
    own: Vec<u64>,
}

impl GroupedValues {
    pub fn group_value(&self, id: usize) -> u64 {
        self.group.get(id).copied().unwrap_or(0)
    }

    pub fn own_value(&self, id: usize) -> u64 {
        self.own.get(id).copied().unwrap_or(0)
    }

    /// Order for display: descending group sum, then descending own
    /// value. Ties compare equal — stability is the sort algorithm's
    /// concern (`slice::sort_by` is stable).
    pub fn compare(&self, a: usize, b: usize) -> Ordering {
        self.group_value(b)
            .cmp(&self.group_value(a))
            .then_with(|| self.own_value(b).cmp(&self.own_value(a)))
    }

    /// Sort a sibling id list for display under the current filter.
    pub fn sort(&self, ids: &mut [usize]) {
        ids.sort_by(|&a, &b| self.compare(a, b));
    }
}

/// Compute the grouped sort annotations for the whole tree.
///
/// Walks the visible structure from the root: every visible node appears
/// in exactly one visible-children list (its nearest visible ancestor's),
/// is grouped there with its `{category}:{type}` peers, and receives the
/// group's summed value.
pub fn compute_grouped_sort_values(tree: &FrameTree, excludes: &ExcludeSet) -> GroupedValues {
    let count = tree.len();
    let mut own = vec![0u64; count];
    // Pre-order ids: reverse scan sees children before parents, so hidden
    // nodes can inherit already-computed child values.
    for id in (0..count).rev() {
        let Some(node) = tree.node(id) else { continue };
        let value = if is_node_excluded(node, excludes) {
            node.children.iter().map(|&child| own[child]).sum()
        } else {
            node.display_value()
        };
        own[id] = value;
    }

    let mut group = vec![0u64; count];
    if count > 0 {
        group[0] = own[0];
        let mut pending = vec![0usize];
        while let Some(id) = pending.pop() {
            let visible = visible_children(tree, id, excludes);

            let mut sums: HashMap<(Category, &str), u64> = HashMap::new();
            for &member in &visible {
                if let Some(node) = tree.node(member) {
                    *sums.entry((node.category, node.kind.as_str())).or_default() += own[member];
                }
            }
            for &member in &visible {
                if let Some(node) = tree.node(member) {
                    group[member] = sums
                        .get(&(node.category, node.kind.as_str()))
                        .copied()
                        .unwrap_or(0);
                }
                pending.push(member);
            }
        }
    }

    GroupedValues { group, own }
}
