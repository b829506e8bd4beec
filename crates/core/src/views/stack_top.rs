use cindertree_protocol::Category;

use crate::model::{FrameNode, FrameTree, StackTopStats};

/// The fixed single-key filters the static aggregator precomputes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StackTopKey {
    App,
    Deps,
    Core,
    V8,
    Cpp,
    Init,
    Native,
    Regexp,
}

const KEYS: [StackTopKey; 8] = [
    StackTopKey::App,
    StackTopKey::Deps,
    StackTopKey::Core,
    StackTopKey::V8,
    StackTopKey::Cpp,
    StackTopKey::Init,
    StackTopKey::Native,
    StackTopKey::Regexp,
];

fn matches_key(node: &FrameNode, key: StackTopKey) -> bool {
    match key {
        StackTopKey::App => node.category == Category::App,
        StackTopKey::Deps => node.category == Category::Deps,
        StackTopKey::Core => node.category == Category::Core,
        StackTopKey::Init => node.is_init,
        StackTopKey::V8 => node.category == Category::AllV8 && node.kind == "v8",
        StackTopKey::Cpp => node.category == Category::AllV8 && node.kind == "cpp",
        StackTopKey::Native => node.category == Category::AllV8 && node.kind == "native",
        StackTopKey::Regexp => node.category == Category::AllV8 && node.kind == "regexp",
    }
}

fn stat(stats: &StackTopStats, key: StackTopKey) -> u64 {
    match key {
        StackTopKey::App => stats.app,
        StackTopKey::Deps => stats.deps,
        StackTopKey::Core => stats.core,
        StackTopKey::V8 => stats.v8,
        StackTopKey::Cpp => stats.cpp,
        StackTopKey::Init => stats.init,
        StackTopKey::Native => stats.native,
        StackTopKey::Regexp => stats.regexp,
    }
}

fn stat_mut(stats: &mut StackTopStats, key: StackTopKey) -> &mut u64 {
    match key {
        StackTopKey::App => &mut stats.app,
        StackTopKey::Deps => &mut stats.deps,
        StackTopKey::Core => &mut stats.core,
        StackTopKey::V8 => &mut stats.v8,
        StackTopKey::Cpp => &mut stats.cpp,
        StackTopKey::Init => &mut stats.init,
        StackTopKey::Native => &mut stats.native,
        StackTopKey::Regexp => &mut stats.regexp,
    }
}

/// Precompute, for every node and each single filter key, how many extra
/// top-of-stack samples the node would gain if every matching descendant
/// were hidden.
///
/// Propagation follows unbroken same-key chains only: a child matching
/// key *k* contributes its own base samples plus its already-computed
/// value for *k*; a non-matching child blocks its whole subtree, even if
/// deeper descendants match. The eight resulting fields are a fast
/// preview dataset for single-key toggles and are NOT composable —
/// arbitrary exclusion sets go through `filtered_top`.
pub fn add_stack_top_values(tree: &mut FrameTree) {
    // Pre-order ids mean children always have larger indices, so a
    // reverse scan visits every child before its parent.
    for id in (0..tree.len()).rev() {
        let mut stats = StackTopStats::default();
        if let Some(node) = tree.node(id) {
            for &child_id in &node.children {
                let Some(child) = tree.node(child_id) else {
                    continue;
                };
                for key in KEYS {
                    if matches_key(child, key) {
                        *stat_mut(&mut stats, key) += child.top_base + stat(&child.stack_top, key);
                    }
                }
            }
        }
        tree.nodes_mut()[id].stack_top = stats;
    }
}
