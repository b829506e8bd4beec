use std::collections::BTreeSet;

use cindertree_protocol::{Category, CodeArea};

use crate::model::{Analysis, FrameTree};

/// Fixed engine sub-areas always offered by the filter UI.
const ENGINE_AREAS: [&str; 4] = ["v8", "native", "cpp", "regexp"];

/// Collect the catalog of code areas present in the analysis, for
/// building the filter UI.
///
/// Both tree variants are scanned because inlining can make a dependency
/// visible in only one of them. Dependency names are deduplicated and
/// sorted lexicographically for stable display.
///
/// The `app` area's children stay empty here — the tree walk has no
/// knowledge of application sub-areas; a caller that does can attach them
/// with `CodeArea::with_children`.
pub fn collect_code_areas(analysis: &Analysis) -> Vec<CodeArea> {
    let mut dependencies = BTreeSet::new();
    collect_dependencies(analysis.merged(), &mut dependencies);
    collect_dependencies(analysis.unmerged(), &mut dependencies);

    let dependency_children: Vec<CodeArea> = dependencies
        .into_iter()
        .map(|name| CodeArea::child_of(Category::Deps, name))
        .collect();
    let engine_children: Vec<CodeArea> = ENGINE_AREAS
        .iter()
        .map(|&name| CodeArea::child_of(Category::AllV8, name))
        .collect();

    vec![
        CodeArea::top_level(Category::App),
        CodeArea::top_level(Category::Deps).with_children(dependency_children),
        CodeArea::top_level(Category::Wasm),
        CodeArea::top_level(Category::Core),
        CodeArea::top_level(Category::AllV8).with_children(engine_children),
    ]
}

fn collect_dependencies(tree: &FrameTree, into: &mut BTreeSet<String>) {
    for node in tree.nodes() {
        if node.category == Category::Deps {
            into.insert(node.kind.clone());
        }
    }
}
