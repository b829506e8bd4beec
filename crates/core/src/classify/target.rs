use cindertree_protocol::{Category, EnvironmentInfo};

use crate::model::{FrameNode, FrameTree};

/// Attach navigable source targets. Runs after classification and
/// anonymization, so app/deps targets are the project-relative paths.
pub fn resolve_targets(tree: &mut FrameTree, env: &EnvironmentInfo) {
    for node in tree.nodes_mut() {
        node.target = resolve_target(node, env);
    }
}

/// A resolvable source location for one node: the (possibly anonymized)
/// file path for app/deps frames, a URL into the runtime's published
/// standard-library source for core frames, nothing otherwise.
pub fn resolve_target(node: &FrameNode, env: &EnvironmentInfo) -> Option<String> {
    match node.category {
        Category::App | Category::Deps => node.file_name.clone(),
        Category::Core => {
            let file = node.file_name.as_deref()?;
            let mut path = file.strip_prefix("node:").unwrap_or(file).to_string();
            // `node:`-style specifiers drop the extension; the published
            // sources carry it.
            if !path.ends_with(".js") && !path.ends_with(".mjs") {
                path.push_str(".js");
            }
            let version = env.node_versions.node.trim_start_matches('v');
            let line = node.line_number.unwrap_or(1);
            Some(format!(
                "https://github.com/nodejs/node/blob/v{version}/lib/{path}#L{line}"
            ))
        }
        _ => None,
    }
}
