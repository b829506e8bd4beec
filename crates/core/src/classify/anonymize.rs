use cindertree_protocol::{Category, EnvironmentInfo};
use log::warn;

use super::paths;
use crate::model::{FrameNode, FrameTree};

/// Rewrite absolute file paths in a classified tree to project-relative
/// form, so a shared report does not leak the capture machine's directory
/// layout. Runs once, after classification.
pub fn anonymize_tree(tree: &mut FrameTree, env: &EnvironmentInfo) {
    for node in tree.nodes_mut() {
        anonymize_node(node, env);
    }
}

fn anonymize_node(node: &mut FrameNode, env: &EnvironmentInfo) {
    // Core and engine paths never point inside user directories.
    if matches!(node.category, Category::Core | Category::AllV8 | Category::Root) {
        return;
    }
    let Some(file_name) = node.file_name.clone() else {
        return;
    };

    // ES-module frames carry a URL; the path inside it is what gets
    // relativized.
    let absolute = file_name.strip_prefix("file://").unwrap_or(&file_name);

    let Some(relative) = paths::relative_from(absolute, &env.main_directory, env.path_separator)
    else {
        warn!(
            "cannot relativize {file_name:?} against {:?}; leaving path untouched",
            env.main_directory
        );
        return;
    };

    let relative = if relative.starts_with("..") {
        relative
    } else {
        format!("./{relative}")
    };

    node.name = match (node.line_number, node.column_number) {
        (Some(line), Some(column)) => {
            format!("{} {relative}:{line}:{column}", node.function_name)
        }
        _ => format!("{} {relative}", node.function_name),
    };
    node.file_name = Some(relative);
}
