use serde::{Deserialize, Serialize};

use crate::code_areas::CodeArea;
use crate::types::Category;

/// The classified, statistically-annotated tree in the nested
/// JSON-compatible form the viewer consumes.
///
/// ```text
///   RawNode tree ──▶ classify / aggregate (core) ──▶ RenderNode tree ──▶ viewer
/// ```
///
/// Field names are camelCase on the wire, matching the viewer's
/// JavaScript vocabulary. Nullable fields are omitted when absent —
/// downstream code must treat absence as "not applicable", never as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderNode {
    /// Stable pre-order index within the tree (root = 0).
    pub id: u64,
    /// Display string; may have been rewritten by anonymization or the
    /// regular-expression display convention.
    pub name: String,
    pub category: Category,
    /// Finer label: dependency package name, application name, or a fixed
    /// engine subtype.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub function_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub file_name: Option<String>,
    /// Original path before anonymization.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub full_file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub line_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub column_number: Option<u32>,
    pub is_init: bool,
    pub is_inlinable: bool,
    pub is_optimized: bool,
    pub is_unoptimized: bool,
    /// Samples in which this frame appears anywhere on the stack.
    pub value: u64,
    pub on_stack_top: OnStackTop,
    /// Resolvable source location (project-relative path or remote URL).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub target: Option<String>,
    #[serde(default)]
    pub children: Vec<RenderNode>,
}

/// Top-of-stack sample statistics for one node.
///
/// `base` is the unfiltered count. The eight per-key fields are the static
/// single-key preview values; `asViewed` is present only once a dynamic
/// aggregation pass has supplied it for a concrete exclusion set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnStackTop {
    pub base: u64,
    pub app: u64,
    pub deps: u64,
    pub core: u64,
    pub v8: u64,
    pub cpp: u64,
    pub init: u64,
    pub native: u64,
    pub regexp: u64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub as_viewed: Option<u64>,
}

/// The full analysis output: both tree variants plus the code-area
/// catalog, which travels alongside the trees rather than inside them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderProfile {
    pub merged: RenderNode,
    pub unmerged: RenderNode,
    pub code_areas: Vec<CodeArea>,
}
