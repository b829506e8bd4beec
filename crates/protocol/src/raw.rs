use serde::{Deserialize, Serialize};

/// One node of the unclassified sample tree handed over by the
/// tick-to-tree converter.
///
/// `name` is the raw frame label exactly as captured; it is parsed and
/// classified by the analysis core, never here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNode {
    /// Raw frame label.
    pub name: String,
    /// Total samples in which this frame appears anywhere on the stack.
    pub value: u64,
    /// Samples in which this frame is the topmost, before any filtering.
    #[serde(default)]
    pub top: u64,
    #[serde(default)]
    pub children: Vec<RawNode>,
}
