pub mod code_areas;
pub mod exclude;
pub mod raw;
pub mod render;
pub mod types;

pub use code_areas::CodeArea;
pub use exclude::{ExcludeKey, ExcludeSet, KeyParseError, default_excludes};
pub use raw::RawNode;
pub use render::{OnStackTop, RenderNode, RenderProfile};
pub use types::{Category, EnvironmentInfo, NodeVersions, PathSeparator, TreeKind};
