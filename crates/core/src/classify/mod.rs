pub mod anonymize;
pub mod label;
pub mod paths;
pub mod rules;
pub mod target;

pub use anonymize::anonymize_tree;
pub use label::{FrameLabel, JsFrame, NativeFrame, NativeTag, OptMarker, ParseError, WasmFrame};
pub use rules::{Classification, REGEXP_FILE_NAME, RuleInput, classify};
pub use target::{resolve_target, resolve_targets};
