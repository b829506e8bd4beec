pub mod analysis;
pub mod frame_tree;

pub use analysis::Analysis;
pub use frame_tree::{FrameNode, FrameTree, StackTopStats};
