//! Classification and filtered aggregation of captured call-stack samples.
//!
//! The pipeline takes the raw sample tree built by the tick converter and
//! produces a classified, statistically-annotated tree a viewer can filter
//! by code-origin category without re-reading the samples:
//!
//! ```text
//!   RawNode tree ─▶ FrameTree::build ─▶ add_stack_top_values ─▶ anonymize
//!      (wire)        (parse+classify)     (static per-key)       + targets
//!                                                │
//!                      filtered_stack_top ◀──────┘──▶ RenderNode tree
//!                      (per exclusion set)              + code areas
//! ```
//!
//! All passes are synchronous pure tree recursion; the exclusion set is an
//! explicit parameter everywhere, never ambient state.

pub mod classify;
pub mod model;
pub mod views;

pub use classify::ParseError;
pub use model::{Analysis, FrameNode, FrameTree, StackTopStats};
