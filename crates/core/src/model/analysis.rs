use cindertree_protocol::{CodeArea, EnvironmentInfo, RawNode, RenderProfile, TreeKind};

use super::frame_tree::FrameTree;
use crate::classify::{ParseError, anonymize_tree, resolve_targets};
use crate::views::filtered_top::StackTopView;
use crate::views::{add_stack_top_values, collect_code_areas};

/// The full classified analysis: both tree variants built independently
/// from the same raw samples.
///
/// The merged variant combines optimized/unoptimized versions of a
/// function; the unmerged variant keeps them separate. They share no
/// nodes — each is its own arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    merged: FrameTree,
    unmerged: FrameTree,
}

impl Analysis {
    /// Classify both raw tree variants and run the one-time enrichment
    /// passes: static per-key statistics, path anonymization, and target
    /// resolution.
    ///
    /// Fails on the first unrecognized frame label — no partial analysis
    /// is ever returned.
    pub fn from_raw(
        merged: &RawNode,
        unmerged: &RawNode,
        env: &EnvironmentInfo,
        app_name: &str,
    ) -> Result<Self, ParseError> {
        let mut merged = FrameTree::build(merged, TreeKind::Merged, env, app_name)?;
        let mut unmerged = FrameTree::build(unmerged, TreeKind::Unmerged, env, app_name)?;
        for tree in [&mut merged, &mut unmerged] {
            add_stack_top_values(tree);
            anonymize_tree(tree, env);
            resolve_targets(tree, env);
        }
        Ok(Self { merged, unmerged })
    }

    pub fn merged(&self) -> &FrameTree {
        &self.merged
    }

    pub fn unmerged(&self) -> &FrameTree {
        &self.unmerged
    }

    pub fn merged_mut(&mut self) -> &mut FrameTree {
        &mut self.merged
    }

    pub fn unmerged_mut(&mut self) -> &mut FrameTree {
        &mut self.unmerged
    }

    /// The code-area catalog for the filter UI, derived from both
    /// variants.
    pub fn code_areas(&self) -> Vec<CodeArea> {
        collect_code_areas(self)
    }

    /// Serialize everything the viewer needs: both enriched trees plus
    /// the code-area catalog alongside them. Dynamic `asViewed` values
    /// are embedded per tree when the caller supplies the matching
    /// `StackTopView`s.
    pub fn to_render(
        &self,
        merged_top: Option<&StackTopView>,
        unmerged_top: Option<&StackTopView>,
    ) -> RenderProfile {
        RenderProfile {
            merged: self.merged.to_render(merged_top),
            unmerged: self.unmerged.to_render(unmerged_top),
            code_areas: self.code_areas(),
        }
    }
}
