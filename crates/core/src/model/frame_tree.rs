use cindertree_protocol::{
    Category, EnvironmentInfo, OnStackTop, RawNode, RenderNode, TreeKind,
};

use crate::classify::label::{self, FrameLabel, OptMarker};
use crate::classify::rules::{self, REGEXP_FILE_NAME, RuleInput};
use crate::classify::ParseError;
use crate::views::filtered_top::StackTopView;

/// Static single-key preview statistics: how many additional top-of-stack
/// samples a node would gain if every descendant matching that one key
/// were hidden. Not composable across keys — arbitrary exclusion sets go
/// through `views::filtered_top` instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StackTopStats {
    pub app: u64,
    pub deps: u64,
    pub core: u64,
    pub v8: u64,
    pub cpp: u64,
    pub init: u64,
    pub native: u64,
    pub regexp: u64,
}

/// One classified stack frame.
///
/// Classification fields are written exactly once during construction and
/// never re-derived; only the aggregation statistics are recomputed later
/// (and the per-filter `asViewed` values live outside the tree entirely,
/// in a `StackTopView`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameNode {
    /// Stable pre-order index within the tree (root = 0).
    pub id: usize,
    /// Display string; rewritten by anonymization and by the
    /// regular-expression display convention.
    pub name: String,
    /// May be empty (anonymous functions, the synthetic root).
    pub function_name: String,
    /// Possibly anonymized; `None` for frames without path information.
    pub file_name: Option<String>,
    /// Original path before anonymization.
    pub full_file_name: Option<String>,
    pub line_number: Option<u32>,
    pub column_number: Option<u32>,
    pub is_init: bool,
    pub is_inlinable: bool,
    pub is_optimized: bool,
    pub is_unoptimized: bool,
    pub category: Category,
    /// Finer label: dependency package name, application name, or a fixed
    /// engine subtype. (`type` in the wire vocabulary.)
    pub kind: String,
    /// Samples in which this frame appears anywhere on the stack.
    pub on_stack: u64,
    /// Samples in which this exact frame is topmost, before any filtering.
    pub top_base: u64,
    /// Static single-key preview statistics.
    pub stack_top: StackTopStats,
    /// True value parked here while a zoom placeholder zeroes `on_stack`.
    pub original: Option<u64>,
    /// Resolvable source location, if any.
    pub target: Option<String>,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
}

impl FrameNode {
    /// Display value honoring the zoomed-out placeholder convention.
    pub fn display_value(&self) -> u64 {
        self.original.unwrap_or(self.on_stack)
    }
}

/// A classified sample tree.
///
/// Nodes live in a flat arena indexed by id; ids are assigned in pre-order
/// during construction, so a child's id is always greater than its
/// parent's — a reverse index scan is a post-order traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameTree {
    kind: TreeKind,
    nodes: Vec<FrameNode>,
}

impl FrameTree {
    /// Build a classified tree from the raw sample tree. Every label is
    /// parsed and classified exactly once; an unrecognized label aborts
    /// the whole build (a partial tree would corrupt sample invariants
    /// downstream).
    ///
    /// The root is synthetic: category `none`, type = the tree kind, no
    /// label parsing.
    pub fn build(
        raw: &RawNode,
        kind: TreeKind,
        env: &EnvironmentInfo,
        app_name: &str,
    ) -> Result<Self, ParseError> {
        let mut tree = Self {
            kind,
            nodes: vec![FrameNode {
                id: 0,
                name: raw.name.clone(),
                function_name: String::new(),
                file_name: None,
                full_file_name: None,
                line_number: None,
                column_number: None,
                is_init: false,
                is_inlinable: false,
                is_optimized: false,
                is_unoptimized: false,
                category: Category::Root,
                kind: kind.as_str().to_string(),
                on_stack: raw.value,
                top_base: raw.top,
                stack_top: StackTopStats::default(),
                original: None,
                target: None,
                parent: None,
                children: Vec::new(),
            }],
        };
        for child in &raw.children {
            tree.add_subtree(child, 0, env, app_name)?;
        }
        Ok(tree)
    }

    fn add_subtree(
        &mut self,
        raw: &RawNode,
        parent: usize,
        env: &EnvironmentInfo,
        app_name: &str,
    ) -> Result<(), ParseError> {
        let id = self.nodes.len();
        let node = classify_frame(id, parent, raw, env, app_name)?;
        self.nodes.push(node);
        self.nodes[parent].children.push(id);
        for child in &raw.children {
            self.add_subtree(child, id, env, app_name)?;
        }
        Ok(())
    }

    pub fn kind(&self) -> TreeKind {
        self.kind
    }

    pub fn node(&self, id: usize) -> Option<&FrameNode> {
        self.nodes.get(id)
    }

    pub fn root(&self) -> &FrameNode {
        &self.nodes[0]
    }

    pub fn nodes(&self) -> &[FrameNode] {
        &self.nodes
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [FrameNode] {
        &mut self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Park a node's true value and zero its displayed one (the viewer
    /// does this for frames zoomed out of view). `clear_zoom_placeholder`
    /// restores it.
    pub fn set_zoom_placeholder(&mut self, id: usize) {
        if let Some(node) = self.nodes.get_mut(id) {
            if node.original.is_none() {
                node.original = Some(node.on_stack);
                node.on_stack = 0;
            }
        }
    }

    pub fn clear_zoom_placeholder(&mut self, id: usize) {
        if let Some(node) = self.nodes.get_mut(id) {
            if let Some(original) = node.original.take() {
                node.on_stack = original;
            }
        }
    }

    /// Serialize into the nested JSON-compatible shape the viewer
    /// consumes. When a `StackTopView` from a dynamic aggregation pass is
    /// supplied, its `asViewed` values are embedded; otherwise the field
    /// is absent.
    pub fn to_render(&self, top: Option<&StackTopView>) -> RenderNode {
        self.render_node(0, top)
    }

    fn render_node(&self, id: usize, top: Option<&StackTopView>) -> RenderNode {
        let node = &self.nodes[id];
        RenderNode {
            id: node.id as u64,
            name: node.name.clone(),
            category: node.category,
            kind: node.kind.clone(),
            function_name: if node.function_name.is_empty() {
                None
            } else {
                Some(node.function_name.clone())
            },
            file_name: node.file_name.clone(),
            full_file_name: node.full_file_name.clone(),
            line_number: node.line_number,
            column_number: node.column_number,
            is_init: node.is_init,
            is_inlinable: node.is_inlinable,
            is_optimized: node.is_optimized,
            is_unoptimized: node.is_unoptimized,
            value: node.on_stack,
            on_stack_top: OnStackTop {
                base: node.top_base,
                app: node.stack_top.app,
                deps: node.stack_top.deps,
                core: node.stack_top.core,
                v8: node.stack_top.v8,
                cpp: node.stack_top.cpp,
                init: node.stack_top.init,
                native: node.stack_top.native,
                regexp: node.stack_top.regexp,
                as_viewed: top.map(|view| view.as_viewed(id)),
            },
            target: node.target.clone(),
            children: node
                .children
                .iter()
                .map(|&child| self.render_node(child, top))
                .collect(),
        }
    }
}

fn classify_frame(
    id: usize,
    parent: usize,
    raw: &RawNode,
    env: &EnvironmentInfo,
    app_name: &str,
) -> Result<FrameNode, ParseError> {
    let label_text = label::normalize_label(&raw.name);
    let parsed = label::parse(&label_text)?;

    let (function_name, file_name, line_number, column_number) = match &parsed {
        FrameLabel::Js(js) => (
            js.function_name.clone(),
            Some(js.file_name.clone()),
            Some(js.line),
            Some(js.column),
        ),
        FrameLabel::Native(native) => (
            native.function_name.clone().unwrap_or_default(),
            native.file_name.clone(),
            None,
            None,
        ),
        FrameLabel::Wasm(wasm) => (wasm.function_name.clone(), None, None, None),
    };
    let (is_init, is_inlinable, marker) = match &parsed {
        FrameLabel::Js(js) => (js.is_init, js.is_inlinable, js.marker),
        FrameLabel::Native(native) => (native.is_init, false, None),
        FrameLabel::Wasm(wasm) => (wasm.is_init, false, None),
    };

    let classification = rules::classify(&RuleInput {
        label: &label_text,
        parsed: &parsed,
        env,
        app_name,
    });

    let full_file_name = file_name.clone();
    let (name, file_name) = if classification.kind == "regexp" {
        // Regex bodies may contain arbitrary whitespace and control
        // characters; display the source wrapped in slashes instead.
        (format!("/{function_name}/"), Some(REGEXP_FILE_NAME.to_string()))
    } else {
        (label_text, file_name)
    };

    Ok(FrameNode {
        id,
        name,
        function_name,
        file_name,
        full_file_name,
        line_number,
        column_number,
        is_init,
        is_inlinable,
        is_optimized: marker == Some(OptMarker::Optimized),
        is_unoptimized: marker == Some(OptMarker::Unoptimized),
        category: classification.category,
        kind: classification.kind,
        on_stack: raw.value,
        top_base: raw.top,
        stack_top: StackTopStats::default(),
        original: None,
        target: None,
        parent: Some(parent),
        children: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cindertree_protocol::{NodeVersions, PathSeparator};

    fn unix_env() -> EnvironmentInfo {
        EnvironmentInfo {
            main_directory: "/root".to_string(),
            path_separator: PathSeparator::Slash,
            node_versions: NodeVersions {
                node: "18.19.0".to_string(),
            },
        }
    }

    fn raw(name: &str, value: u64, top: u64, children: Vec<RawNode>) -> RawNode {
        RawNode {
            name: name.to_string(),
            value,
            top,
            children,
        }
    }

    #[test]
    fn ids_follow_pre_order() {
        let input = raw(
            "all stacks",
            10,
            0,
            vec![
                raw(
                    "a /root/a.js:1:1",
                    6,
                    1,
                    vec![raw("b /root/b.js:1:1", 5, 5, Vec::new())],
                ),
                raw("c /root/c.js:1:1", 4, 4, Vec::new()),
            ],
        );
        let tree = FrameTree::build(&input, TreeKind::Merged, &unix_env(), "my-app").unwrap();
        assert_eq!(tree.len(), 4);
        let names: Vec<&str> = tree
            .nodes()
            .iter()
            .map(|n| n.function_name.as_str())
            .collect();
        assert_eq!(names, ["", "a", "b", "c"]);
        assert_eq!(tree.node(1).unwrap().children, vec![2]);
        assert_eq!(tree.node(2).unwrap().parent, Some(1));
        assert_eq!(tree.root().children, vec![1, 3]);
    }

    #[test]
    fn root_is_synthetic_and_unclassified() {
        let input = raw("all stacks", 3, 0, Vec::new());
        let tree = FrameTree::build(&input, TreeKind::Unmerged, &unix_env(), "my-app").unwrap();
        let root = tree.root();
        assert_eq!(root.category, Category::Root);
        assert_eq!(root.kind, "unmerged");
        assert_eq!(root.name, "all stacks");
        assert_eq!(root.on_stack, 3);
    }

    #[test]
    fn concrete_core_scenario() {
        let input = raw(
            "all stacks",
            1,
            0,
            vec![raw("coreFunction util.js:15:7", 1, 1, Vec::new())],
        );
        let tree = FrameTree::build(&input, TreeKind::Merged, &unix_env(), "my-app").unwrap();
        let node = tree.node(1).unwrap();
        assert_eq!(node.category, Category::Core);
        assert_eq!(node.kind, "core");
        assert_eq!(node.file_name.as_deref(), Some("util.js"));
        assert_eq!(node.line_number, Some(15));
        assert_eq!(node.column_number, Some(7));
    }

    #[test]
    fn concrete_deps_scenario() {
        let input = raw(
            "all stacks",
            1,
            0,
            vec![raw(
                "~getX /a/b/node_modules/foo/x.js:1:1 [INLINABLE]",
                1,
                1,
                Vec::new(),
            )],
        );
        let tree = FrameTree::build(&input, TreeKind::Merged, &unix_env(), "my-app").unwrap();
        let node = tree.node(1).unwrap();
        assert_eq!(node.category, Category::Deps);
        assert_eq!(node.kind, "foo");
        assert!(node.is_inlinable);
        assert!(!node.is_optimized);
        assert!(node.is_unoptimized);
    }

    #[test]
    fn unrecognized_label_fails_the_whole_build() {
        let input = raw(
            "all stacks",
            2,
            0,
            vec![
                raw("fine /root/a.js:1:1", 1, 1, Vec::new()),
                raw("not a frame at all", 1, 1, Vec::new()),
            ],
        );
        let err = FrameTree::build(&input, TreeKind::Merged, &unix_env(), "my-app").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnrecognizedLabel("not a frame at all".to_string())
        );
    }

    #[test]
    fn regexp_frames_get_display_safe_names() {
        let input = raw(
            "all stacks",
            1,
            0,
            vec![raw("a.*b [CODE:RegExp]", 1, 1, Vec::new())],
        );
        let tree = FrameTree::build(&input, TreeKind::Merged, &unix_env(), "my-app").unwrap();
        let node = tree.node(1).unwrap();
        assert_eq!(node.kind, "regexp");
        assert_eq!(node.name, "/a.*b/");
        assert_eq!(node.file_name.as_deref(), Some(REGEXP_FILE_NAME));
        assert_eq!(node.full_file_name, None);
    }

    #[test]
    fn zoom_placeholder_round_trips() {
        let input = raw("all stacks", 9, 0, Vec::new());
        let mut tree = FrameTree::build(&input, TreeKind::Merged, &unix_env(), "my-app").unwrap();
        tree.set_zoom_placeholder(0);
        assert_eq!(tree.root().on_stack, 0);
        assert_eq!(tree.root().display_value(), 9);
        tree.clear_zoom_placeholder(0);
        assert_eq!(tree.root().on_stack, 9);
        assert_eq!(tree.root().original, None);
    }

    #[test]
    fn render_omits_as_viewed_until_computed() {
        let input = raw(
            "all stacks",
            1,
            0,
            vec![raw("a /root/a.js:2:4", 1, 1, Vec::new())],
        );
        let tree = FrameTree::build(&input, TreeKind::Merged, &unix_env(), "my-app").unwrap();
        let render = tree.to_render(None);
        assert_eq!(render.id, 0);
        assert_eq!(render.children.len(), 1);
        assert_eq!(render.children[0].on_stack_top.as_viewed, None);
        assert_eq!(render.children[0].line_number, Some(2));

        let json = serde_json::to_value(&render).unwrap();
        assert_eq!(json["category"], "none");
        assert_eq!(json["children"][0]["type"], "my-app");
    }
}
