use serde::{Deserialize, Serialize};

use crate::types::Category;

/// One entry of the code-area catalog the filter UI is built from.
///
/// `exclude_key` is the string the viewer inserts into the exclusion set
/// to hide this area: the area id alone at top level,
/// `{parentId}:{childId}` for children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeArea {
    /// Area identifier shown in the filter UI (a category name, or a
    /// dependency name under `deps`).
    pub id: String,
    pub exclude_key: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CodeArea>,
    /// UI hint: collapse the child list by default when it is long.
    /// Not a data-correctness concern.
    #[serde(default)]
    pub children_visibility_toggle: bool,
}

impl CodeArea {
    /// A childless top-level area; `exclude_key` is the area id itself.
    pub fn top_level(category: Category) -> Self {
        Self {
            id: category.as_str().to_string(),
            exclude_key: category.as_str().to_string(),
            children: Vec::new(),
            children_visibility_toggle: false,
        }
    }

    /// A child area under `parent`; `exclude_key` is `{parent}:{child}`.
    pub fn child_of(parent: Category, id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            exclude_key: format!("{}:{}", parent.as_str(), id),
            id,
            children: Vec::new(),
            children_visibility_toggle: false,
        }
    }

    /// Attach children, setting the visibility toggle hint for long lists.
    pub fn with_children(mut self, children: Vec<CodeArea>) -> Self {
        self.children_visibility_toggle = children.len() > 2;
        self.children = children;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exclude_keys_follow_the_vocabulary() {
        let area = CodeArea::top_level(Category::AllV8).with_children(vec![
            CodeArea::child_of(Category::AllV8, "v8"),
            CodeArea::child_of(Category::AllV8, "cpp"),
        ]);
        assert_eq!(area.exclude_key, "all-v8");
        assert_eq!(area.children[0].exclude_key, "all-v8:v8");
        assert!(!area.children_visibility_toggle);
    }

    #[test]
    fn long_child_lists_get_the_toggle_hint() {
        let deps = CodeArea::top_level(Category::Deps).with_children(vec![
            CodeArea::child_of(Category::Deps, "a"),
            CodeArea::child_of(Category::Deps, "b"),
            CodeArea::child_of(Category::Deps, "c"),
        ]);
        assert!(deps.children_visibility_toggle);
    }

    #[test]
    fn empty_children_are_omitted_from_the_wire() {
        let json = serde_json::to_value(CodeArea::top_level(Category::Core)).unwrap();
        assert!(!json.as_object().unwrap().contains_key("children"));
        assert_eq!(json["excludeKey"], "core");
    }
}
