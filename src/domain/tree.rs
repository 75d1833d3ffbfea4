use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::FieldState;

/// Visibility predicate over values of fields elsewhere in the tree: the node
/// is shown when the field at `key` currently holds one of the allowed values.
/// Evaluation is owned by the backend; the client only carries the predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub key: String,
    pub allow: IndexMap<String, Vec<Value>>,
}

/// Interior node of the configuration tree: a named container of child nodes
/// and field groups.
///
/// Each node exclusively owns its children and leaves; the tree is rebuilt
/// wholesale on every fetch, so no sharing or patching is needed. A logical
/// field shown in two nodes is always an explicit deep copy.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    /// Stable key, also used as the path segment towards this node.
    pub name: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
    /// Free-form tag, "form" or "group".
    pub kind: String,
    pub children: Vec<TreeNode>,
    /// Ordered rows of sibling leaves presented together.
    pub field_groups: Vec<IndexMap<String, FieldState>>,
    pub conditions: Vec<Condition>,
    pub action: Option<String>,
    pub sub_type: Option<String>,
    pub site_name: Option<String>,
}

impl Default for TreeNode {
    fn default() -> Self {
        Self {
            name: String::new(),
            display_name: None,
            description: None,
            kind: "form".to_string(),
            children: Vec::new(),
            field_groups: Vec::new(),
            conditions: Vec::new(),
            action: None,
            sub_type: None,
            site_name: None,
        }
    }
}

impl TreeNode {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn display_label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    /// A node carrying neither children nor field groups.
    pub fn is_empty_group(&self) -> bool {
        self.children.is_empty() && self.field_groups.is_empty()
    }

    /// Finds a descendant by its slash-separated path of node names.
    pub fn find(&self, path: &str) -> Option<&TreeNode> {
        let mut current = self;
        for segment in path.split('/').filter(|segment| !segment.is_empty()) {
            current = current
                .children
                .iter()
                .find(|child| child.name == segment)?;
        }
        Some(current)
    }

    /// Total number of leaves below this node, including nested groups.
    pub fn leaf_count(&self) -> usize {
        let own: usize = self.field_groups.iter().map(|group| group.len()).sum();
        own + self
            .children
            .iter()
            .map(|child| child.leaf_count())
            .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_walks_nested_children_by_name() {
        let mut root = TreeNode::named("root");
        let mut sites = TreeNode::named("sites");
        sites.children.push(TreeNode::named("primary"));
        root.children.push(sites);

        assert!(root.find("sites/primary").is_some());
        assert!(root.find("sites/missing").is_none());
        assert_eq!(root.find("").map(|node| node.name.as_str()), Some("root"));
    }

    #[test]
    fn empty_group_detection() {
        let node = TreeNode::named("leafless");
        assert!(node.is_empty_group());
    }
}
