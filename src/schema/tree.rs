use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde_json::Value;

use crate::domain::{Condition, TreeNode};

use super::field::decode_field;

/// Decodes a full schema document into an owned tree.
///
/// The document is a recursive object where a handful of keys are attributes
/// of the current node and every other key structurally introduces a node:
/// the first unrecognized key at an unnamed level names the node itself (the
/// outer `{ "treeName": { ... } }` wrapper), later ones append sibling
/// children. Malformed JSON at any level is fatal; there is no partial tree.
pub fn decode_tree(raw: &Value) -> Result<TreeNode> {
    let mut root = TreeNode::default();
    walk(raw, &mut root)?;
    Ok(root)
}

fn walk(raw: &Value, node: &mut TreeNode) -> Result<()> {
    let object = raw
        .as_object()
        .context("tree level must be a JSON object")?;

    for (key, member) in object {
        match key.as_str() {
            "elem" => decode_field_groups(member, node)?,
            "description" => node.description = optional_text(member),
            "display_name" => node.display_name = optional_text(member),
            "type" => {
                if let Some(tag) = member.as_str() {
                    node.kind = tag.to_string();
                }
            }
            "action" => node.action = optional_text(member),
            "sub_type" => node.sub_type = optional_text(member),
            "site_name" => node.site_name = optional_text(member),
            "condition" => {
                if !member.is_null() {
                    node.conditions = serde_json::from_value::<Vec<Condition>>(member.clone())
                        .context("malformed condition list")?;
                }
            }
            "child" => {
                // The empty object is the backend's sentinel for "no children".
                let has_children = member
                    .as_object()
                    .map(|children| !children.is_empty())
                    .unwrap_or(false);
                if has_children {
                    let mut child = TreeNode::default();
                    walk(member, &mut child)?;
                    node.children.push(child);
                }
            }
            name => {
                if node.name.is_empty() {
                    node.name = name.to_string();
                    walk(member, node)?;
                } else {
                    let mut child = TreeNode::named(name);
                    walk(member, &mut child)?;
                    node.children.push(child);
                }
            }
        }
    }

    Ok(())
}

fn decode_field_groups(member: &Value, node: &mut TreeNode) -> Result<()> {
    let Some(entries) = member.as_array() else {
        return Ok(());
    };
    for entry in entries {
        let Some(fields) = entry.as_object() else {
            continue;
        };
        for (key, fragment) in fields {
            // Placeholder slots arrive as null or empty objects; skip them
            // rather than materializing hollow leaves.
            if fragment.is_null()
                || fragment
                    .as_object()
                    .map(|object| object.is_empty())
                    .unwrap_or(false)
            {
                continue;
            }
            let field = decode_field(fragment, 0, false)
                .with_context(|| format!("failed to decode field '{key}'"))?;
            node.field_groups
                .push(IndexMap::from([(key.clone(), field)]));
        }
    }
    Ok(())
}

fn optional_text(member: &Value) -> Option<String> {
    match member {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::domain::{Control, FieldKind, FieldValue};

    use super::*;

    #[test]
    fn single_field_document_decodes_end_to_end() {
        let document = json!({
            "root": {
                "elem": [
                    {"f1": {"value": "5", "type": "int", "control": "input_control"}}
                ],
                "child": {}
            }
        });
        let tree = decode_tree(&document).expect("decoded");
        assert_eq!(tree.name, "root");
        assert!(tree.children.is_empty());
        assert_eq!(tree.field_groups.len(), 1);
        let field = &tree.field_groups[0]["f1"];
        assert_eq!(field.kind, FieldKind::Int);
        assert_eq!(field.control, Control::Text);
        assert_eq!(field.value, Some(FieldValue::Int(5)));
    }

    #[test]
    fn empty_child_sentinel_appends_nothing() {
        let tree = decode_tree(&json!({"root": {"child": {}}})).expect("decoded");
        assert!(tree.children.is_empty());
    }

    #[test]
    fn child_object_appends_exactly_one_named_node() {
        let tree =
            decode_tree(&json!({"root": {"child": {"a": {"description": "nested"}}}}))
                .expect("decoded");
        assert_eq!(tree.children.len(), 1);
        assert_eq!(tree.children[0].name, "a");
        assert_eq!(tree.children[0].description.as_deref(), Some("nested"));
    }

    #[test]
    fn later_structural_keys_become_siblings() {
        let document = json!({
            "root": {
                "display_name": "Root",
                "first": {"description": "one"},
                "second": {"description": "two"}
            }
        });
        let tree = decode_tree(&document).expect("decoded");
        assert_eq!(tree.name, "root");
        let names: Vec<&str> = tree
            .children
            .iter()
            .map(|child| child.name.as_str())
            .collect();
        assert_eq!(names, ["first", "second"]);
    }

    #[test]
    fn node_attributes_and_conditions_are_mapped() {
        let document = json!({
            "deploy": {
                "type": "group",
                "display_name": "Deploy",
                "description": "deployment settings",
                "action": "deploy",
                "sub_type": "site",
                "site_name": "primary",
                "condition": [
                    {"key": "mode", "allow": {"mode": ["expert"]}}
                ]
            }
        });
        let tree = decode_tree(&document).expect("decoded");
        assert_eq!(tree.kind, "group");
        assert_eq!(tree.action.as_deref(), Some("deploy"));
        assert_eq!(tree.site_name.as_deref(), Some("primary"));
        assert_eq!(tree.conditions.len(), 1);
        assert_eq!(tree.conditions[0].key, "mode");
    }

    #[test]
    fn null_and_empty_field_fragments_are_skipped() {
        let document = json!({
            "root": {
                "elem": [
                    {"ghost": null},
                    {"hollow": {}},
                    {"real": {"type": "string"}}
                ]
            }
        });
        let tree = decode_tree(&document).expect("decoded");
        assert_eq!(tree.field_groups.len(), 1);
        assert!(tree.field_groups[0].contains_key("real"));
    }
}
