//! Generic nested-node builder.
//!
//! The fallback strategy for backends without a dedicated builder: any
//! object key whose value is an object or a list of objects is a child tag,
//! scalar keys are attributes, and the tag itself is the type. Geometry is
//! inline `x`/`y`/`width`/`height`; unknown components stay null.

use super::{flag_field, name_field, number_field, partition_children, text_field, RawNode};
use crate::element::Rect;
use serde_json::{Map, Value};

pub(crate) fn parse(payload: &Value) -> Vec<RawNode> {
    let Some(map) = payload.as_object() else {
        tracing::warn!("generic payload is not an object; skipping");
        return Vec::new();
    };
    children_of(map)
}

fn children_of(map: &Map<String, Value>) -> Vec<RawNode> {
    let mut children = Vec::new();
    for (tag, siblings) in partition_children(map) {
        for (position, sibling) in siblings.iter().enumerate() {
            children.push(node(tag, sibling, position));
        }
    }
    children
}

fn node(tag: &str, map: &Map<String, Value>, position: usize) -> RawNode {
    let mut node = RawNode::new(tag.to_ascii_lowercase());
    node.name = map.get("name").and_then(name_field);
    node.label = map.get("label").and_then(text_field);
    node.value = map.get("value").and_then(text_field);
    node.rect = Rect {
        x: map.get("x").and_then(number_field),
        y: map.get("y").and_then(number_field),
        width: map.get("width").and_then(number_field),
        height: map.get("height").and_then(number_field),
    };
    node.enabled = map.get("enabled").and_then(flag_field).unwrap_or(true);
    node.has_keyboard_focus = map.get("focused").and_then(flag_field).unwrap_or(false);
    node.valid = map.get("valid").and_then(flag_field).unwrap_or(true);
    node.visible = map
        .get("visible")
        .and_then(flag_field)
        .unwrap_or_else(|| node.rect.has_area());
    node.index = position;
    node.children = children_of(map);
    node
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::builder::{build_tree, Platform};
    use serde_json::json;

    fn transfer_payload() -> Value {
        json!({
            "window": {
                "width": 800, "height": 600, "x": 0, "y": 0,
                "tableview": {
                    "name": "transferTableView",
                    "x": 0, "y": 0, "width": 800, "height": 500,
                    "tablegroup": {
                        "label": "Transfers",
                        "x": 0, "y": 0, "width": 800, "height": 40
                    },
                    "tablecell": [
                        {"x": 0, "y": 40,  "width": 800, "height": 44,
                         "statictext": {"value": "alpha", "x": 8, "y": 40, "width": 200, "height": 20}},
                        {"x": 0, "y": 84,  "width": 800, "height": 44,
                         "statictext": {"value": "beta", "x": 8, "y": 84, "width": 200, "height": 20}},
                        {"x": 0, "y": 128, "width": 800, "height": 44,
                         "statictext": {"value": "gamma", "x": 8, "y": 128, "width": 200, "height": 20}},
                        {"x": 0, "y": 172, "width": 800, "height": 44,
                         "statictext": {"value": "delta", "x": 8, "y": 172, "width": 200, "height": 20}},
                        {"x": 0, "y": 216, "width": 800, "height": 44,
                         "statictext": {"value": "epsilon", "x": 8, "y": 216, "width": 200, "height": 20}}
                    ]
                }
            }
        })
    }

    #[test]
    fn test_tags_become_lowercased_types() {
        let payload = json!({"Window": {"Button": {"label": "OK"}}});
        let tree = build_tree(&payload, Platform::Generic);
        assert!(tree.get("window:0").is_some());
        assert!(tree.get("button:0").is_some());
    }

    #[test]
    fn test_list_index_is_positional() {
        let tree = build_tree(&transfer_payload(), Platform::Generic);
        let cells = tree.elements_of_kind("tablecell");
        assert_eq!(cells.len(), 5);
        let indexes: Vec<usize> = cells.iter().map(|c| c.index).collect();
        assert_eq!(indexes, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_each_cell_owns_one_statictext() {
        let tree = build_tree(&transfer_payload(), Platform::Generic);
        for cell in tree.elements_of_kind("tablecell") {
            assert_eq!(cell.children.len(), 1);
            assert_eq!(cell.children[0].kind, "statictext");
        }
    }

    #[test]
    fn test_explicit_visible_flag_overrides_geometry() {
        let payload = json!({
            "panel": {"x": 0, "y": 0, "width": 100, "height": 100, "visible": false}
        });
        let tree = build_tree(&payload, Platform::Generic);
        assert!(!tree.get("panel:0").unwrap().visible);
    }

    #[test]
    fn test_geometry_free_node_is_not_visible() {
        let payload = json!({"panel": {"label": "about"}});
        let tree = build_tree(&payload, Platform::Generic);
        let panel = tree.get("panel:0").unwrap();
        assert_eq!(panel.rect.x, None);
        assert!(!panel.visible);
        assert!(panel.hitpoint.is_none());
    }
}
