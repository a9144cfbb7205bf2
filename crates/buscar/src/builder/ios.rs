//! Accessibility-style builder.
//!
//! Nodes carry an `XCUIElementType…` type name, explicit `rect` geometry,
//! and an explicit `children` list. Visibility is derived, not reported:
//! an element is visible when it has a positive on-screen area and is
//! interactable.

use super::{flag_field, name_field, number_field, text_field, RawNode};
use crate::element::Rect;
use serde_json::{Map, Value};
use std::collections::HashMap;

const TYPE_PREFIX: &str = "XCUIElementType";

pub(crate) fn parse(payload: &Value) -> Vec<RawNode> {
    let mut roots = match payload {
        Value::Object(map) => node(map).into_iter().collect(),
        Value::Array(items) => nodes(items),
        _ => {
            tracing::warn!("accessibility payload is not an object or list; skipping");
            Vec::new()
        }
    };
    assign_type_indexes(&mut roots);
    roots
}

fn node(map: &Map<String, Value>) -> Option<RawNode> {
    let Some(kind) = map.get("type").and_then(Value::as_str) else {
        tracing::warn!("accessibility node without a type; skipping branch");
        return None;
    };

    let mut node = RawNode::new(strip_type(kind));
    node.name = map.get("name").and_then(name_field);
    node.label = map.get("label").and_then(text_field);
    node.value = map.get("value").and_then(text_field);
    node.rect = rect(map);
    node.enabled = map
        .get("isEnabled")
        .or_else(|| map.get("enabled"))
        .and_then(flag_field)
        .unwrap_or(true);
    node.has_keyboard_focus = map
        .get("hasKeyboardFocus")
        .or_else(|| map.get("hasFocus"))
        .and_then(flag_field)
        .unwrap_or(false);
    node.valid = map
        .get("isValid")
        .or_else(|| map.get("valid"))
        .and_then(flag_field)
        .unwrap_or(true);
    // Derived visibility policy: positive area plus interactability.
    node.visible = node.rect.has_area() && node.enabled;

    if let Some(children) = map.get("children") {
        node.children = match children {
            Value::Array(items) => nodes(items),
            // Singular child encoding: same construction path as the list.
            Value::Object(child) => node_list(&[child]),
            _ => {
                tracing::warn!("accessibility children are not a list; skipping branch");
                Vec::new()
            }
        };
        assign_type_indexes(&mut node.children);
    }
    Some(node)
}

fn nodes(items: &[Value]) -> Vec<RawNode> {
    let objects: Vec<&Map<String, Value>> = items
        .iter()
        .filter_map(|item| {
            let object = item.as_object();
            if object.is_none() {
                tracing::warn!("skipping non-object accessibility child");
            }
            object
        })
        .collect();
    node_list(&objects)
}

fn node_list(objects: &[&Map<String, Value>]) -> Vec<RawNode> {
    objects.iter().filter_map(|map| node(map)).collect()
}

/// Geometry is reported under `rect` (or inline as a fallback); unknown
/// components stay null.
fn rect(map: &Map<String, Value>) -> Rect {
    let source = map.get("rect").and_then(Value::as_object).unwrap_or(map);
    Rect {
        x: source.get("x").and_then(number_field),
        y: source.get("y").and_then(number_field),
        width: source.get("width").and_then(number_field),
        height: source.get("height").and_then(number_field),
    }
}

fn strip_type(raw: &str) -> String {
    raw.strip_prefix(TYPE_PREFIX)
        .unwrap_or(raw)
        .to_ascii_lowercase()
}

/// Index is the position among same-type siblings.
fn assign_type_indexes(siblings: &mut [RawNode]) {
    let mut counters: HashMap<String, usize> = HashMap::new();
    for sibling in siblings {
        let counter = counters.entry(sibling.kind.clone()).or_insert(0);
        sibling.index = *counter;
        *counter += 1;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::builder::{build_tree, Platform};
    use serde_json::json;

    fn table_payload() -> Value {
        json!({
            "type": "XCUIElementTypeWindow",
            "rect": {"x": 0, "y": 0, "width": 375, "height": 812},
            "isEnabled": "1",
            "children": [{
                "type": "XCUIElementTypeTableView",
                "name": "transferTableView",
                "rect": {"x": 0, "y": 100, "width": 375, "height": 600},
                "isEnabled": "1",
                "children": [
                    {"type": "XCUIElementTypeCell", "label": "first",
                     "rect": {"x": 0, "y": 100, "width": 375, "height": 44}, "isEnabled": true},
                    {"type": "XCUIElementTypeCell", "label": "second",
                     "rect": {"x": 0, "y": 144, "width": 375, "height": 44}, "isEnabled": true}
                ]
            }]
        })
    }

    #[test]
    fn test_type_prefix_is_stripped_and_lowercased() {
        let tree = build_tree(&table_payload(), Platform::Ios);
        assert_eq!(tree.get("window:0").unwrap().kind, "window");
        assert!(tree.get("tableview:0").is_some());
        assert_eq!(tree.elements_of_kind("cell").len(), 2);
    }

    #[test]
    fn test_numeric_string_flags_are_accepted() {
        let tree = build_tree(&table_payload(), Platform::Ios);
        assert!(tree.get("window:0").unwrap().enabled);
    }

    #[test]
    fn test_visibility_needs_area_and_enabled() {
        let payload = json!({
            "type": "XCUIElementTypeWindow",
            "rect": {"x": 0, "y": 0, "width": 375, "height": 812},
            "children": [
                {"type": "XCUIElementTypeButton",
                 "rect": {"x": 0, "y": 0, "width": 0, "height": 44}},
                {"type": "XCUIElementTypeButton",
                 "rect": {"x": 0, "y": 0, "width": 44, "height": 44}, "isEnabled": false},
                {"type": "XCUIElementTypeButton",
                 "rect": {"x": 0, "y": 0, "width": 44, "height": 44}}
            ]
        });
        let tree = build_tree(&payload, Platform::Ios);
        assert!(!tree.get("button:0").unwrap().visible);
        assert!(!tree.get("button:1").unwrap().visible);
        assert!(tree.get("button:2").unwrap().visible);
    }

    #[test]
    fn test_missing_geometry_stays_null() {
        let payload = json!({"type": "XCUIElementTypeOther"});
        let tree = build_tree(&payload, Platform::Ios);
        let element = tree.get("other:0").unwrap();
        assert_eq!(element.rect.x, None);
        assert!(element.hitpoint.is_none());
        assert!(!element.visible);
    }

    #[test]
    fn test_untyped_branch_is_skipped_not_fatal() {
        let payload = json!({
            "type": "XCUIElementTypeWindow",
            "children": [
                {"label": "no type here", "children": [{"type": "XCUIElementTypeCell"}]},
                {"type": "XCUIElementTypeButton"}
            ]
        });
        let tree = build_tree(&payload, Platform::Ios);
        // The untyped branch and everything below it is dropped.
        assert_eq!(tree.len(), 2);
        assert!(tree.get("button:0").is_some());
    }

    #[test]
    fn test_index_counts_same_type_siblings() {
        let tree = build_tree(&table_payload(), Platform::Ios);
        assert_eq!(tree.get("cell:0").unwrap().index, 0);
        assert_eq!(tree.get("cell:1").unwrap().index, 1);
        assert_eq!(tree.get("tableview:0").unwrap().index, 0);
    }
}
