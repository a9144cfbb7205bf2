//! Corner-pair geometry builder.
//!
//! Device dumps arrive as XML converted to nested objects: node classes are
//! java class names, geometry is a `bounds` string holding two corner
//! points, and siblings are encoded as additional keys of the enclosing
//! object rather than an explicit list. Visibility comes from an explicit
//! flag when the dump carries one.

use super::{flag_field, name_field, number_field, partition_children, text_field, RawNode};
use crate::element::Rect;
use serde_json::{Map, Value};

pub(crate) fn parse(payload: &Value) -> Vec<RawNode> {
    let Some(map) = payload.as_object() else {
        tracing::warn!("device dump payload is not an object; skipping");
        return Vec::new();
    };
    if is_node(map) {
        return vec![node("node", map, 0)];
    }
    children_of(map)
}

fn is_node(map: &Map<String, Value>) -> bool {
    map.contains_key("class") || map.contains_key("bounds")
}

/// Partition the enclosing object into sibling tags and recurse over each.
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
    let kind = map
        .get("class")
        .and_then(Value::as_str)
        .map_or_else(|| strip_class(tag), strip_class);

    let mut node = RawNode::new(kind);
    node.name = map.get("resource-id").and_then(name_field);
    node.label = map
        .get("content-desc")
        .or_else(|| map.get("contentDescription"))
        .and_then(text_field);
    node.value = map.get("text").and_then(text_field);
    node.rect = map
        .get("bounds")
        .and_then(Value::as_str)
        .map_or_else(Rect::unknown, parse_bounds);
    node.enabled = map.get("enabled").and_then(flag_field).unwrap_or(true);
    node.has_keyboard_focus = map.get("focused").and_then(flag_field).unwrap_or(false);
    // Explicit visibility flag when the dump carries one; geometry otherwise.
    node.visible = map
        .get("visible-to-user")
        .or_else(|| map.get("displayed"))
        .and_then(flag_field)
        .unwrap_or_else(|| node.rect.has_area());
    node.index = map
        .get("index")
        .and_then(number_field)
        .map_or(position, |value| value as usize);
    node.children = children_of(map);
    node
}

/// Parse a `"[x0,y0][x1,y1]"` corner-pair string.
///
/// Width and height are the corner deltas. A malformed string degrades to an
/// all-null rect; it never becomes a zeroed one.
fn parse_bounds(raw: &str) -> Rect {
    let trimmed = raw.trim();
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'));
    let corners: Option<Vec<f64>> = inner.map(|inner| {
        inner
            .split("][")
            .flat_map(|pair| pair.split(','))
            .filter_map(|coord| coord.trim().parse::<f64>().ok())
            .collect()
    });
    match corners.as_deref() {
        Some([x0, y0, x1, y1]) => Rect {
            x: Some(*x0),
            y: Some(*y0),
            width: Some(x1 - x0),
            height: Some(y1 - y0),
        },
        _ => {
            tracing::warn!(bounds = %raw, "malformed corner-pair bounds; leaving geometry unknown");
            Rect::unknown()
        }
    }
}

fn strip_class(raw: &str) -> String {
    raw.rsplit('.').next().unwrap_or(raw).to_ascii_lowercase()
}
