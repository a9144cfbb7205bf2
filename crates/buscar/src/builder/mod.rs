//! Platform tree builders.
//!
//! One builder strategy per automation backend turns a raw nested payload
//! into a canonical [`ElementTree`]. Builders never raise for a
//! well-formed-but-unexpected shape: malformed branches are logged and
//! skipped, and the rest of the tree still builds. Element discovery is
//! best-effort and retried by callers, so partial trees are acceptable.
//!
//! Id counters are scoped to a single build call. Concurrent sessions
//! building independent trees cannot collide on generated ids.

mod android;
mod generic;
mod ios;

use crate::element::{Element, ParentRef, Rect, TextValue};
use crate::result::BuscarError;
use crate::tree::ElementTree;
use serde_json::{Map, Value};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::str::FromStr;

/// Discriminator selecting a builder strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Accessibility-style hierarchy: explicit `rect` geometry, explicit
    /// `children` list, `XCUIElementType…` type names
    Ios,
    /// Device-dump style: corner-pair `bounds` strings, java class names,
    /// siblings encoded as keys of the enclosing object
    Android,
    /// Generic nested-node payloads: any object-or-list key is a child tag
    Generic,
}

impl Platform {
    /// Build a canonical tree from this platform's raw payload.
    #[must_use]
    pub fn build(self, payload: &Value) -> ElementTree {
        let roots = match self {
            Self::Ios => ios::parse(payload),
            Self::Android => android::parse(payload),
            Self::Generic => generic::parse(payload),
        };
        let tree = finalize(roots);
        tracing::debug!(platform = %self, elements = tree.len(), "built element tree");
        tree
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::Ios => "ios",
            Self::Android => "android",
            Self::Generic => "generic",
        };
        write!(f, "{tag}")
    }
}

impl FromStr for Platform {
    type Err = BuscarError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "ios" => Ok(Self::Ios),
            "android" => Ok(Self::Android),
            "generic" => Ok(Self::Generic),
            _ => Err(BuscarError::UnknownPlatform {
                tag: tag.to_string(),
            }),
        }
    }
}

/// Build a canonical tree from a raw backend payload and a platform tag.
///
/// Never raises: the worst outcome of a malformed payload is an empty tree.
#[must_use]
pub fn build_tree(payload: &Value, platform: Platform) -> ElementTree {
    platform.build(payload)
}

/// Intermediate node produced by the per-platform parse pass.
///
/// Ids, sibling back-references, and hitpoints are assigned by the shared
/// finalize pass so every builder shares one id-assignment order.
#[derive(Debug, Clone)]
pub(crate) struct RawNode {
    pub kind: String,
    pub name: Option<TextValue>,
    pub label: Option<String>,
    pub value: Option<String>,
    pub rect: Rect,
    pub enabled: bool,
    pub visible: bool,
    pub has_keyboard_focus: bool,
    pub valid: bool,
    pub index: usize,
    pub children: Vec<RawNode>,
}

impl RawNode {
    pub(crate) fn new(kind: String) -> Self {
        Self {
            kind,
            name: None,
            label: None,
            value: None,
            rect: Rect::unknown(),
            enabled: true,
            visible: false,
            has_keyboard_focus: false,
            valid: true,
            index: 0,
            children: Vec::new(),
        }
    }
}

/// Per-build-call id allocator: `type:counter`, counter monotonic per type
/// starting at 0, assigned in breadth-first traversal order.
#[derive(Debug, Default)]
struct IdAllocator {
    counters: HashMap<String, usize>,
}

impl IdAllocator {
    fn next(&mut self, kind: &str) -> String {
        let counter = self.counters.entry(kind.to_string()).or_insert(0);
        let id = format!("{kind}:{counter}");
        *counter += 1;
        id
    }
}

/// Assign ids breadth-first and assemble the owned element tree.
fn finalize(roots: Vec<RawNode>) -> ElementTree {
    let mut ids: HashMap<Vec<usize>, String> = HashMap::new();
    let mut alloc = IdAllocator::default();

    let mut queue: VecDeque<(Vec<usize>, &RawNode)> = roots
        .iter()
        .enumerate()
        .map(|(i, node)| (vec![i], node))
        .collect();
    while let Some((path, node)) = queue.pop_front() {
        ids.insert(path.clone(), alloc.next(&node.kind));
        for (i, child) in node.children.iter().enumerate() {
            let mut child_path = path.clone();
            child_path.push(i);
            queue.push_back((child_path, child));
        }
    }

    let elements = roots
        .into_iter()
        .enumerate()
        .map(|(i, node)| assemble(node, vec![i], None, &ids))
        .collect();
    ElementTree::new(elements)
}

fn assemble(
    node: RawNode,
    path: Vec<usize>,
    parent: Option<ParentRef>,
    ids: &HashMap<Vec<usize>, String>,
) -> Element {
    let id = ids.get(&path).cloned().unwrap_or_default();
    let self_ref = ParentRef {
        id: id.clone(),
        name: node.name.clone(),
        label: node.label.clone(),
        value: node.value.clone(),
    };
    let children = node
        .children
        .into_iter()
        .enumerate()
        .map(|(i, child)| {
            let mut child_path = path.clone();
            child_path.push(i);
            assemble(child, child_path, Some(self_ref.clone()), ids)
        })
        .collect();
    Element {
        id,
        kind: node.kind,
        name: node.name,
        label: node.label,
        value: node.value,
        rect: node.rect,
        hitpoint: node.rect.center(),
        enabled: node.enabled,
        visible: node.visible,
        has_keyboard_focus: node.has_keyboard_focus,
        valid: node.valid,
        index: node.index,
        parent,
        children,
    }
}

/// Sanitized scalar text: trimmed, empty becomes `None`.
pub(crate) fn text_field(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

/// Text field accepting both the scalar and the list encoding.
pub(crate) fn name_field(value: &Value) -> Option<TextValue> {
    match value {
        Value::Array(items) => {
            let entries: Vec<String> = items.iter().filter_map(text_field).collect();
            (!entries.is_empty()).then(|| TextValue::List(entries))
        }
        other => text_field(other).map(TextValue::Text),
    }
}

/// Numeric field accepting numbers and numeric strings. Unknown is `None`,
/// never `0`.
pub(crate) fn number_field(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Boolean field accepting bools, `"true"`/`"false"`, `"1"`/`"0"`, and
/// numbers.
pub(crate) fn flag_field(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::String(text) => match text.trim() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        Value::Number(number) => number.as_f64().map(|v| v != 0.0),
        _ => None,
    }
}

/// Partition an enclosing object into child tags.
///
/// A key holds children when its value is an object (singular encoding) or a
/// list containing objects (list encoding); both feed one construction path.
/// Scalar keys are attributes of the enclosing node and are skipped here.
/// A list mixing objects with other values has its malformed entries dropped.
pub(crate) fn partition_children<'a>(
    map: &'a Map<String, Value>,
) -> Vec<(&'a str, Vec<&'a Map<String, Value>>)> {
    let mut tags = Vec::new();
    for (key, value) in map {
        match value {
            Value::Object(child) => tags.push((key.as_str(), vec![child])),
            Value::Array(items) => {
                let objects: Vec<&Map<String, Value>> =
                    items.iter().filter_map(Value::as_object).collect();
                if objects.is_empty() {
                    continue;
                }
                if objects.len() < items.len() {
                    tracing::warn!(tag = %key, "skipping malformed sibling entries");
                }
                tags.push((key.as_str(), objects));
            }
            _ => {}
        }
    }
    tags
}
