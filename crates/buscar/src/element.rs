//! Canonical element model.
//!
//! One `Element` is a normalized node of a platform UI hierarchy: every
//! builder, regardless of the backend it serves, produces this shape. The
//! selector engine and the interaction layer only ever see this model.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A point in 2D space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point {
    /// Create a new point
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Normalized bounding rectangle.
///
/// Each component is independently nullable: a platform that does not report
/// geometry for a node yields `None`, never `0`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: Option<f64>,
    /// Top edge
    pub y: Option<f64>,
    /// Width
    pub width: Option<f64>,
    /// Height
    pub height: Option<f64>,
}

impl Rect {
    /// Create a rect from known components
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            width: Some(width),
            height: Some(height),
        }
    }

    /// A rect with no known components
    #[must_use]
    pub const fn unknown() -> Self {
        Self {
            x: None,
            y: None,
            width: None,
            height: None,
        }
    }

    /// Whether all four components are known
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.x.is_some() && self.y.is_some() && self.width.is_some() && self.height.is_some()
    }

    /// Whether the rect has a known, strictly positive area
    #[must_use]
    pub fn has_area(&self) -> bool {
        matches!((self.width, self.height), (Some(w), Some(h)) if w > 0.0 && h > 0.0)
    }

    /// Geometric center, if geometry is complete
    #[must_use]
    pub fn center(&self) -> Option<Point> {
        match (self.x, self.y, self.width, self.height) {
            (Some(x), Some(y), Some(w), Some(h)) => Some(Point::new(x + w / 2.0, y + h / 2.0)),
            _ => None,
        }
    }
}

/// A text field that platforms encode either as one scalar or as a list.
///
/// The `name` field doubles as a class-style membership list on some
/// platforms; class terms accept both encodings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextValue {
    /// Single scalar encoding
    Text(String),
    /// List encoding
    List(Vec<String>),
}

impl TextValue {
    /// Class-style membership test.
    ///
    /// Scalar encodings match by containment, list encodings by exact entry.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        match self {
            Self::Text(text) => text.contains(needle),
            Self::List(entries) => entries.iter().any(|entry| entry == needle),
        }
    }

    /// Coerce to one string (list entries are space-joined)
    #[must_use]
    pub fn coerce(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::List(entries) => entries.join(" "),
        }
    }
}

impl From<&str> for TextValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for TextValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<String>> for TextValue {
    fn from(entries: Vec<String>) -> Self {
        Self::List(entries)
    }
}

/// Value-copied snapshot of an element's owning parent.
///
/// Taken at construction time, never a live link: the tree stays acyclic and
/// each element remains independently serializable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentRef {
    /// Parent's synthetic id
    pub id: String,
    /// Parent's name at construction time
    pub name: Option<TextValue>,
    /// Parent's label at construction time
    pub label: Option<String>,
    /// Parent's value at construction time
    pub value: Option<String>,
}

/// One normalized tree node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Synthetic id, `type:counter`, unique within a snapshot
    pub id: String,
    /// Lower-cased, namespace-stripped tag/class
    #[serde(rename = "type")]
    pub kind: String,
    /// Name, or class-style membership list
    pub name: Option<TextValue>,
    /// Accessible label
    pub label: Option<String>,
    /// Current value/text
    pub value: Option<String>,
    /// Normalized geometry; components independently nullable
    pub rect: Rect,
    /// Derived interaction point; present only with complete geometry
    pub hitpoint: Option<Point>,
    /// Whether the element accepts interaction
    pub enabled: bool,
    /// Whether the element is visible, per the source platform's policy
    pub visible: bool,
    /// Whether the element holds keyboard focus
    pub has_keyboard_focus: bool,
    /// Whether the backend considers the element valid
    pub valid: bool,
    /// Position among same-type or same-list siblings
    pub index: usize,
    /// Back-reference snapshot of the owning parent
    pub parent: Option<ParentRef>,
    /// Owned children, in discovery order
    pub children: Vec<Element>,
}

impl Element {
    /// Breadth-first iterator over all descendants, excluding `self`.
    #[must_use]
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            queue: self.children.iter().collect(),
        }
    }

    /// Stringified field access used by attribute terms.
    ///
    /// Returns `None` for fields absent on this element; an attribute test
    /// against a missing field is a non-match, not an error.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<String> {
        match key {
            "id" => Some(self.id.clone()),
            "type" => Some(self.kind.clone()),
            "name" => self.name.as_ref().map(TextValue::coerce),
            "label" => self.label.clone(),
            "value" => self.value.clone(),
            "enabled" => Some(self.enabled.to_string()),
            "visible" => Some(self.visible.to_string()),
            "hasKeyboardFocus" => Some(self.has_keyboard_focus.to_string()),
            "valid" => Some(self.valid.to_string()),
            "index" => Some(self.index.to_string()),
            "x" => self.rect.x.map(|v| v.to_string()),
            "y" => self.rect.y.map(|v| v.to_string()),
            "width" => self.rect.width.map(|v| v.to_string()),
            "height" => self.rect.height.map(|v| v.to_string()),
            _ => None,
        }
    }

    /// Coordinate the interaction layer should target, if known
    #[must_use]
    pub const fn hit_target(&self) -> Option<Point> {
        self.hitpoint
    }

    /// Snapshot of this element for its children's back-references
    #[must_use]
    pub fn as_parent_ref(&self) -> ParentRef {
        ParentRef {
            id: self.id.clone(),
            name: self.name.clone(),
            label: self.label.clone(),
            value: self.value.clone(),
        }
    }
}

/// Breadth-first descendant iterator
#[derive(Debug)]
pub struct Descendants<'a> {
    queue: VecDeque<&'a Element>,
}

impl<'a> Descendants<'a> {
    pub(crate) fn from_queue(queue: VecDeque<&'a Element>) -> Self {
        Self { queue }
    }
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.queue.pop_front()?;
        self.queue.extend(element.children.iter());
        Some(element)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn leaf(id: &str, kind: &str) -> Element {
        Element {
            id: id.to_string(),
            kind: kind.to_string(),
            name: None,
            label: None,
            value: None,
            rect: Rect::unknown(),
            hitpoint: None,
            enabled: true,
            visible: true,
            has_keyboard_focus: false,
            valid: true,
            index: 0,
            parent: None,
            children: Vec::new(),
        }
    }

    mod rect_tests {
        use super::*;

        #[test]
        fn test_center_of_complete_rect() {
            let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
            let center = rect.center().unwrap();
            assert!((center.x - 60.0).abs() < f64::EPSILON);
            assert!((center.y - 45.0).abs() < f64::EPSILON);
        }

        #[test]
        fn test_unknown_rect_has_no_center() {
            assert!(Rect::unknown().center().is_none());
        }

        #[test]
        fn test_partial_rect_has_no_center() {
            let rect = Rect {
                x: Some(1.0),
                y: None,
                width: Some(10.0),
                height: Some(10.0),
            };
            assert!(rect.center().is_none());
            assert!(!rect.is_complete());
        }

        #[test]
        fn test_has_area() {
            assert!(Rect::new(0.0, 0.0, 1.0, 1.0).has_area());
            assert!(!Rect::new(0.0, 0.0, 0.0, 10.0).has_area());
            assert!(!Rect::unknown().has_area());
        }
    }

    mod text_value_tests {
        use super::*;

        #[test]
        fn test_scalar_containment() {
            let name = TextValue::from("transferTableView");
            assert!(name.contains("transferTableView"));
            assert!(name.contains("TableView"));
            assert!(!name.contains("button"));
        }

        #[test]
        fn test_list_membership_is_exact() {
            let name = TextValue::from(vec!["primary".to_string(), "selected".to_string()]);
            assert!(name.contains("primary"));
            assert!(!name.contains("prim"));
        }

        #[test]
        fn test_coerce_joins_list() {
            let name = TextValue::from(vec!["a".to_string(), "b".to_string()]);
            assert_eq!(name.coerce(), "a b");
        }

        #[test]
        fn test_untagged_deserialization() {
            let scalar: TextValue = serde_json::from_str("\"cell\"").unwrap();
            assert_eq!(scalar, TextValue::Text("cell".to_string()));
            let list: TextValue = serde_json::from_str("[\"a\",\"b\"]").unwrap();
            assert!(matches!(list, TextValue::List(_)));
        }
    }

    mod attribute_tests {
        use super::*;

        #[test]
        fn test_known_attributes_stringify() {
            let mut element = leaf("button:0", "button");
            element.label = Some("OK".to_string());
            element.rect = Rect::new(10.0, 20.0, 30.0, 40.0);
            assert_eq!(element.attribute("type").as_deref(), Some("button"));
            assert_eq!(element.attribute("label").as_deref(), Some("OK"));
            assert_eq!(element.attribute("enabled").as_deref(), Some("true"));
            assert_eq!(element.attribute("x").as_deref(), Some("10"));
            assert_eq!(element.attribute("index").as_deref(), Some("0"));
        }

        #[test]
        fn test_absent_attribute_is_none() {
            let element = leaf("button:0", "button");
            assert!(element.attribute("label").is_none());
            assert!(element.attribute("width").is_none());
            assert!(element.attribute("no-such-field").is_none());
        }
    }

    mod descendants_tests {
        use super::*;

        #[test]
        fn test_breadth_first_order() {
            let mut root = leaf("window:0", "window");
            let mut group = leaf("group:0", "group");
            group.children.push(leaf("cell:0", "cell"));
            root.children.push(group);
            root.children.push(leaf("button:0", "button"));

            let order: Vec<&str> = root.descendants().map(|e| e.id.as_str()).collect();
            assert_eq!(order, vec!["group:0", "button:0", "cell:0"]);
        }

        #[test]
        fn test_descendants_excludes_self() {
            let root = leaf("window:0", "window");
            assert_eq!(root.descendants().count(), 0);
        }
    }

    mod serde_tests {
        use super::*;

        #[test]
        fn test_wire_field_names() {
            let element = leaf("cell:1", "cell");
            let json = serde_json::to_value(&element).unwrap();
            assert_eq!(json["type"], "cell");
            assert!(json.get("hasKeyboardFocus").is_some());
            assert!(json.get("kind").is_none());
        }

        #[test]
        fn test_null_geometry_stays_null() {
            let element = leaf("cell:0", "cell");
            let json = serde_json::to_value(&element).unwrap();
            assert!(json["rect"]["x"].is_null());
            assert_ne!(json["rect"]["x"], 0);
        }
    }
}
