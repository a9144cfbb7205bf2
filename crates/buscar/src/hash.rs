//! Snapshot fingerprinting.
//!
//! Two snapshots with identical element content and structure hash equally;
//! any content or structural change changes the hash. Consumed by callers
//! for change detection and artifact labeling — the evaluator does not
//! depend on it for correctness.

use crate::element::{Element, TextValue};
use crate::tree::ElementTree;
use sha2::{Digest, Sha256};

impl ElementTree {
    /// Compute the content fingerprint of this snapshot.
    ///
    /// SHA-256 over a canonical document-order serialization of every
    /// element, hex-encoded.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for element in self.iter() {
            hasher.update(canonical_record(element).as_bytes());
        }
        let result = hasher.finalize();
        format!("{result:x}")
    }
}

/// One element as an unambiguous field-separated record.
///
/// Unit separators keep `("ab", "c")` distinct from `("a", "bc")`; the child
/// count makes structural moves visible even when content is unchanged.
fn canonical_record(element: &Element) -> String {
    let mut record = String::new();
    let mut push = |field: &str| {
        record.push_str(field);
        record.push('\u{1f}');
    };
    push(&element.id);
    push(&element.kind);
    push(&element.name.as_ref().map(TextValue::coerce).unwrap_or_default());
    push(element.label.as_deref().unwrap_or_default());
    push(element.value.as_deref().unwrap_or_default());
    push(&geometry(element));
    push(&format!(
        "{}{}{}{}",
        u8::from(element.enabled),
        u8::from(element.visible),
        u8::from(element.has_keyboard_focus),
        u8::from(element.valid),
    ));
    push(&element.index.to_string());
    push(
        element
            .parent
            .as_ref()
            .map(|parent| parent.id.as_str())
            .unwrap_or_default(),
    );
    push(&element.children.len().to_string());
    record.push('\u{1e}');
    record
}

fn geometry(element: &Element) -> String {
    [
        element.rect.x,
        element.rect.y,
        element.rect.width,
        element.rect.height,
    ]
    .into_iter()
    .map(|component| component.map_or_else(|| "null".to_string(), |v| v.to_string()))
    .collect::<Vec<String>>()
    .join(",")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::builder::{build_tree, Platform};
    use serde_json::json;

    fn payload() -> serde_json::Value {
        json!({
            "window": {
                "x": 0, "y": 0, "width": 800, "height": 600,
                "button": [
                    {"label": "OK", "x": 0, "y": 0, "width": 80, "height": 40},
                    {"label": "Cancel", "x": 100, "y": 0, "width": 80, "height": 40}
                ]
            }
        })
    }

    #[test]
    fn test_identical_content_hashes_equally() {
        let first = build_tree(&payload(), Platform::Generic);
        let second = build_tree(&payload(), Platform::Generic);
        assert_eq!(first.fingerprint(), second.fingerprint());
    }

    #[test]
    fn test_content_change_changes_the_hash() {
        let base = build_tree(&payload(), Platform::Generic);
        let mut changed = payload();
        changed["window"]["button"][0]["label"] = json!("Accept");
        let changed = build_tree(&changed, Platform::Generic);
        assert_ne!(base.fingerprint(), changed.fingerprint());
    }

    #[test]
    fn test_structural_change_changes_the_hash() {
        let base = build_tree(&payload(), Platform::Generic);
        let mut pruned = payload();
        pruned["window"]["button"] = json!([{"label": "OK", "x": 0, "y": 0, "width": 80, "height": 40}]);
        let pruned = build_tree(&pruned, Platform::Generic);
        assert_ne!(base.fingerprint(), pruned.fingerprint());
    }

    #[test]
    fn test_null_and_zero_geometry_hash_differently() {
        let zeroed = build_tree(
            &json!({"panel": {"x": 0, "y": 0, "width": 0, "height": 0}}),
            Platform::Generic,
        );
        let bare = build_tree(&json!({"panel": {}}), Platform::Generic);
        assert_ne!(zeroed.fingerprint(), bare.fingerprint());
    }

    #[test]
    fn test_fingerprint_is_stable_hex() {
        let tree = build_tree(&payload(), Platform::Generic);
        let hash = tree.fingerprint();
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(hash, tree.fingerprint());
    }
}
