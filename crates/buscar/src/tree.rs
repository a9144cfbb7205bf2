//! Immutable element tree snapshots.
//!
//! A snapshot is produced by one build call, fully replaces any prior
//! snapshot, and is never mutated. Document order is the breadth-first order
//! elements were inserted during the build, which is also the order their
//! synthetic ids were assigned; every query result is reported in this order.

use crate::element::{Descendants, Element};
use crate::result::BuscarResult;
use serde::{Deserialize, Serialize};

/// One immutable snapshot of a normalized UI hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementTree {
    roots: Vec<Element>,
}

impl ElementTree {
    /// Create a snapshot from its root elements
    #[must_use]
    pub fn new(roots: Vec<Element>) -> Self {
        Self { roots }
    }

    /// Root elements, in discovery order
    #[must_use]
    pub fn roots(&self) -> &[Element] {
        &self.roots
    }

    /// Breadth-first iterator over every element, in document order
    #[must_use]
    pub fn iter(&self) -> Descendants<'_> {
        Descendants::from_queue(self.roots.iter().collect())
    }

    /// Total number of elements in the snapshot
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Whether the snapshot holds no elements
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Look up an element by synthetic id
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Element> {
        self.iter().find(|element| element.id == id)
    }

    /// All elements of one normalized type, in document order
    #[must_use]
    pub fn elements_of_kind(&self, kind: &str) -> Vec<&Element> {
        self.iter()
            .filter(|element| element.kind.eq_ignore_ascii_case(kind))
            .collect()
    }

    /// Serialize the snapshot for artifact labeling
    pub fn to_json(&self) -> BuscarResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl<'a> IntoIterator for &'a ElementTree {
    type Item = &'a Element;
    type IntoIter = Descendants<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
