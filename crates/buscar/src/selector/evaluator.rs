//! Selector evaluation.
//!
//! For a chain `T1 T2 … Tn`: `T1` is evaluated against the whole tree, and
//! each later term against the entire descendant subtree of every element
//! the previous term matched. Terminal matches are unioned as a set — the
//! same element may be reachable via more than one intermediate descendant
//! path — and reported in document order, so identical `(selector,
//! snapshot)` pairs always yield the same ordered result.

use super::{Selector, Term};
use crate::element::Element;
use crate::tree::ElementTree;
use std::collections::HashSet;

impl Selector {
    /// Evaluate the compiled chain against a snapshot.
    ///
    /// Never raises: absent attributes are non-matches, an out-of-range
    /// `nth` empties its scope, and an empty result is an ordinary value.
    #[must_use]
    pub fn evaluate<'t>(&self, tree: &'t ElementTree) -> Vec<&'t Element> {
        let Some((first, rest)) = self.terms.split_first() else {
            return Vec::new();
        };

        let mut matched = scope_matches(tree.iter(), first);
        for term in rest {
            let mut ids: HashSet<&str> = HashSet::new();
            for scope in &matched {
                for hit in scope_matches(scope.descendants(), term) {
                    ids.insert(hit.id.as_str());
                }
            }
            // Re-walking the tree collapses duplicates and restores global
            // document order across overlapping scopes.
            matched = tree
                .iter()
                .filter(|element| ids.contains(element.id.as_str()))
                .collect();
        }
        matched
    }

    /// Evaluate and return synthetic ids, in document order.
    #[must_use]
    pub fn evaluate_ids(&self, tree: &ElementTree) -> Vec<String> {
        self.evaluate(tree)
            .into_iter()
            .map(|element| element.id.clone())
            .collect()
    }
}

/// Apply one term within one evaluation scope.
///
/// Candidates are collected in the scope's document order; `nth` then keeps
/// only the element at that 0-based ordinal.
fn scope_matches<'t>(
    candidates: impl Iterator<Item = &'t Element>,
    term: &Term,
) -> Vec<&'t Element> {
    let hits: Vec<&Element> = candidates
        .filter(|element| term.matches(element))
        .collect();
    match term.nth() {
        Some(ordinal) => hits.get(ordinal).copied().into_iter().collect(),
        None => hits,
    }
}
