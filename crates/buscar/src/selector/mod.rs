//! Selector parsing and evaluation.
//!
//! A selector is a whitespace-delimited chain of terms; whitespace between
//! terms is a descendant-anywhere combinator. Each term carries optional
//! bracket predicates that conjoin left to right. Parsing a defective
//! selector fails fast; evaluating a parsed selector never raises, and an
//! empty match set is the ordinary representation of "not currently
//! present".
//!
//! Compiled selectors are reusable: parse once, evaluate against every
//! polled snapshot. Regex patterns in `~` predicates compile at parse time,
//! so a malformed pattern is a parse-time diagnosis rather than a silent
//! per-element non-match.

mod evaluator;
mod parser;

use crate::element::Element;
use crate::result::BuscarResult;
use crate::tree::ElementTree;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

/// What a term matches against, before bracket predicates apply.
#[derive(Debug, Clone)]
pub enum TermTarget {
    /// `*` — matches any element
    Any,
    /// Bare identifier — matches `type` case-insensitively
    Kind(String),
    /// `.name` — class-style membership against the `name` field
    Class(String),
    /// `#{literal}` — exact equality against the synthetic id
    Id(String),
}

/// One bracket predicate.
#[derive(Debug, Clone)]
pub enum Predicate {
    /// `[key='value']` — equality after string coercion
    Equals {
        /// Attribute key
        key: String,
        /// Expected value
        value: String,
    },
    /// `[key~'pattern']` — containment: the pattern is found anywhere in the
    /// stringified field, not full-string equality
    Contains {
        /// Attribute key
        key: String,
        /// Compiled pattern
        pattern: Regex,
    },
}

impl Predicate {
    fn matches(&self, element: &Element) -> bool {
        match self {
            Self::Equals { key, value } => element
                .attribute(key)
                .is_some_and(|actual| actual == *value),
            Self::Contains { key, pattern } => element
                .attribute(key)
                .is_some_and(|actual| pattern.is_match(&actual)),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equals { key, value } => write!(f, "[{key}='{value}']"),
            Self::Contains { key, pattern } => write!(f, "[{key}~'{}']", pattern.as_str()),
        }
    }
}

/// One whitespace-delimited selector unit with its bracket predicates.
#[derive(Debug, Clone)]
pub struct Term {
    target: TermTarget,
    predicates: Vec<Predicate>,
    nth: Option<usize>,
}

impl Term {
    /// Whether this term matches one element.
    ///
    /// `nth` is not checked here: it filters the term's candidate set, not a
    /// single element, and is applied last by the evaluator.
    #[must_use]
    pub fn matches(&self, element: &Element) -> bool {
        let target_matches = match &self.target {
            TermTarget::Any => true,
            TermTarget::Kind(kind) => element.kind.eq_ignore_ascii_case(kind),
            TermTarget::Class(class) => element
                .name
                .as_ref()
                .is_some_and(|name| name.contains(class)),
            TermTarget::Id(id) => element.id == *id,
        };
        target_matches && self.predicates.iter().all(|p| p.matches(element))
    }

    /// The term's target
    #[must_use]
    pub const fn target(&self) -> &TermTarget {
        &self.target
    }

    /// The term's attribute predicates
    #[must_use]
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// The term's 0-based ordinal filter, if any
    #[must_use]
    pub const fn nth(&self) -> Option<usize> {
        self.nth
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            TermTarget::Any => write!(f, "*")?,
            TermTarget::Kind(kind) => write!(f, "{kind}")?,
            TermTarget::Class(class) => write!(f, ".{class}")?,
            TermTarget::Id(id) => write!(f, "#{{{id}}}")?,
        }
        for predicate in &self.predicates {
            write!(f, "{predicate}")?;
        }
        if let Some(n) = self.nth {
            write!(f, "[nth={n}]")?;
        }
        Ok(())
    }
}

/// A compiled selector: an ordered term chain, reusable across snapshots.
#[derive(Debug, Clone)]
pub struct Selector {
    terms: Vec<Term>,
    source: String,
}

impl Selector {
    /// The compiled term chain
    #[must_use]
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// The original selector text, for diagnostics
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for Selector {
    /// Writes the normalized selector: single spaces between terms.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{term}")?;
        }
        Ok(())
    }
}

impl FromStr for Selector {
    type Err = crate::result::BuscarError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Self::parse(input)
    }
}

/// Parse a selector and evaluate it against a tree in one call.
///
/// Callers that poll the same selector repeatedly should parse once with
/// [`Selector::parse`] and reuse the compiled chain.
pub fn query<'t>(tree: &'t ElementTree, selector: &str) -> BuscarResult<Vec<&'t Element>> {
    Ok(Selector::parse(selector)?.evaluate(tree))
}
