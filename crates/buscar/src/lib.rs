//! Buscar: UI Element Tree Normalization and Selector Engine
//!
//! Buscar (Spanish: "to find/seek") normalizes the incompatible UI-hierarchy
//! exports of heterogeneous automation backends into one canonical element
//! tree, then lets test authors locate elements with a single declarative
//! selector language that behaves identically regardless of source platform.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                       BUSCAR Architecture                         │
//! ├───────────────────────────────────────────────────────────────────┤
//! │  ┌──────────┐   ┌──────────┐   ┌──────────┐   ┌───────────────┐   │
//! │  │ Raw      │   │ Platform │   │ Element  │   │ Selector      │   │
//! │  │ payload  │──►│ builder  │──►│ tree     │──►│ parse + eval  │   │
//! │  │ + tag    │   │ strategy │   │ snapshot │   │ (match sets)  │   │
//! │  └──────────┘   └──────────┘   └──────────┘   └───────────────┘   │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Locating is the whole job: the crate resolves selectors to elements and
//! exposes their attributes (hitpoint, label, value); interactions belong to
//! the calling layer.
//!
//! # Example
//!
//! ```
//! use buscar::prelude::*;
//! use serde_json::json;
//!
//! let payload = json!({
//!     "window": {
//!         "tableview": {
//!             "name": "transferTableView",
//!             "tablecell": [
//!                 {"label": "first"},
//!                 {"label": "second"}
//!             ]
//!         }
//!     }
//! });
//! let tree = build_tree(&payload, Platform::Generic);
//! let cells = query(&tree, ".transferTableView *[type='tablecell']").unwrap();
//! assert_eq!(cells.len(), 2);
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]
#![cfg_attr(test, allow(clippy::large_stack_arrays, clippy::large_stack_frames))]

/// Platform builder strategies and the canonical build entry point
pub mod builder;

mod element;
mod hash;
mod result;
mod tree;

/// Selector grammar, compiled term chains, and evaluation
pub mod selector;

pub use builder::{build_tree, Platform};
pub use element::{Descendants, Element, ParentRef, Point, Rect, TextValue};
pub use result::{BuscarError, BuscarResult};
pub use selector::{query, Predicate, Selector, Term, TermTarget};
pub use tree::ElementTree;

/// Convenience re-exports for test authors
pub mod prelude {
    pub use super::builder::{build_tree, Platform};
    pub use super::element::{Element, ParentRef, Point, Rect, TextValue};
    pub use super::result::{BuscarError, BuscarResult};
    pub use super::selector::{query, Predicate, Selector, Term, TermTarget};
    pub use super::tree::ElementTree;
}
