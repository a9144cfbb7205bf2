//! Result and error types for Buscar.

use thiserror::Error;

/// Result type for Buscar operations
pub type BuscarResult<T> = Result<T, BuscarError>;

/// Errors that can occur in Buscar
///
/// Only selector parsing fails fast: a selector that violates the grammar is
/// a defective test asset, not a runtime condition. Tree building degrades to
/// partial trees, and evaluation never raises.
#[derive(Debug, Error)]
pub enum BuscarError {
    /// Selector string is empty or contains no terms
    #[error("Empty selector")]
    EmptySelector,

    /// Selector string violates the grammar
    #[error("Failed to parse selector `{selector}`: {message}")]
    SelectorParse {
        /// Original selector text, for diagnosis
        selector: String,
        /// What went wrong
        message: String,
    },

    /// A quoted literal inside a bracket predicate is not terminated
    #[error("Unterminated quote in selector `{selector}`")]
    UnterminatedQuote {
        /// Original selector text
        selector: String,
    },

    /// A bracket predicate group is not terminated
    #[error("Unterminated bracket predicate in selector `{selector}`")]
    UnterminatedBracket {
        /// Original selector text
        selector: String,
    },

    /// A `[key~'pattern']` literal failed to compile as a regex
    #[error("Invalid pattern `{pattern}` in selector `{selector}`: {message}")]
    InvalidPattern {
        /// Original selector text
        selector: String,
        /// The pattern literal that failed
        pattern: String,
        /// Compiler diagnostic
        message: String,
    },

    /// An `[nth=N]` ordinal is not a non-negative integer
    #[error("Invalid ordinal `{ordinal}` in selector `{selector}`")]
    InvalidOrdinal {
        /// Original selector text
        selector: String,
        /// The ordinal literal that failed
        ordinal: String,
    },

    /// Platform tag does not name a known builder strategy
    #[error("Unknown platform tag `{tag}`")]
    UnknownPlatform {
        /// The unrecognized tag
        tag: String,
    },

    /// JSON error (snapshot export)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
