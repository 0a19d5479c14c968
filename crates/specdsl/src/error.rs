//! Error types for the specdsl crate.

use thiserror::Error;

/// Errors that can occur when building page requests or executing queries.
#[derive(Debug, Error)]
pub enum SpecError {
    /// Page size must be at least one.
    #[error("page size must not be less than one, got {size}")]
    InvalidPageSize { size: usize },

    /// A record value and a predicate operand have incompatible types.
    #[error("type mismatch on '{path}': operand is {expected}, value is {actual}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// A LIKE pattern ends with an unescaped escape character.
    #[error("invalid like pattern '{pattern}': dangling escape character '{escape}'")]
    InvalidLikePattern { pattern: String, escape: char },

    /// The regular expression compiled from a LIKE pattern was rejected.
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// A single result was requested but several records matched.
    #[error("incorrect result size: expected at most 1, got {actual}")]
    IncorrectResultSize { actual: usize },
}

/// Result type for specdsl operations.
pub type Result<T> = std::result::Result<T, SpecError>;
