//! Pipeline error types.

use thiserror::Error;

/// Result type for parsing extractor output.
pub type ParseResult<T> = Result<T, ParseError>;

/// Errors raised when extractor output cannot be read as a list of records.
///
/// These are fatal for the call that produced them only; other pages keep
/// their events.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The text contains no `[ ... ]` span at all.
    #[error("No JSON array found in extractor output")]
    NoArray,

    /// A `[ ... ]` span exists but none of it is valid JSON.
    #[error("Invalid JSON in extractor output: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Decoded JSON whose top-level value is not an array.
    #[error("Top-level JSON must be an array, found {found}")]
    NotAnArray { found: &'static str },
}

impl ParseError {
    /// Creates a not-an-array error for the given JSON value.
    pub fn not_an_array(value: &serde_json::Value) -> Self {
        let found = match value {
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "a boolean",
            serde_json::Value::Number(_) => "a number",
            serde_json::Value::String(_) => "a string",
            serde_json::Value::Array(_) => "an array",
            serde_json::Value::Object(_) => "an object",
        };
        Self::NotAnArray { found }
    }
}

/// A defect that makes a single record unusable.
///
/// Never aborts a batch: the record is logged and skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// The title is empty after trimming.
    #[error("title is empty")]
    EmptyTitle,
}
