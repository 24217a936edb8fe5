//! Error types for the normalizer.
//!
//! These errors never leave [`crate::normalize::normalize`]: each one is
//! caught at the smallest enclosing scope (a record, a source group, a call,
//! or a scanned location) and turned into "nothing extracted here".

/// Faults raised while reading one piece of a response document.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExtractError {
    /// A field that should hold text held an array or object.
    #[error("field `{field}` is not text")]
    NotText { field: String },

    /// A score field held something that is not a number.
    #[error("field `{field}` is not numeric: {value}")]
    NotNumeric { field: String, value: String },

    /// A location held a JSON shape its parser does not accept.
    #[error("unexpected shape at `{location}`: expected {expected}")]
    UnexpectedShape {
        location: String,
        expected: &'static str,
    },

    /// A JSON-encoded string failed to decode.
    #[error("invalid JSON in `{field}`: {message}")]
    InvalidJson { field: String, message: String },
}

/// Convenience alias used by the per-location parsers.
pub type Result<T> = std::result::Result<T, ExtractError>;
