use thiserror::Error;

/// Errors produced while building, updating or restoring filters
#[derive(Debug, Error)]
pub enum FilterError {
    /// The pattern does not compile into a marker expression
    #[error("invalid filter pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("filter pattern should not be empty")]
    EmptyPattern,

    /// A persisted entry is missing a field or has a field of the wrong shape
    #[error("malformed entry: field '{field}' {reason}")]
    MalformedEntry { field: String, reason: String },

    /// A persisted entry is not valid JSON
    #[error("failed to parse entry content: {0}")]
    Json(#[from] serde_json::Error),
}

impl FilterError {
    pub fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedEntry { field: field.into(), reason: reason.into() }
    }
}
