//! Error types for osview.

use thiserror::Error;

/// The main error type for osview operations.
#[derive(Debug, Error)]
pub enum ViewerError {
    /// The input is not valid JSON, or its top level is not an object.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// A requested index name is absent from the loaded file.
    #[error("Index '{name}' not found. Available indexes: {}", format_available(.available))]
    IndexNotFound { name: String, available: Vec<String> },

    /// A search pattern failed to compile.
    #[error("Invalid search pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Export serialization error.
    #[error("Export error: {0}")]
    Export(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ViewerError {
    /// Create an index-not-found error listing the names that do exist.
    pub fn not_found(name: impl Into<String>, available: Vec<String>) -> Self {
        Self::IndexNotFound {
            name: name.into(),
            available,
        }
    }

    /// Create an invalid pattern error.
    pub fn pattern(pattern: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.to_string(),
        }
    }
}

fn format_available(available: &[String]) -> String {
    if available.is_empty() {
        "(none)".to_string()
    } else {
        available.join(", ")
    }
}

/// Result type alias for osview operations.
pub type ViewerResult<T> = Result<T, ViewerError>;
