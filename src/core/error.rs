//! Crate error types

use thiserror::Error;

/// Errors that can occur while tracking agent lineage
#[derive(Error, Debug)]
pub enum LineageError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl LineageError {
    /// Create a generic error from a string
    pub fn other(msg: impl Into<String>) -> Self {
        LineageError::Other(msg.into())
    }
}

/// Result type alias for lineage operations
pub type LineageResult<T> = Result<T, LineageError>;
