//! Storage error types

use thiserror::Error;

/// Errors from the media and record stores
#[derive(Debug, Error)]
pub enum StorageError {
    /// The referenced record does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// A media filename was empty or contained path components
    #[error("invalid media file name: {0:?}")]
    InvalidName(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Records file could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl StorageError {
    /// Create a NotFound error
    pub fn not_found(what: impl Into<String>) -> Self {
        StorageError::NotFound(what.into())
    }

    /// Check if this is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serialization(e.to_string())
    }
}
