//! Error types for core record handling

use thiserror::Error;

/// Errors raised while building or decoding core records
#[derive(Debug, Error)]
pub enum Error {
    /// A calendar date did not match the `YYYY-MM-DD` format
    #[error("invalid calendar date '{value}': expected YYYY-MM-DD")]
    InvalidDate {
        /// The text that failed to parse
        value: String,
    },

    /// Serialization or deserialization failed
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
