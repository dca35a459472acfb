//! Archive error types

use thiserror::Error;

/// Errors from writing or reading an archive
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// I/O error on the archive file or a media file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The tar container is malformed
    #[error("archive error: {0}")]
    Archive(String),

    /// zstd compression or decompression failed
    #[error("compression error: {0}")]
    Compression(String),

    /// A required entry is absent
    #[error("missing entry: {0}")]
    MissingEntry(String),

    /// The snapshot declares a format version this build cannot read
    #[error("unsupported archive version: {version}")]
    UnsupportedVersion {
        /// Version string found in the archive
        version: String,
    },

    /// The snapshot entry could not be decoded
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// A media path could not be staged or resolved
    #[error("storage error: {0}")]
    Storage(#[from] keepsake_storage::StorageError),
}

/// Result type for archive operations
pub type ArchiveResult<T> = Result<T, ArchiveError>;

impl ArchiveError {
    /// Create an Archive error
    pub fn archive(msg: impl Into<String>) -> Self {
        ArchiveError::Archive(msg.into())
    }

    /// Create a Compression error
    pub fn compression(msg: impl Into<String>) -> Self {
        ArchiveError::Compression(msg.into())
    }

    /// Create a MissingEntry error
    pub fn missing_entry(name: impl Into<String>) -> Self {
        ArchiveError::MissingEntry(name.into())
    }

    /// Create an InvalidSnapshot error
    pub fn invalid_snapshot(msg: impl Into<String>) -> Self {
        ArchiveError::InvalidSnapshot(msg.into())
    }

    /// Whether the archive content itself is unreadable, as opposed to an
    /// environment failure
    pub fn is_corrupt(&self) -> bool {
        matches!(
            self,
            ArchiveError::Archive(_)
                | ArchiveError::Compression(_)
                | ArchiveError::MissingEntry(_)
                | ArchiveError::UnsupportedVersion { .. }
                | ArchiveError::InvalidSnapshot(_)
        )
    }
}
