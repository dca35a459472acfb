//! Unified error types for keepsake.
//!
//! Errors from the storage and archive crates are folded into one enum so
//! callers see a single, stable set of failure kinds.

use keepsake_archive::ArchiveError;
use keepsake_storage::StorageError;
use thiserror::Error;

/// All keepsake errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Record not found (memory, anniversary, user)
    #[error("not found: {0}")]
    NotFound(String),

    /// Rejected input (empty title, empty message, bad name)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Record or media storage failure
    #[error("storage error: {0}")]
    Storage(String),

    /// Archive could not be written
    #[error("archive error: {0}")]
    Archive(String),

    /// Archive is unreadable, incomplete or from an unknown format version
    #[error("corrupt archive: {0}")]
    CorruptArchive(String),

    /// Some imported records could not be inserted
    #[error("partial import: {applied} applied, {failed} failed (last error: {reason})")]
    PartialImport {
        /// Records inserted successfully
        applied: usize,
        /// Records that failed to insert
        failed: usize,
        /// Message of the last failure
        reason: String,
    },
}

/// Result type for keepsake operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// Check if the input was rejected before anything was stored.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Error::InvalidInput(_))
    }

    /// Check if an archive was rejected as unreadable.
    pub fn is_corrupt_archive(&self) -> bool {
        matches!(self, Error::CorruptArchive(_))
    }

    pub(crate) fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound(what) => Error::NotFound(what),
            StorageError::Io(io_err) => Error::Io(io_err),
            StorageError::InvalidName(name) => {
                Error::Storage(format!("invalid media file name: {:?}", name))
            }
            StorageError::Serialization(msg) => Error::Storage(format!("serialization: {}", msg)),
        }
    }
}

impl From<ArchiveError> for Error {
    fn from(e: ArchiveError) -> Self {
        if e.is_corrupt() {
            return Error::CorruptArchive(e.to_string());
        }
        match e {
            ArchiveError::Io(io_err) => Error::Io(io_err),
            ArchiveError::Storage(storage) => Error::from(storage),
            other => Error::Archive(other.to_string()),
        }
    }
}

impl From<keepsake_core::Error> for Error {
    fn from(e: keepsake_core::Error) -> Self {
        use keepsake_core::Error as CoreError;
        match e {
            CoreError::InvalidDate { value } => {
                Error::InvalidInput(format!("invalid date '{}': expected YYYY-MM-DD", value))
            }
            CoreError::Serialization(msg) => Error::Storage(format!("serialization: {}", msg)),
            CoreError::Io(io_err) => Error::Io(io_err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_not_found_maps_to_not_found() {
        let err = Error::from(StorageError::not_found("memory 7"));
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "not found: memory 7");
    }

    #[test]
    fn test_corrupt_archive_errors() {
        assert!(Error::from(ArchiveError::missing_entry("data.json")).is_corrupt_archive());
        assert!(Error::from(ArchiveError::UnsupportedVersion {
            version: "9.9".to_string()
        })
        .is_corrupt_archive());
        let disk = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        assert!(!Error::from(ArchiveError::Io(disk)).is_corrupt_archive());
    }

    #[test]
    fn test_archive_storage_error_unwraps() {
        let err = Error::from(ArchiveError::Storage(StorageError::not_found("x")));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_invalid_date_is_invalid_input() {
        let err = Error::from(keepsake_core::Error::InvalidDate {
            value: "15/03/2024".to_string(),
        });
        assert!(err.is_invalid_input());
        assert!(err.to_string().contains("15/03/2024"));
    }
}
