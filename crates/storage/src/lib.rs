//! Local storage for the keepsake journal
//!
//! This crate implements the two stores the rest of the workspace is built on:
//! - [`MediaStore`]: image and audio directories on local disk
//! - [`RecordStore`]: memories, anniversaries and users, with change
//!   notification through watch channels
//!
//! Two record store backends are provided: [`InMemoryRecordStore`] for tests
//! and ephemeral journals, and [`FileRecordStore`] which persists the full
//! state as JSON after every mutation.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod file_store;
pub mod media;
pub mod memory_store;
pub mod record_store;

pub use error::{StorageError, StorageResult};
pub use file_store::FileRecordStore;
pub use media::{file_name_of, MediaKind, MediaStore};
pub use memory_store::InMemoryRecordStore;
pub use record_store::RecordStore;
