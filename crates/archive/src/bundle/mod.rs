//! Journal archives - portable exports of records and media
//!
//! An archive bundles every memory and anniversary together with the photo
//! and audio files the memories reference, so a journal can be moved to
//! another device and imported there.
//!
//! ## Archive Format
//!
//! Archives use the `.tar.zst` format - a zstd-compressed tar stream:
//!
//! ```text
//! memories_backup_<millis>.tar.zst
//! ├── data.json          # Snapshot: records, export date, format version
//! ├── photos/<filename>  # Raw bytes of each referenced photo
//! └── audios/<filename>  # Raw bytes of each referenced voice note
//! ```
//!
//! ## Usage
//!
//! Export:
//! ```ignore
//! let snapshot = ArchiveSnapshot::new(memories, anniversaries);
//! let info = ArchiveWriter::new(&ExportOptions::default()).write(&snapshot, path)?;
//! ```
//!
//! Import (media lands in the media store, records are returned):
//! ```ignore
//! let imported = ArchiveReader::import(path, &media)?;
//! ```
//!
//! ## Behavior
//!
//! - **Missing media is not an error**: a referenced file absent at export
//!   time is left out, and the snapshot keeps the dangling path
//! - **Filenames only**: media entries are keyed by filename; two sources
//!   with the same name overwrite each other on import
//! - **Strict snapshot**: unknown versions and malformed dates fail the import
//! - **No deduplication**: importing twice writes media twice and returns
//!   the same records twice

mod error;
mod reader;
mod types;
mod writer;

pub use error::{ArchiveError, ArchiveResult};
pub use reader::ArchiveReader;
pub use types::{
    paths, ArchiveExportInfo, ArchiveSnapshot, ArchiveSummary, ExportOptions, ImportedArchive,
    ARCHIVE_EXTENSION, ARCHIVE_FORMAT_VERSION, DEFAULT_COMPRESSION_LEVEL,
};
pub use writer::ArchiveWriter;
