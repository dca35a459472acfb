//! Export and import of journal archives
//!
//! - [`bundle`]: the portable `.tar.zst` archive holding records and media
//! - [`text`]: a one-way, human-readable plain-text export

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bundle;
pub mod text;

pub use bundle::{
    paths, ArchiveError, ArchiveExportInfo, ArchiveReader, ArchiveResult, ArchiveSnapshot,
    ArchiveSummary, ArchiveWriter, ExportOptions, ImportedArchive, ARCHIVE_EXTENSION,
    ARCHIVE_FORMAT_VERSION,
};
pub use text::{render_text, TextExporter};
