//! Main journal entry point.
//!
//! This module provides the `Journal` struct, the primary entry point for
//! all journal operations. Operations are grouped by what they touch:
//! memories, anniversaries, users, media, and archives.

mod anniversaries;
mod archive;
mod media;
mod memories;
mod users;

pub use users::DEFAULT_USER_NAME;

use crate::error::{Error, Result};
use crate::import::ImportOptions;
use keepsake_archive::ExportOptions;
use keepsake_storage::{FileRecordStore, InMemoryRecordStore, MediaStore, RecordStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tracing::info;

/// Records file under the data directory
pub const RECORDS_FILE: &str = "records.json";
/// Media root under the data directory
pub const MEDIA_DIR: &str = "media";
/// Default export directory under the data directory
pub const EXPORTS_DIR: &str = "exports";

/// A memory journal.
///
/// Owns a record store and a media store and exposes every journal
/// operation on top of them. Create one with [`Journal::open`],
/// [`Journal::ephemeral`] or [`Journal::builder`].
///
/// # Example
///
/// ```ignore
/// use keepsake::prelude::*;
///
/// let journal = Journal::open("./journal")?;
/// journal.add_memory(NewMemory::new("Picnic", date, "By the lake"))?;
/// let info = journal.export_archive()?;
/// ```
///
/// # Layout
///
/// | Path | Contents |
/// |------|----------|
/// | `records.json` | memories, anniversaries, users |
/// | `media/images` | photos |
/// | `media/audio` | voice notes |
/// | `exports/` | archives and text exports |
pub struct Journal {
    records: Arc<dyn RecordStore>,
    media: MediaStore,
    data_dir: PathBuf,
    export_dir: PathBuf,
    export_options: ExportOptions,
    import_options: ImportOptions,
    /// Keeps the backing directory of a journal opened without a path alive
    _temp_dir: Option<TempDir>,
}

impl Journal {
    /// Open a journal at the given directory, creating it if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::builder().path(path).open()
    }

    /// Open a throwaway journal.
    ///
    /// Records live in memory only; media goes to a temporary directory
    /// that is removed when the journal is dropped.
    pub fn ephemeral() -> Result<Self> {
        Self::builder().ephemeral().open()
    }

    /// Create a builder for journal configuration.
    pub fn builder() -> JournalBuilder {
        JournalBuilder::new()
    }

    /// Data directory of this journal
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Directory that `export_archive` and `export_text` write into
    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// The underlying record store
    pub fn records(&self) -> &dyn RecordStore {
        self.records.as_ref()
    }

    /// The underlying media store
    pub fn media(&self) -> &MediaStore {
        &self.media
    }
}

/// Builder for journal configuration.
///
/// # Example
///
/// ```ignore
/// // Disk-backed journal with custom export directory
/// let journal = Journal::builder()
///     .path("./journal")
///     .export_dir("/mnt/backup")
///     .compression_level(9)
///     .open()?;
///
/// // Records in memory, media in a temp dir
/// let journal = Journal::builder().ephemeral().open()?;
/// ```
pub struct JournalBuilder {
    path: Option<PathBuf>,
    ephemeral: bool,
    records: Option<Arc<dyn RecordStore>>,
    export_dir: Option<PathBuf>,
    export_options: ExportOptions,
    import_options: ImportOptions,
}

impl JournalBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            path: None,
            ephemeral: false,
            records: None,
            export_dir: None,
            export_options: ExportOptions::default(),
            import_options: ImportOptions::default(),
        }
    }

    /// Set the data directory.
    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Keep records in memory instead of `records.json`.
    ///
    /// Without a [`path`](Self::path), media goes to a temporary directory.
    pub fn ephemeral(mut self) -> Self {
        self.ephemeral = true;
        self
    }

    /// Use an existing record store instead of building one.
    pub fn record_store(mut self, records: Arc<dyn RecordStore>) -> Self {
        self.records = Some(records);
        self
    }

    /// Write exports somewhere other than `<data dir>/exports`.
    pub fn export_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.export_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// zstd level for archive exports (1-22).
    pub fn compression_level(mut self, level: i32) -> Self {
        self.export_options = self.export_options.with_compression_level(level);
        self
    }

    /// Apply anniversaries found in imported archives.
    pub fn import_anniversaries(mut self, include: bool) -> Self {
        self.import_options = self.import_options.with_anniversaries(include);
        self
    }

    /// Open the journal.
    ///
    /// Without a path the journal lives in a temporary directory.
    pub fn open(self) -> Result<Journal> {
        if !(1..=22).contains(&self.export_options.compression_level) {
            return Err(Error::invalid_input(format!(
                "compression level {} is outside 1-22",
                self.export_options.compression_level
            )));
        }

        let (data_dir, temp_dir) = match self.path {
            Some(path) => (path, None),
            None => {
                let temp = TempDir::new()?;
                (temp.path().to_path_buf(), Some(temp))
            }
        };
        std::fs::create_dir_all(&data_dir)?;

        let ephemeral = self.ephemeral || temp_dir.is_some();
        let records: Arc<dyn RecordStore> = match self.records {
            Some(records) => records,
            None if ephemeral => Arc::new(InMemoryRecordStore::new()),
            None => Arc::new(FileRecordStore::open(data_dir.join(RECORDS_FILE))?),
        };
        let media = MediaStore::open(data_dir.join(MEDIA_DIR))?;
        let export_dir = self
            .export_dir
            .unwrap_or_else(|| data_dir.join(EXPORTS_DIR));

        info!(
            "Opened journal at {} ({})",
            data_dir.display(),
            if ephemeral { "ephemeral" } else { "persistent" }
        );

        Ok(Journal {
            records,
            media,
            data_dir,
            export_dir,
            export_options: self.export_options,
            import_options: self.import_options,
            _temp_dir: temp_dir,
        })
    }
}

impl Default for JournalBuilder {
    fn default() -> Self {
        Self::new()
    }
}
