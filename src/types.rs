//! Public types for the keepsake API.
//!
//! Record types come from `keepsake-core`; the input types here are what
//! callers hand to [`Journal`](crate::Journal) when creating or editing.

pub use keepsake_core::{AnniversaryId, AnniversaryRecord, MemoryId, MemoryRecord, User, UserId};
pub use keepsake_storage::MediaKind;

pub use keepsake_archive::{ArchiveExportInfo, ArchiveSnapshot, ArchiveSummary};

use crate::error::{Error, Result};
use chrono::NaiveDate;
use keepsake_core::date;

/// Fields of a memory to create.
///
/// Title and message must be non-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMemory {
    /// Memory title
    pub title: String,
    /// Calendar date the memory belongs to
    pub date: NaiveDate,
    /// Memory text
    pub message: String,
    /// Photo paths, in display order
    pub photo_paths: Vec<String>,
    /// Voice note path
    pub audio_path: Option<String>,
}

/// Replacement fields for an existing memory.
///
/// Editing replaces title, date, message, photos and audio wholesale.
pub type MemoryEdit = NewMemory;

impl NewMemory {
    /// Memory with no media attached
    pub fn new(title: impl Into<String>, date: NaiveDate, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            date,
            message: message.into(),
            photo_paths: Vec::new(),
            audio_path: None,
        }
    }

    /// Attach photos, in display order
    pub fn with_photos<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.photo_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Attach a voice note
    pub fn with_audio(mut self, path: impl Into<String>) -> Self {
        self.audio_path = Some(path.into());
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::invalid_input("memory title must not be empty"));
        }
        if self.message.trim().is_empty() {
            return Err(Error::invalid_input("memory message must not be empty"));
        }
        date::check_date(self.date)?;
        Ok(())
    }

    pub(crate) fn into_record(self) -> MemoryRecord {
        let mut record = MemoryRecord::new(self.title, self.date, self.message);
        record.photo_paths = self.photo_paths;
        record.audio_path = self.audio_path;
        record
    }
}

/// Fields of an anniversary to create or replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAnniversary {
    /// Anniversary title
    pub title: String,
    /// The original date
    pub date: NaiveDate,
    /// Optional note
    pub description: Option<String>,
    /// Flag for highlighting
    pub is_important: bool,
}

/// Replacement fields for an existing anniversary.
pub type AnniversaryEdit = NewAnniversary;

impl NewAnniversary {
    /// Plain anniversary with no description
    pub fn new(title: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            date,
            description: None,
            is_important: false,
        }
    }

    /// Set the description; blank text means none
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = (!description.trim().is_empty()).then_some(description);
        self
    }

    /// Mark as important
    pub fn important(mut self) -> Self {
        self.is_important = true;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::invalid_input("anniversary title must not be empty"));
        }
        date::check_date(self.date)?;
        Ok(())
    }

    pub(crate) fn into_record(self) -> AnniversaryRecord {
        let mut record = AnniversaryRecord::new(self.title, self.date);
        record.description = self.description;
        record.is_important = self.is_important;
        record
    }
}

/// An anniversary with its next yearly recurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpcomingAnniversary {
    /// The stored anniversary
    pub anniversary: AnniversaryRecord,
    /// Next day (today or later) the anniversary falls on
    pub next: NaiveDate,
    /// Days from today until `next`
    pub days_until: i64,
    /// Years completed at `next`
    pub years: i32,
}
