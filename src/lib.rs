//! # Keepsake
//!
//! A local memory journal: dated memories with photos and voice notes,
//! anniversaries with day-count reminders, and portable archives for moving
//! a journal between devices.
//!
//! ## Quick Start
//!
//! ```ignore
//! use keepsake::prelude::*;
//!
//! let journal = Journal::open("./journal")?;
//!
//! let photo = journal.save_photo(&jpeg_bytes)?;
//! journal.add_memory(
//!     NewMemory::new("Picnic", date, "By the lake").with_photos([photo.to_string_lossy()]),
//! )?;
//!
//! // Back up, then restore on another device
//! let info = journal.export_archive()?;
//! other.import_archive(info.path.as_deref().unwrap())?;
//! ```
//!
//! ## Archives
//!
//! An archive is a zstd-compressed tar holding `data.json` plus every
//! referenced photo and voice note. On import, media lands in the
//! receiving journal's media directories and each record's paths are
//! rewritten to point there; records are always inserted as new.

#![warn(missing_docs)]

mod error;
mod import;
mod journal;
mod types;

pub mod prelude;

pub use error::{Error, Result};
pub use import::{ApplyReport, ImportCoordinator, ImportOptions};
pub use journal::{
    Journal, JournalBuilder, DEFAULT_USER_NAME, EXPORTS_DIR, MEDIA_DIR, RECORDS_FILE,
};
pub use keepsake_core::date;
pub use types::*;
