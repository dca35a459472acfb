//! Core types for the keepsake journal
//!
//! This crate defines the record types shared by every other crate:
//! - [`MemoryRecord`]: a dated entry with text, photos and an optional voice note
//! - [`AnniversaryRecord`]: a date worth counting days to or from
//! - [`User`]: a co-author of the journal
//!
//! It also owns the calendar-date codec used by the archive format.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod date;
pub mod error;
pub mod records;
pub mod types;

pub use error::{Error, Result};
pub use records::{AnniversaryRecord, MemoryRecord, User};
pub use types::{now_millis, AnniversaryId, MemoryId, UserId};
