//! Convenient imports for keepsake.
//!
//! ```ignore
//! use keepsake::prelude::*;
//!
//! let journal = Journal::open("./journal")?;
//! journal.add_memory(NewMemory::new("Picnic", date, "By the lake"))?;
//! ```

// Main entry point
pub use crate::journal::{Journal, JournalBuilder};

// Error handling
pub use crate::error::{Error, Result};

// Inputs
pub use crate::types::{AnniversaryEdit, MemoryEdit, NewAnniversary, NewMemory};

// Records
pub use crate::types::{AnniversaryId, AnniversaryRecord, MemoryId, MemoryRecord, User, UserId};

// Import and export
pub use crate::import::{ApplyReport, ImportOptions};
pub use crate::types::{ArchiveExportInfo, ArchiveSummary, UpcomingAnniversary};

// Re-export chrono's date type for convenience
pub use chrono::NaiveDate;
