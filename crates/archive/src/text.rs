//! Plain-text export
//!
//! A readable summary for sharing; there is no way to import it back.
//! Anniversaries come first in the order given, then memories sorted by
//! date, oldest first.

use crate::bundle::{ArchiveError, ArchiveResult};
use chrono::NaiveDate;
use keepsake_core::date::format_date;
use keepsake_core::{AnniversaryRecord, MemoryRecord};
use std::fmt::Write as _;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

/// Render the text export
pub fn render_text(
    memories: &[MemoryRecord],
    anniversaries: &[AnniversaryRecord],
    export_date: NaiveDate,
) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = write_text(&mut out, memories, anniversaries, export_date);
    out
}

fn write_text(
    out: &mut String,
    memories: &[MemoryRecord],
    anniversaries: &[AnniversaryRecord],
    export_date: NaiveDate,
) -> std::fmt::Result {
    writeln!(out, "=== Our Memories ===")?;
    writeln!(out)?;
    writeln!(out, "Exported: {}", format_date(export_date))?;
    writeln!(out)?;

    if !anniversaries.is_empty() {
        writeln!(out, "=== Anniversaries ===")?;
        for anniversary in anniversaries {
            writeln!(out, "{}", anniversary.title)?;
            writeln!(out, "Date: {}", format_date(anniversary.date))?;
            if let Some(description) = anniversary
                .description
                .as_deref()
                .filter(|d| !d.trim().is_empty())
            {
                writeln!(out, "Description: {}", description)?;
            }
            writeln!(out)?;
        }
        writeln!(out)?;
    }

    if !memories.is_empty() {
        let mut sorted: Vec<&MemoryRecord> = memories.iter().collect();
        sorted.sort_by_key(|m| m.date);

        writeln!(out, "=== Memories ===")?;
        for memory in sorted {
            writeln!(out, "{}", memory.title)?;
            writeln!(out, "Date: {}", format_date(memory.date))?;
            writeln!(out, "Message: {}", memory.message)?;
            if memory.photo_count() > 0 {
                writeln!(out, "Photos: {}", memory.photo_count())?;
            }
            if memory.has_audio() {
                writeln!(out, "Voice note: yes")?;
            }
            writeln!(out, "---")?;
            writeln!(out)?;
        }
    }

    Ok(())
}

/// Writes text exports to disk
pub struct TextExporter;

impl TextExporter {
    /// Render and write the text export to `path`
    ///
    /// Staged through a temporary file like archives, so a failure never
    /// leaves a truncated file at `path`.
    pub fn write(
        memories: &[MemoryRecord],
        anniversaries: &[AnniversaryRecord],
        export_date: NaiveDate,
        path: &Path,
    ) -> ArchiveResult<()> {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir)?;

        let text = render_text(memories, anniversaries, export_date);
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(text.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| ArchiveError::Io(e.error))?;

        info!(
            "Wrote text export of {} memories and {} anniversaries to {}",
            memories.len(),
            anniversaries.len(),
            path.display()
        );
        Ok(())
    }
}
