//! Human-readable output for records and reports.

use chrono::NaiveDate;
use keepsake::date::format_date;
use keepsake::{AnniversaryRecord, ArchiveExportInfo, ArchiveSummary, Journal, MemoryRecord, User};

/// One line per memory: id, date, title and media markers
pub fn format_memory_line(memory: &MemoryRecord) -> String {
    let mut line = format!("{:>4}  {}  {}", memory.id, format_date(memory.date), memory.title);
    if memory.photo_count() > 0 {
        line.push_str(&format!("  [{} photo(s)]", memory.photo_count()));
    }
    if memory.has_audio() {
        line.push_str("  [voice note]");
    }
    line
}

/// Every field of a memory
pub fn format_memory(memory: &MemoryRecord) -> String {
    let mut out = format!(
        "id: {}\ntitle: {}\ndate: {}\nmessage: {}",
        memory.id,
        memory.title,
        format_date(memory.date),
        memory.message
    );
    for photo in &memory.photo_paths {
        out.push_str(&format!("\nphoto: {}", photo));
    }
    if let Some(audio) = &memory.audio_path {
        out.push_str(&format!("\naudio: {}", audio));
    }
    out
}

/// One line per anniversary with its day counts relative to `today`
pub fn format_anniversary_line(anniversary: &AnniversaryRecord, today: NaiveDate) -> String {
    let marker = if anniversary.is_important { "*" } else { " " };
    let mut line = format!(
        "{:>4} {} {}  {}",
        anniversary.id,
        marker,
        format_date(anniversary.date),
        anniversary.title
    );
    let since = Journal::days_since(anniversary.date, today);
    if since >= 0 {
        line.push_str(&format!("  ({} days ago", since));
        if let Some(next) = Journal::next_occurrence(anniversary.date, today) {
            line.push_str(&format!(", next in {} days", Journal::days_until(next, today)));
        }
        line.push(')');
    } else {
        line.push_str(&format!("  (in {} days)", -since));
    }
    line
}

/// One line per user, current user marked
pub fn format_user_line(user: &User) -> String {
    let marker = if user.is_current_user { "*" } else { " " };
    format!("{} {}  {}", marker, user.id, user.name)
}

/// Summary of a finished export
pub fn format_export(info: &ArchiveExportInfo) -> String {
    let path = info
        .path
        .as_deref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    let mut out = format!(
        "exported {} memories, {} anniversaries, {} photos, {} voice notes to {}",
        info.memory_count, info.anniversary_count, info.photo_entries, info.audio_entries, path
    );
    if !info.skipped_media.is_empty() {
        out.push_str(&format!(" ({} missing media files skipped)", info.skipped_media.len()));
    }
    out
}

/// Contents of an archive
pub fn format_summary(summary: &ArchiveSummary) -> String {
    format!(
        "version: {}\nexported: {}\nmemories: {}\nanniversaries: {}\nphotos: {}\nvoice notes: {}",
        summary.version,
        format_date(summary.export_date),
        summary.memory_count,
        summary.anniversary_count,
        summary.photo_entries.len(),
        summary.audio_entries.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_memory_line_markers() {
        let memory = MemoryRecord::new("Picnic", ymd(2024, 5, 1), "Lake")
            .with_photos(["/p/1.jpg"])
            .with_audio("/a/1.3gp");
        let line = format_memory_line(&memory);
        assert!(line.contains("2024-05-01  Picnic"));
        assert!(line.contains("[1 photo(s)]"));
        assert!(line.ends_with("[voice note]"));
    }

    #[test]
    fn test_anniversary_line_counts() {
        let anniversary = AnniversaryRecord::new("Met", ymd(2024, 3, 10)).important();
        let line = format_anniversary_line(&anniversary, ymd(2024, 3, 15));
        assert!(line.contains("*"));
        assert!(line.contains("(5 days ago, next in 360 days)"), "{}", line);

        let future = AnniversaryRecord::new("Trip", ymd(2024, 3, 20));
        assert!(format_anniversary_line(&future, ymd(2024, 3, 15)).ends_with("(in 5 days)"));
    }
}
