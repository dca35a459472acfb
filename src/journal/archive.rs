//! Archive and text export, archive import

use super::Journal;
use crate::error::Result;
use crate::import::{ApplyReport, ImportCoordinator};
use chrono::Local;
use keepsake_archive::{
    ArchiveExportInfo, ArchiveReader, ArchiveSnapshot, ArchiveSummary, ArchiveWriter, TextExporter,
    ARCHIVE_EXTENSION,
};
use keepsake_core::now_millis;
use std::path::{Path, PathBuf};
use tracing::info;

impl Journal {
    /// Snapshot of every memory and anniversary, stamped with today's date
    pub fn snapshot(&self) -> Result<ArchiveSnapshot> {
        Ok(ArchiveSnapshot::new(
            self.records.list_memories()?,
            self.records.list_anniversaries()?,
        ))
    }

    /// Export everything to `memories_backup_<millis>.tar.zst` in the export dir
    pub fn export_archive(&self) -> Result<ArchiveExportInfo> {
        let name = format!("memories_backup_{}.{}", now_millis(), ARCHIVE_EXTENSION);
        self.export_archive_to(&self.export_dir.join(name))
    }

    /// Export everything to `path`
    ///
    /// Missing media files are left out and listed in the returned
    /// [`ArchiveExportInfo::skipped_media`].
    pub fn export_archive_to(&self, path: &Path) -> Result<ArchiveExportInfo> {
        let snapshot = self.snapshot()?;
        Ok(ArchiveWriter::new(&self.export_options).write(&snapshot, path)?)
    }

    /// Import an archive: write its media, then insert its records as new
    pub fn import_archive(&self, path: &Path) -> Result<ApplyReport> {
        let imported = ArchiveReader::import(path, &self.media)?;
        if !imported.media_skipped.is_empty() {
            info!("{} media entries were not imported", imported.media_skipped.len());
        }
        self.apply_import(&imported.snapshot)
    }

    /// Insert a decoded snapshot's records with media paths remapped
    pub fn apply_import(&self, snapshot: &ArchiveSnapshot) -> Result<ApplyReport> {
        ImportCoordinator::new(self.records.as_ref(), &self.media, self.import_options.clone())
            .apply(snapshot)
    }

    /// Describe an archive without importing it
    pub fn inspect_archive(&self, path: &Path) -> Result<ArchiveSummary> {
        Ok(ArchiveReader::inspect(path)?)
    }

    /// Write a readable text export to `memories_text_<millis>.txt` in the export dir
    pub fn export_text(&self) -> Result<PathBuf> {
        let path = self.export_dir.join(format!("memories_text_{}.txt", now_millis()));
        self.export_text_to(&path)?;
        Ok(path)
    }

    /// Write a readable text export to `path`
    pub fn export_text_to(&self, path: &Path) -> Result<()> {
        let memories = self.records.list_memories()?;
        let anniversaries = self.records.list_anniversaries()?;
        TextExporter::write(&memories, &anniversaries, Local::now().date_naive(), path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::types::{NewAnniversary, NewMemory};
    use crate::Journal;
    use chrono::NaiveDate;
    use std::fs;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_export_names_and_location() {
        let journal = Journal::ephemeral().unwrap();
        journal.add_memory(NewMemory::new("t", ymd(2024, 1, 1), "m")).unwrap();

        let info = journal.export_archive().unwrap();
        let path = info.path.unwrap();
        assert_eq!(path.parent().unwrap(), journal.export_dir());
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("memories_backup_") && name.ends_with(".tar.zst"), "{}", name);

        let text = journal.export_text().unwrap();
        let name = text.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("memories_text_") && name.ends_with(".txt"), "{}", name);
        assert!(fs::read_to_string(&text).unwrap().contains("Message: m"));
    }

    #[test]
    fn test_inspect_counts() {
        let journal = Journal::ephemeral().unwrap();
        journal.add_memory(NewMemory::new("t", ymd(2024, 1, 1), "m")).unwrap();
        journal.add_anniversary(NewAnniversary::new("Met", ymd(2019, 5, 20))).unwrap();

        let info = journal.export_archive().unwrap();
        let summary = journal.inspect_archive(info.path.as_deref().unwrap()).unwrap();
        assert_eq!(summary.memory_count, 1);
        assert_eq!(summary.anniversary_count, 1);
        assert_eq!(summary.version, "1.0");
    }

    #[test]
    fn test_import_anniversaries_opt_in() {
        let source = Journal::ephemeral().unwrap();
        source.add_anniversary(NewAnniversary::new("Met", ymd(2019, 5, 20))).unwrap();
        let archive = source.export_archive().unwrap().path.unwrap();

        let target = Journal::builder().ephemeral().import_anniversaries(true).open().unwrap();
        let report = target.import_archive(&archive).unwrap();
        assert_eq!(report.anniversaries_applied, 1);
        assert_eq!(target.anniversaries().unwrap()[0].title, "Met");
    }
}
