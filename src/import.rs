//! Applying imported snapshots to the record store
//!
//! An archive's records carry media paths from the device that exported
//! them. Before insertion every path is re-homed under this journal's media
//! directories, keeping only the filename. Records are always inserted as
//! new; archive ids are never reused.

use crate::error::{Error, Result};
use keepsake_archive::ArchiveSnapshot;
use keepsake_core::MemoryRecord;
use keepsake_storage::{MediaKind, MediaStore, RecordStore};
use tracing::{info, warn};

/// Options for applying an import
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Insert the snapshot's anniversaries as well as its memories
    pub include_anniversaries: bool,
}

impl ImportOptions {
    /// Also apply anniversaries
    pub fn with_anniversaries(mut self, include: bool) -> Self {
        self.include_anniversaries = include;
        self
    }
}

/// Records inserted by a successful apply
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Memories inserted
    pub memories_applied: usize,
    /// Anniversaries inserted
    pub anniversaries_applied: usize,
}

impl ApplyReport {
    /// Total records inserted
    pub fn total(&self) -> usize {
        self.memories_applied + self.anniversaries_applied
    }
}

/// Inserts snapshot records into a record store with remapped media paths
pub struct ImportCoordinator<'a> {
    records: &'a dyn RecordStore,
    media: &'a MediaStore,
    options: ImportOptions,
}

impl<'a> ImportCoordinator<'a> {
    /// Coordinator writing into `records`, remapping paths under `media`
    pub fn new(
        records: &'a dyn RecordStore,
        media: &'a MediaStore,
        options: ImportOptions,
    ) -> Self {
        Self {
            records,
            media,
            options,
        }
    }

    /// Rewrite a memory's media paths to point into this journal's media store
    ///
    /// Photo paths without a filename are dropped, as is such an audio path.
    pub fn remap_memory(&self, memory: &MemoryRecord) -> MemoryRecord {
        let mut remapped = memory.clone();
        remapped.photo_paths = memory
            .photo_paths
            .iter()
            .filter_map(|p| self.remap(MediaKind::Image, p))
            .collect();
        remapped.audio_path = memory
            .audio_path
            .as_deref()
            .and_then(|p| self.remap(MediaKind::Audio, p));
        remapped
    }

    fn remap(&self, kind: MediaKind, original: &str) -> Option<String> {
        match self.media.remap(kind, original) {
            Some(path) => Some(path.to_string_lossy().into_owned()),
            None => {
                warn!("Dropping media path without a file name: {:?}", original);
                None
            }
        }
    }

    /// Insert every memory (and, if enabled, anniversary) as a new record
    ///
    /// A failed insert is logged and the remaining records are still
    /// attempted. If any insert failed the result is
    /// [`Error::PartialImport`] with the number that succeeded.
    pub fn apply(&self, snapshot: &ArchiveSnapshot) -> Result<ApplyReport> {
        let mut report = ApplyReport::default();
        let mut failed = 0usize;
        let mut last_error = None;

        for memory in &snapshot.memories {
            match self.records.insert_memory(self.remap_memory(memory)) {
                Ok(_) => report.memories_applied += 1,
                Err(e) => {
                    warn!("Failed to import memory {:?}: {}", memory.title, e);
                    failed += 1;
                    last_error = Some(e.to_string());
                }
            }
        }

        if self.options.include_anniversaries {
            for anniversary in &snapshot.anniversaries {
                match self.records.insert_anniversary(anniversary.clone()) {
                    Ok(_) => report.anniversaries_applied += 1,
                    Err(e) => {
                        warn!("Failed to import anniversary {:?}: {}", anniversary.title, e);
                        failed += 1;
                        last_error = Some(e.to_string());
                    }
                }
            }
        }

        if let Some(reason) = last_error {
            return Err(Error::PartialImport {
                applied: report.total(),
                failed,
                reason,
            });
        }

        info!(
            "Applied {} memories and {} anniversaries",
            report.memories_applied, report.anniversaries_applied
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use keepsake_core::{AnniversaryId, AnniversaryRecord, MemoryId, User, UserId};
    use keepsake_storage::{InMemoryRecordStore, StorageError, StorageResult};
    use proptest::prelude::*;
    use std::path::Path;
    use tempfile::tempdir;
    use tokio::sync::watch;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn snapshot() -> ArchiveSnapshot {
        let mut first = MemoryRecord::new("Beach", ymd(2023, 7, 1), "Sunny")
            .with_photos(["/old/device/img_1.jpg", "C:\\phone\\img_2.jpg"])
            .with_audio("/old/device/audio_1.3gp");
        first.id = MemoryId(40);
        let second = MemoryRecord::new("Dinner", ymd(2023, 8, 2), "Pasta");
        let mut anniversary = AnniversaryRecord::new("Met", ymd(2019, 5, 20));
        anniversary.id = AnniversaryId(9);
        ArchiveSnapshot::new(vec![first, second], vec![anniversary])
    }

    #[test]
    fn test_apply_remaps_and_inserts_memories_only() {
        let dir = tempdir().unwrap();
        let media = MediaStore::open(dir.path()).unwrap();
        let records = InMemoryRecordStore::new();

        let report = ImportCoordinator::new(&records, &media, ImportOptions::default())
            .apply(&snapshot())
            .unwrap();

        assert_eq!(report, ApplyReport { memories_applied: 2, anniversaries_applied: 0 });
        assert!(records.list_anniversaries().unwrap().is_empty());

        let beach = records
            .list_memories()
            .unwrap()
            .into_iter()
            .find(|m| m.title == "Beach")
            .unwrap();
        assert_ne!(beach.id, MemoryId(40));
        let image_dir = media.dir_path(MediaKind::Image);
        assert_eq!(
            beach.photo_paths,
            vec![
                image_dir.join("img_1.jpg").to_string_lossy().to_string(),
                image_dir.join("img_2.jpg").to_string_lossy().to_string(),
            ]
        );
        assert_eq!(
            beach.audio_path.map(std::path::PathBuf::from),
            Some(media.dir_path(MediaKind::Audio).join("audio_1.3gp"))
        );
    }

    #[test]
    fn test_apply_with_anniversaries() {
        let dir = tempdir().unwrap();
        let media = MediaStore::open(dir.path()).unwrap();
        let records = InMemoryRecordStore::new();

        let options = ImportOptions::default().with_anniversaries(true);
        let report = ImportCoordinator::new(&records, &media, options)
            .apply(&snapshot())
            .unwrap();

        assert_eq!(report.anniversaries_applied, 1);
        assert_eq!(report.total(), 3);
        let stored = records.list_anniversaries().unwrap();
        assert_eq!(stored[0].title, "Met");
    }

    #[test]
    fn test_path_without_file_name_is_dropped() {
        let dir = tempdir().unwrap();
        let media = MediaStore::open(dir.path()).unwrap();
        let records = InMemoryRecordStore::new();
        let coordinator = ImportCoordinator::new(&records, &media, ImportOptions::default());

        let memory = MemoryRecord::new("t", ymd(2024, 1, 1), "m")
            .with_photos(["/some/dir/", "/p/img_3.jpg"])
            .with_audio("");
        let remapped = coordinator.remap_memory(&memory);
        assert_eq!(remapped.photo_paths.len(), 1);
        assert!(remapped.photo_paths[0].ends_with("img_3.jpg"));
        assert_eq!(remapped.audio_path, None);
    }

    /// Accepts memories until the budget runs out
    struct FlakyStore {
        inner: InMemoryRecordStore,
        budget: parking_lot::Mutex<usize>,
    }

    impl RecordStore for FlakyStore {
        fn list_memories(&self) -> StorageResult<Vec<MemoryRecord>> {
            self.inner.list_memories()
        }
        fn watch_memories(&self) -> watch::Receiver<Vec<MemoryRecord>> {
            self.inner.watch_memories()
        }
        fn get_memory(&self, id: MemoryId) -> StorageResult<Option<MemoryRecord>> {
            self.inner.get_memory(id)
        }
        fn insert_memory(&self, record: MemoryRecord) -> StorageResult<MemoryId> {
            let mut budget = self.budget.lock();
            if *budget == 0 {
                return Err(StorageError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "disk full",
                )));
            }
            *budget -= 1;
            self.inner.insert_memory(record)
        }
        fn update_memory(&self, record: &MemoryRecord) -> StorageResult<()> {
            self.inner.update_memory(record)
        }
        fn delete_memory(&self, id: MemoryId) -> StorageResult<Option<MemoryRecord>> {
            self.inner.delete_memory(id)
        }
        fn delete_all_memories(&self) -> StorageResult<usize> {
            self.inner.delete_all_memories()
        }
        fn random_memory(&self) -> StorageResult<Option<MemoryRecord>> {
            self.inner.random_memory()
        }
        fn list_anniversaries(&self) -> StorageResult<Vec<AnniversaryRecord>> {
            self.inner.list_anniversaries()
        }
        fn watch_anniversaries(&self) -> watch::Receiver<Vec<AnniversaryRecord>> {
            self.inner.watch_anniversaries()
        }
        fn get_anniversary(&self, id: AnniversaryId) -> StorageResult<Option<AnniversaryRecord>> {
            self.inner.get_anniversary(id)
        }
        fn insert_anniversary(&self, record: AnniversaryRecord) -> StorageResult<AnniversaryId> {
            self.inner.insert_anniversary(record)
        }
        fn update_anniversary(&self, record: &AnniversaryRecord) -> StorageResult<()> {
            self.inner.update_anniversary(record)
        }
        fn delete_anniversary(
            &self,
            id: AnniversaryId,
        ) -> StorageResult<Option<AnniversaryRecord>> {
            self.inner.delete_anniversary(id)
        }
        fn list_users(&self) -> StorageResult<Vec<User>> {
            self.inner.list_users()
        }
        fn get_user(&self, id: UserId) -> StorageResult<Option<User>> {
            self.inner.get_user(id)
        }
        fn upsert_user(&self, user: User) -> StorageResult<()> {
            self.inner.upsert_user(user)
        }
        fn delete_user(&self, id: UserId) -> StorageResult<Option<User>> {
            self.inner.delete_user(id)
        }
        fn current_user(&self) -> StorageResult<Option<User>> {
            self.inner.current_user()
        }
        fn set_current_user(&self, id: UserId) -> StorageResult<()> {
            self.inner.set_current_user(id)
        }
    }

    #[test]
    fn test_partial_failure_reports_counts() {
        let dir = tempdir().unwrap();
        let media = MediaStore::open(dir.path()).unwrap();
        let records = FlakyStore {
            inner: InMemoryRecordStore::new(),
            budget: parking_lot::Mutex::new(1),
        };

        let err = ImportCoordinator::new(&records, &media, ImportOptions::default())
            .apply(&snapshot())
            .unwrap_err();

        match err {
            Error::PartialImport { applied, failed, reason } => {
                assert_eq!(applied, 1);
                assert_eq!(failed, 1);
                assert!(reason.contains("disk full"), "{}", reason);
            }
            other => panic!("expected PartialImport, got {:?}", other),
        }
        assert_eq!(records.list_memories().unwrap().len(), 1);
    }

    proptest! {
        #[test]
        fn prop_remap_keeps_only_file_name(
            dirs in proptest::collection::vec("[a-zA-Z0-9 _.-]{1,8}", 0..4),
            name in "[a-zA-Z0-9_]{1,12}\\.jpg",
            windows in any::<bool>(),
        ) {
            let sep = if windows { "\\" } else { "/" };
            let mut original = String::new();
            for d in &dirs {
                original.push_str(sep);
                original.push_str(d);
            }
            original.push_str(sep);
            original.push_str(&name);

            let dir = tempdir().unwrap();
            let media = MediaStore::open(dir.path()).unwrap();
            let records = InMemoryRecordStore::new();
            let coordinator = ImportCoordinator::new(&records, &media, ImportOptions::default());

            let memory = MemoryRecord::new("t", ymd(2024, 1, 1), "m").with_photos([original]);
            let remapped = coordinator.remap_memory(&memory);
            prop_assert_eq!(remapped.photo_paths.len(), 1);
            let expected = media.dir_path(MediaKind::Image).join(&name);
            prop_assert_eq!(Path::new(&remapped.photo_paths[0]), expected.as_path());
        }
    }
}
