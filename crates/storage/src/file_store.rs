//! File-backed record store
//!
//! Wraps [`InMemoryRecordStore`] and rewrites `records.json` after every
//! successful mutation. The rewrite goes through a temporary file in the same
//! directory followed by a rename, so readers never see a half-written file.

use crate::error::{StorageError, StorageResult};
use crate::memory_store::{InMemoryRecordStore, RecordState};
use crate::record_store::RecordStore;
use keepsake_core::{AnniversaryId, AnniversaryRecord, MemoryId, MemoryRecord, User, UserId};
use parking_lot::Mutex;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Record store persisted to a single JSON file
pub struct FileRecordStore {
    path: PathBuf,
    inner: InMemoryRecordStore,
    /// Serializes mutate-then-persist so saves land in mutation order
    write_lock: Mutex<()>,
}

impl FileRecordStore {
    /// Open the store at `path`, loading existing records if the file exists
    ///
    /// The parent directory is created if needed.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let state = match fs::read(&path) {
            Ok(bytes) => {
                let state: RecordState = serde_json::from_slice(&bytes)?;
                info!(
                    "Loaded {} memories, {} anniversaries, {} users from {}",
                    state.memories.len(),
                    state.anniversaries.len(),
                    state.users.len(),
                    path.display()
                );
                state
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No records file at {}, starting empty", path.display());
                RecordState::default()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            inner: InMemoryRecordStore::from_state(state),
            write_lock: Mutex::new(()),
        })
    }

    /// Location of the records file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> StorageResult<()> {
        let state = self.inner.state();
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let tmp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file());
            serde_json::to_writer_pretty(&mut writer, &state)?;
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)
            .map_err(|e| StorageError::Io(e.error))?;
        Ok(())
    }

    /// Apply `op` and save, restoring the previous contents if the save fails
    fn mutate<T>(
        &self,
        op: impl FnOnce(&InMemoryRecordStore) -> StorageResult<T>,
    ) -> StorageResult<T> {
        let _guard = self.write_lock.lock();
        let before = self.inner.state();
        let result = op(&self.inner)?;
        if let Err(e) = self.persist() {
            warn!("Failed to save {}, rolling back: {}", self.path.display(), e);
            self.inner.restore(before);
            return Err(e);
        }
        Ok(result)
    }
}

impl RecordStore for FileRecordStore {
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
        self.mutate(|s| s.insert_memory(record))
    }

    fn update_memory(&self, record: &MemoryRecord) -> StorageResult<()> {
        self.mutate(|s| s.update_memory(record))
    }

    fn delete_memory(&self, id: MemoryId) -> StorageResult<Option<MemoryRecord>> {
        self.mutate(|s| s.delete_memory(id))
    }

    fn delete_all_memories(&self) -> StorageResult<usize> {
        self.mutate(|s| s.delete_all_memories())
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
        self.mutate(|s| s.insert_anniversary(record))
    }

    fn update_anniversary(&self, record: &AnniversaryRecord) -> StorageResult<()> {
        self.mutate(|s| s.update_anniversary(record))
    }

    fn delete_anniversary(&self, id: AnniversaryId) -> StorageResult<Option<AnniversaryRecord>> {
        self.mutate(|s| s.delete_anniversary(id))
    }

    fn list_users(&self) -> StorageResult<Vec<User>> {
        self.inner.list_users()
    }

    fn get_user(&self, id: UserId) -> StorageResult<Option<User>> {
        self.inner.get_user(id)
    }

    fn upsert_user(&self, user: User) -> StorageResult<()> {
        self.mutate(|s| s.upsert_user(user))
    }

    fn delete_user(&self, id: UserId) -> StorageResult<Option<User>> {
        self.mutate(|s| s.delete_user(id))
    }

    fn current_user(&self) -> StorageResult<Option<User>> {
        self.inner.current_user()
    }

    fn set_current_user(&self, id: UserId) -> StorageResult<()> {
        self.mutate(|s| s.set_current_user(id))
    }
}
