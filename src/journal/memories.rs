//! Memory operations

use super::Journal;
use crate::error::{Error, Result};
use crate::types::{MemoryEdit, NewMemory};
use keepsake_core::{MemoryId, MemoryRecord};
use std::path::Path;
use tokio::sync::watch;
use tracing::{debug, warn};

impl Journal {
    /// Create a memory and return it with its assigned id.
    ///
    /// Fails with [`Error::InvalidInput`] if the title or message is blank.
    pub fn add_memory(&self, memory: NewMemory) -> Result<MemoryRecord> {
        memory.validate()?;
        let mut record = memory.into_record();
        record.id = self.records.insert_memory(record.clone())?;
        debug!("Added memory {} ({:?})", record.id, record.title);
        Ok(record)
    }

    /// Replace the fields of an existing memory.
    ///
    /// Media files the memory no longer references are left on disk.
    pub fn edit_memory(&self, id: MemoryId, edit: MemoryEdit) -> Result<MemoryRecord> {
        edit.validate()?;
        let existing = self
            .records
            .get_memory(id)?
            .ok_or_else(|| Error::NotFound(format!("memory {}", id)))?;

        let record = MemoryRecord {
            id,
            title: edit.title,
            date: edit.date,
            message: edit.message,
            photo_paths: edit.photo_paths,
            audio_path: edit.audio_path,
            created_at: existing.created_at,
        };
        self.records.update_memory(&record)?;
        Ok(record)
    }

    /// Delete a memory and its media files.
    ///
    /// Media deletion is best-effort: failures are logged and the memory is
    /// still reported as deleted.
    pub fn delete_memory(&self, id: MemoryId) -> Result<MemoryRecord> {
        let record = self
            .records
            .delete_memory(id)?
            .ok_or_else(|| Error::NotFound(format!("memory {}", id)))?;
        self.delete_media_of(&record);
        Ok(record)
    }

    /// Delete every memory and its media. Returns how many were removed.
    pub fn clear_memories(&self) -> Result<usize> {
        let memories = self.records.list_memories()?;
        let removed = self.records.delete_all_memories()?;
        for record in &memories {
            self.delete_media_of(record);
        }
        debug!("Cleared {} memories", removed);
        Ok(removed)
    }

    /// All memories, newest date first
    pub fn memories(&self) -> Result<Vec<MemoryRecord>> {
        Ok(self.records.list_memories()?)
    }

    /// One memory by id
    pub fn memory(&self, id: MemoryId) -> Result<Option<MemoryRecord>> {
        Ok(self.records.get_memory(id)?)
    }

    /// A uniformly random memory, if there are any
    pub fn random_memory(&self) -> Result<Option<MemoryRecord>> {
        Ok(self.records.random_memory()?)
    }

    /// Receiver that always holds the current memory list
    pub fn watch_memories(&self) -> watch::Receiver<Vec<MemoryRecord>> {
        self.records.watch_memories()
    }

    fn delete_media_of(&self, record: &MemoryRecord) {
        for path in record.media_paths() {
            if let Err(e) = self.media.delete(Some(Path::new(path))) {
                warn!("Could not delete media {} of memory {}: {}", path, record.id, e);
            }
        }
    }
}
