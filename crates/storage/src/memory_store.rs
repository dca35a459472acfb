//! In-memory record store
//!
//! All records live behind a single `RwLock`. Ids are handed out from
//! monotonically increasing counters and are never reused, even after
//! deletes. Every mutation republishes the affected list on its watch
//! channel while the write lock is still held, so subscribers never observe
//! lists out of order.

use crate::error::{StorageError, StorageResult};
use crate::record_store::RecordStore;
use keepsake_core::{AnniversaryId, AnniversaryRecord, MemoryId, MemoryRecord, User, UserId};
use parking_lot::RwLock;
use rand::seq::IteratorRandom;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokio::sync::watch;

/// Serializable form of everything a record store holds
///
/// This is also the on-disk layout used by
/// [`FileRecordStore`](crate::FileRecordStore).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordState {
    /// Last memory id handed out
    pub last_memory_id: i64,
    /// Last anniversary id handed out
    pub last_anniversary_id: i64,
    /// Memories in id order
    pub memories: Vec<MemoryRecord>,
    /// Anniversaries in id order
    pub anniversaries: Vec<AnniversaryRecord>,
    /// Users in creation order
    pub users: Vec<User>,
}

#[derive(Debug, Default)]
struct Tables {
    last_memory_id: i64,
    last_anniversary_id: i64,
    memories: BTreeMap<MemoryId, MemoryRecord>,
    anniversaries: BTreeMap<AnniversaryId, AnniversaryRecord>,
    users: Vec<User>,
}

impl Tables {
    fn from_state(state: RecordState) -> Self {
        let memories: BTreeMap<_, _> = state.memories.into_iter().map(|m| (m.id, m)).collect();
        let anniversaries: BTreeMap<_, _> = state
            .anniversaries
            .into_iter()
            .map(|a| (a.id, a))
            .collect();

        // Never hand out an id that is already present
        let max_memory = memories.keys().next_back().map(|id| id.0).unwrap_or(0);
        let max_anniversary = anniversaries.keys().next_back().map(|id| id.0).unwrap_or(0);

        Self {
            last_memory_id: state.last_memory_id.max(max_memory),
            last_anniversary_id: state.last_anniversary_id.max(max_anniversary),
            memories,
            anniversaries,
            users: state.users,
        }
    }

    fn to_state(&self) -> RecordState {
        RecordState {
            last_memory_id: self.last_memory_id,
            last_anniversary_id: self.last_anniversary_id,
            memories: self.memories.values().cloned().collect(),
            anniversaries: self.anniversaries.values().cloned().collect(),
            users: self.users.clone(),
        }
    }

    fn sorted_memories(&self) -> Vec<MemoryRecord> {
        let mut list: Vec<_> = self.memories.values().cloned().collect();
        list.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        list
    }

    fn sorted_anniversaries(&self) -> Vec<AnniversaryRecord> {
        let mut list: Vec<_> = self.anniversaries.values().cloned().collect();
        list.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
        list
    }
}

/// Record store kept entirely in memory
///
/// Thread-safe; share it behind an `Arc`.
pub struct InMemoryRecordStore {
    tables: RwLock<Tables>,
    memories_tx: watch::Sender<Vec<MemoryRecord>>,
    anniversaries_tx: watch::Sender<Vec<AnniversaryRecord>>,
}

impl InMemoryRecordStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::from_state(RecordState::default())
    }

    /// Create a store pre-populated from a saved state
    pub fn from_state(state: RecordState) -> Self {
        let tables = Tables::from_state(state);
        let (memories_tx, _) = watch::channel(tables.sorted_memories());
        let (anniversaries_tx, _) = watch::channel(tables.sorted_anniversaries());
        Self {
            tables: RwLock::new(tables),
            memories_tx,
            anniversaries_tx,
        }
    }

    /// Copy of the full store contents
    pub fn state(&self) -> RecordState {
        self.tables.read().to_state()
    }

    /// Replace the full store contents and republish both lists
    pub fn restore(&self, state: RecordState) {
        let mut tables = self.tables.write();
        *tables = Tables::from_state(state);
        self.publish_memories(&tables);
        self.publish_anniversaries(&tables);
    }

    fn publish_memories(&self, tables: &Tables) {
        self.memories_tx.send_replace(tables.sorted_memories());
    }

    fn publish_anniversaries(&self, tables: &Tables) {
        self.anniversaries_tx.send_replace(tables.sorted_anniversaries());
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for InMemoryRecordStore {
    fn list_memories(&self) -> StorageResult<Vec<MemoryRecord>> {
        Ok(self.tables.read().sorted_memories())
    }

    fn watch_memories(&self) -> watch::Receiver<Vec<MemoryRecord>> {
        self.memories_tx.subscribe()
    }

    fn get_memory(&self, id: MemoryId) -> StorageResult<Option<MemoryRecord>> {
        Ok(self.tables.read().memories.get(&id).cloned())
    }

    fn insert_memory(&self, mut record: MemoryRecord) -> StorageResult<MemoryId> {
        let mut tables = self.tables.write();
        tables.last_memory_id += 1;
        let id = MemoryId(tables.last_memory_id);
        record.id = id;
        tables.memories.insert(id, record);
        self.publish_memories(&tables);
        Ok(id)
    }

    fn update_memory(&self, record: &MemoryRecord) -> StorageResult<()> {
        let mut tables = self.tables.write();
        match tables.memories.get_mut(&record.id) {
            Some(existing) => *existing = record.clone(),
            None => return Err(StorageError::not_found(format!("memory {}", record.id))),
        }
        self.publish_memories(&tables);
        Ok(())
    }

    fn delete_memory(&self, id: MemoryId) -> StorageResult<Option<MemoryRecord>> {
        let mut tables = self.tables.write();
        let removed = tables.memories.remove(&id);
        if removed.is_some() {
            self.publish_memories(&tables);
        }
        Ok(removed)
    }

    fn delete_all_memories(&self) -> StorageResult<usize> {
        let mut tables = self.tables.write();
        let count = tables.memories.len();
        tables.memories.clear();
        self.publish_memories(&tables);
        Ok(count)
    }

    fn random_memory(&self) -> StorageResult<Option<MemoryRecord>> {
        let tables = self.tables.read();
        Ok(tables
            .memories
            .values()
            .choose(&mut rand::thread_rng())
            .cloned())
    }

    fn list_anniversaries(&self) -> StorageResult<Vec<AnniversaryRecord>> {
        Ok(self.tables.read().sorted_anniversaries())
    }

    fn watch_anniversaries(&self) -> watch::Receiver<Vec<AnniversaryRecord>> {
        self.anniversaries_tx.subscribe()
    }

    fn get_anniversary(&self, id: AnniversaryId) -> StorageResult<Option<AnniversaryRecord>> {
        Ok(self.tables.read().anniversaries.get(&id).cloned())
    }

    fn insert_anniversary(&self, mut record: AnniversaryRecord) -> StorageResult<AnniversaryId> {
        let mut tables = self.tables.write();
        tables.last_anniversary_id += 1;
        let id = AnniversaryId(tables.last_anniversary_id);
        record.id = id;
        tables.anniversaries.insert(id, record);
        self.publish_anniversaries(&tables);
        Ok(id)
    }

    fn update_anniversary(&self, record: &AnniversaryRecord) -> StorageResult<()> {
        let mut tables = self.tables.write();
        match tables.anniversaries.get_mut(&record.id) {
            Some(existing) => *existing = record.clone(),
            None => return Err(StorageError::not_found(format!("anniversary {}", record.id))),
        }
        self.publish_anniversaries(&tables);
        Ok(())
    }

    fn delete_anniversary(&self, id: AnniversaryId) -> StorageResult<Option<AnniversaryRecord>> {
        let mut tables = self.tables.write();
        let removed = tables.anniversaries.remove(&id);
        if removed.is_some() {
            self.publish_anniversaries(&tables);
        }
        Ok(removed)
    }

    fn list_users(&self) -> StorageResult<Vec<User>> {
        Ok(self.tables.read().users.clone())
    }

    fn get_user(&self, id: UserId) -> StorageResult<Option<User>> {
        Ok(self.tables.read().users.iter().find(|u| u.id == id).cloned())
    }

    fn upsert_user(&self, user: User) -> StorageResult<()> {
        let mut tables = self.tables.write();
        if user.is_current_user {
            for other in tables.users.iter_mut() {
                other.is_current_user = false;
            }
        }
        match tables.users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => *existing = user,
            None => tables.users.push(user),
        }
        Ok(())
    }

    fn delete_user(&self, id: UserId) -> StorageResult<Option<User>> {
        let mut tables = self.tables.write();
        let position = tables.users.iter().position(|u| u.id == id);
        Ok(position.map(|i| tables.users.remove(i)))
    }

    fn current_user(&self) -> StorageResult<Option<User>> {
        Ok(self
            .tables
            .read()
            .users
            .iter()
            .find(|u| u.is_current_user)
            .cloned())
    }

    fn set_current_user(&self, id: UserId) -> StorageResult<()> {
        let mut tables = self.tables.write();
        if !tables.users.iter().any(|u| u.id == id) {
            return Err(StorageError::not_found(format!("user {}", id)));
        }
        for user in tables.users.iter_mut() {
            user.is_current_user = user.id == id;
        }
        Ok(())
    }
}
