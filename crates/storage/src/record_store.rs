//! Record store interface
//!
//! The journal talks to persisted records only through [`RecordStore`].
//! Implementations must:
//! - assign a fresh id on every insert, ignoring the id on the incoming record
//! - keep the watch channels current after every successful mutation
//! - list memories newest date first and anniversaries oldest date first
//! - keep at most one user flagged as current

use crate::error::StorageResult;
use keepsake_core::{AnniversaryId, AnniversaryRecord, MemoryId, MemoryRecord, User, UserId};
use tokio::sync::watch;

/// Persistence for memories, anniversaries and users
pub trait RecordStore: Send + Sync {
    // ------------------------------------------------------------------
    // Memories
    // ------------------------------------------------------------------

    /// All memories, newest date first
    fn list_memories(&self) -> StorageResult<Vec<MemoryRecord>>;

    /// Live view of [`list_memories`](Self::list_memories)
    fn watch_memories(&self) -> watch::Receiver<Vec<MemoryRecord>>;

    /// Single memory by id
    fn get_memory(&self, id: MemoryId) -> StorageResult<Option<MemoryRecord>>;

    /// Insert as a new record and return the assigned id
    fn insert_memory(&self, record: MemoryRecord) -> StorageResult<MemoryId>;

    /// Replace an existing record; NotFound if the id is unknown
    fn update_memory(&self, record: &MemoryRecord) -> StorageResult<()>;

    /// Remove a record, returning it if it existed
    ///
    /// Does not touch media files.
    fn delete_memory(&self, id: MemoryId) -> StorageResult<Option<MemoryRecord>>;

    /// Remove every memory, returning how many were removed
    fn delete_all_memories(&self) -> StorageResult<usize>;

    /// A uniformly random memory, or `None` when there are none
    fn random_memory(&self) -> StorageResult<Option<MemoryRecord>>;

    // ------------------------------------------------------------------
    // Anniversaries
    // ------------------------------------------------------------------

    /// All anniversaries, oldest date first
    fn list_anniversaries(&self) -> StorageResult<Vec<AnniversaryRecord>>;

    /// Live view of [`list_anniversaries`](Self::list_anniversaries)
    fn watch_anniversaries(&self) -> watch::Receiver<Vec<AnniversaryRecord>>;

    /// Single anniversary by id
    fn get_anniversary(&self, id: AnniversaryId) -> StorageResult<Option<AnniversaryRecord>>;

    /// Insert as a new record and return the assigned id
    fn insert_anniversary(&self, record: AnniversaryRecord) -> StorageResult<AnniversaryId>;

    /// Replace an existing record; NotFound if the id is unknown
    fn update_anniversary(&self, record: &AnniversaryRecord) -> StorageResult<()>;

    /// Remove a record, returning it if it existed
    fn delete_anniversary(&self, id: AnniversaryId) -> StorageResult<Option<AnniversaryRecord>>;

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    /// All users, in creation order
    fn list_users(&self) -> StorageResult<Vec<User>>;

    /// Single user by id
    fn get_user(&self, id: UserId) -> StorageResult<Option<User>>;

    /// Insert or replace a user by id
    ///
    /// Upserting a user flagged as current clears the flag on all others.
    fn upsert_user(&self, user: User) -> StorageResult<()>;

    /// Remove a user, returning it if it existed
    fn delete_user(&self, id: UserId) -> StorageResult<Option<User>>;

    /// The user flagged as current, if any
    fn current_user(&self) -> StorageResult<Option<User>>;

    /// Flag `id` as current and clear the flag on everyone else
    fn set_current_user(&self, id: UserId) -> StorageResult<()>;
}
