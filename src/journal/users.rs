//! User operations
//!
//! Users are local co-authors of the journal. At most one is current at a
//! time; users are never exported.

use super::Journal;
use crate::error::{Error, Result};
use keepsake_core::{User, UserId};
use tracing::info;

/// Name given to the user created on first run
pub const DEFAULT_USER_NAME: &str = "Me";

impl Journal {
    /// Return the current user, creating or promoting one if needed.
    ///
    /// With no users at all a default user is created. With users but none
    /// current, the earliest created becomes current.
    pub fn ensure_default_user(&self) -> Result<User> {
        if let Some(current) = self.records.current_user()? {
            return Ok(current);
        }

        let mut users = self.records.list_users()?;
        users.sort_by_key(|u| u.created_at);
        match users.into_iter().next() {
            Some(first) => {
                self.records.set_current_user(first.id)?;
                Ok(User {
                    is_current_user: true,
                    ..first
                })
            }
            None => {
                let mut user = User::new(DEFAULT_USER_NAME);
                user.is_current_user = true;
                self.records.upsert_user(user.clone())?;
                info!("Created default user {}", user.id);
                Ok(user)
            }
        }
    }

    /// Add a non-current user.
    pub fn add_user(&self, name: impl Into<String>) -> Result<User> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::invalid_input("user name must not be empty"));
        }
        let user = User::new(name);
        self.records.upsert_user(user.clone())?;
        Ok(user)
    }

    /// Change a user's display name.
    pub fn rename_user(&self, id: UserId, name: impl Into<String>) -> Result<User> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::invalid_input("user name must not be empty"));
        }
        let user = User {
            name,
            ..self.user(id)?
        };
        self.records.upsert_user(user.clone())?;
        info!("Renamed user {}", id);
        Ok(user)
    }

    /// Set or clear a user's avatar image path.
    pub fn set_user_avatar(&self, id: UserId, avatar: Option<String>) -> Result<User> {
        let user = User {
            avatar,
            ..self.user(id)?
        };
        self.records.upsert_user(user.clone())?;
        Ok(user)
    }

    /// Look up one user
    pub fn user(&self, id: UserId) -> Result<User> {
        self.records
            .get_user(id)?
            .ok_or_else(|| Error::NotFound(format!("user {}", id)))
    }

    /// Make `id` the current user.
    pub fn set_current_user(&self, id: UserId) -> Result<()> {
        Ok(self.records.set_current_user(id)?)
    }

    /// Remove a user.
    pub fn remove_user(&self, id: UserId) -> Result<User> {
        self.records
            .delete_user(id)?
            .ok_or_else(|| Error::NotFound(format!("user {}", id)))
    }

    /// All users
    pub fn users(&self) -> Result<Vec<User>> {
        Ok(self.records.list_users()?)
    }

    /// The current user, if one is set
    pub fn current_user(&self) -> Result<Option<User>> {
        Ok(self.records.current_user()?)
    }
}
