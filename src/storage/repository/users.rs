// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User record repository.
//!
//! Each user is stored as a separate JSON file under `users/`, keyed by a
//! surrogate UUID. Username and email lookups are case-insensitive scans,
//! matching the uniqueness rules enforced at registration and update time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::super::{FileStorage, StorageError, StorageResult};

/// User record as persisted.
///
/// The password hash and the surrogate id never leave the storage layer;
/// API responses are built from a separate projection type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredUser {
    /// Surrogate identifier (UUID).
    pub id: String,
    /// Login name, unique ignoring case.
    pub username: String,
    /// First name.
    pub firstname: String,
    /// Last name.
    pub lastname: String,
    /// E-mail address, unique ignoring case.
    pub email: String,
    /// bcrypt hash of the password.
    pub password_hash: String,
    /// Granted authorities, e.g. `ROLE_USER`.
    pub roles: Vec<String>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// Repository for user records.
pub struct UserRepository<'a> {
    storage: &'a FileStorage,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository.
    pub fn new(storage: &'a FileStorage) -> Self {
        Self { storage }
    }

    /// Check if a user record exists.
    pub fn exists(&self, user_id: &str) -> bool {
        self.storage.exists(self.storage.paths().user(user_id))
    }

    /// Get a user by surrogate id.
    pub fn get(&self, user_id: &str) -> StorageResult<StoredUser> {
        let path = self.storage.paths().user(user_id);
        if !self.storage.exists(&path) {
            return Err(StorageError::NotFound(format!("User {user_id}")));
        }
        self.storage.read_json(path)
    }

    /// Find a user by username, ignoring case.
    pub fn find_by_username_ignore_case(
        &self,
        username: &str,
    ) -> StorageResult<Option<StoredUser>> {
        Ok(self
            .list_all()?
            .into_iter()
            .find(|user| user.username.eq_ignore_ascii_case(username)))
    }

    /// Find all users matching the username or email, ignoring case.
    ///
    /// Used by registration to detect duplicates on either attribute.
    pub fn find_by_username_or_email_ignore_case(
        &self,
        username: &str,
        email: &str,
    ) -> StorageResult<Vec<StoredUser>> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|user| {
                user.username.eq_ignore_ascii_case(username)
                    || user.email.eq_ignore_ascii_case(email)
            })
            .collect())
    }

    /// Find a user other than `username` that already uses `email`.
    ///
    /// Used by update to keep emails unique across accounts.
    pub fn find_other_with_email_ignore_case(
        &self,
        username: &str,
        email: &str,
    ) -> StorageResult<Option<StoredUser>> {
        Ok(self.list_all()?.into_iter().find(|user| {
            !user.username.eq_ignore_ascii_case(username)
                && user.email.eq_ignore_ascii_case(email)
        }))
    }

    /// Create a new user record.
    pub fn create(&self, user: &StoredUser) -> StorageResult<()> {
        if self.exists(&user.id) {
            return Err(StorageError::AlreadyExists(format!("User {}", user.id)));
        }
        self.storage
            .write_json(self.storage.paths().user(&user.id), user)
    }

    /// Update an existing user record.
    pub fn update(&self, user: &StoredUser) -> StorageResult<()> {
        if !self.exists(&user.id) {
            return Err(StorageError::NotFound(format!("User {}", user.id)));
        }
        self.storage
            .write_json(self.storage.paths().user(&user.id), user)
    }

    /// Delete a user record.
    pub fn delete(&self, user_id: &str) -> StorageResult<()> {
        if !self.exists(user_id) {
            return Err(StorageError::NotFound(format!("User {user_id}")));
        }
        self.storage.delete(self.storage.paths().user(user_id))
    }

    /// List all user records (admin view).
    pub fn list_all(&self) -> StorageResult<Vec<StoredUser>> {
        let ids = self
            .storage
            .list_files(self.storage.paths().users_dir(), "json")?;

        let mut users = Vec::new();
        for id in ids {
            match self.get(&id) {
                Ok(user) => users.push(user),
                Err(e) => tracing::warn!("Failed to read user {}: {}", id, e),
            }
        }
        Ok(users)
    }
}
