// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Revoked-token (blacklist) repository.
//!
//! Each revocation is stored as a separate JSON file under `revoked/`, keyed
//! by a surrogate UUID. Records are append-only: they are never updated and
//! never purged, so the table accumulates for the lifetime of the store.
//!
//! Token strings are stored with the scheme prefix already stripped and
//! whitespace trimmed; callers normalize before calling in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::super::{FileStorage, StorageResult};

/// A revoked token record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RevokedToken {
    /// Surrogate identifier (UUID).
    pub id: String,
    /// The raw signed-token string, prefix stripped.
    pub token: String,
    /// Username the token belonged to (may be empty if the token could not
    /// be decoded at revocation time).
    pub username: String,
    /// When the token was revoked.
    pub revoked_at: DateTime<Utc>,
}

/// Repository for the revocation table.
pub struct RevokedTokenRepository<'a> {
    storage: &'a FileStorage,
}

impl<'a> RevokedTokenRepository<'a> {
    /// Create a new RevokedTokenRepository.
    pub fn new(storage: &'a FileStorage) -> Self {
        Self { storage }
    }

    /// Exact string match against the persisted revoked tokens.
    pub fn contains(&self, raw_token: &str) -> StorageResult<bool> {
        let ids = self
            .storage
            .list_files(self.storage.paths().revoked_dir(), "json")?;

        for id in ids {
            let record: RevokedToken = self.storage.read_json(self.storage.paths().revoked(&id))?;
            if record.token == raw_token {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Insert a new revocation record.
    ///
    /// Not idempotent: revoking the same token twice creates a duplicate
    /// record. Harmless for `contains`, wasteful for storage; kept as-is
    /// rather than silently deduplicated.
    pub fn revoke(&self, raw_token: &str, username: &str) -> StorageResult<RevokedToken> {
        let record = RevokedToken {
            id: Uuid::new_v4().to_string(),
            token: raw_token.to_string(),
            username: username.to_string(),
            revoked_at: Utc::now(),
        };
        self.storage
            .write_json(self.storage.paths().revoked(&record.id), &record)?;
        Ok(record)
    }

    /// Number of revocation records.
    pub fn count(&self) -> StorageResult<usize> {
        Ok(self
            .storage
            .list_files(self.storage.paths().revoked_dir(), "json")?
            .len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StoragePaths;
    use tempfile::TempDir;

    fn test_storage() -> (FileStorage, TempDir) {
        let temp_dir = TempDir::new().expect("create temp dir");
        let mut storage = FileStorage::new(StoragePaths::new(temp_dir.path()));
        storage.initialize().expect("initialize storage");
        (storage, temp_dir)
    }

    #[test]
    fn contains_is_exact_match() {
        let (storage, _guard) = test_storage();
        let repo = RevokedTokenRepository::new(&storage);

        repo.revoke("aaa.bbb.ccc", "johnsmith").unwrap();

        assert!(repo.contains("aaa.bbb.ccc").unwrap());
        assert!(!repo.contains("aaa.bbb.ccc ").unwrap());
        assert!(!repo.contains("aaa.bbb.ccd").unwrap());
    }

    #[test]
    fn empty_table_contains_nothing() {
        let (storage, _guard) = test_storage();
        let repo = RevokedTokenRepository::new(&storage);
        assert!(!repo.contains("anything").unwrap());
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn revoking_twice_creates_duplicate_records() {
        let (storage, _guard) = test_storage();
        let repo = RevokedTokenRepository::new(&storage);

        let first = repo.revoke("aaa.bbb.ccc", "johnsmith").unwrap();
        let second = repo.revoke("aaa.bbb.ccc", "johnsmith").unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(repo.count().unwrap(), 2);
        assert!(repo.contains("aaa.bbb.ccc").unwrap());
    }
}
