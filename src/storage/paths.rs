// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Path constants and utilities for the storage layout.

use std::path::{Path, PathBuf};

/// Default base directory for persistent storage.
pub const DATA_ROOT: &str = "/data";

/// Storage path utilities.
///
/// Layout:
///
/// ```text
/// /data/
///   users/{user_id}.json      # User records
///   revoked/{record_id}.json  # Revoked (blacklisted) tokens
/// ```
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl Default for StoragePaths {
    fn default() -> Self {
        Self::new(DATA_ROOT)
    }
}

impl StoragePaths {
    /// Create a new StoragePaths with a custom root (useful for testing).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory for all persistent data.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory containing all user records.
    pub fn users_dir(&self) -> PathBuf {
        self.root.join("users")
    }

    /// Path to a specific user record.
    pub fn user(&self, user_id: &str) -> PathBuf {
        self.users_dir().join(format!("{user_id}.json"))
    }

    /// Directory containing all revoked-token records.
    pub fn revoked_dir(&self) -> PathBuf {
        self.root.join("revoked")
    }

    /// Path to a specific revoked-token record.
    pub fn revoked(&self, record_id: &str) -> PathBuf {
        self.revoked_dir().join(format!("{record_id}.json"))
    }
}
