// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Persistent storage for user records and the token revocation table,
//! implemented as one JSON file per record under the configured data
//! directory.
//!
//! ## Storage Layout
//!
//! ```text
//! /data/
//!   users/
//!     {user_id}.json        # User record (profile, password hash, roles)
//!   revoked/
//!     {record_id}.json      # Revoked token (append-only, never purged)
//! ```

pub mod fs;
pub mod paths;
pub mod repository;

pub use fs::{FileStorage, StorageError, StorageResult};
pub use paths::StoragePaths;
pub use repository::{RevokedToken, RevokedTokenRepository, StoredUser, UserRepository};
