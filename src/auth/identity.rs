// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity lookup and credential verification.
//!
//! The authentication gate and the session issuer talk to the user store
//! through the [`IdentityService`] trait, so tests can substitute a double
//! without a filesystem-backed store.

use std::sync::Arc;

use super::error::AuthError;
use super::roles::Role;
use crate::storage::{FileStorage, StorageError, StoredUser, UserRepository};

/// A resolved identity: who a username belongs to and what they may do.
#[derive(Debug, Clone)]
pub struct Identity {
    /// Surrogate user id.
    pub user_id: String,
    /// Canonical username as stored.
    pub username: String,
    /// Roles granted in the identity store.
    pub roles: Vec<Role>,
}

impl From<&StoredUser> for Identity {
    fn from(user: &StoredUser) -> Self {
        Self {
            user_id: user.id.clone(),
            username: user.username.clone(),
            roles: user
                .roles
                .iter()
                .filter_map(|authority| Role::from_authority(authority))
                .collect(),
        }
    }
}

/// Identity collaborator consumed by the gate and the session issuer.
pub trait IdentityService: Send + Sync {
    /// Look up an identity by username (case-insensitive).
    fn lookup(&self, username: &str) -> Result<Option<Identity>, StorageError>;

    /// Verify a username/password pair, returning the identity on success.
    ///
    /// Every failure mode (unknown user, wrong password, hash error)
    /// collapses to `InvalidCredentials` so login responses stay generic.
    fn verify_credentials(&self, username: &str, password: &str) -> Result<Identity, AuthError>;
}

/// Production identity service backed by the user store and bcrypt.
pub struct DirectoryIdentity {
    storage: Arc<FileStorage>,
}

impl DirectoryIdentity {
    pub fn new(storage: Arc<FileStorage>) -> Self {
        Self { storage }
    }
}

impl IdentityService for DirectoryIdentity {
    fn lookup(&self, username: &str) -> Result<Option<Identity>, StorageError> {
        let repo = UserRepository::new(&self.storage);
        Ok(repo
            .find_by_username_ignore_case(username)?
            .as_ref()
            .map(Identity::from))
    }

    fn verify_credentials(&self, username: &str, password: &str) -> Result<Identity, AuthError> {
        let repo = UserRepository::new(&self.storage);
        let user = repo
            .find_by_username_ignore_case(username)
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .ok_or(AuthError::InvalidCredentials)?;

        let valid = bcrypt::verify(password, &user.password_hash)
            .map_err(|_| AuthError::InvalidCredentials)?;
        if !valid {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(Identity::from(&user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StoragePaths;
    use chrono::Utc;
    use tempfile::TempDir;

    fn test_storage() -> (Arc<FileStorage>, TempDir) {
        let temp_dir = TempDir::new().expect("create temp dir");
        let mut storage = FileStorage::new(StoragePaths::new(temp_dir.path()));
        storage.initialize().expect("initialize storage");
        (Arc::new(storage), temp_dir)
    }

    fn seed_user(storage: &FileStorage, username: &str, password: &str) -> StoredUser {
        let user = StoredUser {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.to_string(),
            firstname: "Test".to_string(),
            lastname: "User".to_string(),
            email: format!("{username}@example.com"),
            password_hash: bcrypt::hash(password, 4).unwrap(),
            roles: vec!["ROLE_USER".to_string()],
            created_at: Utc::now(),
        };
        UserRepository::new(storage).create(&user).unwrap();
        user
    }

    #[test]
    fn lookup_resolves_roles() {
        let (storage, _guard) = test_storage();
        seed_user(&storage, "johnsmith", "secret-password");

        let identity = DirectoryIdentity::new(Arc::clone(&storage));
        let found = identity.lookup("JOHNSMITH").unwrap().unwrap();
        assert_eq!(found.username, "johnsmith");
        assert_eq!(found.roles, vec![Role::User]);

        assert!(identity.lookup("nobody").unwrap().is_none());
    }

    #[test]
    fn verify_credentials_accepts_correct_password() {
        let (storage, _guard) = test_storage();
        seed_user(&storage, "johnsmith", "secret-password");

        let identity = DirectoryIdentity::new(storage);
        let verified = identity
            .verify_credentials("johnsmith", "secret-password")
            .unwrap();
        assert_eq!(verified.username, "johnsmith");
    }

    #[test]
    fn verify_credentials_failures_are_generic() {
        let (storage, _guard) = test_storage();
        seed_user(&storage, "johnsmith", "secret-password");

        let identity = DirectoryIdentity::new(storage);

        let wrong_password = identity
            .verify_credentials("johnsmith", "wrong-password")
            .unwrap_err();
        assert!(matches!(wrong_password, AuthError::InvalidCredentials));

        let unknown_user = identity
            .verify_credentials("nobody", "secret-password")
            .unwrap_err();
        assert!(matches!(unknown_user, AuthError::InvalidCredentials));
    }
}
