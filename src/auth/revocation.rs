// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token revocation on logout and account deletion.

use super::principal::Principal;
use super::token::TokenCodec;
use crate::storage::{FileStorage, RevokedTokenRepository, StorageError, StorageResult};

/// Attempts per revocation insert. A failed revoke would leave a logged-out
/// token usable, so transient storage failures are retried before giving up.
const INSERT_ATTEMPTS: u32 = 3;

/// Inserts tokens into the revocation table on logout and account deletion.
pub struct RevocationManager<'a> {
    storage: &'a FileStorage,
    codec: &'a TokenCodec,
    token_prefix: &'a str,
}

impl<'a> RevocationManager<'a> {
    pub fn new(storage: &'a FileStorage, codec: &'a TokenCodec, token_prefix: &'a str) -> Self {
        Self {
            storage,
            codec,
            token_prefix,
        }
    }

    /// Strip the scheme prefix and surrounding whitespace from a raw header
    /// value. The revocation table stores and matches normalized tokens.
    fn normalize(&self, header_value: &str) -> String {
        header_value
            .strip_prefix(self.token_prefix)
            .unwrap_or(header_value)
            .trim()
            .to_string()
    }

    /// Revoke the presented token on logout.
    ///
    /// The subject is decoded best-effort for the stored record and the log
    /// line; a decode failure does not block the revocation. Any caller who
    /// reached this point holds a currently-valid token (the gate already
    /// ran), which is the only ownership check logout needs.
    pub fn revoke_on_logout(&self, header_value: &str) -> StorageResult<()> {
        let token = self.normalize(header_value);
        let username = self.codec.subject_of(&token).unwrap_or_default();
        tracing::info!("revoking token on logout for user {:?}", username);
        self.insert(&token, &username)
    }

    /// Revoke the presented token on account deletion, but only when the
    /// deleted account is the caller's own (case-insensitive).
    ///
    /// An admin deleting another user's account does NOT revoke that user's
    /// outstanding token; the mismatch is a silent no-op, not an error.
    pub fn revoke_on_delete(
        &self,
        header_value: &str,
        target_username: &str,
        principal: &Principal,
    ) -> StorageResult<()> {
        let token = self.normalize(header_value);
        if !principal.is_self(target_username) {
            tracing::debug!(
                "skipping token revocation: {} deleted account {}",
                principal.username,
                target_username
            );
            return Ok(());
        }
        tracing::info!("revoking token on self-delete for user {}", target_username);
        self.insert(&token, target_username)
    }

    fn insert(&self, token: &str, username: &str) -> StorageResult<()> {
        let repo = RevokedTokenRepository::new(self.storage);
        let mut last_error: Option<StorageError> = None;
        for attempt in 1..=INSERT_ATTEMPTS {
            match repo.revoke(token, username) {
                Ok(_) => return Ok(()),
                Err(e) => {
                    tracing::warn!(
                        "revocation insert attempt {}/{} failed: {}",
                        attempt,
                        INSERT_ATTEMPTS,
                        e
                    );
                    last_error = Some(e);
                }
            }
        }
        Err(last_error.unwrap_or(StorageError::NotInitialized))
    }
}
