// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{DirectoryIdentity, IdentityService, TokenCodec};
use crate::config::AppConfig;
use crate::storage::FileStorage;

/// Shared application state.
///
/// Everything here is immutable after startup and safe for concurrent
/// reads; requests only mutate the store underneath the repositories.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub storage: Arc<FileStorage>,
    pub tokens: Arc<TokenCodec>,
    pub identity: Arc<dyn IdentityService>,
}

impl AppState {
    /// Build the state from loaded configuration and initialized storage.
    pub fn new(config: AppConfig, storage: FileStorage) -> Self {
        let storage = Arc::new(storage);
        let tokens = Arc::new(TokenCodec::new(
            &config.jwt_signing_key,
            config.jwt_validity_secs,
            &config.jwt_authorities_key,
        ));
        let identity: Arc<dyn IdentityService> =
            Arc::new(DirectoryIdentity::new(Arc::clone(&storage)));

        Self {
            config: Arc::new(config),
            storage,
            tokens,
            identity,
        }
    }

    /// State with a temp-dir store and fixed JWT settings for tests.
    #[cfg(test)]
    pub fn for_tests(data_dir: &std::path::Path) -> Self {
        use crate::storage::StoragePaths;

        let config = AppConfig {
            jwt_signing_key: "test-signing-key-at-least-32-bytes!!".to_string(),
            jwt_validity_secs: 3600,
            jwt_header_name: "Authorization".to_string(),
            jwt_token_prefix: "Bearer ".to_string(),
            jwt_authorities_key: "auth".to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
            data_dir: data_dir.to_path_buf(),
        };

        let mut storage = FileStorage::new(StoragePaths::new(data_dir));
        storage.initialize().expect("initialize test storage");

        Self::new(config, storage)
    }
}
