// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

use secureapp_server::api::router;
use secureapp_server::config::{AppConfig, LOG_FORMAT_ENV};
use secureapp_server::state::AppState;
use secureapp_server::storage::{FileStorage, StoragePaths};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    let format = std::env::var(LOG_FORMAT_ENV).unwrap_or_else(|_| "pretty".to_string());
    if format == "json" {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    // All JWT settings are required; refuse to start without them.
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let mut storage = FileStorage::new(StoragePaths::new(&config.data_dir));
    if let Err(e) = storage.initialize() {
        tracing::error!("failed to initialize storage at {:?}: {}", config.data_dir, e);
        std::process::exit(1);
    }
    tracing::info!("storage initialized at {:?}", config.data_dir);

    let addr: SocketAddr = match format!("{}:{}", config.host, config.port).parse() {
        Ok(addr) => addr,
        Err(_) => {
            tracing::error!("invalid bind address {}:{}", config.host, config.port);
            std::process::exit(1);
        }
    };

    let state = AppState::new(config, storage);
    let app = router(state);

    tracing::info!("SecureApp server listening on http://{addr} (docs at /docs)");

    axum_server::bind(addr)
        .serve(app.into_make_service())
        .await
        .expect("HTTP server failed");
}
