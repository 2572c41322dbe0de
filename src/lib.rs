// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! SecureApp Server - User Account Microservice
//!
//! This crate provides user registration, login and account management
//! behind JWT authentication with a persistent token revocation table, so
//! a logout or account deletion invalidates a still-signed token before
//! its natural expiry.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Token issuance, verification gate and revocation
//! - `config` - Environment-driven runtime configuration
//! - `error` - API error responses
//! - `models` - Request/response data structures and validation
//! - `state` - Shared application state
//! - `storage` - File-backed user and revoked-token stores

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;
