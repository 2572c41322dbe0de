// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! JWT authentication with stateful revocation.
//!
//! ## Auth Flow
//!
//! 1. Client registers, then logs in with username/password
//! 2. Server verifies credentials and issues an HMAC-signed token
//! 3. Client sends the token on every request in the configured header
//! 4. The gate verifies, per request: revocation, signature, expiry,
//!    subject, then attaches a [`Principal`] for the handlers
//! 5. Logout (or self-delete) inserts the token into the revocation table,
//!    invalidating it ahead of its natural expiry
//!
//! A token authenticates if and only if its signature verifies under the
//! shared key, its expiry has not passed, and its raw string is absent from
//! the revocation table.

pub mod error;
pub mod extractor;
pub mod gate;
pub mod identity;
pub mod principal;
pub mod revocation;
pub mod roles;
pub mod session;
pub mod token;

pub use error::AuthError;
pub use extractor::{AdminOnly, Auth};
pub use identity::{DirectoryIdentity, Identity, IdentityService};
pub use principal::Principal;
pub use revocation::RevocationManager;
pub use roles::Role;
pub use session::SessionIssuer;
pub use token::{TokenClaims, TokenCodec};
