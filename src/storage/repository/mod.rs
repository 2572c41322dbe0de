// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Storage repositories.

pub mod revoked;
pub mod users;

pub use revoked::{RevokedToken, RevokedTokenRepository};
pub use users::{StoredUser, UserRepository};
