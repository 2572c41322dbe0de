// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authenticated principal attached to a request.

use serde::{Deserialize, Serialize};

use super::roles::Role;

/// The resolved identity of the caller, valid for one request.
///
/// Built by the authentication gate from decoded token claims plus an
/// identity lookup, inserted into the request extensions, and read by the
/// `Auth` extractor. It is an immutable value passed down the call chain;
/// there is no ambient thread-local holding "the current user".
///
/// The roles come from the token's own authorities claim, not from the
/// current state of the user store. A role change therefore does not affect
/// an already-issued, non-revoked token until it expires or is revoked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    /// Surrogate user id from the identity store.
    pub user_id: String,
    /// Login name (token subject).
    pub username: String,
    /// Roles extracted from the token's authorities claim.
    pub roles: Vec<Role>,
}

impl Principal {
    /// Check if the principal holds the required role or a superior one.
    pub fn has_role(&self, required: Role) -> bool {
        self.roles.iter().any(|role| role.has_privilege(required))
    }

    /// Check if this principal is an admin.
    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }

    /// Check if `username` names this principal's own account
    /// (case-insensitive, matching the store's username semantics).
    pub fn is_self(&self, username: &str) -> bool {
        self.username.eq_ignore_ascii_case(username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_principal() -> Principal {
        Principal {
            user_id: "u-1".to_string(),
            username: "JohnSmith".to_string(),
            roles: vec![Role::User],
        }
    }

    #[test]
    fn has_role_follows_privilege_order() {
        let user = user_principal();
        assert!(user.has_role(Role::User));
        assert!(!user.has_role(Role::Admin));

        let admin = Principal {
            roles: vec![Role::Admin],
            ..user_principal()
        };
        assert!(admin.has_role(Role::User));
        assert!(admin.has_role(Role::Admin));
        assert!(admin.is_admin());
    }

    #[test]
    fn is_self_ignores_case() {
        let principal = user_principal();
        assert!(principal.is_self("johnsmith"));
        assert!(principal.is_self("JOHNSMITH"));
        assert!(!principal.is_self("janedoe"));
    }
}
