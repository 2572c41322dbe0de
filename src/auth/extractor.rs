// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for the authenticated principal.
//!
//! The authentication gate attaches a [`Principal`] to the request
//! extensions; these extractors hand it to handlers:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(principal): Auth) -> impl IntoResponse {
//!     // principal is the verified caller
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::error::AuthError;
use super::principal::Principal;
use super::roles::Role;
use crate::state::AppState;

/// Extractor for the authenticated principal.
///
/// Rejects with 401 if no principal is attached, which means the route was
/// not behind the authentication gate.
pub struct Auth(pub Principal);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(Auth)
            .ok_or(AuthError::MissingAuthHeader)
    }
}

/// Extractor that additionally requires the admin role.
///
/// Role-insufficient is a 403, distinct from the gate's no-identity 401.
pub struct AdminOnly(pub Principal);

impl FromRequestParts<AppState> for AdminOnly {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Auth(principal) = Auth::from_request_parts(parts, state).await?;

        if !principal.has_role(Role::Admin) {
            return Err(AuthError::InsufficientPermissions);
        }

        Ok(AdminOnly(principal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn test_state() -> AppState {
        AppState::for_tests(tempfile::TempDir::new().unwrap().path())
    }

    fn parts_with(principal: Option<Principal>) -> Parts {
        let mut parts = Request::builder()
            .uri("/test")
            .body(())
            .unwrap()
            .into_parts()
            .0;
        if let Some(principal) = principal {
            parts.extensions.insert(principal);
        }
        parts
    }

    fn principal(roles: Vec<Role>) -> Principal {
        Principal {
            user_id: "u-1".to_string(),
            username: "johnsmith".to_string(),
            roles,
        }
    }

    #[tokio::test]
    async fn auth_requires_an_attached_principal() {
        let state = test_state();
        let mut parts = parts_with(None);

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::MissingAuthHeader)));
    }

    #[tokio::test]
    async fn auth_returns_the_attached_principal() {
        let state = test_state();
        let mut parts = parts_with(Some(principal(vec![Role::User])));

        let Auth(found) = Auth::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(found.username, "johnsmith");
    }

    #[tokio::test]
    async fn admin_only_rejects_plain_users() {
        let state = test_state();
        let mut parts = parts_with(Some(principal(vec![Role::User])));

        let result = AdminOnly::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InsufficientPermissions)));
    }

    #[tokio::test]
    async fn admin_only_accepts_admins() {
        let state = test_state();
        let mut parts = parts_with(Some(principal(vec![Role::Admin])));

        let result = AdminOnly::from_request_parts(&mut parts, &state).await;
        assert!(result.is_ok());
    }
}
