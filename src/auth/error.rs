// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.
//!
//! Every authentication fault renders as a bare `401 Unauthorized` with no
//! body, so a caller cannot tell which check failed (missing header, revoked
//! token, expired token, unknown subject, ...). The distinction only exists
//! internally, in the gate's log output. Authorization failures (role
//! present but insufficient) are the one exception and render as `403`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::storage::StorageError;

/// Authentication error type.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No authentication header present.
    #[error("authentication header is missing")]
    MissingAuthHeader,
    /// Header present but not `<prefix><token>` shaped.
    #[error("authentication header is malformed")]
    InvalidAuthHeader,
    /// Token structure could not be parsed.
    #[error("token is malformed")]
    MalformedToken,
    /// Token signature does not verify under the shared key.
    #[error("token signature is invalid")]
    InvalidSignature,
    /// Token expiry has passed.
    #[error("token has expired")]
    TokenExpired,
    /// Token is present in the revocation table.
    #[error("token has been revoked")]
    RevokedToken,
    /// Token subject does not resolve to a known user.
    #[error("token subject is unknown")]
    UnknownSubject,
    /// Username/password pair did not verify.
    #[error("invalid credentials")]
    InvalidCredentials,
    /// Authenticated but lacking the required role.
    #[error("insufficient permissions for this operation")]
    InsufficientPermissions,
    /// Collaborator failure during authentication. Collapsed to the same
    /// 401 as every other gate fault; the request never proceeds.
    #[error("authentication failed: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InsufficientPermissions => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl From<StorageError> for AuthError {
    fn from(e: StorageError) -> Self {
        AuthError::Internal(e.to_string())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        // Status only, no body: the failure cause must not leak to callers.
        self.status_code().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn auth_faults_return_bare_401() {
        for error in [
            AuthError::MissingAuthHeader,
            AuthError::InvalidAuthHeader,
            AuthError::MalformedToken,
            AuthError::InvalidSignature,
            AuthError::TokenExpired,
            AuthError::RevokedToken,
            AuthError::UnknownSubject,
            AuthError::InvalidCredentials,
            AuthError::Internal("boom".to_string()),
        ] {
            let response = error.into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

            let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            assert!(body.is_empty(), "401 must carry no body detail");
        }
    }

    #[tokio::test]
    async fn insufficient_permissions_returns_403() {
        let response = AuthError::InsufficientPermissions.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
