// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-request authentication gate.
//!
//! Runs as axum middleware in front of every `/user` route. Each request is
//! processed synchronously on its own task; the only shared mutable resource
//! is the revocation store underneath.
//!
//! Order of checks, each with a terminal 401 on failure:
//!
//! 1. Exempt-route check (registration and login bypass everything below,
//!    before the header is even looked at).
//! 2. Header extraction and prefix check.
//! 3. Revocation lookup. This runs before any cryptographic verification:
//!    it is the cheaper reject path, and a revoked token must never reach
//!    authorization logic no matter how much validity it has left.
//! 4. Signature/expiry verification and claim decoding.
//! 5. Identity lookup by subject; subject/expiry re-check; Principal
//!    construction from the claim authorities (not re-fetched from the
//!    store) and attachment to the request extensions.
//!
//! If a principal is already attached (re-entrant invocation), the request
//! is forwarded untouched.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::error::AuthError;
use super::principal::Principal;
use crate::state::AppState;
use crate::storage::RevokedTokenRepository;

/// Routes that bypass the gate unconditionally. Exactly these two; exact
/// path+method match, no patterns.
const EXEMPT_ROUTES: [(&Method, &str); 2] = [
    (&Method::POST, "/user/register"),
    (&Method::POST, "/user/login"),
];

fn is_exempt(method: &Method, path: &str) -> bool {
    EXEMPT_ROUTES
        .iter()
        .any(|(m, p)| *m == method && *p == path)
}

/// Authentication gate middleware.
pub async fn authentication_gate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if is_exempt(request.method(), request.uri().path()) {
        return next.run(request).await;
    }

    // Re-entrant invocation: a principal is already established.
    if request.extensions().get::<Principal>().is_some() {
        return next.run(request).await;
    }

    match authenticate(&state, request.headers()) {
        Ok(principal) => {
            tracing::info!("authenticated user {}", principal.username);
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

/// Run the full verification chain against the request headers.
fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Principal, AuthError> {
    let header = headers
        .get(state.config.jwt_header_name.as_str())
        .ok_or_else(|| {
            tracing::warn!("couldn't find bearer string in request");
            AuthError::MissingAuthHeader
        })?
        .to_str()
        .map_err(|_| {
            tracing::warn!("authentication header is not valid UTF-8");
            AuthError::InvalidAuthHeader
        })?;

    let token = header
        .strip_prefix(state.config.jwt_token_prefix.as_str())
        .ok_or_else(|| {
            tracing::warn!("authentication header missing the expected token prefix");
            AuthError::InvalidAuthHeader
        })?
        .trim();

    // Revocation before signature/expiry: a revoked-but-otherwise-valid
    // token is never processed further.
    let revoked = RevokedTokenRepository::new(&state.storage)
        .contains(token)
        .map_err(|e| {
            tracing::error!("revocation lookup failed: {}", e);
            AuthError::from(e)
        })?;
    if revoked {
        tracing::warn!("rejected revoked token");
        return Err(AuthError::RevokedToken);
    }

    let claims = state.tokens.decode(token).map_err(|e| {
        match &e {
            AuthError::TokenExpired => tracing::warn!("the token has expired"),
            other => tracing::error!("token verification failed: {}", other),
        }
        e
    })?;

    let identity = state
        .identity
        .lookup(&claims.subject)
        .map_err(|e| {
            tracing::error!("identity lookup failed: {}", e);
            AuthError::from(e)
        })?
        .ok_or_else(|| {
            tracing::error!("token subject does not resolve to a known user");
            AuthError::UnknownSubject
        })?;

    // Re-verify subject and expiry explicitly before establishing the
    // principal, independent of what decode already enforced.
    if claims.subject != identity.username {
        tracing::error!("token subject does not match stored username");
        return Err(AuthError::UnknownSubject);
    }
    if state.tokens.is_expired(token)? {
        tracing::warn!("the token has expired");
        return Err(AuthError::TokenExpired);
    }

    Ok(Principal {
        user_id: identity.user_id,
        username: claims.subject.clone(),
        roles: claims.roles(),
    })
}
