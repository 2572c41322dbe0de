// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User account endpoints.
//!
//! Registration and login are open; everything else sits behind the
//! authentication gate and receives the caller as a [`Principal`] through
//! the extractors. Target-account resolution is role-dependent: admins may
//! name any account, plain users only their own.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    auth::{AdminOnly, Auth, AuthError, Principal, RevocationManager, Role, SessionIssuer},
    error::ApiError,
    models::{
        AuthTokenResponse, LoginRequest, RegisterUserRequest, UpdateUserRequest, UserResponse,
    },
    state::AppState,
    storage::{StoredUser, UserRepository},
};

/// Body returned by a successful account deletion.
pub const DELETE_SUCCESS: &str = "DELETE_SUCCESS";
/// Body returned by a successful logout.
pub const LOGOUT_SUCCESS: &str = "LOGOUT_SUCCESS";

const DUPLICATE_USER_MSG: &str = "User with the given username/email already exists";
const DUPLICATE_EMAIL_MSG: &str = "User with same email already exists";
const LOGIN_FAILED_MSG: &str = "Invalid username/password";

#[derive(Deserialize, IntoParams)]
pub struct UserNameQuery {
    #[serde(rename = "userName")]
    pub user_name: String,
}

/// Resolve the account an operation targets.
///
/// Admins resolve any username; plain users only resolve themselves, with
/// the same case-insensitive comparison used everywhere else. A failed
/// resolution is a 404 for admins (the account genuinely does not exist)
/// but a 403 for plain users, so a user probing foreign usernames learns
/// nothing about which ones exist.
fn resolve_target(
    repo: &UserRepository<'_>,
    principal: &Principal,
    user_name: &str,
) -> Result<StoredUser, ApiError> {
    let found = if principal.is_admin() {
        repo.find_by_username_ignore_case(user_name)?
    } else if principal.is_self(user_name) {
        repo.find_by_username_ignore_case(&principal.username)?
    } else {
        None
    };

    found.ok_or_else(|| {
        tracing::warn!("invalid user {}", user_name);
        if principal.is_admin() {
            ApiError::not_found("User not found")
        } else {
            ApiError::forbidden("Invalid user name")
        }
    })
}

#[utoipa::path(
    post,
    path = "/user/register",
    request_body = RegisterUserRequest,
    tag = "Users",
    responses(
        (status = 200, body = UserResponse),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Username or email already taken")
    )
)]
pub async fn register_user(
    State(state): State<AppState>,
    Json(request): Json<RegisterUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    tracing::info!("registering user");

    let errors = request.validate();
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    let repo = UserRepository::new(&state.storage);
    let existing =
        repo.find_by_username_or_email_ignore_case(&request.username, &request.email)?;
    if !existing.is_empty() {
        tracing::warn!("{}", DUPLICATE_USER_MSG);
        return Err(ApiError::conflict(DUPLICATE_USER_MSG));
    }

    let password_hash = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST)
        .map_err(|e| ApiError::internal(format!("Password hashing failed: {e}")))?;

    let user = StoredUser {
        id: uuid::Uuid::new_v4().to_string(),
        username: request.username,
        firstname: request.firstname,
        lastname: request.lastname,
        email: request.email,
        password_hash,
        roles: vec![Role::User.authority().to_string()],
        created_at: Utc::now(),
    };
    repo.create(&user)?;

    Ok(Json(UserResponse::from(&user)))
}

#[utoipa::path(
    post,
    path = "/user/login",
    request_body = LoginRequest,
    tag = "Users",
    responses(
        (status = 200, body = AuthTokenResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login_user(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthTokenResponse>, ApiError> {
    tracing::info!("logging in user");

    let errors = request.validate();
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    let issuer = SessionIssuer::new(state.identity.as_ref(), &state.tokens);
    let token = issuer
        .login(&request.username, &request.password)
        .map_err(|e| {
            // Deliberately generic: the response never reveals whether the
            // username exists or the password was wrong.
            tracing::warn!("login failed: {}", e);
            ApiError::unauthorized(LOGIN_FAILED_MSG)
        })?;

    Ok(Json(AuthTokenResponse { token }))
}

#[utoipa::path(
    get,
    path = "/user/getuser",
    params(UserNameQuery),
    tag = "Users",
    responses(
        (status = 200, body = UserResponse),
        (status = 403, description = "Caller may not view this account"),
        (status = 404, description = "No such account (admin callers only)")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Query(query): Query<UserNameQuery>,
) -> Result<Json<UserResponse>, ApiError> {
    tracing::info!("fetching user {}", query.user_name);

    if query.user_name.trim().is_empty() {
        return Err(ApiError::bad_request("userName must not be blank"));
    }

    let repo = UserRepository::new(&state.storage);
    let user = resolve_target(&repo, &principal, &query.user_name)?;
    Ok(Json(UserResponse::from(&user)))
}

#[utoipa::path(
    get,
    path = "/user/getallusers",
    tag = "Users",
    responses(
        (status = 200, body = [UserResponse]),
        (status = 403, description = "Caller is not an admin")
    )
)]
pub async fn get_all_users(
    State(state): State<AppState>,
    AdminOnly(_principal): AdminOnly,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    tracing::info!("listing all users");

    let users = UserRepository::new(&state.storage).list_all()?;
    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

#[utoipa::path(
    put,
    path = "/user/update",
    request_body = UpdateUserRequest,
    tag = "Users",
    responses(
        (status = 200, body = UserResponse),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Email already used by another account")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    tracing::info!("updating user {}", request.username);

    let errors = request.validate();
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    let repo = UserRepository::new(&state.storage);
    let mut user = resolve_target(&repo, &principal, &request.username)?;

    if repo
        .find_other_with_email_ignore_case(&request.username, &request.email)?
        .is_some()
    {
        tracing::warn!("{}", DUPLICATE_EMAIL_MSG);
        return Err(ApiError::conflict(DUPLICATE_EMAIL_MSG));
    }

    // The username is the lookup key and stays fixed; only profile fields
    // are written.
    user.firstname = request.firstname;
    user.lastname = request.lastname;
    user.email = request.email;
    repo.update(&user)?;

    Ok(Json(UserResponse::from(&user)))
}

#[utoipa::path(
    delete,
    path = "/user/delete",
    params(UserNameQuery),
    tag = "Users",
    responses(
        (status = 200, description = "Account deleted", body = String),
        (status = 403, description = "Caller may not delete this account"),
        (status = 404, description = "No such account (admin callers only)")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Query(query): Query<UserNameQuery>,
    headers: HeaderMap,
) -> Result<String, ApiError> {
    tracing::info!("deleting user {}", query.user_name);

    if query.user_name.trim().is_empty() {
        return Err(ApiError::bad_request("userName must not be blank"));
    }

    let repo = UserRepository::new(&state.storage);
    let user = resolve_target(&repo, &principal, &query.user_name)?;
    repo.delete(&user.id)?;

    // Self-delete also revokes the presented token; an admin deleting
    // another account leaves that account's tokens to expire naturally.
    let header_value = auth_header(&state, &headers)?;
    RevocationManager::new(&state.storage, &state.tokens, &state.config.jwt_token_prefix)
        .revoke_on_delete(header_value, &query.user_name, &principal)?;

    Ok(DELETE_SUCCESS.to_string())
}

#[utoipa::path(
    delete,
    path = "/user/logout",
    tag = "Users",
    responses(
        (status = 200, description = "Token revoked", body = String)
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    Auth(_principal): Auth,
    headers: HeaderMap,
) -> Result<String, ApiError> {
    tracing::info!("logging out");

    let header_value = auth_header(&state, &headers)?;
    RevocationManager::new(&state.storage, &state.tokens, &state.config.jwt_token_prefix)
        .revoke_on_logout(header_value)?;

    Ok(LOGOUT_SUCCESS.to_string())
}

/// Read back the raw authentication header. The gate already required it,
/// so absence here means the request never went through the gate.
fn auth_header<'h>(state: &AppState, headers: &'h HeaderMap) -> Result<&'h str, ApiError> {
    headers
        .get(state.config.jwt_header_name.as_str())
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            tracing::error!("{}", AuthError::MissingAuthHeader);
            ApiError::unauthorized("Missing authentication header")
        })
}
