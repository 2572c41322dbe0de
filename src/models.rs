// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response data structures used by the REST API. All types
//! derive `Serialize`, `Deserialize`, and `ToSchema` for automatic JSON
//! handling and OpenAPI documentation.
//!
//! Request bodies carry their own `validate()` which returns a field-name
//! to message map; a non-empty map becomes a 400 response with that map as
//! the JSON body.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::storage::StoredUser;

// =============================================================================
// Validation limits
// =============================================================================

const USERNAME_MIN: usize = 6;
const USERNAME_MAX: usize = 45;
const PASSWORD_MIN: usize = 8;
const PASSWORD_MAX: usize = 200;
const NAME_MAX: usize = 100;

const USERNAME_MSG: &str = "User name must be between 6 and 45 characters long";
const PASSWORD_MSG: &str = "Password must be between 8 and 200 characters long";
const FIRSTNAME_MSG: &str = "First name must be less than 100 characters long";
const LASTNAME_MSG: &str = "Last name must be less than 100 characters long";
const BLANK_MSG: &str = "must not be blank";
const EMAIL_MSG: &str = "must be a well-formed email address";

/// Field errors keyed by field name. Empty means the input passed.
pub type FieldErrors = BTreeMap<String, String>;

fn check_blank(errors: &mut FieldErrors, field: &str, value: &str) -> bool {
    if value.trim().is_empty() {
        errors.insert(field.to_string(), BLANK_MSG.to_string());
        return true;
    }
    false
}

fn check_length(errors: &mut FieldErrors, field: &str, value: &str, min: usize, max: usize, msg: &str) {
    let len = value.chars().count();
    if len < min || len > max {
        errors.insert(field.to_string(), msg.to_string());
    }
}

/// Lenient shape check: something before and after a single-ish `@`. An
/// empty email is allowed (the field is optional).
fn check_email(errors: &mut FieldErrors, value: &str) {
    if value.is_empty() {
        return;
    }
    let valid = match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    };
    if !valid {
        errors.insert("email".to_string(), EMAIL_MSG.to_string());
    }
}

// =============================================================================
// Request Models
// =============================================================================

/// Request to register a new account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterUserRequest {
    pub username: String,
    pub password: String,
    pub firstname: String,
    pub lastname: String,
    /// Optional contact address; checked for shape only when present.
    #[serde(default)]
    pub email: String,
}

impl RegisterUserRequest {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if !check_blank(&mut errors, "username", &self.username) {
            check_length(
                &mut errors,
                "username",
                &self.username,
                USERNAME_MIN,
                USERNAME_MAX,
                USERNAME_MSG,
            );
        }
        if !check_blank(&mut errors, "password", &self.password) {
            check_length(
                &mut errors,
                "password",
                &self.password,
                PASSWORD_MIN,
                PASSWORD_MAX,
                PASSWORD_MSG,
            );
        }
        if !check_blank(&mut errors, "firstname", &self.firstname) {
            check_length(&mut errors, "firstname", &self.firstname, 0, NAME_MAX, FIRSTNAME_MSG);
        }
        if !check_blank(&mut errors, "lastname", &self.lastname) {
            check_length(&mut errors, "lastname", &self.lastname, 0, NAME_MAX, LASTNAME_MSG);
        }
        check_email(&mut errors, &self.email);
        errors
    }
}

/// Request to update an existing account's profile fields.
///
/// The username names the target account and is itself immutable; only
/// first name, last name and email are written.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub username: String,
    pub firstname: String,
    pub lastname: String,
    #[serde(default)]
    pub email: String,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if !check_blank(&mut errors, "username", &self.username) {
            check_length(
                &mut errors,
                "username",
                &self.username,
                USERNAME_MIN,
                USERNAME_MAX,
                USERNAME_MSG,
            );
        }
        if !check_blank(&mut errors, "firstname", &self.firstname) {
            check_length(&mut errors, "firstname", &self.firstname, 0, NAME_MAX, FIRSTNAME_MSG);
        }
        if !check_blank(&mut errors, "lastname", &self.lastname) {
            check_length(&mut errors, "lastname", &self.lastname, 0, NAME_MAX, LASTNAME_MSG);
        }
        check_email(&mut errors, &self.email);
        errors
    }
}

/// Login credentials.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        check_blank(&mut errors, "username", &self.username);
        check_blank(&mut errors, "password", &self.password);
        errors
    }
}

// =============================================================================
// Response Models
// =============================================================================

/// Successful login response carrying the issued token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthTokenResponse {
    pub token: String,
}

/// Public view of a user record.
///
/// The internal id, password hash and role assignments are never
/// serialized out.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UserResponse {
    pub username: String,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
}

impl From<&StoredUser> for UserResponse {
    fn from(user: &StoredUser) -> Self {
        Self {
            username: user.username.clone(),
            firstname: user.firstname.clone(),
            lastname: user.lastname.clone(),
            email: user.email.clone(),
        }
    }
}
