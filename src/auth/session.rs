// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session issuance: credentials in, signed token out.

use super::error::AuthError;
use super::identity::IdentityService;
use super::token::TokenCodec;

/// Turns a verified username/password pair into a signed token.
pub struct SessionIssuer<'a> {
    identity: &'a dyn IdentityService,
    codec: &'a TokenCodec,
}

impl<'a> SessionIssuer<'a> {
    pub fn new(identity: &'a dyn IdentityService, codec: &'a TokenCodec) -> Self {
        Self { identity, codec }
    }

    /// Verify the credentials and issue a token carrying the verified
    /// identity's authorities.
    ///
    /// Fails with `InvalidCredentials` for any verification failure; the
    /// boundary maps that to a generic 401 so the response does not reveal
    /// whether the username exists.
    pub fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let identity = self.identity.verify_credentials(username, password)?;
        tracing::info!("issuing token for user {}", identity.username);
        self.codec.issue(&identity.username, &identity.roles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::identity::Identity;
    use crate::auth::roles::Role;
    use crate::storage::StorageError;

    /// Test double for the identity collaborator.
    struct StaticIdentity {
        username: String,
        password: String,
        roles: Vec<Role>,
    }

    impl IdentityService for StaticIdentity {
        fn lookup(&self, username: &str) -> Result<Option<Identity>, StorageError> {
            if username.eq_ignore_ascii_case(&self.username) {
                Ok(Some(Identity {
                    user_id: "u-1".to_string(),
                    username: self.username.clone(),
                    roles: self.roles.clone(),
                }))
            } else {
                Ok(None)
            }
        }

        fn verify_credentials(
            &self,
            username: &str,
            password: &str,
        ) -> Result<Identity, AuthError> {
            if username == self.username && password == self.password {
                Ok(Identity {
                    user_id: "u-1".to_string(),
                    username: self.username.clone(),
                    roles: self.roles.clone(),
                })
            } else {
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    #[test]
    fn login_issues_token_with_verified_authorities() {
        let identity = StaticIdentity {
            username: "johnsmith".to_string(),
            password: "secret-password".to_string(),
            roles: vec![Role::User],
        };
        let codec = TokenCodec::new("test-signing-key-at-least-32-bytes!!", 3600, "auth");

        let issuer = SessionIssuer::new(&identity, &codec);
        let token = issuer.login("johnsmith", "secret-password").unwrap();

        let claims = codec.decode(&token).unwrap();
        assert_eq!(claims.subject, "johnsmith");
        assert_eq!(claims.roles(), vec![Role::User]);
    }

    #[test]
    fn login_with_bad_credentials_fails() {
        let identity = StaticIdentity {
            username: "johnsmith".to_string(),
            password: "secret-password".to_string(),
            roles: vec![Role::User],
        };
        let codec = TokenCodec::new("test-signing-key-at-least-32-bytes!!", 3600, "auth");

        let issuer = SessionIssuer::new(&identity, &codec);
        let err = issuer.login("johnsmith", "wrong").unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }
}
