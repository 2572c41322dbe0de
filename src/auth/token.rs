// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signed-token encode/decode (the token codec).
//!
//! Tokens are compact JWTs signed with HMAC-SHA256 over the UTF-8 bytes of
//! the shared secret. Claims carry the standard subject / issued-at / expiry
//! plus one custom claim with the comma-joined role names under a
//! configurable key. Expiry is always computed server-side at issuance.

use chrono::Utc;
use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde_json::Value;

use super::error::AuthError;
use super::roles::Role;

/// Decoded token claims.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    /// Subject: the username the token was issued to.
    pub subject: String,
    /// Authority strings from the custom authorities claim.
    pub authorities: Vec<String>,
    /// Issued-at (Unix seconds).
    pub issued_at: i64,
    /// Expiry (Unix seconds).
    pub expires_at: i64,
}

impl TokenClaims {
    /// Parse the authority strings into known roles; unknown strings are
    /// dropped.
    pub fn roles(&self) -> Vec<Role> {
        self.authorities
            .iter()
            .filter_map(|authority| Role::from_authority(authority))
            .collect()
    }

    fn from_map(
        claims: serde_json::Map<String, Value>,
        authorities_key: &str,
    ) -> Result<Self, AuthError> {
        let subject = claims
            .get("sub")
            .and_then(Value::as_str)
            .ok_or(AuthError::MalformedToken)?
            .to_string();
        let issued_at = claims
            .get("iat")
            .and_then(Value::as_i64)
            .ok_or(AuthError::MalformedToken)?;
        let expires_at = claims
            .get("exp")
            .and_then(Value::as_i64)
            .ok_or(AuthError::MalformedToken)?;
        let authorities = claims
            .get(authorities_key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.trim().to_string())
            .collect();

        Ok(Self {
            subject,
            authorities,
            issued_at,
            expires_at,
        })
    }
}

/// Encodes and decodes signed claims tokens under the shared symmetric key.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validity_secs: u64,
    authorities_key: String,
}

impl TokenCodec {
    /// Create a codec from the shared secret and token settings.
    ///
    /// The key material is immutable process-wide configuration; the codec
    /// is safe for unsynchronized concurrent reads.
    pub fn new(signing_key: &str, validity_secs: u64, authorities_key: impl Into<String>) -> Self {
        let key_bytes = signing_key.as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(key_bytes),
            decoding_key: DecodingKey::from_secret(key_bytes),
            validity_secs,
            authorities_key: authorities_key.into(),
        }
    }

    /// Issue a signed token for `username` carrying the given roles.
    ///
    /// Expiry is `now + validity_secs`, computed here and never
    /// client-supplied.
    pub fn issue(&self, username: &str, roles: &[Role]) -> Result<String, AuthError> {
        let authorities = roles
            .iter()
            .map(Role::authority)
            .collect::<Vec<_>>()
            .join(",");

        let now = Utc::now().timestamp();
        let mut claims = serde_json::Map::new();
        claims.insert("sub".to_string(), Value::from(username));
        claims.insert(self.authorities_key.clone(), Value::from(authorities));
        claims.insert("iat".to_string(), Value::from(now));
        claims.insert("exp".to_string(), Value::from(now + self.validity_secs as i64));

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("token encoding failed: {e}")))
    }

    /// Verify signature and expiry, returning the claims.
    pub fn decode(&self, token: &str) -> Result<TokenClaims, AuthError> {
        self.parse(token, true)
    }

    /// Subject of a signature-valid token, whether or not it has expired.
    pub fn subject_of(&self, token: &str) -> Result<String, AuthError> {
        Ok(self.parse(token, false)?.subject)
    }

    /// Expiry (Unix seconds) of a signature-valid token.
    pub fn expiry_of(&self, token: &str) -> Result<i64, AuthError> {
        Ok(self.parse(token, false)?.expires_at)
    }

    /// Compare the expiry claim against the current time.
    ///
    /// `decode` already enforces expiry; this exists so callers can re-check
    /// it explicitly and independently.
    pub fn is_expired(&self, token: &str) -> Result<bool, AuthError> {
        Ok(self.expiry_of(token)? < Utc::now().timestamp())
    }

    fn parse(&self, token: &str, validate_exp: bool) -> Result<TokenClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = validate_exp;

        let data = decode::<serde_json::Map<String, Value>>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::MalformedToken,
            })?;

        TokenClaims::from_map(data.claims, &self.authorities_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-signing-key-at-least-32-bytes!!";

    fn codec() -> TokenCodec {
        TokenCodec::new(SECRET, 3600, "auth")
    }

    /// Craft a token with explicit iat/exp, signed with the same secret.
    fn raw_token(subject: &str, authorities: &str, iat: i64, exp: i64) -> String {
        let mut claims = serde_json::Map::new();
        claims.insert("sub".to_string(), Value::from(subject));
        claims.insert("auth".to_string(), Value::from(authorities));
        claims.insert("iat".to_string(), Value::from(iat));
        claims.insert("exp".to_string(), Value::from(exp));
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn issue_then_decode_round_trips() {
        let codec = codec();
        let token = codec.issue("johnsmith", &[Role::User, Role::Admin]).unwrap();

        let claims = codec.decode(&token).unwrap();
        assert_eq!(claims.subject, "johnsmith");
        assert_eq!(claims.authorities, vec!["ROLE_USER", "ROLE_ADMIN"]);
        assert_eq!(claims.roles(), vec![Role::User, Role::Admin]);
        assert_eq!(claims.expires_at - claims.issued_at, 3600);
    }

    #[test]
    fn subject_and_expiry_projections() {
        let codec = codec();
        let token = codec.issue("johnsmith", &[Role::User]).unwrap();

        assert_eq!(codec.subject_of(&token).unwrap(), "johnsmith");
        assert!(codec.expiry_of(&token).unwrap() > Utc::now().timestamp());
        assert!(!codec.is_expired(&token).unwrap());
    }

    #[test]
    fn expired_token_is_rejected() {
        let codec = codec();
        let now = Utc::now().timestamp();
        let token = raw_token("johnsmith", "ROLE_USER", now - 7200, now - 3600);

        assert!(matches!(
            codec.decode(&token),
            Err(AuthError::TokenExpired)
        ));
        // The expiry-ignoring projections still work on expired tokens.
        assert_eq!(codec.subject_of(&token).unwrap(), "johnsmith");
        assert!(codec.is_expired(&token).unwrap());
    }

    #[test]
    fn tampered_token_fails_verification() {
        let codec = codec();
        let token = codec.issue("johnsmith", &[Role::User]).unwrap();

        let tampered = format!("{token}x");
        assert!(codec.decode(&tampered).is_err());
        assert!(codec.subject_of(&tampered).is_err());
    }

    #[test]
    fn token_signed_with_other_key_fails() {
        let codec = codec();
        let other = TokenCodec::new("a-completely-different-secret-key!!!", 3600, "auth");
        let token = other.issue("johnsmith", &[Role::User]).unwrap();

        assert!(codec.decode(&token).is_err());
    }

    #[test]
    fn garbage_is_malformed() {
        let codec = codec();
        assert!(matches!(
            codec.decode("not-a-token"),
            Err(AuthError::MalformedToken)
        ));
    }

    #[test]
    fn unknown_authorities_are_dropped_from_roles() {
        let codec = codec();
        let now = Utc::now().timestamp();
        let token = raw_token("johnsmith", "ROLE_USER,ROLE_SUPPORT", now, now + 3600);

        let claims = codec.decode(&token).unwrap();
        assert_eq!(claims.authorities.len(), 2);
        assert_eq!(claims.roles(), vec![Role::User]);
    }
}
