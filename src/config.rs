// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment at startup. The JWT settings
//! are required inputs with no defaults: the server refuses to start without
//! them, so a misconfigured deployment fails loudly instead of issuing
//! unverifiable tokens.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `JWT_SIGNING_KEY` | HMAC shared secret for token signing | Required |
//! | `JWT_TOKEN_VALIDITY_SECS` | Token lifetime in seconds | Required |
//! | `JWT_HEADER_NAME` | HTTP header carrying the token | Required |
//! | `JWT_TOKEN_PREFIX` | Scheme prefix inside the header (e.g. `Bearer `) | Required |
//! | `JWT_AUTHORITIES_KEY` | Claim key carrying comma-joined role names | Required |
//! | `DATA_DIR` | Root directory for persistent storage | `/data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;
use std::path::PathBuf;

/// Environment variable name for the persistent data directory path.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Environment variable name for the logging format selector.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

const JWT_SIGNING_KEY_ENV: &str = "JWT_SIGNING_KEY";
const JWT_TOKEN_VALIDITY_ENV: &str = "JWT_TOKEN_VALIDITY_SECS";
const JWT_HEADER_NAME_ENV: &str = "JWT_HEADER_NAME";
const JWT_TOKEN_PREFIX_ENV: &str = "JWT_TOKEN_PREFIX";
const JWT_AUTHORITIES_KEY_ENV: &str = "JWT_AUTHORITIES_KEY";

/// Configuration errors raised during startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
    /// An environment variable is set but cannot be parsed.
    #[error("invalid value for {var}: {value}")]
    InvalidVar { var: &'static str, value: String },
}

/// Resolved application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HMAC shared secret (UTF-8 bytes sign and verify every token).
    pub jwt_signing_key: String,
    /// Token lifetime in seconds; expiry is always computed server-side.
    pub jwt_validity_secs: u64,
    /// Name of the HTTP header carrying the token.
    pub jwt_header_name: String,
    /// Scheme prefix expected inside the header value.
    pub jwt_token_prefix: String,
    /// Claim key under which comma-joined role names are stored.
    pub jwt_authorities_key: String,
    /// Server bind address.
    pub host: String,
    /// Server bind port.
    pub port: u16,
    /// Root directory for persistent storage.
    pub data_dir: PathBuf,
}

impl AppConfig {
    /// Load the configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port_raw = env::var("PORT").unwrap_or_else(|_| "8080".to_string());
        let port: u16 = port_raw.parse().map_err(|_| ConfigError::InvalidVar {
            var: "PORT",
            value: port_raw.clone(),
        })?;

        let validity_raw = required(JWT_TOKEN_VALIDITY_ENV)?;
        let jwt_validity_secs: u64 =
            validity_raw.parse().map_err(|_| ConfigError::InvalidVar {
                var: JWT_TOKEN_VALIDITY_ENV,
                value: validity_raw.clone(),
            })?;

        Ok(Self {
            jwt_signing_key: required(JWT_SIGNING_KEY_ENV)?,
            jwt_validity_secs,
            jwt_header_name: required(JWT_HEADER_NAME_ENV)?,
            jwt_token_prefix: required(JWT_TOKEN_PREFIX_ENV)?,
            jwt_authorities_key: required(JWT_AUTHORITIES_KEY_ENV)?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
            data_dir: PathBuf::from(
                env::var(DATA_DIR_ENV).unwrap_or_else(|_| "/data".to_string()),
            ),
        })
    }
}

fn required(var: &'static str) -> Result<String, ConfigError> {
    match env::var(var) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(var)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_rejects_empty() {
        std::env::set_var("SECUREAPP_TEST_EMPTY_VAR", "");
        let err = required("SECUREAPP_TEST_EMPTY_VAR").unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(_)));
    }

    #[test]
    fn config_error_names_the_variable() {
        let err = ConfigError::MissingVar(JWT_SIGNING_KEY_ENV);
        assert!(err.to_string().contains("JWT_SIGNING_KEY"));
    }
}
