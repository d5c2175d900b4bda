// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names, defaults, and the [`GateConfig`] value that is
//! injected into the authentication gates. The environment is read once, in
//! `main`; the gates never consult it themselves.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `JWT_SECRET` | Shared HS256 secret for bearer tokens | Required for service |
//! | `JWT_EXPIRES_IN` | Maximum token lifetime (`3600`, `30m`, `12h`, `1d`) | `1d` |
//! | `SEED_DATA` | JSON file with identities and carts for the in-memory store | Optional |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug,socketioxide=info` |

use std::env;
use std::fmt;
use std::time::Duration;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const JWT_EXPIRES_IN_ENV: &str = "JWT_EXPIRES_IN";
pub const SEED_DATA_ENV: &str = "SEED_DATA";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug,socketioxide=info";

/// Default token lifetime (one day).
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Invalid configuration detected at startup.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} has an invalid duration {value:?} (expected e.g. 3600, 30m, 12h, 1d)")]
    InvalidDuration { name: &'static str, value: String },

    #[error("{name} must be greater than zero")]
    ZeroDuration { name: &'static str },

    #[error("{name} is not a valid port: {value:?}")]
    InvalidPort { name: &'static str, value: String },
}

/// Token settings shared by the HTTP and connection gates.
#[derive(Clone, PartialEq, Eq)]
pub struct GateConfig {
    /// HS256 secret. `None` means unconfigured; every verification then faults.
    pub jwt_secret: Option<String>,
    /// Longest lifetime (`exp - iat`) a token may claim.
    pub token_ttl: Duration,
}

impl GateConfig {
    pub fn new(secret: impl Into<String>, token_ttl: Duration) -> Self {
        Self {
            jwt_secret: Some(secret.into()).filter(|s: &String| !s.trim().is_empty()),
            token_ttl,
        }
    }

    /// A config with no usable secret.
    pub fn unconfigured() -> Self {
        Self {
            jwt_secret: None,
            token_ttl: DEFAULT_TOKEN_TTL,
        }
    }

    /// Build from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup(JWT_SECRET_ENV).filter(|s| !s.trim().is_empty());

        let token_ttl = match lookup(JWT_EXPIRES_IN_ENV) {
            Some(raw) => parse_duration(JWT_EXPIRES_IN_ENV, &raw)?,
            None => DEFAULT_TOKEN_TTL,
        };

        Ok(Self {
            jwt_secret,
            token_ttl,
        })
    }

    pub fn has_secret(&self) -> bool {
        self.jwt_secret.is_some()
    }
}

impl fmt::Debug for GateConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GateConfig")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

/// Parse `"<n>"` (seconds) or `"<n><unit>"` with unit `s`, `m`, `h` or `d`.
pub fn parse_duration(name: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    let value = raw.trim();
    let invalid = || ConfigError::InvalidDuration {
        name,
        value: raw.to_string(),
    };

    let (digits, multiplier) = match value.char_indices().last() {
        Some((idx, 's')) => (&value[..idx], 1),
        Some((idx, 'm')) => (&value[..idx], 60),
        Some((idx, 'h')) => (&value[..idx], 60 * 60),
        Some((idx, 'd')) => (&value[..idx], 24 * 60 * 60),
        Some(_) => (value, 1),
        None => return Err(invalid()),
    };

    let amount: u64 = digits.parse().map_err(|_| invalid())?;
    let secs = amount.checked_mul(multiplier).ok_or_else(invalid)?;
    if secs == 0 {
        return Err(ConfigError::ZeroDuration { name });
    }
    Ok(Duration::from_secs(secs))
}

/// Bind address from `HOST`/`PORT`.
pub fn bind_address() -> Result<(String, u16), ConfigError> {
    let host = env::var(HOST_ENV).unwrap_or_else(|_| DEFAULT_HOST.to_string());
    let port = match env::var(PORT_ENV) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidPort {
            name: PORT_ENV,
            value: raw,
        })?,
        Err(_) => DEFAULT_PORT,
    };
    Ok((host, port))
}
