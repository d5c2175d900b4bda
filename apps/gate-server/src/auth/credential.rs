// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer credential extraction from HTTP headers and Socket.IO handshakes.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use serde_json::Value;

use super::AuthError;

/// Scheme prefix tolerated inside the handshake token field.
pub const BEARER_SCHEME: &str = "Bearer";

/// Field of the handshake `auth` payload holding the token.
pub const HANDSHAKE_TOKEN_FIELD: &str = "token";

/// A raw bearer token, non-empty and stripped of any scheme prefix.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    fn new(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            None
        } else {
            Some(Self(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Pull the bearer credential out of request headers.
///
/// A missing header and a header without a usable `<scheme> <token>` value are
/// reported separately so callers can tell "absent" from "malformed". The
/// scheme word is not inspected: a well-formed value with a foreign scheme
/// carries a credential that simply fails verification.
pub fn from_headers(headers: &HeaderMap) -> Result<Credential, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::MalformedAuthHeader)?;

    let mut parts = value.split_whitespace();
    let (Some(_scheme), Some(token), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(AuthError::MalformedAuthHeader);
    };

    Credential::new(token).ok_or(AuthError::MalformedAuthHeader)
}

/// Pull the token out of a Socket.IO handshake `auth` payload.
///
/// Returns `None` when the payload is not an object, the field is absent, not
/// a string, or empty. A leading `Bearer ` is tolerated and stripped.
pub fn from_handshake(auth: &Value) -> Option<Credential> {
    let raw = auth.get(HANDSHAKE_TOKEN_FIELD)?.as_str()?.trim();
    let token = match raw.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case(BEARER_SCHEME) => rest,
        _ => raw,
    };
    Credential::new(token)
}
