// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims carried by storefront bearer tokens.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Decoded payload of a verified token.
///
/// Only ever produced by [`super::TokenVerifier`]; a value of this type has
/// passed signature, expiry and shape checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// Subject; the identity store id of the caller
    pub sub: String,

    /// Issued at timestamp; required so the lifetime policy always applies
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Role label; carried through, never interpreted by the gates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Claims {
    pub fn subject(&self) -> &str {
        &self.sub
    }

    /// Lifetime the token claims for itself.
    pub fn lifetime_secs(&self) -> i64 {
        self.exp.saturating_sub(self.iat)
    }
}
