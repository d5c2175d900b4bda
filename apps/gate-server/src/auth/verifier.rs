// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HS256 token verification against the configured shared secret.
//!
//! ## Classification
//!
//! Anything caused by the token itself (encoding, signature, expiry, missing
//! claims including `iat`, wrong algorithm, payload shape, over-long lifetime) is
//! [`VerifyError::Invalid`] and becomes a 401. A missing secret or any other
//! verifier failure is a fault and becomes a 500.

use jsonwebtoken::{errors::ErrorKind, decode, Algorithm, DecodingKey, Validation};

use super::{claims::Claims, credential::Credential};
use crate::config::GateConfig;

/// Clock skew tolerance (60 seconds).
pub const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Why a credential did not produce claims.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum VerifyError {
    /// The token is at fault.
    #[error("invalid token: {0}")]
    Invalid(&'static str),

    /// No usable secret is configured.
    #[error("token verifier is not configured: {0}")]
    Misconfigured(&'static str),

    /// The verifier failed for a reason unrelated to the token.
    #[error("token verifier failed: {0}")]
    Internal(String),
}

impl VerifyError {
    /// Client-facing rejection, as opposed to a server fault.
    pub fn is_rejection(&self) -> bool {
        matches!(self, VerifyError::Invalid(_))
    }
}

/// Verifies bearer tokens; cheap to clone and safe to share across calls.
#[derive(Clone)]
pub struct TokenVerifier {
    key: Option<DecodingKey>,
    validation: Validation,
    max_lifetime_secs: i64,
}

impl TokenVerifier {
    pub fn new(config: &GateConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = CLOCK_SKEW_LEEWAY;
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            key: config
                .jwt_secret
                .as_deref()
                .map(|secret| DecodingKey::from_secret(secret.as_bytes())),
            validation,
            max_lifetime_secs: i64::try_from(config.token_ttl.as_secs()).unwrap_or(i64::MAX),
        }
    }

    /// Verify signature and expiry in one decode, then check payload shape.
    pub fn verify(&self, credential: &Credential) -> Result<Claims, VerifyError> {
        let key = self
            .key
            .as_ref()
            .ok_or(VerifyError::Misconfigured("JWT secret is not set"))?;

        let claims = decode::<Claims>(credential.as_str(), key, &self.validation)
            .map_err(|e| classify(e.into_kind()))?
            .claims;

        if claims.sub.trim().is_empty() {
            return Err(VerifyError::Invalid("empty subject"));
        }
        let allowed = self
            .max_lifetime_secs
            .saturating_add(CLOCK_SKEW_LEEWAY as i64);
        if claims.lifetime_secs() > allowed {
            return Err(VerifyError::Invalid("lifetime exceeds policy"));
        }

        Ok(claims)
    }
}

fn classify(kind: ErrorKind) -> VerifyError {
    match kind {
        ErrorKind::ExpiredSignature => VerifyError::Invalid("token expired"),
        ErrorKind::InvalidSignature => VerifyError::Invalid("signature mismatch"),
        ErrorKind::ImmatureSignature => VerifyError::Invalid("token not yet valid"),
        ErrorKind::InvalidAlgorithm => VerifyError::Invalid("unexpected algorithm"),
        ErrorKind::MissingRequiredClaim(_) => VerifyError::Invalid("missing required claim"),
        ErrorKind::InvalidIssuer | ErrorKind::InvalidAudience => {
            VerifyError::Invalid("claim mismatch")
        }
        ErrorKind::InvalidToken
        | ErrorKind::Base64(_)
        | ErrorKind::Json(_)
        | ErrorKind::Utf8(_) => VerifyError::Invalid("malformed token"),
        other => VerifyError::Internal(format!("{other:?}")),
    }
}
