// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication and authorization errors.
//!
//! Rejections (4xx) answer with `{"message": ...}`. Faults (5xx) answer with
//! `{"message": "Internal server down", "error": ...}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::store::StoreError;

/// Message sent with every 5xx answer from the gates.
pub const FAULT_MESSAGE: &str = "Internal server down";

/// Gate outcome other than "proceed".
#[derive(Debug)]
pub enum AuthError {
    /// No `authorization` header on the request
    MissingAuthHeader,
    /// Header present but carries no usable bearer credential
    MalformedAuthHeader,
    /// Credential failed signature, expiry or shape checks
    InvalidToken,
    /// Token subject does not match any stored identity
    IdentityNotFound,
    /// Authenticated caller has no active cart
    NoActiveCart,
    /// Verifier failed for a reason unrelated to the token (e.g. no secret)
    VerifierFault(String),
    /// Identity store failed while resolving the subject
    ResolutionFault(String),
    /// Cart store failed; the original error is kept for upstream logging
    UpstreamFault(StoreError),
}

#[derive(Serialize)]
struct RejectionBody {
    message: String,
}

#[derive(Serialize)]
struct FaultBody {
    message: &'static str,
    error: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::MalformedAuthHeader => "malformed_auth_header",
            AuthError::InvalidToken => "invalid_token",
            AuthError::IdentityNotFound => "identity_not_found",
            AuthError::NoActiveCart => "no_active_cart",
            AuthError::VerifierFault(_) => "verifier_fault",
            AuthError::ResolutionFault(_) => "resolution_fault",
            AuthError::UpstreamFault(_) => "upstream_fault",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingAuthHeader
            | AuthError::MalformedAuthHeader
            | AuthError::InvalidToken
            | AuthError::IdentityNotFound => StatusCode::UNAUTHORIZED,
            AuthError::NoActiveCart => StatusCode::NOT_FOUND,
            AuthError::VerifierFault(_)
            | AuthError::ResolutionFault(_)
            | AuthError::UpstreamFault(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether this is a server fault rather than a client rejection.
    pub fn is_fault(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Text placed in the `error` field of a fault body.
    ///
    /// Verifier and resolution faults get a fixed category so store or key
    /// details never reach the caller. The cart gate forwards the raw error.
    fn fault_detail(&self) -> String {
        match self {
            AuthError::VerifierFault(_) => "token verification unavailable".to_string(),
            AuthError::ResolutionFault(_) => "identity lookup failed".to_string(),
            AuthError::UpstreamFault(err) => err.to_string(),
            _ => String::new(),
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingAuthHeader => write!(f, "Please Login"),
            AuthError::MalformedAuthHeader => write!(f, "no access token found"),
            AuthError::InvalidToken => write!(f, "invalid token"),
            AuthError::IdentityNotFound => write!(f, "user not found"),
            AuthError::NoActiveCart => write!(f, "No active cart found"),
            AuthError::VerifierFault(msg) => write!(f, "token verifier failure: {msg}"),
            AuthError::ResolutionFault(msg) => write!(f, "identity lookup failure: {msg}"),
            AuthError::UpstreamFault(err) => write!(f, "cart lookup failure: {err}"),
        }
    }
}

impl std::error::Error for AuthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AuthError::UpstreamFault(err) => Some(err),
            _ => None,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if self.is_fault() {
            let body = Json(FaultBody {
                message: FAULT_MESSAGE,
                error: self.fault_detail(),
            });
            (status, body).into_response()
        } else {
            let body = Json(RejectionBody {
                message: self.to_string(),
            });
            (status, body).into_response()
        }
    }
}
