// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Bearer-token gates for the storefront API.
//!
//! ## Auth Flow (HTTP)
//!
//! 1. Client sends `Authorization: Bearer <JWT>`
//! 2. Server:
//!    - Extracts the credential (missing vs. malformed header are distinct)
//!    - Verifies HS256 signature and expiry against the shared secret
//!    - Resolves `sub` to a stored identity
//!    - Attaches the identity to the request extensions
//! 3. Cart routes additionally require an active cart owned by the caller
//!
//! The Socket.IO handshake path lives in [`crate::socket`] and reuses the
//! same extractor and verifier, trusting claims without a store lookup.
//!
//! ## Security
//!
//! - Verification fails closed when no secret is configured
//! - Clock skew tolerance is 60 seconds
//! - Verifier and identity-lookup faults surface only a generic category;
//!   the cart gate forwards its store error text in the `error` field

pub mod cart;
pub mod claims;
pub mod credential;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod resolver;
pub mod verifier;

pub use cart::{check_active_cart, require_active_cart};
pub use claims::Claims;
pub use credential::Credential;
pub use error::AuthError;
pub use extractor::Auth;
pub use middleware::{require_auth, HttpAuthGate};
pub use resolver::{IdentityResolver, ResolveError};
pub use verifier::{TokenVerifier, VerifyError};
