// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Cart authorization gate.
//!
//! Runs after [`super::require_auth`]. Lets the call through only when the
//! caller owns an active cart; it never modifies the request. A store failure
//! is forwarded as the original [`StoreError`] so the fault response and logs
//! carry full detail.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::AuthError;
use crate::models::{CartSnapshot, Identity};
use crate::state::AppState;
use crate::store::CartStore;

/// Look up the active cart of `identity`.
///
/// `NoActiveCart` when absent; `UpstreamFault` wrapping the store's own error
/// when the lookup fails.
pub async fn check_active_cart(
    carts: &dyn CartStore,
    identity: &Identity,
) -> Result<CartSnapshot, AuthError> {
    match carts.find_active_cart(&identity.id).await {
        Ok(Some(cart)) => Ok(cart),
        Ok(None) => Err(AuthError::NoActiveCart),
        Err(err) => Err(AuthError::UpstreamFault(err)),
    }
}

/// Cart check middleware function.
pub async fn require_active_cart(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(identity) = request.extensions().get::<Identity>() else {
        tracing::warn!(
            path = %request.uri().path(),
            "Cart gate reached without an authenticated identity"
        );
        return AuthError::MissingAuthHeader.into_response();
    };

    match check_active_cart(state.carts.as_ref(), identity).await {
        Ok(cart) => {
            tracing::debug!(buyer_id = %identity.id, cart_id = %cart.id, "Active cart present");
            next.run(request).await
        }
        Err(AuthError::UpstreamFault(source)) => {
            tracing::error!(buyer_id = %identity.id, error = ?source, "Cart lookup failed");
            AuthError::UpstreamFault(source).into_response()
        }
        Err(err) => err.into_response(),
    }
}
