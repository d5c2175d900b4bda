// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Cart endpoints. Mounted behind both the authentication and cart gates.

use axum::{extract::State, Json};

use crate::{auth::Auth, error::ApiError, models::CartSnapshot, state::AppState};

/// Get the caller's active cart.
#[utoipa::path(
    get,
    path = "/v1/cart",
    tag = "Cart",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Active cart", body = CartSnapshot),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 404, description = "No active cart"),
        (status = 500, description = "Store failure"),
    )
)]
pub async fn get_active_cart(
    Auth(identity): Auth,
    State(state): State<AppState>,
) -> Result<Json<CartSnapshot>, ApiError> {
    // The cart gate already checked; the cart may have closed since.
    match state.carts.find_active_cart(&identity.id).await {
        Ok(Some(cart)) => Ok(Json(cart)),
        Ok(None) => Err(ApiError::not_found("No active cart found")),
        Err(e) => {
            tracing::warn!(buyer_id = %identity.id, "Failed to load cart: {}", e);
            Err(ApiError::internal("cart lookup failed"))
        }
    }
}
