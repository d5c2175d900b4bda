// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{middleware::from_fn_with_state, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{require_active_cart, require_auth, Claims},
    models::{CartItem, CartSnapshot, Identity},
    state::AppState,
};

pub mod cart;
pub mod health;
pub mod users;

pub fn router(state: AppState) -> Router {
    // Route layers run last-added first: authentication, then the cart check.
    let cart_routes = Router::new()
        .route("/cart", get(cart::get_active_cart))
        .route_layer(from_fn_with_state(state.clone(), require_active_cart));

    let v1_routes = Router::new()
        .route("/users/me", get(users::get_current_user))
        .merge(cart_routes)
        .route_layer(from_fn_with_state(state.clone(), require_auth))
        .with_state(state.clone());

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    Router::new()
        .nest("/v1", v1_routes)
        .merge(health_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        health::liveness,
        health::readiness,
        users::get_current_user,
        cart::get_active_cart
    ),
    components(
        schemas(
            Identity,
            CartSnapshot,
            CartItem,
            Claims,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Users", description = "Authenticated caller information"),
        (name = "Cart", description = "Active cart of the authenticated caller")
    )
)]
struct ApiDoc;
