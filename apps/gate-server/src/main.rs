// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{env, sync::Arc};

use storefront_gate::{
    api::router,
    config::{bind_address, GateConfig, DEFAULT_LOG_FILTER, LOG_FORMAT_ENV, SEED_DATA_ENV},
    socket::{create_socket_layer, SocketState},
    state::AppState,
    store::InMemoryStore,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);

    match env::var(LOG_FORMAT_ENV).as_deref() {
        Ok("json") => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        _ => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() {
    init_tracing();

    let config = GateConfig::from_env().expect("Invalid gate configuration");
    if !config.has_secret() {
        tracing::warn!("JWT_SECRET is not set; every authenticated call will fail with 500");
    }
    tracing::info!(token_ttl_secs = config.token_ttl.as_secs(), "Gate configuration loaded");

    let store = match env::var(SEED_DATA_ENV) {
        Ok(path) => {
            let store = InMemoryStore::from_seed_file(&path).expect("Failed to load seed data");
            tracing::info!(
                %path,
                identities = store.identity_count().await,
                "Seeded in-memory store"
            );
            store
        }
        Err(_) => InMemoryStore::new(),
    };
    let store = Arc::new(store);

    let state = AppState::new(config.clone(), store.clone(), store);
    let (socket_layer, _io) = create_socket_layer(SocketState::new(&config));
    let app = router(state).layer(socket_layer);

    let (host, port) = bind_address().expect("Invalid bind address");
    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .expect("Failed to bind listener");

    tracing::info!("Storefront gate listening on http://{host}:{port} (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("HTTP server failed");
}
