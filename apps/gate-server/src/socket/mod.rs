// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Socket.IO channel for storefront clients.
//!
//! Every connection to `/` passes [`authenticate_connection`] first; handlers
//! read the caller's claims from the socket extensions.

pub mod gate;

use serde::Serialize;
use socketioxide::extract::SocketRef;
use socketioxide::handler::ConnectHandler;
use socketioxide::SocketIo;
use tracing::{info, warn};

use crate::auth::Claims;
use crate::config::GateConfig;

pub use gate::{authenticate_connection, ConnectionGate, ConnectionRefusal};

/// Shared state for Socket.IO handlers
#[derive(Clone)]
pub struct SocketState {
    pub gate: ConnectionGate,
}

impl SocketState {
    pub fn new(config: &GateConfig) -> Self {
        Self {
            gate: ConnectionGate::new(config),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorPayload {
    pub message: String,
}

/// Handle a connection that passed the gate
pub async fn on_connect(socket: SocketRef) {
    let subject = socket
        .extensions
        .get::<Claims>()
        .map(|claims| claims.sub)
        .unwrap_or_default();
    info!(socket_id = %socket.id, %subject, "Client connected");

    socket.on("whoami", |socket: SocketRef| async move {
        match socket.extensions.get::<Claims>() {
            Some(claims) => {
                if let Err(e) = socket.emit("whoami", &claims) {
                    warn!("Failed to emit whoami: {}", e);
                }
            }
            None => {
                let payload = ErrorPayload {
                    message: "Not authenticated".to_string(),
                };
                if let Err(e) = socket.emit("auth:error", &payload) {
                    warn!("Failed to emit auth:error: {}", e);
                }
            }
        }
    });

    socket.on_disconnect(|socket: SocketRef| async move {
        info!(socket_id = %socket.id, "Client disconnected");
    });
}

/// Create and configure Socket.IO layer
pub fn create_socket_layer(state: SocketState) -> (socketioxide::layer::SocketIoLayer, SocketIo) {
    let (layer, io) = SocketIo::builder().with_state(state).build_layer();

    io.ns("/", on_connect.with(authenticate_connection));

    (layer, io)
}
