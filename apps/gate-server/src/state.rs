// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::HttpAuthGate;
use crate::config::GateConfig;
use crate::store::{CartStore, IdentityStore};

#[derive(Clone)]
pub struct AppState {
    pub auth_gate: HttpAuthGate,
    pub carts: Arc<dyn CartStore>,
    /// Whether a signing secret is configured; reported by the health probe.
    pub secret_configured: bool,
}

impl AppState {
    pub fn new(
        config: GateConfig,
        identities: Arc<dyn IdentityStore>,
        carts: Arc<dyn CartStore>,
    ) -> Self {
        Self {
            auth_gate: HttpAuthGate::new(&config, identities),
            carts,
            secret_configured: config.has_secret(),
        }
    }
}
