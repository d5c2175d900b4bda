// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared fixtures for unit tests: token minting and store doubles.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;
use serde_json::{json, Value};

use crate::auth::credential::{self, Credential};
use crate::config::{GateConfig, DEFAULT_TOKEN_TTL};
use crate::models::{CartSnapshot, Identity};
use crate::state::AppState;
use crate::store::{CartStore, IdentityStore, InMemoryStore, StoreError};

pub const TEST_SECRET: &str = "test-secret-do-not-use";

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

pub fn claims_for(sub: &str) -> Value {
    json!({
        "sub": sub,
        "iat": now(),
        "exp": now() + 3600,
        "email": format!("{sub}@example.com"),
        "role": "buyer",
    })
}

pub fn mint_with_secret<T: Serialize>(claims: &T, secret: &str) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("test token encodes")
}

pub fn mint<T: Serialize>(claims: &T) -> String {
    mint_with_secret(claims, TEST_SECRET)
}

pub fn credential(token: &str) -> Credential {
    credential::from_handshake(&json!({ "token": token })).expect("non-empty test token")
}

pub fn test_config() -> GateConfig {
    GateConfig::new(TEST_SECRET, DEFAULT_TOKEN_TTL)
}

pub fn identity(id: &str) -> Identity {
    Identity {
        id: id.to_string(),
        email: format!("{id}@example.com"),
        role: Some("buyer".to_string()),
        name: Some(format!("Buyer {id}")),
    }
}

/// In-memory store holding `user_1` (with an active cart) and `user_2` (without).
pub async fn seeded_store() -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());
    store.insert_identity(identity("user_1")).await;
    store.insert_identity(identity("user_2")).await;
    store
        .insert_cart(CartSnapshot::open("user_1").with_item("sku-1", 2))
        .await;
    store
}

pub async fn seeded_state() -> AppState {
    let store = seeded_store().await;
    AppState::new(test_config(), store.clone(), store)
}

/// Store that fails every lookup and counts how often it was asked.
#[derive(Default)]
pub struct FailingStore {
    pub calls: AtomicUsize,
}

impl FailingStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityStore for FailingStore {
    async fn find_identity(&self, _id: &str) -> Result<Option<Identity>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Unavailable("identity backend timed out".into()))
    }
}

#[async_trait]
impl CartStore for FailingStore {
    async fn find_active_cart(&self, _buyer_id: &str) -> Result<Option<CartSnapshot>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Unavailable("cart backend timed out".into()))
    }
}
