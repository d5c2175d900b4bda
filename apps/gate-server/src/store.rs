// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity and cart store contracts, plus an in-memory implementation.
//!
//! The gates depend only on the two traits. Persistence, retries and timeouts
//! belong to whatever implements them; a failed lookup is reported once.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::models::{CartSnapshot, Identity};

/// Errors raised by a backing store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached or refused the request.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store answered with a record it could not decode.
    #[error("corrupt record: {0}")]
    Corrupt(String),

    /// Seed or snapshot I/O failure.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Seed document was not valid JSON for this store.
    #[error("store seed is invalid: {0}")]
    Seed(#[from] serde_json::Error),
}

/// Lookup-by-id over durable user identities.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// `Ok(None)` means the id is unknown; `Err` means the lookup itself failed.
    async fn find_identity(&self, id: &str) -> Result<Option<Identity>, StoreError>;
}

/// Lookup of the active cart owned by a buyer.
#[async_trait]
pub trait CartStore: Send + Sync {
    async fn find_active_cart(&self, buyer_id: &str) -> Result<Option<CartSnapshot>, StoreError>;
}

/// Seed document accepted by [`InMemoryStore::from_seed_file`].
#[derive(Debug, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub identities: Vec<Identity>,
    #[serde(default)]
    pub carts: Vec<CartSnapshot>,
}

#[derive(Default)]
struct Records {
    identities: HashMap<String, Identity>,
    carts: HashMap<String, Vec<CartSnapshot>>,
}

/// Process-local store used by the binary and by tests.
#[derive(Default)]
pub struct InMemoryStore {
    records: RwLock<Records>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_seed(seed: SeedData) -> Self {
        let mut records = Records::default();
        for identity in seed.identities {
            records.identities.insert(identity.id.clone(), identity);
        }
        for cart in seed.carts {
            records
                .carts
                .entry(cart.buyer_id.clone())
                .or_default()
                .push(cart);
        }
        Self {
            records: RwLock::new(records),
        }
    }

    /// Load identities and carts from a JSON document on disk.
    pub fn from_seed_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let raw = std::fs::read(path)?;
        let seed: SeedData = serde_json::from_slice(&raw)?;
        Ok(Self::from_seed(seed))
    }

    pub async fn insert_identity(&self, identity: Identity) {
        let mut records = self.records.write().await;
        records.identities.insert(identity.id.clone(), identity);
    }

    pub async fn insert_cart(&self, cart: CartSnapshot) {
        let mut records = self.records.write().await;
        records
            .carts
            .entry(cart.buyer_id.clone())
            .or_default()
            .push(cart);
    }

    /// Mark every cart of `buyer_id` inactive. Returns how many were closed.
    pub async fn close_carts(&self, buyer_id: &str) -> usize {
        let mut records = self.records.write().await;
        let Some(carts) = records.carts.get_mut(buyer_id) else {
            return 0;
        };
        let mut closed = 0;
        for cart in carts.iter_mut().filter(|cart| cart.active) {
            cart.active = false;
            closed += 1;
        }
        closed
    }

    pub async fn identity_count(&self) -> usize {
        self.records.read().await.identities.len()
    }
}

#[async_trait]
impl IdentityStore for InMemoryStore {
    async fn find_identity(&self, id: &str) -> Result<Option<Identity>, StoreError> {
        Ok(self.records.read().await.identities.get(id).cloned())
    }
}

#[async_trait]
impl CartStore for InMemoryStore {
    async fn find_active_cart(&self, buyer_id: &str) -> Result<Option<CartSnapshot>, StoreError> {
        let records = self.records.read().await;
        Ok(records
            .carts
            .get(buyer_id)
            .and_then(|carts| carts.iter().rev().find(|cart| cart.active))
            .cloned())
    }
}
