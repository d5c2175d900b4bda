// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Records owned by the external identity and cart stores.
//!
//! The gates only ever hold a read view of these for the duration of one call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A durable user identity, looked up by the token subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Identity {
    /// Store identifier; matches the `sub` claim of tokens issued for this user.
    pub id: String,
    pub email: String,
    /// Role label as recorded by the store. Presence only, not interpreted here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// One line of a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CartItem {
    pub product_id: String,
    pub quantity: u32,
}

/// The active cart belonging to a buyer, fetched on demand and never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CartSnapshot {
    pub id: Uuid,
    pub buyer_id: String,
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default = "default_active")]
    pub active: bool,
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl CartSnapshot {
    /// Start an empty, active cart for `buyer_id`.
    pub fn open(buyer_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            buyer_id: buyer_id.into(),
            items: Vec::new(),
            active: true,
            updated_at: Utc::now(),
        }
    }

    pub fn with_item(mut self, product_id: impl Into<String>, quantity: u32) -> Self {
        self.items.push(CartItem {
            product_id: product_id.into(),
            quantity,
        });
        self
    }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}
