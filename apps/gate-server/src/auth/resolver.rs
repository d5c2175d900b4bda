// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Maps verified claims to a stored identity.

use std::sync::Arc;

use super::claims::Claims;
use crate::models::Identity;
use crate::store::{IdentityStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("no identity for subject {0}")]
    NotFound(String),

    #[error("identity lookup failed: {0}")]
    Fault(#[source] StoreError),
}

/// Single-shot lookup of `claims.sub`; no retries.
#[derive(Clone)]
pub struct IdentityResolver {
    store: Arc<dyn IdentityStore>,
}

impl IdentityResolver {
    pub fn new(store: Arc<dyn IdentityStore>) -> Self {
        Self { store }
    }

    pub async fn resolve(&self, claims: &Claims) -> Result<Identity, ResolveError> {
        match self.store.find_identity(claims.subject()).await {
            Ok(Some(identity)) => Ok(identity),
            Ok(None) => Err(ResolveError::NotFound(claims.sub.clone())),
            Err(err) => Err(ResolveError::Fault(err)),
        }
    }
}
