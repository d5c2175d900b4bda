// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Storefront Gate - Authentication and cart authorization
//!
//! This crate provides the bearer-token gates that sit in front of the
//! storefront HTTP API and its Socket.IO channel.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Token verification, identity resolution and the cart check
//! - `socket` - Socket.IO handshake authentication
//! - `store` - Identity and cart store contracts

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod socket;
pub mod state;
pub mod store;

#[cfg(test)]
mod test_support;
