// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Mercado-Connect: OAuth and checkout relay for Mercado Pago sellers
//!
//! This crate provides the backend API that connects seller accounts to
//! Mercado Pago via OAuth and creates checkout preferences on their behalf.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::FirestoreDb;
use services::MercadoPagoApi;
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub mercado_pago: Arc<dyn MercadoPagoApi>,
}
