// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Mercado-Connect API Server
//!
//! Relays the Mercado Pago OAuth flow into Firestore seller records and
//! creates checkout preferences on behalf of connected sellers.

use mercado_connect::{
    config::Config, db::FirestoreDb, services::MercadoPagoClient, AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Mercado-Connect API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id, &config.firestore_credentials)
        .await
        .expect("Failed to connect to Firestore");

    // Initialize Mercado Pago client
    let mercado_pago = Arc::new(MercadoPagoClient::new(
        config.mp_client_id.clone(),
        config.mp_client_secret.clone(),
        config.mp_redirect_uri.clone(),
    ));

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        mercado_pago,
    });

    // Build router
    let app = mercado_connect::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mercado_connect=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
