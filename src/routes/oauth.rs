// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Mercado Pago OAuth callback route.

use axum::{
    extract::{Query, State},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::SellerConnection;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/oauth_callback", get(oauth_callback))
}

/// Query parameters Mercado Pago appends to the redirect.
#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    /// Carries the seller id through the OAuth round trip.
    #[serde(default)]
    state: Option<String>,
}

/// OAuth callback - exchange the authorization code and store the seller's
/// credentials.
///
/// A failed exchange is terminal; the seller restarts the flow. Nothing is
/// written unless the exchange succeeded.
async fn oauth_callback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackParams>,
) -> Result<&'static str> {
    let code = params
        .code
        .as_deref()
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing authorization code".to_string()))?;

    // Without a seller id the credentials would land under a null key.
    let seller_id = params
        .state
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing state (seller id)".to_string()))?;

    tracing::info!(seller_id, "Exchanging authorization code for seller credentials");

    let token = state.mercado_pago.exchange_code(code).await?;

    let connection = SellerConnection {
        mp_connected: true,
        mp_access_token: token.access_token,
        mp_user_id: token.user_id,
        mp_public_key: token.public_key,
        payment_method_registered: true,
        updated_at: chrono::Utc::now().to_rfc3339(),
    };

    state.db.connect_seller(seller_id, &connection).await?;

    tracing::info!(
        seller_id,
        mp_user_id = %connection.mp_user_id,
        "Seller connected to Mercado Pago"
    );

    Ok("Your Mercado Pago account has been connected successfully.")
}
