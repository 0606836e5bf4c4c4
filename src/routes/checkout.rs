// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Checkout preference creation route.

use axum::{
    extract::State,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::services::{BackUrls, PreferenceItem, PreferenceRequest};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/create_preference", post(create_preference))
}

/// A cart line item as sent by the storefront.
#[derive(Debug, Clone, Deserialize)]
struct LineItem {
    title: String,
    quantity: u32,
    unit_price: f64,
}

/// Response carrying the checkout redirect URL.
#[derive(Serialize)]
struct CreatePreferenceResponse {
    init_point: String,
}

/// Create a checkout preference for a connected seller.
///
/// The body is validated by hand rather than through a typed extractor:
/// a malformed `items` must come back as a 400 with a structured error,
/// not as an extractor rejection.
async fn create_preference(
    State(state): State<Arc<AppState>>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<CreatePreferenceResponse>> {
    let seller_id = body
        .get("vendedorId")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("vendedorId is required".to_string()))?;

    let items_value = body
        .get("items")
        .filter(|v| v.is_array())
        .ok_or_else(|| AppError::BadRequest("items must be a list".to_string()))?;

    let items: Vec<LineItem> = serde_json::from_value(items_value.clone())
        .map_err(|e| AppError::BadRequest(format!("Invalid items: {}", e)))?;

    tracing::info!(seller_id, item_count = items.len(), "Creating checkout preference");

    let seller = state
        .db
        .get_seller(seller_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Seller {} not found", seller_id)))?;

    let access_token = seller
        .mp_access_token
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            AppError::BadRequest("Seller has no connected Mercado Pago account".to_string())
        })?;

    let preference = build_preference(&state.config, &items);

    let created = state
        .mercado_pago
        .create_preference(access_token, &preference)
        .await?;

    tracing::info!(
        seller_id,
        preference_id = %created.id,
        "Checkout preference created"
    );

    Ok(Json(CreatePreferenceResponse {
        init_point: created.init_point,
    }))
}

/// Map cart line items onto a preference request: items 1:1 with the
/// configured currency, plus the fixed back URLs and auto-return.
fn build_preference(config: &Config, items: &[LineItem]) -> PreferenceRequest {
    PreferenceRequest {
        items: items
            .iter()
            .map(|item| PreferenceItem {
                title: item.title.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                currency_id: config.currency_id.clone(),
            })
            .collect(),
        back_urls: BackUrls {
            success: config.checkout_success_url.clone(),
            failure: config.checkout_failure_url.clone(),
            pending: config.checkout_pending_url.clone(),
        },
        auto_return: "approved".to_string(),
    }
}
