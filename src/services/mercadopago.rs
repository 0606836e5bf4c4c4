// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Mercado Pago API client.
//!
//! Handles:
//! - OAuth authorization-code exchange
//! - Checkout preference creation with a seller's access token
//!
//! The outbound calls sit behind [`MercadoPagoApi`] so handlers can be
//! tested against a recording double without network access.

use crate::error::AppError;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

/// Narrow interface over the two Mercado Pago calls this service makes.
#[async_trait]
pub trait MercadoPagoApi: Send + Sync {
    /// Exchange an OAuth authorization code for seller credentials.
    async fn exchange_code(&self, code: &str) -> Result<TokenExchangeResponse, AppError>;

    /// Create a checkout preference on behalf of a seller.
    async fn create_preference(
        &self,
        access_token: &str,
        preference: &PreferenceRequest,
    ) -> Result<PreferenceResponse, AppError>;
}

/// Mercado Pago HTTP client.
#[derive(Clone)]
pub struct MercadoPagoClient {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl MercadoPagoClient {
    /// Create a new client with OAuth credentials.
    pub fn new(client_id: String, client_secret: String, redirect_uri: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: "https://api.mercadopago.com".to_string(),
            client_id,
            client_secret,
            redirect_uri,
        }
    }

    /// Check response and parse JSON body.
    ///
    /// On a non-2xx response the upstream body is logged and carried in the
    /// error detail; diagnostics for a failed exchange live in the logs.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Mercado Pago request failed");
            return Err(AppError::MercadoPago(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::MercadoPago(format!("JSON parse error: {}", e)))
    }
}

#[async_trait]
impl MercadoPagoApi for MercadoPagoClient {
    async fn exchange_code(&self, code: &str) -> Result<TokenExchangeResponse, AppError> {
        let response = self
            .http
            .post(format!("{}/oauth/token", self.base_url))
            .form(&[
                ("grant_type", "authorization_code"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", self.redirect_uri.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::MercadoPago(format!("Token exchange request failed: {}", e)))?;

        self.check_response_json(response).await
    }

    async fn create_preference(
        &self,
        access_token: &str,
        preference: &PreferenceRequest,
    ) -> Result<PreferenceResponse, AppError> {
        let response = self
            .http
            .post(format!("{}/checkout/preferences", self.base_url))
            .bearer_auth(access_token)
            .json(preference)
            .send()
            .await
            .map_err(|e| {
                AppError::MercadoPago(format!("Preference creation request failed: {}", e))
            })?;

        self.check_response_json(response).await
    }
}

/// Token exchange response from Mercado Pago OAuth.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenExchangeResponse {
    pub access_token: String,
    /// Mercado Pago sends this as a number; stored as a string.
    #[serde(deserialize_with = "string_or_number")]
    pub user_id: String,
    pub public_key: String,
}

/// Checkout preference request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferenceRequest {
    pub items: Vec<PreferenceItem>,
    pub back_urls: BackUrls,
    pub auto_return: String,
}

/// A single purchasable line item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferenceItem {
    pub title: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub currency_id: String,
}

/// Redirect targets after checkout completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackUrls {
    pub success: String,
    pub failure: String,
    pub pending: String,
}

/// Checkout preference response; `init_point` is the redirect URL.
#[derive(Debug, Clone, Deserialize)]
pub struct PreferenceResponse {
    pub id: String,
    pub init_point: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        String(String),
        Number(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::String(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}
