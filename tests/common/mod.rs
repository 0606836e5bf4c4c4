// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use mercado_connect::config::Config;
use mercado_connect::db::FirestoreDb;
use mercado_connect::error::AppError;
use mercado_connect::routes::create_router;
use mercado_connect::services::{
    MercadoPagoApi, PreferenceRequest, PreferenceResponse, TokenExchangeResponse,
};
use mercado_connect::AppState;
use std::sync::{Arc, Mutex};

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Recording double for the Mercado Pago API.
///
/// Responses are configured up front; a `None` response makes the call fail
/// the way an upstream non-2xx does. Every call is recorded for assertions.
#[derive(Default)]
pub struct StubMercadoPago {
    pub exchange_response: Mutex<Option<TokenExchangeResponse>>,
    pub preference_response: Mutex<Option<PreferenceResponse>>,
    pub exchange_codes: Mutex<Vec<String>>,
    pub preference_calls: Mutex<Vec<(String, PreferenceRequest)>>,
}

#[allow(dead_code)]
impl StubMercadoPago {
    pub fn with_exchange(response: TokenExchangeResponse) -> Arc<Self> {
        let stub = Self::default();
        *stub.exchange_response.lock().unwrap() = Some(response);
        Arc::new(stub)
    }

    pub fn with_preference(response: PreferenceResponse) -> Arc<Self> {
        let stub = Self::default();
        *stub.preference_response.lock().unwrap() = Some(response);
        Arc::new(stub)
    }

    /// Every call fails, as if the upstream returned an error.
    pub fn failing() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn exchange_call_count(&self) -> usize {
        self.exchange_codes.lock().unwrap().len()
    }

    pub fn preference_call_count(&self) -> usize {
        self.preference_calls.lock().unwrap().len()
    }
}

#[async_trait]
impl MercadoPagoApi for StubMercadoPago {
    async fn exchange_code(&self, code: &str) -> Result<TokenExchangeResponse, AppError> {
        self.exchange_codes.lock().unwrap().push(code.to_string());
        self.exchange_response
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| AppError::MercadoPago("HTTP 400: invalid_grant".to_string()))
    }

    async fn create_preference(
        &self,
        access_token: &str,
        preference: &PreferenceRequest,
    ) -> Result<PreferenceResponse, AppError> {
        self.preference_calls
            .lock()
            .unwrap()
            .push((access_token.to_string(), preference.clone()));
        self.preference_response
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| AppError::MercadoPago("HTTP 500: upstream failure".to_string()))
    }
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Create a test database connection against the emulator.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    use mercado_connect::config::FirestoreCredentials;
    FirestoreDb::new("test-project", &FirestoreCredentials::ApplicationDefault)
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a test app with an offline mock database.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app(mercado_pago: Arc<StubMercadoPago>) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        config: Config::test_default(),
        db: test_db_offline(),
        mercado_pago,
    });

    (create_router(state.clone()), state)
}

/// Create a test app backed by the Firestore emulator.
#[allow(dead_code)]
pub async fn create_emulator_test_app(
    mercado_pago: Arc<StubMercadoPago>,
) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        config: Config::test_default(),
        db: test_db().await,
        mercado_pago,
    });

    (create_router(state.clone()), state)
}

/// Raw emulator client for seeding and inspecting documents outside the
/// typed wrapper (same unauthenticated connection it uses).
#[allow(dead_code)]
pub async fn raw_firestore() -> firestore::FirestoreDb {
    let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
        Ok(gcloud_sdk::Token {
            token_type: "Bearer".to_string(),
            token: gcloud_sdk::SecretValue::new(
                "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                    .to_string()
                    .into(),
            ),
            expiry: chrono::Utc::now() + chrono::Duration::hours(1),
        })
    });

    firestore::FirestoreDb::with_options_token_source(
        firestore::FirestoreDbOptions::new("test-project".to_string()),
        gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
        gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
    )
    .await
    .expect("Failed to connect raw client to Firestore emulator")
}

/// Overwrite a seller document with the given value (full write, no mask).
#[allow(dead_code)]
pub async fn seed_seller<T: serde::Serialize + for<'de> serde::Deserialize<'de> + Send + Sync>(
    seller_id: &str,
    doc: &T,
) {
    let db = raw_firestore().await;
    let _: () = db
        .fluent()
        .update()
        .in_col("usuario")
        .document_id(seller_id)
        .object(doc)
        .execute()
        .await
        .expect("Failed to seed seller document");
}

/// Read a seller document back as a typed value.
#[allow(dead_code)]
pub async fn read_seller<T>(seller_id: &str) -> Option<T>
where
    T: for<'de> serde::Deserialize<'de> + Send,
{
    let db = raw_firestore().await;
    db.fluent()
        .select()
        .by_id_in("usuario")
        .obj()
        .one(seller_id)
        .await
        .expect("Failed to read seller document")
}
