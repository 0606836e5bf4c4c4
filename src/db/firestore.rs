// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! One collection, one document per seller. The only write this service
//! performs is the merge of connection fields after a token exchange.

use crate::config::FirestoreCredentials;
use crate::db::collections;
use crate::error::AppError;
use crate::models::{SellerAccount, SellerConnection};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// The credential strategy is picked once at startup: inline key JSON,
    /// a key file, or application-default credentials. For local development
    /// with the emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(
        project_id: &str,
        credentials: &FirestoreCredentials,
    ) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let token_source = match credentials {
            FirestoreCredentials::InlineJson(json) => {
                gcloud_sdk::TokenSourceType::Json(json.clone())
            }
            FirestoreCredentials::KeyFile(path) => gcloud_sdk::TokenSourceType::File(path.clone()),
            FirestoreCredentials::ApplicationDefault => gcloud_sdk::TokenSourceType::Default,
        };

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            token_source,
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        // Use ExternalJwtFunctionSource to provide a dummy token without needing async-trait
        // or a custom TokenSource implementation struct.
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

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Seller Operations ───────────────────────────────────────

    /// Get a seller account by its external id.
    pub async fn get_seller(&self, seller_id: &str) -> Result<Option<SellerAccount>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::SELLERS)
            .obj()
            .one(seller_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Merge the connection fields into a seller document, creating it if
    /// it does not exist yet.
    ///
    /// The update mask limits the write to the fields of
    /// [`SellerConnection`]; anything else on the document is preserved.
    pub async fn connect_seller(
        &self,
        seller_id: &str,
        connection: &SellerConnection,
    ) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields(SellerConnection::FIELD_PATHS)
            .in_col(collections::SELLERS)
            .document_id(seller_id)
            .object(connection)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(seller_id, "Seller connection stored");
        Ok(())
    }
}
