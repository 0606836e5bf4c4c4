//! Application configuration loaded from environment variables.
//!
//! Everything is read once at startup into an explicit `Config` value that
//! lives in the shared state; handlers never touch the environment.

use std::env;
use std::path::PathBuf;

/// How to authenticate the Firestore client.
///
/// One strategy is selected at startup: an inline service-account JSON blob,
/// a key file on disk, or application-default credentials.
#[derive(Debug, Clone)]
pub enum FirestoreCredentials {
    /// Service-account key JSON passed directly in the environment.
    InlineJson(String),
    /// Path to a service-account key file.
    KeyFile(PathBuf),
    /// Application-default credentials (metadata server, gcloud login, ...).
    ApplicationDefault,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// GCP project ID owning the Firestore database
    pub gcp_project_id: String,
    /// Firestore credential-loading strategy
    pub firestore_credentials: FirestoreCredentials,

    /// Mercado Pago OAuth client ID (public)
    pub mp_client_id: String,
    /// Mercado Pago OAuth client secret
    pub mp_client_secret: String,
    /// Redirect URI registered with Mercado Pago for the OAuth flow
    pub mp_redirect_uri: String,

    /// Currency applied to every checkout line item
    pub currency_id: String,
    /// Where Mercado Pago sends the buyer after an approved payment
    pub checkout_success_url: String,
    /// ... after a failed payment
    pub checkout_failure_url: String,
    /// ... while the payment is pending
    pub checkout_pending_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let firestore_credentials = if let Ok(json) = env::var("FIREBASE_KEY_JSON") {
            FirestoreCredentials::InlineJson(json)
        } else if let Ok(path) = env::var("FIREBASE_KEY_FILE") {
            FirestoreCredentials::KeyFile(PathBuf::from(path))
        } else {
            FirestoreCredentials::ApplicationDefault
        };

        let gcp_project_id = match env::var("GCP_PROJECT_ID") {
            Ok(id) => id,
            Err(_) => project_id_from_credentials(&firestore_credentials)
                .ok_or(ConfigError::Missing("GCP_PROJECT_ID"))?,
        };

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            gcp_project_id,
            firestore_credentials,

            mp_client_id: env::var("MP_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("MP_CLIENT_ID"))?,
            mp_client_secret: env::var("MP_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("MP_CLIENT_SECRET"))?,
            mp_redirect_uri: env::var("MP_REDIRECT_URI")
                .map_err(|_| ConfigError::Missing("MP_REDIRECT_URI"))?,

            currency_id: env::var("CURRENCY_ID").unwrap_or_else(|_| "PEN".to_string()),
            checkout_success_url: env::var("CHECKOUT_SUCCESS_URL")
                .unwrap_or_else(|_| "https://tusitio.com/success".to_string()),
            checkout_failure_url: env::var("CHECKOUT_FAILURE_URL")
                .unwrap_or_else(|_| "https://tusitio.com/failure".to_string()),
            checkout_pending_url: env::var("CHECKOUT_PENDING_URL")
                .unwrap_or_else(|_| "https://tusitio.com/pending".to_string()),
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            port: 3000,
            gcp_project_id: "test-project".to_string(),
            firestore_credentials: FirestoreCredentials::ApplicationDefault,
            mp_client_id: "test_client_id".to_string(),
            mp_client_secret: "test_secret".to_string(),
            mp_redirect_uri: "http://localhost:3000/oauth_callback".to_string(),
            currency_id: "PEN".to_string(),
            checkout_success_url: "https://tusitio.com/success".to_string(),
            checkout_failure_url: "https://tusitio.com/failure".to_string(),
            checkout_pending_url: "https://tusitio.com/pending".to_string(),
        }
    }
}

/// Service-account key files carry the project id; use it when
/// GCP_PROJECT_ID is not set explicitly.
fn project_id_from_credentials(credentials: &FirestoreCredentials) -> Option<String> {
    let json = match credentials {
        FirestoreCredentials::InlineJson(json) => json.clone(),
        FirestoreCredentials::KeyFile(path) => std::fs::read_to_string(path).ok()?,
        FirestoreCredentials::ApplicationDefault => return None,
    };

    let key: serde_json::Value = serde_json::from_str(&json).ok()?;
    key.get("project_id")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_id_from_inline_json() {
        let creds = FirestoreCredentials::InlineJson(
            r#"{"type":"service_account","project_id":"my-project"}"#.to_string(),
        );
        assert_eq!(
            project_id_from_credentials(&creds),
            Some("my-project".to_string())
        );
    }

    #[test]
    fn test_project_id_absent_for_application_default() {
        assert_eq!(
            project_id_from_credentials(&FirestoreCredentials::ApplicationDefault),
            None
        );
    }

    #[test]
    fn test_config_from_env() {
        env::set_var("MP_CLIENT_ID", "test_id");
        env::set_var("MP_CLIENT_SECRET", "test_secret");
        env::set_var("MP_REDIRECT_URI", "https://example.com/oauth_callback");
        env::set_var("GCP_PROJECT_ID", "test-project");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.mp_client_id, "test_id");
        assert_eq!(config.mp_client_secret, "test_secret");
        assert_eq!(config.port, 3000);
        assert_eq!(config.currency_id, "PEN");
    }
}
