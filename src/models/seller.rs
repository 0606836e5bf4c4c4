//! Seller account model for storage and API.

use serde::{Deserialize, Serialize};

/// Seller account document as read from Firestore.
///
/// Documents are created by the OAuth callback but may also carry fields
/// written by other applications sharing the collection; everything this
/// service does not own is optional here and left untouched on write.
/// Wire names match the existing Firestore documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SellerAccount {
    /// Set once a token exchange has completed for this seller
    #[serde(default)]
    pub mp_connected: bool,
    /// Access token used to act on the seller's behalf.
    /// A record without one cannot receive payments.
    #[serde(default)]
    pub mp_access_token: Option<String>,
    /// Mercado Pago user id of the seller
    #[serde(default)]
    pub mp_user_id: Option<String>,
    /// Seller's public key
    #[serde(default)]
    pub mp_public_key: Option<String>,
    /// "Payment method registered" flag
    #[serde(default, rename = "metodoPagoRegistrado")]
    pub payment_method_registered: bool,
    /// Last connect timestamp (RFC 3339)
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// The exact field set written by a successful OAuth callback.
///
/// Kept separate from [`SellerAccount`] so the merge write can name every
/// field it touches and nothing else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SellerConnection {
    pub mp_connected: bool,
    pub mp_access_token: String,
    pub mp_user_id: String,
    pub mp_public_key: String,
    #[serde(rename = "metodoPagoRegistrado")]
    pub payment_method_registered: bool,
    pub updated_at: String,
}

impl SellerConnection {
    /// Field paths for the Firestore update mask, matching the serialized
    /// names above. Must stay in sync with the struct.
    pub const FIELD_PATHS: [&'static str; 6] = [
        "mp_connected",
        "mp_access_token",
        "mp_user_id",
        "mp_public_key",
        "metodoPagoRegistrado",
        "updated_at",
    ];
}
