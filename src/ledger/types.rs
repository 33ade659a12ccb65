//! Wire types for the auth/ledger service.
//!
//! Payload shapes are the compatibility surface: the service's actual
//! field names — misspellings included — are preserved through serde
//! renames, and loosely shaped fields are kept permissive with
//! defaults rather than widened into an untyped blob.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A wallet user as the service reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: String,
    /// The palm code bound to the profile, if any. Wire name is the
    /// service's own spelling.
    #[serde(rename = "plam_code", default)]
    pub palm_code: Option<String>,
    /// Wallet balance, reported as a string.
    #[serde(default)]
    pub amount: String,
    /// Whether a palm code is bound and verified.
    #[serde(rename = "vertify_plam", default)]
    pub palm_verified: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Login request body.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub phone: String,
    pub password: String,
}

/// Registration request body.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub password: String,
    /// Optional initial palm code captured during onboarding.
    #[serde(rename = "plam_code", skip_serializing_if = "Option::is_none")]
    pub palm_code: Option<String>,
}

/// Successful authentication payload.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

/// A purchase or top-up transaction as the service reports it.
#[derive(Debug, Clone, Deserialize)]
pub struct Order {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub payment_status: String,
    #[serde(default)]
    pub transaction_id: String,
    /// Item map; shape varies by transaction kind.
    #[serde(default)]
    pub items: serde_json::Value,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Order creation request body.
#[derive(Debug, Clone, Serialize)]
pub struct CreateOrderRequest {
    pub amount: f64,
    pub description: String,
    /// Item name → quantity.
    pub items: BTreeMap<String, u32>,
}

/// Top-up request body.
#[derive(Debug, Clone, Serialize)]
pub struct TopupRequest {
    pub amount: f64,
}

/// External payment hand-off attached to a top-up.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentLink {
    #[serde(rename = "paymentUrl")]
    pub payment_url: String,
}

/// Transaction history page.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionPage {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub transactions: Vec<Order>,
}

/// The service's error body shape.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(rename = "currentBalance", default)]
    pub current_balance: Option<f64>,
    #[serde(rename = "requiredAmount", default)]
    pub required_amount: Option<f64>,
}

/// Order endpoint result, one variant per named failure reason.
#[derive(Debug, Clone)]
pub enum OrderResult {
    /// The order was created; the service may omit the order record.
    Created {
        /// The created order, when reported.
        order: Option<Order>,
    },
    /// Balance too low; both figures are relayed verbatim.
    InsufficientBalance {
        current_balance: f64,
        required_amount: f64,
    },
    /// The submitted palm code did not verify.
    InvalidPalmCode,
    /// No palm is bound to the paying profile.
    PalmNotVerified,
    /// Any other rejection, with the service's message.
    Rejected(String),
}

/// Top-up endpoint result.
#[derive(Debug, Clone)]
pub enum TopupResult {
    /// Accepted; the updated user and an optional payment hand-off.
    Accepted {
        user: User,
        payment: Option<PaymentLink>,
    },
    /// The palm-code credential did not verify.
    InvalidPalmCode,
    /// No palm is bound to the profile.
    PalmNotVerified,
    /// Any other rejection.
    Rejected(String),
}

/// Palm verification endpoint result.
#[derive(Debug, Clone)]
pub enum VerifyPalmResult {
    /// The palm code was bound to the profile.
    Verified { message: String, user: User },
    /// Rejected with the service's message.
    Rejected(String),
}

/// Authentication endpoint result.
#[derive(Debug, Clone)]
pub enum AuthResult {
    /// Credentials accepted.
    Authenticated(AuthResponse),
    /// Rejected with the service's message.
    Rejected(String),
}

/// Raw payloads parsed from 2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct OrderResponse {
    #[serde(default)]
    pub order: Option<Order>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TopupResponse {
    pub user: User,
    #[serde(default)]
    pub payment: Option<PaymentLink>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct VerifyPalmResponse {
    #[serde(default)]
    pub message: String,
    pub user: User,
}
