//! HTTP client for the auth/ledger service.
//!
//! Transport is kept thin; each endpoint's response is interpreted by
//! a pure function mapping status + body into that endpoint's tagged
//! result type, so outcome mapping is testable without a server.
//! Nothing here retries: every retry is a fresh user action.

use super::types::{
    ApiErrorBody, AuthResponse, AuthResult, CreateOrderRequest, LoginRequest, OrderResponse,
    OrderResult, RegisterRequest, TopupRequest, TopupResponse, TopupResult, TransactionPage,
    VerifyPalmResponse, VerifyPalmResult,
};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Header carrying a palm code as an alternate credential.
pub const PALM_CODE_HEADER: &str = "x-palm-code";

/// Errors that can occur talking to the ledger service.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("network failure: {0}")]
    Network(#[from] reqwest::Error),
    #[error("unexpected response payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("service error ({status}): {message}")]
    Service { status: u16, message: String },
}

/// Ledger service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Service base URL, including the API prefix.
    pub base_url: String,
    /// Bearer token for authenticated calls.
    #[serde(default)]
    pub token: Option<String>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.ceit-iot-lab.site/api".to_string(),
            token: None,
        }
    }
}

/// Client for the auth/ledger service.
pub struct LedgerClient {
    http: reqwest::Client,
    config: LedgerConfig,
}

impl LedgerClient {
    /// Creates a client for the given configuration.
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Installs the bearer token used on authenticated calls.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.config.token = Some(token.into());
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self.http.post(self.url(path));
        if let Some(token) = &self.config.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self.http.get(self.url(path));
        if let Some(token) = &self.config.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// `POST /auth/login`
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResult, LedgerError> {
        let response = self.post("/auth/login").json(request).send().await?;
        let status = response.status();
        let body = response.text().await?;
        interpret_auth_response(status, &body)
    }

    /// `POST /auth/register`
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResult, LedgerError> {
        let response = self.post("/auth/register").json(request).send().await?;
        let status = response.status();
        let body = response.text().await?;
        interpret_auth_response(status, &body)
    }

    /// `POST /users/verify-palm` — binds or replaces the profile's
    /// palm code.
    pub async fn verify_palm(&self, palm_code: &str) -> Result<VerifyPalmResult, LedgerError> {
        let body = serde_json::json!({ "plam_code": palm_code });
        let response = self.post("/users/verify-palm").json(&body).send().await?;
        let status = response.status();
        let body = response.text().await?;
        interpret_verify_palm_response(status, &body)
    }

    /// `POST /users/topup` with the bearer token as credential.
    pub async fn topup(&self, request: &TopupRequest) -> Result<TopupResult, LedgerError> {
        let response = self.post("/users/topup").json(request).send().await?;
        let status = response.status();
        let body = response.text().await?;
        interpret_topup_response(status, &body)
    }

    /// `POST /users/topup` carrying a palm code as the alternate
    /// credential.
    pub async fn topup_with_palm(
        &self,
        request: &TopupRequest,
        palm_code: &str,
    ) -> Result<TopupResult, LedgerError> {
        let response = self
            .post("/users/topup")
            .header(PALM_CODE_HEADER, palm_code)
            .json(request)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        interpret_topup_response(status, &body)
    }

    /// `POST /orders` authorized by a palm code.
    pub async fn create_order_with_palm(
        &self,
        request: &CreateOrderRequest,
        palm_code: &str,
    ) -> Result<OrderResult, LedgerError> {
        let response = self
            .post("/orders")
            .header(PALM_CODE_HEADER, palm_code)
            .json(request)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        interpret_order_response(status, &body)
    }

    /// `GET /transactions/order-history`
    pub async fn order_history(&self) -> Result<TransactionPage, LedgerError> {
        self.history("/transactions/order-history").await
    }

    /// `GET /transactions/topup-history`
    pub async fn topup_history(&self) -> Result<TransactionPage, LedgerError> {
        self.history("/transactions/topup-history").await
    }

    async fn history(&self, path: &str) -> Result<TransactionPage, LedgerError> {
        let response = self.get(path).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(LedgerError::Service {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }
        Ok(serde_json::from_str(&body)?)
    }
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .unwrap_or_else(|| "request failed".to_string())
}

/// Maps an order response into its tagged result.
pub fn interpret_order_response(
    status: StatusCode,
    body: &str,
) -> Result<OrderResult, LedgerError> {
    if status.is_success() {
        let parsed: OrderResponse = serde_json::from_str(body)?;
        return Ok(OrderResult::Created {
            order: parsed.order,
        });
    }

    let error: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();
    Ok(match error.error.as_deref() {
        Some("Insufficient balance") => OrderResult::InsufficientBalance {
            current_balance: error.current_balance.unwrap_or(0.0),
            required_amount: error.required_amount.unwrap_or(0.0),
        },
        Some("Invalid palm code") => OrderResult::InvalidPalmCode,
        Some("Palm not verified") => OrderResult::PalmNotVerified,
        Some(message) => OrderResult::Rejected(message.to_string()),
        None => OrderResult::Rejected("Order failed. Please try again.".to_string()),
    })
}

/// Maps a top-up response into its tagged result.
pub fn interpret_topup_response(
    status: StatusCode,
    body: &str,
) -> Result<TopupResult, LedgerError> {
    if status.is_success() {
        let parsed: TopupResponse = serde_json::from_str(body)?;
        return Ok(TopupResult::Accepted {
            user: parsed.user,
            payment: parsed.payment,
        });
    }

    let error: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();
    Ok(match error.error.as_deref() {
        Some("Invalid palm code") => TopupResult::InvalidPalmCode,
        Some("Palm not verified") => TopupResult::PalmNotVerified,
        Some(message) => TopupResult::Rejected(message.to_string()),
        None => TopupResult::Rejected("Top-up failed".to_string()),
    })
}

/// Maps a palm-verification response into its tagged result.
pub fn interpret_verify_palm_response(
    status: StatusCode,
    body: &str,
) -> Result<VerifyPalmResult, LedgerError> {
    if status.is_success() {
        let parsed: VerifyPalmResponse = serde_json::from_str(body)?;
        return Ok(VerifyPalmResult::Verified {
            message: parsed.message,
            user: parsed.user,
        });
    }
    Ok(VerifyPalmResult::Rejected(
        serde_json::from_str::<ApiErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .unwrap_or_else(|| "Palm verification failed".to_string()),
    ))
}

/// Maps an authentication response into its tagged result.
pub fn interpret_auth_response(status: StatusCode, body: &str) -> Result<AuthResult, LedgerError> {
    if status.is_success() {
        let parsed: AuthResponse = serde_json::from_str(body)?;
        return Ok(AuthResult::Authenticated(parsed));
    }
    Ok(AuthResult::Rejected(
        serde_json::from_str::<ApiErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .unwrap_or_else(|| "Authentication failed".to_string()),
    ))
}
