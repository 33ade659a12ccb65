//! Checkout authorization flow.
//!
//! Consumes a palm code — scanned or typed — plus a pending cart or
//! top-up amount, validates locally, submits once, and interprets the
//! ledger's answer into a single terminal outcome. While a submission
//! is in flight resubmission is rejected; nothing retries on its own.

use super::cart::Cart;
use super::outcome::{AuthMethod, AuthOutcome, AuthorizationAttempt, Confirmation};
use crate::ledger::{
    CreateOrderRequest, LedgerClient, OrderResult, TopupRequest, TopupResult,
};
use thiserror::Error;

/// Inclusive top-up bound, in currency units.
pub const TOPUP_MIN: f64 = 1.0;
/// Inclusive top-up bound, in currency units.
pub const TOPUP_MAX: f64 = 1000.0;

/// Local validation failures raised before any network call.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Please enter your palm code")]
    MissingCode,
    #[error("Your cart is empty")]
    EmptyCart,
    #[error("Please enter a valid amount between {min} and {max}", min = TOPUP_MIN, max = TOPUP_MAX)]
    AmountOutOfRange {
        /// The rejected amount.
        amount: f64,
    },
    #[error("A submission is already in progress")]
    SubmissionInFlight,
}

/// Turns a palm code plus a pending amount into an authorized order
/// or top-up.
pub struct CheckoutAuthorizer {
    client: LedgerClient,
    in_flight: bool,
}

impl CheckoutAuthorizer {
    /// Creates an authorizer over a ledger client.
    pub fn new(client: LedgerClient) -> Self {
        Self {
            client,
            in_flight: false,
        }
    }

    /// True while a submission is awaiting its response.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Submits a purchase authorized by the given palm code.
    ///
    /// Rejects locally — before any network call — on an empty code,
    /// an empty cart, or a submission already in flight. The returned
    /// attempt always carries a terminal outcome.
    pub async fn purchase(
        &mut self,
        method: AuthMethod,
        code: &str,
        cart: &Cart,
    ) -> Result<AuthorizationAttempt, CheckoutError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(CheckoutError::MissingCode);
        }
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        if self.in_flight {
            return Err(CheckoutError::SubmissionInFlight);
        }

        let amount = cart.total_amount();
        let request = CreateOrderRequest {
            amount,
            description: cart.description(),
            items: cart.item_quantities(),
        };

        self.in_flight = true;
        let result = self.client.create_order_with_palm(&request, code).await;
        self.in_flight = false;

        let outcome = match result {
            Ok(OrderResult::Created { order }) => AuthOutcome::Approved(Confirmation {
                order_id: order.map(|o| o.id),
                amount,
                item_count: cart.distinct_items(),
            }),
            Ok(OrderResult::InsufficientBalance {
                current_balance,
                required_amount,
            }) => AuthOutcome::InsufficientBalance {
                current_balance,
                required_amount,
            },
            Ok(OrderResult::InvalidPalmCode) => AuthOutcome::InvalidCode,
            Ok(OrderResult::PalmNotVerified) => AuthOutcome::NotVerified,
            Ok(OrderResult::Rejected(message)) => AuthOutcome::Failed(message),
            Err(error) => {
                tracing::warn!(%error, "order submission failed");
                AuthOutcome::Failed("Order failed. Please try again.".to_string())
            }
        };

        tracing::info!(?method, amount, outcome = %outcome, "purchase attempt resolved");

        Ok(AuthorizationAttempt {
            method,
            code: code.to_string(),
            amount,
            outcome,
        })
    }

    /// Submits a top-up authorized by the given palm code.
    ///
    /// The amount must lie within the inclusive [`TOPUP_MIN`],
    /// [`TOPUP_MAX`] bound; out-of-range amounts are rejected locally
    /// before any network call.
    pub async fn top_up(
        &mut self,
        method: AuthMethod,
        code: &str,
        amount: f64,
    ) -> Result<AuthorizationAttempt, CheckoutError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(CheckoutError::MissingCode);
        }
        if !(TOPUP_MIN..=TOPUP_MAX).contains(&amount) {
            return Err(CheckoutError::AmountOutOfRange { amount });
        }
        if self.in_flight {
            return Err(CheckoutError::SubmissionInFlight);
        }

        let request = TopupRequest { amount };

        self.in_flight = true;
        let result = self.client.topup_with_palm(&request, code).await;
        self.in_flight = false;

        let outcome = match result {
            Ok(TopupResult::Accepted { .. }) => AuthOutcome::Approved(Confirmation {
                order_id: None,
                amount,
                item_count: 0,
            }),
            Ok(TopupResult::InvalidPalmCode) => AuthOutcome::InvalidCode,
            Ok(TopupResult::PalmNotVerified) => AuthOutcome::NotVerified,
            Ok(TopupResult::Rejected(message)) => AuthOutcome::Failed(message),
            Err(error) => {
                tracing::warn!(%error, "top-up submission failed");
                AuthOutcome::Failed("Top-up failed".to_string())
            }
        };

        tracing::info!(?method, amount, outcome = %outcome, "top-up attempt resolved");

        Ok(AuthorizationAttempt {
            method,
            code: code.to_string(),
            amount,
            outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{LedgerClient, LedgerConfig};

    fn authorizer() -> CheckoutAuthorizer {
        // Unroutable base URL: any request that does reach the network
        // layer fails fast, proving local validation ran first.
        CheckoutAuthorizer::new(LedgerClient::new(LedgerConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            token: None,
        }))
    }

    fn cart() -> Cart {
        let mut cart = Cart::new();
        cart.add("coffee", 3.5, 2);
        cart
    }

    #[tokio::test]
    async fn test_purchase_rejects_missing_code() {
        let mut authorizer = authorizer();
        let result = authorizer.purchase(AuthMethod::Manual, "  ", &cart()).await;
        assert!(matches!(result, Err(CheckoutError::MissingCode)));
    }

    #[tokio::test]
    async fn test_purchase_rejects_empty_cart() {
        let mut authorizer = authorizer();
        let result = authorizer
            .purchase(AuthMethod::Manual, "PALM_1_abc", &Cart::new())
            .await;
        assert!(matches!(result, Err(CheckoutError::EmptyCart)));
    }

    #[tokio::test]
    async fn test_topup_bound_is_inclusive() {
        let mut authorizer = authorizer();

        for amount in [0.0, 0.99, 1000.01, 1500.0, -5.0, f64::NAN] {
            let result = authorizer
                .top_up(AuthMethod::Manual, "PALM_1_abc", amount)
                .await;
            assert!(
                matches!(result, Err(CheckoutError::AmountOutOfRange { .. })),
                "amount {amount} must be rejected locally"
            );
        }
    }

    #[tokio::test]
    async fn test_network_failure_collapses_to_generic_outcome() {
        let mut authorizer = authorizer();
        let attempt = authorizer
            .purchase(AuthMethod::Scan, "PALM_1_abc", &cart())
            .await
            .unwrap();

        assert_eq!(
            attempt.outcome,
            AuthOutcome::Failed("Order failed. Please try again.".to_string())
        );
        assert_eq!(attempt.code, "PALM_1_abc");
        assert!((attempt.amount - 7.0).abs() < 1e-9);
        assert!(!authorizer.is_in_flight());
    }
}
