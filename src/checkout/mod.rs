//! Checkout authorization.
//!
//! This module takes a palm code — scanned or typed — plus a pending
//! cart or top-up amount, and drives one submission to the ledger
//! service into exactly one terminal outcome.

mod authorizer;
mod cart;
mod outcome;

pub use authorizer::{CheckoutAuthorizer, CheckoutError, TOPUP_MAX, TOPUP_MIN};
pub use cart::{Cart, CartItem};
pub use outcome::{AuthMethod, AuthOutcome, AuthorizationAttempt, Confirmation};
