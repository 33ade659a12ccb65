//! Auth/ledger service interface.
//!
//! The remote service owns balances, orders and profiles; this module
//! is the crate's only way to reach it. Responses are dynamic and
//! weakly typed on the wire, so each endpoint gets an explicit tagged
//! result type instead of a generic response.

mod client;
mod types;

pub use client::{
    interpret_auth_response, interpret_order_response, interpret_topup_response,
    interpret_verify_palm_response, LedgerClient, LedgerConfig, LedgerError, PALM_CODE_HEADER,
};
pub use types::{
    ApiErrorBody, AuthResponse, AuthResult, CreateOrderRequest, LoginRequest, Order, OrderResult,
    PaymentLink, RegisterRequest, TopupRequest, TopupResult, TransactionPage, User,
    VerifyPalmResult,
};
