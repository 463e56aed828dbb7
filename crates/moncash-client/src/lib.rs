//! # moncash-client
//!
//! Async client for the MonCash payment gateway REST API.
//!
//! This crate provides:
//! - **TokenManager** - OAuth2 client-credentials flow with a cached bearer token
//! - **RequestExecutor** - the authenticated request/decode/error pipeline
//! - **PaymentService** - create payments, verify by transaction or order id
//! - **TransferService** - merchant transfers, prefunded status and balance
//! - **CustomerService** - payer account status
//! - **MonCash** - one handle wiring all of the above together
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use moncash_client::MonCash;
//!
//! // Reads MONCASH_MODE, MONCASH_CLIENT_ID, MONCASH_SECRET
//! let moncash = MonCash::from_env()?;
//!
//! let payment = moncash.payment().create_payment("ORD-1", 100.0).await?;
//!
//! // Redirect the payer to payment.redirect_url
//! ```
//!
//! ## Error Handling
//!
//! ```rust,ignore
//! use moncash_client::MonCashError;
//!
//! match moncash.transfer().transfer("50937000000", 250.0, "payout", "REF-1").await {
//!     Ok(confirmation) => println!("sent: {}", confirmation),
//!     Err(MonCashError::ClientRejected { body, .. }) => eprintln!("refused: {}", body),
//!     Err(e) if e.is_retryable() => eprintln!("try again later: {}", e),
//!     Err(e) => return Err(e),
//! }
//! ```

pub mod auth;
pub mod client;
pub mod customer;
pub mod executor;
pub mod payment;
pub mod transfer;
pub mod transport;

// Re-exports
pub use auth::{StaticToken, TokenManager, TokenProvider};
pub use client::{MonCash, MonCashBuilder};
pub use customer::{CustomerService, CustomerStatusQuery};
pub use executor::RequestExecutor;
pub use moncash_core::{
    AuthError, MonCashConfig, MonCashError, MonCashResult, Mode, Service, TransportError,
};
pub use payment::{PaymentRequest, PaymentResult, PaymentService};
pub use transfer::{TransferRequest, TransferService};
pub use transport::{
    HttpMethod, HttpRequest, HttpResponse, RequestBody, ReqwestTransport, Transport,
};
