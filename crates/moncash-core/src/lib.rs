//! # moncash-core
//!
//! Core types for the MonCash gateway client.
//!
//! This crate provides:
//! - `MonCashConfig` and `Mode` for sandbox/live configuration
//! - `MonCashError` for typed error handling
//! - `CachedToken`, `TokenLifetimePolicy` and `Clock` for the token lifecycle
//! - `ResponseFields` for reading the few gateway fields the client interprets
//!
//! ## Example
//!
//! ```rust,ignore
//! use moncash_core::{MonCashConfig, Mode};
//!
//! let config = MonCashConfig::new(Mode::Sandbox, "client-id", "client-secret")
//!     .with_timeout_secs(30);
//!
//! assert!(config.api_base_url().starts_with("https://sandbox."));
//! ```

pub mod config;
pub mod error;
pub mod response;
pub mod token;

// Re-exports for convenience
pub use config::{MonCashConfig, Mode, DEFAULT_TIMEOUT_SECS, DEFAULT_TOKEN_LIFETIME_SECS};
pub use error::{
    AuthError, MonCashError, MonCashResult, Service, TransportError, TransportErrorKind,
};
pub use response::ResponseFields;
pub use token::{
    CachedToken, Clock, ManualClock, SystemClock, TokenLifetimePolicy, DEFAULT_EXPIRES_IN_SECS,
    TOKEN_BUFFER_SECS,
};
