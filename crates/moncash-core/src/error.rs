//! # MonCash Error Types
//!
//! Typed error handling for the MonCash gateway client.
//! Every gateway operation returns `Result<T, MonCashError>`.
//!
//! The taxonomy separates three situations callers handle differently:
//! - the gateway could not be reached (`Network`, `AuthError::Network`)
//! - the gateway rejected the request (`ClientRejected`, `AuthError::Rejected`)
//! - the gateway broke its contract (`Decode`, `InvalidResponse`, `AuthError::InvalidResponse`)

use std::fmt;
use thiserror::Error;

/// The domain module an API call belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    /// Payment creation and verification
    Payment,
    /// Merchant fund transfers and prefunded balance
    Transfer,
    /// Payer account status
    Customer,
}

impl Service {
    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Payment => "payment",
            Service::Transfer => "transfer",
            Service::Customer => "customer",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What went wrong below HTTP
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Connect or read timeout elapsed
    Timeout,
    /// DNS, TLS or TCP connection failure
    Connect,
    /// Anything else (reset, malformed response, body read failure)
    Other,
}

/// Transport-level failure: no HTTP response was obtained
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Timeout, message)
    }

    pub fn connect(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Connect, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Other, message)
    }

    pub fn is_timeout(&self) -> bool {
        self.kind == TransportErrorKind::Timeout
    }
}

/// Failures while acquiring a bearer token from `/oauth/token`
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The OAuth endpoint could not be reached
    #[error("MonCash auth network error: {0}")]
    Network(#[source] TransportError),

    /// The OAuth endpoint answered but without a usable access token
    #[error("Invalid response from MonCash auth: {0}")]
    InvalidResponse(String),

    /// The OAuth endpoint answered with a non-2xx status
    #[error("MonCash auth rejected (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Core error type for all gateway operations
#[derive(Debug, Error)]
pub enum MonCashError {
    /// Token acquisition failed
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The gateway answered with a non-2xx status
    #[error("MonCash {service} error on {endpoint} (HTTP {status}): {body}")]
    ClientRejected {
        service: Service,
        endpoint: String,
        status: u16,
        body: String,
    },

    /// The gateway could not be reached
    #[error("MonCash {service} network error on {endpoint}: {source}")]
    Network {
        service: Service,
        endpoint: String,
        #[source]
        source: TransportError,
    },

    /// A 2xx response whose body is not JSON
    #[error("Failed to decode MonCash response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    /// A 2xx JSON response missing a field the client has to interpret
    #[error("Invalid response from MonCash {service} ({endpoint}): {message}")]
    InvalidResponse {
        service: Service,
        endpoint: String,
        message: String,
    },

    /// Configuration errors (missing credentials, unreadable config file)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Request payload could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl MonCashError {
    /// Returns true if retrying the same call may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            MonCashError::Network { .. } => true,
            MonCashError::Auth(AuthError::Network(_)) => true,
            MonCashError::Auth(AuthError::Rejected { status, .. }) => {
                *status == 429 || *status >= 500
            }
            MonCashError::ClientRejected { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// HTTP status returned by the gateway, when there was one
    pub fn status_code(&self) -> Option<u16> {
        match self {
            MonCashError::ClientRejected { status, .. } => Some(*status),
            MonCashError::Auth(AuthError::Rejected { status, .. }) => Some(*status),
            _ => None,
        }
    }

    /// Raw response body attached to a rejection
    pub fn response_body(&self) -> Option<&str> {
        match self {
            MonCashError::ClientRejected { body, .. } => Some(body),
            MonCashError::Auth(AuthError::Rejected { body, .. }) => Some(body),
            _ => None,
        }
    }

    /// The domain module the failed call belonged to
    pub fn service(&self) -> Option<Service> {
        match self {
            MonCashError::ClientRejected { service, .. }
            | MonCashError::Network { service, .. }
            | MonCashError::InvalidResponse { service, .. } => Some(*service),
            _ => None,
        }
    }
}

/// Result type alias for gateway operations
pub type MonCashResult<T> = Result<T, MonCashError>;
