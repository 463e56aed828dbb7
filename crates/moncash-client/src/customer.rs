//! # MonCash Customers
//!
//! Whether a payer account exists and is active. The gateway's answer is
//! returned as decoded; callers read the fields they need.

use crate::executor::{to_payload, RequestExecutor};
use moncash_core::{MonCashResult, Service};
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

pub const CUSTOMER_STATUS_PATH: &str = "/v1/CustomerStatus";

/// Payload of `/v1/CustomerStatus`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerStatusQuery {
    /// Phone number or MonCash account
    pub account: String,
}

impl CustomerStatusQuery {
    pub fn new(account: impl Into<String>) -> Self {
        Self {
            account: account.into(),
        }
    }
}

/// Payer account lookups
#[derive(Clone)]
pub struct CustomerService {
    executor: RequestExecutor,
}

impl CustomerService {
    pub fn new(executor: RequestExecutor) -> Self {
        Self { executor }
    }

    /// Status of the account behind `phone_or_account`.
    ///
    /// An unknown account is an error (`ClientRejected` carrying the gateway
    /// body), not `false`.
    pub async fn customer_status(&self, phone_or_account: &str) -> MonCashResult<Value> {
        self.status(&CustomerStatusQuery::new(phone_or_account))
            .await
    }

    #[instrument(skip(self))]
    pub async fn status(&self, query: &CustomerStatusQuery) -> MonCashResult<Value> {
        self.executor
            .post(Service::Customer, CUSTOMER_STATUS_PATH, to_payload(query)?)
            .await
    }
}
