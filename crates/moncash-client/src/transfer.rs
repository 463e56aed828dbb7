//! # MonCash Transfers
//!
//! Merchant-initiated fund transfers to a MonCash account, plus the
//! prefunded wallet they are paid from.

use crate::executor::{to_payload, RequestExecutor};
use moncash_core::{MonCashResult, Service};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, instrument};

pub const TRANSFER_PATH: &str = "/v1/Transfert";
pub const PREFUNDED_TRANSACTION_STATUS_PATH: &str = "/v1/PrefundedTransactionStatus";
pub const PREFUNDED_BALANCE_PATH: &str = "/v1/PrefundedBalance";

/// Payload of `/v1/Transfert`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferRequest {
    /// Receiving MonCash account (phone number)
    pub receiver: String,
    pub amount: f64,
    #[serde(rename = "desc")]
    pub description: String,
    /// Caller-supplied reference, echoed back by the gateway
    pub reference: String,
}

impl TransferRequest {
    pub fn new(
        receiver: impl Into<String>,
        amount: f64,
        description: impl Into<String>,
        reference: impl Into<String>,
    ) -> Self {
        Self {
            receiver: receiver.into(),
            amount,
            description: description.into(),
            reference: reference.into(),
        }
    }

    /// Same as [`TransferRequest::new`] with a random v4 UUID as reference
    pub fn with_generated_reference(
        receiver: impl Into<String>,
        amount: f64,
        description: impl Into<String>,
    ) -> Self {
        Self::new(
            receiver,
            amount,
            description,
            uuid::Uuid::new_v4().to_string(),
        )
    }
}

/// Transfers and prefunded wallet queries
#[derive(Clone)]
pub struct TransferService {
    executor: RequestExecutor,
}

impl TransferService {
    pub fn new(executor: RequestExecutor) -> Self {
        Self { executor }
    }

    /// Send `amount` to `receiver`.
    ///
    /// Rejections such as insufficient funds come back as
    /// `MonCashError::ClientRejected` with the gateway's body attached.
    pub async fn transfer(
        &self,
        receiver: &str,
        amount: f64,
        description: &str,
        reference: &str,
    ) -> MonCashResult<Value> {
        self.send(&TransferRequest::new(receiver, amount, description, reference))
            .await
    }

    #[instrument(skip(self), fields(reference = %request.reference))]
    pub async fn send(&self, request: &TransferRequest) -> MonCashResult<Value> {
        let body = self
            .executor
            .post(Service::Transfer, TRANSFER_PATH, to_payload(request)?)
            .await?;

        info!("MonCash transfer {} accepted", request.reference);

        Ok(body)
    }

    /// Status of a previous transfer
    #[instrument(skip(self))]
    pub async fn prefunded_transaction_status(&self, transfer_id: &str) -> MonCashResult<Value> {
        self.executor
            .post(
                Service::Transfer,
                PREFUNDED_TRANSACTION_STATUS_PATH,
                json!({ "transferId": transfer_id }),
            )
            .await
    }

    /// Balance of the prefunded wallet
    #[instrument(skip(self))]
    pub async fn prefunded_balance(&self) -> MonCashResult<Value> {
        self.executor
            .get(Service::Transfer, PREFUNDED_BALANCE_PATH)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_request_wire_keys() {
        let payload =
            to_payload(&TransferRequest::new("50937000000", 250.0, "payout", "REF-1")).unwrap();
        assert_eq!(
            payload,
            json!({
                "receiver": "50937000000",
                "amount": 250.0,
                "desc": "payout",
                "reference": "REF-1"
            })
        );
    }

    #[test]
    fn test_generated_reference_is_unique() {
        let a = TransferRequest::with_generated_reference("509", 1.0, "a");
        let b = TransferRequest::with_generated_reference("509", 1.0, "a");
        assert_ne!(a.reference, b.reference);
        assert!(uuid::Uuid::parse_str(&a.reference).is_ok());
    }
}
