//! # MonCash Payments
//!
//! Create a payment and hand the payer off to the hosted gateway page,
//! then verify it by transaction id or by order id.

use crate::executor::{to_payload, RequestExecutor};
use moncash_core::{MonCashError, MonCashResult, ResponseFields, Service};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument};

pub const CREATE_PAYMENT_PATH: &str = "/v1/CreatePayment";
pub const RETRIEVE_TRANSACTION_PAYMENT_PATH: &str = "/v1/RetrieveTransactionPayment";
pub const RETRIEVE_ORDER_PAYMENT_PATH: &str = "/v1/RetrieveOrderPayment";

/// Path on the gateway host that accepts a payment token
pub const REDIRECT_PATH: &str = "/Payment/Redirect";

/// Payload of `/v1/CreatePayment`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentRequest {
    #[serde(rename = "orderId")]
    pub order_id: String,
    pub amount: f64,
}

impl PaymentRequest {
    pub fn new(order_id: impl Into<String>, amount: f64) -> Self {
        Self {
            order_id: order_id.into(),
            amount,
        }
    }
}

/// A created payment, ready for redirect
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentResult {
    /// The `payment_token` object as returned by the gateway
    pub payment_token: Value,
    /// `payment_token.token`
    pub token: String,
    /// Hosted payment page for the payer
    pub redirect_url: String,
    /// Full decoded response
    pub raw: Value,
}

/// Payment creation and verification
#[derive(Clone)]
pub struct PaymentService {
    executor: RequestExecutor,
}

impl PaymentService {
    pub fn new(executor: RequestExecutor) -> Self {
        Self { executor }
    }

    /// Create a payment for `order_id` and build its redirect URL
    pub async fn create_payment(
        &self,
        order_id: impl Into<String>,
        amount: f64,
    ) -> MonCashResult<PaymentResult> {
        self.create(&PaymentRequest::new(order_id, amount)).await
    }

    #[instrument(skip(self), fields(order_id = %request.order_id))]
    pub async fn create(&self, request: &PaymentRequest) -> MonCashResult<PaymentResult> {
        let body = self
            .executor
            .post(Service::Payment, CREATE_PAYMENT_PATH, to_payload(request)?)
            .await?;

        let payment_token = body
            .payment_token()
            .cloned()
            .ok_or_else(|| invalid_response("payment_token missing"))?;

        let token = body
            .payment_token_value()
            .map(String::from)
            .ok_or_else(|| invalid_response("payment_token.token missing"))?;

        let redirect_url = self.redirect_url(&token);

        info!("Created MonCash payment for order {}", request.order_id);

        Ok(PaymentResult {
            payment_token,
            token,
            redirect_url,
            raw: body,
        })
    }

    /// Hosted payment page for a payment token
    pub fn redirect_url(&self, token: &str) -> String {
        format!(
            "{}{}?token={}",
            self.executor.config().gateway_base_url().trim_end_matches('/'),
            REDIRECT_PATH,
            token
        )
    }

    /// Look up a payment by the gateway's transaction id
    pub async fn verify_by_transaction_id(&self, transaction_id: &str) -> MonCashResult<Value> {
        self.verify(
            RETRIEVE_TRANSACTION_PAYMENT_PATH,
            "transactionId",
            transaction_id,
        )
        .await
    }

    /// Look up a payment by the merchant's order id
    pub async fn verify_by_order_id(&self, order_id: &str) -> MonCashResult<Value> {
        self.verify(RETRIEVE_ORDER_PAYMENT_PATH, "orderId", order_id)
            .await
    }

    /// The response (status, payer, cost...) is returned as decoded, without schema checks.
    #[instrument(skip(self))]
    async fn verify(&self, path: &str, key: &str, id: &str) -> MonCashResult<Value> {
        let mut payload = serde_json::Map::new();
        payload.insert(key.to_string(), Value::String(id.to_string()));

        self.executor
            .post(Service::Payment, path, Value::Object(payload))
            .await
    }
}

fn invalid_response(message: &str) -> MonCashError {
    MonCashError::InvalidResponse {
        service: Service::Payment,
        endpoint: CREATE_PAYMENT_PATH.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payment_request_wire_keys() {
        let payload = to_payload(&PaymentRequest::new("ORD-1", 100.0)).unwrap();
        assert_eq!(payload, json!({"orderId": "ORD-1", "amount": 100.0}));
    }
}
