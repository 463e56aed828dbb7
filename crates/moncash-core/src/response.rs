//! # Gateway Responses
//!
//! Gateway responses are passed through as decoded JSON. The few fields the
//! client itself interprets are read through [`ResponseFields`].

use serde_json::Value;

/// Accessors for the gateway fields the client acts on
pub trait ResponseFields {
    /// `access_token` from `/oauth/token`
    fn access_token(&self) -> Option<&str>;

    /// `expires_in` from `/oauth/token`, as a number or numeric string
    fn expires_in(&self) -> Option<i64>;

    /// The `payment_token` object from `/v1/CreatePayment`
    fn payment_token(&self) -> Option<&Value>;

    /// `payment_token.token`
    fn payment_token_value(&self) -> Option<&str> {
        self.payment_token()
            .and_then(|t| t.get("token"))
            .and_then(|v| v.as_str())
    }
}

impl ResponseFields for Value {
    fn access_token(&self) -> Option<&str> {
        self.get("access_token")
            .and_then(|v| v.as_str())
            .filter(|token| !token.is_empty())
    }

    fn expires_in(&self) -> Option<i64> {
        match self.get("expires_in")? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn payment_token(&self) -> Option<&Value> {
        self.get("payment_token").filter(|v| !v.is_null())
    }
}
