//! # Request Executor
//!
//! The call pattern shared by every authenticated gateway operation:
//! fetch a bearer token, send the request, decode the JSON body and map
//! failures onto [`MonCashError`].

use crate::auth::TokenProvider;
use crate::transport::{HttpMethod, HttpRequest, RequestBody, Transport};
use moncash_core::{MonCashConfig, MonCashError, MonCashResult, Service};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, instrument};

/// Sends authenticated JSON requests to the MonCash API
#[derive(Clone)]
pub struct RequestExecutor {
    config: Arc<MonCashConfig>,
    transport: Arc<dyn Transport>,
    tokens: Arc<dyn TokenProvider>,
}

impl RequestExecutor {
    pub fn new(
        config: Arc<MonCashConfig>,
        transport: Arc<dyn Transport>,
        tokens: Arc<dyn TokenProvider>,
    ) -> Self {
        Self {
            config,
            transport,
            tokens,
        }
    }

    pub fn config(&self) -> &MonCashConfig {
        &self.config
    }

    /// POST a JSON payload to `path`
    pub async fn post(
        &self,
        service: Service,
        path: &str,
        payload: Value,
    ) -> MonCashResult<Value> {
        self.execute(
            service,
            HttpMethod::Post,
            path,
            Vec::new(),
            RequestBody::Json(payload),
        )
        .await
    }

    /// GET `path` with no body
    pub async fn get(&self, service: Service, path: &str) -> MonCashResult<Value> {
        self.execute(service, HttpMethod::Get, path, Vec::new(), RequestBody::Empty)
            .await
    }

    /// Perform one authenticated call.
    ///
    /// `Content-Type` is set from the body kind and `Accept` is always JSON.
    /// A caller header replaces any default of the same name (case-insensitive).
    #[instrument(skip(self, headers, body), fields(service = %service, method = method.as_str()))]
    pub async fn execute(
        &self,
        service: Service,
        method: HttpMethod,
        path: &str,
        headers: Vec<(String, String)>,
        body: RequestBody,
    ) -> MonCashResult<Value> {
        let token = self.tokens.bearer_token().await?;

        let mut request = HttpRequest::new(method, self.config.api_url(path))
            .header("Authorization", format!("Bearer {}", token))
            .header("Accept", "application/json");

        match body {
            RequestBody::Json(_) => {
                request = request.header("Content-Type", "application/json");
            }
            RequestBody::Form(_) => {
                request = request.header("Content-Type", "application/x-www-form-urlencoded");
            }
            RequestBody::Empty => {}
        }

        for (name, value) in headers {
            request
                .headers
                .retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
            request.headers.push((name, value));
        }
        let request = request.body(body);

        debug!("Sending MonCash request: {} {}", method.as_str(), path);

        let response = self.transport.send(request).await.map_err(|source| {
            error!("MonCash {} network error on {}: {}", service, path, source);
            MonCashError::Network {
                service,
                endpoint: path.to_string(),
                source,
            }
        })?;

        if !response.is_success() {
            error!(
                "MonCash API error: status={}, body={}",
                response.status, response.body
            );
            return Err(MonCashError::ClientRejected {
                service,
                endpoint: path.to_string(),
                status: response.status,
                body: response.body,
            });
        }

        serde_json::from_str(&response.body).map_err(|e| MonCashError::Decode {
            endpoint: path.to_string(),
            message: e.to_string(),
        })
    }
}

/// Encode a typed request into the JSON payload sent on the wire
pub(crate) fn to_payload<T: Serialize>(value: &T) -> MonCashResult<Value> {
    serde_json::to_value(value)
        .map_err(|e| MonCashError::Serialization(format!("Failed to encode request: {}", e)))
}
