//! # MonCash Authentication
//!
//! OAuth2 client-credentials flow against `/oauth/token`, with a single
//! cached bearer token reused until it expires.
//!
//! The check-and-refresh sequence runs under an async mutex: callers that
//! arrive while a refresh is in flight wait for it and reuse its token
//! instead of authenticating again.

use crate::transport::{HttpMethod, HttpRequest, RequestBody, Transport};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use moncash_core::{
    AuthError, CachedToken, Clock, MonCashConfig, ResponseFields, SystemClock,
    TokenLifetimePolicy,
};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

/// OAuth token endpoint, relative to the API base URL
pub const TOKEN_PATH: &str = "/oauth/token";

const TOKEN_SCOPE: &str = "read,write";
const GRANT_TYPE: &str = "client_credentials";

/// Anything able to hand out a bearer token for the next API call
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn bearer_token(&self) -> Result<String, AuthError>;
}

/// Owns the cached bearer token and refreshes it on demand
pub struct TokenManager {
    config: Arc<MonCashConfig>,
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
    policy: TokenLifetimePolicy,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenManager {
    /// Create a token manager using the wall clock
    pub fn new(config: Arc<MonCashConfig>, transport: Arc<dyn Transport>) -> Self {
        Self::with_clock(config, transport, Arc::new(SystemClock))
    }

    /// Create a token manager with an explicit clock
    pub fn with_clock(
        config: Arc<MonCashConfig>,
        transport: Arc<dyn Transport>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let policy = TokenLifetimePolicy::new(config.token_lifetime_secs);
        if policy.is_degenerate() {
            warn!(
                "token_lifetime_secs={} does not exceed the refresh buffer; every call will re-authenticate",
                config.token_lifetime_secs
            );
        }

        Self {
            config,
            transport,
            clock,
            policy,
            cached: Mutex::new(None),
        }
    }

    /// Return a valid bearer token, authenticating only if the cached one expired.
    #[instrument(skip(self))]
    pub async fn get_token(&self) -> Result<String, AuthError> {
        let mut cached = self.cached.lock().await;
        let now = self.clock.now();

        if let Some(token) = cached.as_ref().filter(|t| t.is_valid_at(now)) {
            debug!(
                "Reusing cached MonCash token ({}s left)",
                token.remaining_secs(now)
            );
            return Ok(token.value.clone());
        }

        let token = self.authenticate(now).await?;
        let value = token.value.clone();
        *cached = Some(token);

        Ok(value)
    }

    /// Drop the cached token so the next call re-authenticates
    pub async fn invalidate(&self) {
        self.cached.lock().await.take();
    }

    /// Snapshot of the cached token, if any
    pub async fn cached_token(&self) -> Option<CachedToken> {
        self.cached.lock().await.clone()
    }

    /// The lifetime policy applied to new tokens
    pub fn policy(&self) -> TokenLifetimePolicy {
        self.policy
    }

    async fn authenticate(&self, now: DateTime<Utc>) -> Result<CachedToken, AuthError> {
        let url = self.config.api_url(TOKEN_PATH);

        let request = HttpRequest::new(HttpMethod::Post, url)
            .header("Authorization", self.config.basic_auth_header())
            .header("Content-Type", "application/x-www-form-urlencoded")
            .header("Accept", "application/json")
            .body(RequestBody::Form(vec![
                ("scope".to_string(), TOKEN_SCOPE.to_string()),
                ("grant_type".to_string(), GRANT_TYPE.to_string()),
            ]));

        debug!("Requesting MonCash access token ({} mode)", self.config.mode);

        let response = self.transport.send(request).await.map_err(|e| {
            error!("MonCash auth network error: {}", e);
            AuthError::Network(e)
        })?;

        if !response.is_success() {
            error!(
                "MonCash auth error: status={}, body={}",
                response.status, response.body
            );
            return Err(AuthError::Rejected {
                status: response.status,
                body: response.body,
            });
        }

        let body: Value = serde_json::from_str(&response.body).map_err(|e| {
            AuthError::InvalidResponse(format!("body is not JSON: {}", e))
        })?;

        let access_token = body
            .access_token()
            .ok_or_else(|| AuthError::InvalidResponse("access token not found".to_string()))?;

        let token = self.policy.cache(access_token, body.expires_in(), now);

        info!(
            "Obtained MonCash access token, cached until {}",
            token.expires_at
        );

        Ok(token)
    }
}

#[async_trait]
impl TokenProvider for TokenManager {
    async fn bearer_token(&self) -> Result<String, AuthError> {
        self.get_token().await
    }
}

/// A fixed token, for callers that obtain tokens elsewhere
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

#[async_trait]
impl TokenProvider for StaticToken {
    async fn bearer_token(&self) -> Result<String, AuthError> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::HttpResponse;
    use chrono::Duration;
    use moncash_core::{ManualClock, Mode, TransportError};
    use std::sync::Mutex as StdMutex;

    /// Transport that replays canned results and records requests
    struct ScriptedTransport {
        responses: StdMutex<Vec<Result<HttpResponse, TransportError>>>,
        requests: StdMutex<Vec<HttpRequest>>,
    }

    impl ScriptedTransport {
        fn new(responses: Vec<Result<HttpResponse, TransportError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: StdMutex::new(responses.into_iter().rev().collect()),
                requests: StdMutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            self.requests.lock().unwrap().push(request);
            self.responses
                .lock()
                .unwrap()
                .pop()
                .expect("unexpected extra request")
        }
    }

    fn token_response(token: &str, expires_in: i64) -> Result<HttpResponse, TransportError> {
        Ok(HttpResponse::new(
            200,
            format!(r#"{{"access_token":"{}","expires_in":{}}}"#, token, expires_in),
        ))
    }

    fn manager(
        transport: Arc<ScriptedTransport>,
        clock: Arc<ManualClock>,
        margin: u64,
    ) -> TokenManager {
        let config = MonCashConfig::new(Mode::Sandbox, "alice", "secret123")
            .with_token_lifetime_secs(margin);
        TokenManager::with_clock(Arc::new(config), transport, clock)
    }

    #[tokio::test]
    async fn test_auth_request_shape() {
        let transport = ScriptedTransport::new(vec![token_response("tok-1", 59)]);
        let tokens = manager(transport.clone(), Arc::new(ManualClock::default()), 50);

        assert_eq!(tokens.get_token().await.unwrap(), "tok-1");

        let requests = transport.requests.lock().unwrap();
        let request = &requests[0];
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(
            request.url,
            "https://sandbox.moncashbutton.digicelgroup.com/Api/oauth/token"
        );
        assert_eq!(
            request.header_value("Authorization"),
            Some("Basic YWxpY2U6c2VjcmV0MTIz")
        );
        assert_eq!(
            request.body,
            RequestBody::Form(vec![
                ("scope".to_string(), "read,write".to_string()),
                ("grant_type".to_string(), "client_credentials".to_string()),
            ])
        );
    }

    #[tokio::test]
    async fn test_token_is_cached_within_lifetime() {
        let clock = Arc::new(ManualClock::default());
        let transport = ScriptedTransport::new(vec![token_response("tok-1", 3600)]);
        let tokens = manager(transport.clone(), clock.clone(), 50);

        for _ in 0..5 {
            assert_eq!(tokens.get_token().await.unwrap(), "tok-1");
            clock.advance(Duration::seconds(8));
        }

        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_expired_token_refreshes_once() {
        let clock = Arc::new(ManualClock::default());
        let transport = ScriptedTransport::new(vec![
            token_response("tok-1", 3600),
            token_response("tok-2", 3600),
        ]);
        let tokens = manager(transport.clone(), clock.clone(), 50);

        assert_eq!(tokens.get_token().await.unwrap(), "tok-1");

        // min(3600, 50) - 5 = 45 seconds
        clock.advance(Duration::seconds(45));
        assert_eq!(tokens.get_token().await.unwrap(), "tok-2");
        assert_eq!(tokens.get_token().await.unwrap(), "tok-2");

        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_missing_expires_in_uses_default() {
        let clock = Arc::new(ManualClock::default());
        let start = clock.now();
        let transport = ScriptedTransport::new(vec![Ok(HttpResponse::new(
            200,
            r#"{"access_token":"tok-1"}"#,
        ))]);
        let tokens = manager(transport, clock, 50);

        tokens.get_token().await.unwrap();
        let cached = tokens.cached_token().await.unwrap();
        assert_eq!(cached.expires_at, start + Duration::seconds(45));
    }

    #[tokio::test]
    async fn test_degenerate_margin_always_refreshes() {
        let clock = Arc::new(ManualClock::default());
        let transport = ScriptedTransport::new(vec![
            token_response("tok-1", 3600),
            token_response("tok-2", 3600),
        ]);
        let tokens = manager(transport.clone(), clock, 5);

        assert_eq!(tokens.get_token().await.unwrap(), "tok-1");
        assert_eq!(tokens.get_token().await.unwrap(), "tok-2");
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_missing_access_token_is_invalid_response() {
        let transport = ScriptedTransport::new(vec![Ok(HttpResponse::new(
            200,
            r#"{"error":"invalid_client"}"#,
        ))]);
        let tokens = manager(transport, Arc::new(ManualClock::default()), 50);

        let err = tokens.get_token().await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_transport_failure_is_network_error() {
        let transport =
            ScriptedTransport::new(vec![Err(TransportError::connect("connection refused"))]);
        let tokens = manager(transport, Arc::new(ManualClock::default()), 50);

        let err = tokens.get_token().await.unwrap_err();
        assert!(matches!(err, AuthError::Network(_)));
        assert!(tokens.cached_token().await.is_none());
    }

    #[tokio::test]
    async fn test_rejected_credentials() {
        let transport = ScriptedTransport::new(vec![Ok(HttpResponse::new(
            401,
            r#"{"error":"unauthorized"}"#,
        ))]);
        let tokens = manager(transport, Arc::new(ManualClock::default()), 50);

        match tokens.get_token().await.unwrap_err() {
            AuthError::Rejected { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("unauthorized"));
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalidate_forces_refresh() {
        let transport = ScriptedTransport::new(vec![
            token_response("tok-1", 3600),
            token_response("tok-2", 3600),
        ]);
        let tokens = manager(transport, Arc::new(ManualClock::default()), 50);

        assert_eq!(tokens.get_token().await.unwrap(), "tok-1");
        tokens.invalidate().await;
        assert_eq!(tokens.get_token().await.unwrap(), "tok-2");
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_refresh() {
        let transport = ScriptedTransport::new(vec![token_response("tok-1", 3600)]);
        let tokens = Arc::new(manager(
            transport.clone(),
            Arc::new(ManualClock::default()),
            50,
        ));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let tokens = tokens.clone();
                tokio::spawn(async move { tokens.get_token().await })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), "tok-1");
        }
        assert_eq!(transport.calls(), 1);
    }
}
