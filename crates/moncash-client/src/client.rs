//! # MonCash Client
//!
//! Wires configuration, transport, token manager and the three services
//! into one long-lived handle. Build it once and share it; every service
//! reuses the same cached token.

use crate::auth::TokenManager;
use crate::customer::CustomerService;
use crate::executor::RequestExecutor;
use crate::payment::PaymentService;
use crate::transfer::TransferService;
use crate::transport::{ReqwestTransport, Transport};
use moncash_core::{Clock, MonCashConfig, MonCashResult, SystemClock};
use std::sync::Arc;
use tracing::info;

/// Entry point to the MonCash API
#[derive(Clone)]
pub struct MonCash {
    config: Arc<MonCashConfig>,
    auth: Arc<TokenManager>,
    payment: PaymentService,
    transfer: TransferService,
    customer: CustomerService,
}

impl MonCash {
    /// Create a client with the reqwest transport and the wall clock
    pub fn new(config: MonCashConfig) -> MonCashResult<Self> {
        Self::builder(config).build()
    }

    /// Create from environment variables
    pub fn from_env() -> MonCashResult<Self> {
        let config = MonCashConfig::from_env()?;
        Self::new(config)
    }

    pub fn builder(config: MonCashConfig) -> MonCashBuilder {
        MonCashBuilder {
            config,
            transport: None,
            clock: None,
        }
    }

    pub fn config(&self) -> &MonCashConfig {
        &self.config
    }

    /// Payment creation and verification
    pub fn payment(&self) -> &PaymentService {
        &self.payment
    }

    /// Transfers and prefunded wallet
    pub fn transfer(&self) -> &TransferService {
        &self.transfer
    }

    /// Alias of [`MonCash::transfer`], after the gateway's "business" API group
    pub fn business(&self) -> &TransferService {
        &self.transfer
    }

    /// Payer account status
    pub fn customer(&self) -> &CustomerService {
        &self.customer
    }

    /// Direct access to the token manager
    pub fn auth(&self) -> &TokenManager {
        &self.auth
    }
}

/// Builder for [`MonCash`], for swapping the transport or clock
pub struct MonCashBuilder {
    config: MonCashConfig,
    transport: Option<Arc<dyn Transport>>,
    clock: Option<Arc<dyn Clock>>,
}

impl MonCashBuilder {
    /// Builder: use a custom transport
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Builder: use a custom clock for token expiry
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> MonCashResult<MonCash> {
        let config = Arc::new(self.config);

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(config.timeout_secs)?) as Arc<dyn Transport>,
        };
        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(SystemClock) as Arc<dyn Clock>);

        let auth = Arc::new(TokenManager::with_clock(
            config.clone(),
            transport.clone(),
            clock,
        ));
        let executor = RequestExecutor::new(config.clone(), transport, auth.clone());

        info!(
            "MonCash client ready: mode={}, api={}",
            config.mode,
            config.api_base_url()
        );

        Ok(MonCash {
            config,
            auth,
            payment: PaymentService::new(executor.clone()),
            transfer: TransferService::new(executor.clone()),
            customer: CustomerService::new(executor),
        })
    }
}
