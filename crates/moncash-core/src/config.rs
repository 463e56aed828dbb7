//! # MonCash Configuration
//!
//! Immutable configuration shared by every component of the client.
//! Values come from explicit construction, environment variables, or a TOML file.

use crate::error::MonCashError;
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Deserialize;
use std::{env, fmt, path::Path};

const SANDBOX_API_URL: &str = "https://sandbox.moncashbutton.digicelgroup.com/Api";
const LIVE_API_URL: &str = "https://moncashbutton.digicelgroup.com/Api";
const SANDBOX_GATEWAY_URL: &str =
    "https://sandbox.moncashbutton.digicelgroup.com/Moncash-middleware";
const LIVE_GATEWAY_URL: &str = "https://moncashbutton.digicelgroup.com/Moncash-middleware";

/// Default connect/read timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default ceiling on the cached token lifetime in seconds
pub const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 50;

/// Operating mode, selecting which pair of base URLs is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(from = "String")]
pub enum Mode {
    #[default]
    Sandbox,
    Live,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Sandbox => "sandbox",
            Mode::Live => "live",
        }
    }

    pub fn api_base_url(&self) -> &'static str {
        match self {
            Mode::Sandbox => SANDBOX_API_URL,
            Mode::Live => LIVE_API_URL,
        }
    }

    pub fn gateway_base_url(&self) -> &'static str {
        match self {
            Mode::Sandbox => SANDBOX_GATEWAY_URL,
            Mode::Live => LIVE_GATEWAY_URL,
        }
    }
}

/// Unrecognized values fall back to `Sandbox`.
impl From<&str> for Mode {
    fn from(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("live") {
            Mode::Live
        } else {
            Mode::Sandbox
        }
    }
}

impl From<String> for Mode {
    fn from(value: String) -> Self {
        Mode::from(value.as_str())
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// MonCash API configuration
#[derive(Clone)]
pub struct MonCashConfig {
    /// Sandbox or live
    pub mode: Mode,

    /// Client id issued by the Business Portal
    pub client_id: String,

    /// Client secret issued by the Business Portal
    pub client_secret: String,

    /// Connect/read timeout applied uniformly to every call
    pub timeout_secs: u64,

    /// Ceiling on how long an access token is cached
    pub token_lifetime_secs: u64,

    /// Overrides the mode-keyed API base URL (for testing/mocking)
    pub api_base_url: Option<String>,

    /// Overrides the mode-keyed gateway base URL
    pub gateway_base_url: Option<String>,
}

/// On-disk shape of the TOML configuration file
#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    mode: Mode,
    #[serde(default)]
    client_id: String,
    #[serde(default)]
    client_secret: String,
    #[serde(default = "default_timeout")]
    timeout_secs: u64,
    #[serde(default = "default_token_lifetime")]
    token_lifetime_secs: u64,
    #[serde(default)]
    api_base_url: Option<String>,
    #[serde(default)]
    gateway_base_url: Option<String>,
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_token_lifetime() -> u64 {
    DEFAULT_TOKEN_LIFETIME_SECS
}

impl MonCashConfig {
    /// Configuration template, ready to be written out and filled in
    pub const TEMPLATE: &'static str = include_str!("../config/moncash.toml");

    /// Create config with explicit credentials and default timeout/lifetime
    pub fn new(
        mode: impl Into<Mode>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            mode: mode.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            token_lifetime_secs: DEFAULT_TOKEN_LIFETIME_SECS,
            api_base_url: None,
            gateway_base_url: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `MONCASH_CLIENT_ID`
    /// - `MONCASH_SECRET`
    ///
    /// Optional: `MONCASH_MODE` (default sandbox), `MONCASH_TIMEOUT` (60),
    /// `MONCASH_TOKEN_LIFETIME` (50).
    pub fn from_env() -> Result<Self, MonCashError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let client_id = env::var("MONCASH_CLIENT_ID").map_err(|_| {
            MonCashError::Configuration("MONCASH_CLIENT_ID not set".to_string())
        })?;

        let client_secret = env::var("MONCASH_SECRET")
            .map_err(|_| MonCashError::Configuration("MONCASH_SECRET not set".to_string()))?;

        let mode = env::var("MONCASH_MODE").map(Mode::from).unwrap_or_default();

        let config = Self::new(mode, client_id, client_secret)
            .with_timeout_secs(env_u64("MONCASH_TIMEOUT", DEFAULT_TIMEOUT_SECS)?)
            .with_token_lifetime_secs(env_u64(
                "MONCASH_TOKEN_LIFETIME",
                DEFAULT_TOKEN_LIFETIME_SECS,
            )?);

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text (see [`MonCashConfig::TEMPLATE`])
    pub fn from_toml_str(content: &str) -> Result<Self, MonCashError> {
        let file: ConfigFile = toml::from_str(content)
            .map_err(|e| MonCashError::Configuration(format!("Invalid TOML config: {}", e)))?;

        let config = Self {
            mode: file.mode,
            client_id: file.client_id,
            client_secret: file.client_secret,
            timeout_secs: file.timeout_secs,
            token_lifetime_secs: file.token_lifetime_secs,
            api_base_url: file.api_base_url,
            gateway_base_url: file.gateway_base_url,
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, MonCashError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            MonCashError::Configuration(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    fn validate(&self) -> Result<(), MonCashError> {
        if self.client_id.trim().is_empty() {
            return Err(MonCashError::Configuration(
                "client_id must not be empty".to_string(),
            ));
        }
        if self.client_secret.trim().is_empty() {
            return Err(MonCashError::Configuration(
                "client_secret must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Active API base URL (override, else mode-keyed)
    pub fn api_base_url(&self) -> &str {
        self.api_base_url
            .as_deref()
            .unwrap_or_else(|| self.mode.api_base_url())
    }

    /// Active hosted-gateway base URL (override, else mode-keyed)
    pub fn gateway_base_url(&self) -> &str {
        self.gateway_base_url
            .as_deref()
            .unwrap_or_else(|| self.mode.gateway_base_url())
    }

    /// Absolute URL of an API endpoint path such as `/v1/CreatePayment`
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url().trim_end_matches('/'), path)
    }

    pub fn is_sandbox(&self) -> bool {
        self.mode == Mode::Sandbox
    }

    /// `Authorization` header value for the OAuth client-credentials call
    pub fn basic_auth_header(&self) -> String {
        let raw = format!("{}:{}", self.client_id, self.client_secret);
        format!("Basic {}", STANDARD.encode(raw))
    }

    /// Builder: set the transport timeout
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Builder: set the token lifetime ceiling
    pub fn with_token_lifetime_secs(mut self, secs: u64) -> Self {
        self.token_lifetime_secs = secs;
        self
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Builder: set custom gateway base URL
    pub fn with_gateway_base_url(mut self, url: impl Into<String>) -> Self {
        self.gateway_base_url = Some(url.into());
        self
    }
}

impl fmt::Debug for MonCashConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonCashConfig")
            .field("mode", &self.mode)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .field("timeout_secs", &self.timeout_secs)
            .field("token_lifetime_secs", &self.token_lifetime_secs)
            .field("api_base_url", &self.api_base_url())
            .field("gateway_base_url", &self.gateway_base_url())
            .finish()
    }
}

fn env_u64(key: &str, default: u64) -> Result<u64, MonCashError> {
    match env::var(key) {
        Ok(value) => value.trim().parse().map_err(|_| {
            MonCashError::Configuration(format!("{} must be a whole number of seconds", key))
        }),
        Err(_) => Ok(default),
    }
}
