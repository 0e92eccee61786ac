use serde::Deserialize;
use posbridge_core::error::{BridgeError, Result};

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub cors: CorsSection,

    #[serde(default)]
    pub body: BodySection,

    #[serde(default)]
    pub ws: WsSection,
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        self.server.validate()?;
        self.body.validate()?;
        self.ws.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(BridgeError::Config("server.host must not be empty".into()));
        }
        Ok(())
    }
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    5000
}

/// Origins allowed to read responses with credentials.
///
/// An origin is echoed back when it exactly matches `allowed_origins` or
/// contains any of `allowed_substrings`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorsSection {
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,

    #[serde(default = "default_allowed_substrings")]
    pub allowed_substrings: Vec<String>,
}

impl Default for CorsSection {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
            allowed_substrings: default_allowed_substrings(),
        }
    }
}

fn default_allowed_origins() -> Vec<String> {
    [
        "https://demo-edpos.vercel.app",
        "http://localhost:5000",
        "http://localhost:3000",
        "http://localhost:5001",
        "http://127.0.0.1:5000",
        "http://127.0.0.1:5001",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_allowed_substrings() -> Vec<String> {
    vec!["replit.dev".into(), "vercel.app".into()]
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BodySection {
    #[serde(default = "default_limit_bytes")]
    pub limit_bytes: usize,
}

impl Default for BodySection {
    fn default() -> Self {
        Self { limit_bytes: default_limit_bytes() }
    }
}

impl BodySection {
    pub fn validate(&self) -> Result<()> {
        if self.limit_bytes == 0 {
            return Err(BridgeError::Config("body.limit_bytes must be > 0".into()));
        }
        Ok(())
    }
}

fn default_limit_bytes() -> usize {
    100 * 1024
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WsSection {
    #[serde(default = "default_ws_path")]
    pub path: String,

    #[serde(default = "default_ping_interval_ms")]
    pub ping_interval_ms: u64,

    #[serde(default = "default_idle_timeout_ms")]
    pub idle_timeout_ms: u64,

    #[serde(default = "default_outbound_queue")]
    pub outbound_queue: usize,
}

impl Default for WsSection {
    fn default() -> Self {
        Self {
            path: default_ws_path(),
            ping_interval_ms: default_ping_interval_ms(),
            idle_timeout_ms: default_idle_timeout_ms(),
            outbound_queue: default_outbound_queue(),
        }
    }
}

impl WsSection {
    pub fn validate(&self) -> Result<()> {
        if !self.path.starts_with('/') {
            return Err(BridgeError::Config("ws.path must start with '/'".into()));
        }
        if !(5000..=120000).contains(&self.ping_interval_ms) {
            return Err(BridgeError::Config(
                "ws.ping_interval_ms must be between 5000 and 120000".into(),
            ));
        }
        if !(10000..=600000).contains(&self.idle_timeout_ms) {
            return Err(BridgeError::Config(
                "ws.idle_timeout_ms must be between 10000 and 600000".into(),
            ));
        }
        if self.idle_timeout_ms <= self.ping_interval_ms {
            return Err(BridgeError::Config(
                "ws.idle_timeout_ms must be greater than ping_interval_ms".into(),
            ));
        }
        if self.outbound_queue == 0 {
            return Err(BridgeError::Config("ws.outbound_queue must be > 0".into()));
        }
        Ok(())
    }
}

fn default_ws_path() -> String {
    "/ws".into()
}
fn default_ping_interval_ms() -> u64 {
    20000
}
fn default_idle_timeout_ms() -> u64 {
    60000
}
fn default_outbound_queue() -> usize {
    256
}
