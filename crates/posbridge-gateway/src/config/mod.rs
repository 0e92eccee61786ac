//! Gateway config loader (strict parsing).
//!
//! Sources, lowest precedence first: built-in defaults, the YAML file named by
//! `POSBRIDGE_CONFIG`, then the `PORT` environment variable.

pub mod schema;

use std::fs;

use posbridge_core::error::{BridgeError, Result};

pub use schema::{BodySection, CorsSection, GatewayConfig, ServerSection, WsSection};

pub const CONFIG_PATH_ENV: &str = "POSBRIDGE_CONFIG";
pub const PORT_ENV: &str = "PORT";

pub fn load_from_env() -> Result<GatewayConfig> {
    let mut cfg = match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) if !path.trim().is_empty() => load_from_file(&path)?,
        _ => GatewayConfig::default(),
    };
    apply_port(&mut cfg, std::env::var(PORT_ENV).ok().as_deref())?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn load_from_file(path: &str) -> Result<GatewayConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| BridgeError::Config(format!("read {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<GatewayConfig> {
    let cfg: GatewayConfig = serde_yaml::from_str(s)
        .map_err(|e| BridgeError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Override the listen port from a raw `PORT` value. Unset or blank keeps the current port.
pub fn apply_port(cfg: &mut GatewayConfig, raw: Option<&str>) -> Result<()> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(());
    };
    cfg.server.port = raw
        .parse()
        .map_err(|_| BridgeError::Config(format!("PORT must be an integer in 0..=65535, got {raw:?}")))?;
    Ok(())
}
