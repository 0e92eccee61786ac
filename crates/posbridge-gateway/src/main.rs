//! posbridge gateway binary.
//!
//! Loads `.env` if present, reads config from the environment, runs the startup sequence and serves
//! until Ctrl-C / SIGTERM. Exits with status 1 if startup fails.

use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use posbridge_core::error::Result;
use posbridge_gateway::{bootstrap::Bootstrap, config, dispatch, realtime::BroadcastHub};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "posbridge-gateway stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let cfg = config::load_from_env()?;
    let hub = Arc::new(BroadcastHub::new(cfg.ws.clone()));

    tracing::info!(port = cfg.server.port, ws_path = %cfg.ws.path, "posbridge-gateway starting");
    let server = Bootstrap::new(cfg, Arc::new(dispatch::no_business_routes), hub)
        .prepare()
        .await?;

    server.bind().await?.serve().await
}
