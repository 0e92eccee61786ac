//! Shared application state for the posbridge gateway.
//!
//! Built once by the bootstrap and cloned into every request. Holds only
//! immutable configuration and handles to long-lived collaborators.

use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::obs::{AccessLog, TracingAccessLog};
use crate::policy::OriginPolicy;
use crate::realtime::WsSubsystem;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: GatewayConfig,
    origins: OriginPolicy,
    ws: Arc<dyn WsSubsystem>,
    access_log: Arc<dyn AccessLog>,
}

impl AppState {
    pub fn new(cfg: GatewayConfig, ws: Arc<dyn WsSubsystem>) -> Self {
        Self::with_access_log(cfg, ws, Arc::new(TracingAccessLog))
    }

    pub fn with_access_log(
        cfg: GatewayConfig,
        ws: Arc<dyn WsSubsystem>,
        access_log: Arc<dyn AccessLog>,
    ) -> Self {
        let origins = OriginPolicy::from_config(&cfg.cors);
        Self {
            inner: Arc::new(AppStateInner {
                cfg,
                origins,
                ws,
                access_log,
            }),
        }
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.inner.cfg
    }

    pub fn origin_policy(&self) -> &OriginPolicy {
        &self.inner.origins
    }

    pub fn ws(&self) -> Arc<dyn WsSubsystem> {
        Arc::clone(&self.inner.ws)
    }

    pub fn access_log(&self) -> &dyn AccessLog {
        self.inner.access_log.as_ref()
    }
}
