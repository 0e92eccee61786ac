//! Startup sequence.
//!
//! 1. register business routes (await; failure aborts)
//! 2. install the fallback error responder
//! 3. register the event bridge endpoints
//! 4. initialize the WebSocket subsystem (await; failure is logged and ignored)
//! 5. bind and listen
//! 6. observe listen errors (address-in-use gets its own diagnostic)

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use axum::{routing::MethodRouter, Router};
use tokio::net::TcpListener;

use posbridge_core::error::{BridgeError, Result};

use crate::app_state::AppState;
use crate::config::GatewayConfig;
use crate::dispatch::RouteRegistrar;
use crate::obs::{AccessLog, TracingAccessLog};
use crate::realtime::WsSubsystem;
use crate::{router, services};

pub struct Bootstrap {
    cfg: GatewayConfig,
    registrar: Arc<dyn RouteRegistrar>,
    ws: Arc<dyn WsSubsystem>,
    access_log: Arc<dyn AccessLog>,
}

impl Bootstrap {
    pub fn new(
        cfg: GatewayConfig,
        registrar: Arc<dyn RouteRegistrar>,
        ws: Arc<dyn WsSubsystem>,
    ) -> Self {
        Self {
            cfg,
            registrar,
            ws,
            access_log: Arc::new(TracingAccessLog),
        }
    }

    pub fn with_access_log(mut self, access_log: Arc<dyn AccessLog>) -> Self {
        self.access_log = access_log;
        self
    }

    /// Steps 1-4. On success the server is ready to bind.
    pub async fn prepare(self) -> Result<ServerHandle> {
        let state = AppState::with_access_log(self.cfg, Arc::clone(&self.ws), self.access_log);

        let app = self
            .registrar
            .register(router::base_routes())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "route registration failed");
                e
            })?;

        let mut server = ServerHandle::new(app, state);
        server.install_error_responder();
        services::bridge::mount(&mut server);

        match self.ws.initialize(&mut server).await {
            Ok(()) => tracing::info!("WebSocket server initialized"),
            Err(e) => tracing::warn!(error = %e, "failed to start WebSocket; serving HTTP without live updates"),
        }

        Ok(server)
    }
}

/// Application assembled but not yet listening.
pub struct ServerHandle {
    router: Router<AppState>,
    state: AppState,
    catch_panics: bool,
}

impl ServerHandle {
    pub fn new(router: Router<AppState>, state: AppState) -> Self {
        Self {
            router,
            state,
            catch_panics: false,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn install_error_responder(&mut self) {
        self.catch_panics = true;
    }

    /// Add a route; a conflict with an existing route is reported instead of panicking.
    ///
    /// axum only signals an overlapping method route by panicking, so the
    /// conflict is caught here and the previous router is restored. The
    /// process panic hook still prints axum's "Overlapping method route"
    /// message to stderr when this happens; that output is expected.
    pub fn try_route(&mut self, path: &str, method_router: MethodRouter<AppState>) -> Result<()> {
        let current = std::mem::take(&mut self.router);
        let backup = current.clone();
        match catch_unwind(AssertUnwindSafe(move || current.route(path, method_router))) {
            Ok(r) => {
                self.router = r;
                Ok(())
            }
            Err(_) => {
                self.router = backup;
                Err(BridgeError::Internal(format!(
                    "route {path} conflicts with an existing route"
                )))
            }
        }
    }

    /// Final router with the request pipeline applied.
    pub fn into_router(self) -> Router {
        router::pipeline(self.router, self.state, self.catch_panics)
    }

    /// Steps 5-6.
    pub async fn bind(self) -> Result<BoundServer> {
        let host = self.state.cfg().server.host.clone();
        let port = self.state.cfg().server.port;

        let listener = match TcpListener::bind((host.as_str(), port)).await {
            Ok(l) => l,
            Err(e) => {
                report_listen_error(port, &e);
                return Err(BridgeError::Internal(format!("bind {host}:{port} failed: {e}")));
            }
        };
        let addr = listener
            .local_addr()
            .map_err(|e| BridgeError::Internal(format!("local_addr: {e}")))?;

        tracing::info!("Backend running on http://localhost:{}", addr.port());
        Ok(BoundServer {
            listener,
            addr,
            app: self.into_router(),
        })
    }
}

pub fn is_addr_in_use(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::AddrInUse
}

pub fn report_listen_error(port: u16, err: &io::Error) {
    tracing::error!(error = %err, "server error");
    if is_addr_in_use(err) {
        tracing::warn!("Port {port} is already in use");
    }
}

/// Listening server.
pub struct BoundServer {
    listener: TcpListener,
    addr: SocketAddr,
    app: Router,
}

impl BoundServer {
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Serve until Ctrl-C / SIGTERM.
    pub async fn serve(self) -> Result<()> {
        self.serve_with_shutdown(shutdown_signal()).await
    }

    pub async fn serve_with_shutdown<F>(self, signal: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let port = self.addr.port();
        axum::serve(self.listener, self.app)
            .with_graceful_shutdown(signal)
            .await
            .map_err(|e| {
                report_listen_error(port, &e);
                BridgeError::Internal(format!("server failed: {e}"))
            })
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addr_in_use_is_distinguished() {
        assert!(is_addr_in_use(&io::Error::from(io::ErrorKind::AddrInUse)));
        assert!(!is_addr_in_use(&io::Error::from(io::ErrorKind::PermissionDenied)));
    }
}
