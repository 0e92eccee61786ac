//! Shared test doubles for gateway integration tests.

#![allow(dead_code)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use tokio::sync::mpsc;

use posbridge_core::error::{BridgeError, Result};
use posbridge_gateway::app_state::AppState;
use posbridge_gateway::bootstrap::ServerHandle;
use posbridge_gateway::config::GatewayConfig;
use posbridge_gateway::obs::MemoryAccessLog;
use posbridge_gateway::realtime::WsSubsystem;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    PopupClose(bool),
    PaymentSuccess(String),
}

/// WebSocket double that records every broadcast.
pub struct RecordingWs {
    tx: mpsc::UnboundedSender<Call>,
    pub init_calls: AtomicUsize,
    fail_init: bool,
}

impl RecordingWs {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<Call>) {
        Self::build(false)
    }

    pub fn failing() -> (Arc<Self>, mpsc::UnboundedReceiver<Call>) {
        Self::build(true)
    }

    fn build(fail_init: bool) -> (Arc<Self>, mpsc::UnboundedReceiver<Call>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Arc::new(Self {
                tx,
                init_calls: AtomicUsize::new(0),
                fail_init,
            }),
            rx,
        )
    }

    pub fn init_count(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WsSubsystem for RecordingWs {
    async fn initialize(&self, _server: &mut ServerHandle) -> Result<()> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_init {
            return Err(BridgeError::Internal("ws port exploded".into()));
        }
        Ok(())
    }

    fn broadcast_popup_close(&self, success: bool) {
        let _ = self.tx.send(Call::PopupClose(success));
    }

    fn broadcast_payment_success(&self, transaction_id: &str) {
        let _ = self.tx.send(Call::PaymentSuccess(transaction_id.to_string()));
    }
}

/// Wait for exactly one broadcast and make sure no second one follows.
pub async fn expect_single_call(rx: &mut mpsc::UnboundedReceiver<Call>) -> Call {
    let call = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("broadcast not issued in time")
        .expect("channel closed");
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(rx.try_recv().is_err(), "more than one broadcast issued");
    call
}

pub async fn expect_no_call(rx: &mut mpsc::UnboundedReceiver<Call>) {
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(rx.try_recv().is_err(), "unexpected broadcast");
}

pub fn test_config() -> GatewayConfig {
    let mut cfg = GatewayConfig::default();
    cfg.server.host = "127.0.0.1".into();
    cfg.server.port = 0;
    cfg
}

pub fn test_state(ws: Arc<dyn WsSubsystem>) -> (AppState, Arc<MemoryAccessLog>) {
    let log = Arc::new(MemoryAccessLog::new());
    let state = AppState::with_access_log(test_config(), ws, log.clone());
    (state, log)
}

pub async fn body_string(res: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn json_post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}
