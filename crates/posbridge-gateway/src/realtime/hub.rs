//! Broadcast hub: the gateway's WebSocket subsystem.
//!
//! Events are serialized once and pushed to every session with `try_send`
//! (lossy: a full queue drops the frame for that session). Broadcasting
//! before `initialize`, or with nobody connected, is a no-op.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocketUpgrade};
use axum::routing::get;
use tokio::sync::mpsc;

use posbridge_core::error::{BridgeError, Result};
use posbridge_core::protocol::BroadcastEvent;

use crate::bootstrap::ServerHandle;
use crate::config::WsSection;
use crate::realtime::core::{Connection, SessionRegistry};
use crate::realtime::WsSubsystem;
use crate::transport;

#[derive(Clone)]
pub struct BroadcastHub {
    inner: Arc<HubInner>,
}

struct HubInner {
    cfg: WsSection,
    sessions: SessionRegistry,
    initialized: AtomicBool,
}

impl BroadcastHub {
    pub fn new(cfg: WsSection) -> Self {
        Self {
            inner: Arc::new(HubInner {
                cfg,
                sessions: SessionRegistry::new(),
                initialized: AtomicBool::new(false),
            }),
        }
    }

    pub fn cfg(&self) -> &WsSection {
        &self.inner.cfg
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.initialized.load(Ordering::Acquire)
    }

    pub fn session_count(&self) -> usize {
        self.inner.sessions.len()
    }

    /// Register a new session and hand back its outbound queue.
    pub fn connect(&self) -> (u64, mpsc::Receiver<Message>) {
        let (tx, rx) = mpsc::channel(self.inner.cfg.outbound_queue);
        let id = self.inner.sessions.insert(Connection { tx });
        tracing::debug!(session_id = id, sessions = self.session_count(), "ws session registered");
        (id, rx)
    }

    pub fn disconnect(&self, session_id: u64) {
        if self.inner.sessions.remove(session_id).is_some() {
            tracing::debug!(session_id, sessions = self.session_count(), "ws session removed");
        }
    }

    /// Fan an event out to all sessions. Returns how many queues accepted it.
    pub fn publish(&self, event: &BroadcastEvent) -> usize {
        if self.inner.sessions.is_empty() {
            tracing::debug!(event = event.kind(), "no ws clients; broadcast skipped");
            return 0;
        }
        let text = match event.to_text() {
            Ok(t) => t,
            Err(e) => {
                tracing::error!(event = event.kind(), error = %e, "broadcast encode failed");
                return 0;
            }
        };

        let mut delivered = 0;
        let mut dropped = 0;
        for (id, conn) in self.inner.sessions.snapshot() {
            match conn.tx.try_send(Message::Text(text.clone())) {
                Ok(()) => delivered += 1,
                Err(mpsc::error::TrySendError::Full(_)) => dropped += 1,
                Err(mpsc::error::TrySendError::Closed(_)) => self.disconnect(id),
            }
        }
        tracing::info!(event = event.kind(), delivered, dropped, "broadcast sent");
        delivered
    }
}

#[async_trait]
impl WsSubsystem for BroadcastHub {
    async fn initialize(&self, server: &mut ServerHandle) -> Result<()> {
        if self.inner.initialized.swap(true, Ordering::AcqRel) {
            return Err(BridgeError::Internal("websocket hub already initialized".into()));
        }

        let hub = self.clone();
        let mounted = server.try_route(
            &self.inner.cfg.path,
            get(move |ws: WebSocketUpgrade| {
                let hub = hub.clone();
                async move { ws.on_upgrade(move |socket| transport::ws::run_session(hub, socket)) }
            }),
        );
        if let Err(e) = mounted {
            self.inner.initialized.store(false, Ordering::Release);
            return Err(e);
        }

        tracing::info!(path = %self.inner.cfg.path, "websocket endpoint mounted");
        Ok(())
    }

    fn broadcast_popup_close(&self, success: bool) {
        self.publish(&BroadcastEvent::PopupClose { success });
    }

    fn broadcast_payment_success(&self, transaction_id: &str) {
        self.publish(&BroadcastEvent::PaymentSuccess {
            transaction_id: transaction_id.to_string(),
        });
    }
}
