//! WebSocket session loop.
//!
//! Clients are receive-only: the gateway pushes broadcast frames, answers
//! pings, pings on its own schedule and closes idle sessions. Inbound data
//! frames only count as activity.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};
use tracing::Instrument;

use crate::realtime::BroadcastHub;

pub async fn run_session(hub: BroadcastHub, socket: WebSocket) {
    let (session_id, out_rx) = hub.connect();
    let span = tracing::info_span!("ws_session", session_id);

    async {
        tracing::info!("ws client connected");
        let reason = session_loop(&hub, socket, out_rx).await;
        hub.disconnect(session_id);
        tracing::info!(reason, "ws client disconnected");
    }
    .instrument(span)
    .await
}

async fn session_loop(
    hub: &BroadcastHub,
    socket: WebSocket,
    mut out_rx: mpsc::Receiver<Message>,
) -> &'static str {
    let (mut ws_tx, mut ws_rx) = socket.split();

    let ping_every = Duration::from_millis(hub.cfg().ping_interval_ms);
    let idle_timeout = Duration::from_millis(hub.cfg().idle_timeout_ms);

    let mut ping_tick = tokio::time::interval(ping_every);
    ping_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // first tick fires immediately
    ping_tick.tick().await;

    let mut last_activity = Instant::now();

    loop {
        tokio::select! {
            // outbound writer
            maybe_out = out_rx.recv() => {
                let Some(m) = maybe_out else { return "hub dropped session"; };
                if ws_tx.send(m).await.is_err() {
                    return "write failed";
                }
            }

            // inbound reader
            incoming = ws_rx.next() => {
                let Some(Ok(msg)) = incoming else { return "read closed"; };
                last_activity = Instant::now();
                match msg {
                    Message::Ping(payload) => {
                        if ws_tx.send(Message::Pong(payload)).await.is_err() {
                            return "write failed";
                        }
                    }
                    Message::Close(_) => return "client close",
                    Message::Text(_) | Message::Binary(_) | Message::Pong(_) => {}
                }
            }

            // ping
            _ = ping_tick.tick() => {
                if ws_tx.send(Message::Ping(Vec::new())).await.is_err() {
                    return "write failed";
                }
            }

            // idle timeout
            _ = tokio::time::sleep(Duration::from_millis(250)) => {
                if last_activity.elapsed() >= idle_timeout {
                    let _ = ws_tx.send(Message::Close(None)).await;
                    return "idle timeout";
                }
            }
        }
    }
}
