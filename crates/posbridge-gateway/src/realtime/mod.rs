//! WebSocket broadcast subsystem.
//!
//! The HTTP side only sees [`WsSubsystem`]. It is resolved once at startup and
//! shared by handle, so broadcast calls are valid at any time, including
//! before `initialize` has run.

pub mod core;
pub mod hub;

use async_trait::async_trait;

use posbridge_core::error::Result;

use crate::bootstrap::ServerHandle;

pub use hub::BroadcastHub;

#[async_trait]
pub trait WsSubsystem: Send + Sync {
    /// Attach the subsystem to the server (e.g. mount its upgrade route).
    async fn initialize(&self, server: &mut ServerHandle) -> Result<()>;

    /// Must not block; a no-op when no client is connected.
    fn broadcast_popup_close(&self, success: bool);

    /// Must not block; a no-op when no client is connected.
    fn broadcast_payment_success(&self, transaction_id: &str);
}
