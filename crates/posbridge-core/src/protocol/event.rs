//! Broadcast events pushed to WebSocket clients.
//!
//! One JSON text frame per event, discriminated by `type`.

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};

/// Event fanned out to every connected client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BroadcastEvent {
    /// The POS UI should close its payment popup.
    PopupClose { success: bool },
    /// The payment provider confirmed a transaction.
    PaymentSuccess {
        #[serde(rename = "transactionId")]
        transaction_id: String,
    },
}

impl BroadcastEvent {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            BroadcastEvent::PopupClose { .. } => "popup_close",
            BroadcastEvent::PaymentSuccess { .. } => "payment_success",
        }
    }

    /// Serialize once for fan-out.
    pub fn to_text(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| BridgeError::Internal(format!("event encode failed: {e}")))
    }
}
