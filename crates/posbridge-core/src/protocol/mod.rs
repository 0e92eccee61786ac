//! Wire formats shared between the gateway and its WebSocket clients.
//!
//! Encoding never panics: failures surface as `BridgeError`.

pub mod event;

pub use event::BroadcastEvent;
