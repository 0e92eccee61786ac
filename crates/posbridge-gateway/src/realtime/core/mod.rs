//! Realtime core components: the session registry shared by the hub and the
//! WebSocket transport.

mod session_registry;

pub use session_registry::{Connection, SessionRegistry};
