//! Top-level facade crate for posbridge.
//!
//! Re-exports core types and the gateway library so users can depend on a single crate.

pub mod core {
    pub use posbridge_core::*;
}

pub mod gateway {
    pub use posbridge_gateway::*;
}
