//! Endpoints owned by the gateway itself.

pub mod bridge;
pub mod hello;
