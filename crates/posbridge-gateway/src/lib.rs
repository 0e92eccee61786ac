//! posbridge gateway library entry.
//!
//! This crate wires the request pipeline (origin policy, body decoding,
//! access log), the event bridge endpoints, the WebSocket broadcast hub and
//! the startup sequence. It is consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod app_state;
pub mod bootstrap;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod obs;
pub mod policy;
pub mod realtime;
pub mod router;
pub mod services;
pub mod transport;
