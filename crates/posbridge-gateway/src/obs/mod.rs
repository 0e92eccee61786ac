//! Request observability.
//!
//! The access log is the only per-request output of the gateway; everything
//! else goes through plain `tracing` events.

pub mod access_log;

pub use access_log::{AccessLog, MemoryAccessLog, TracingAccessLog};
