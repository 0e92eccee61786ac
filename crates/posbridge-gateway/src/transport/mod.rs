//! HTTP and WebSocket transport helpers.
//!
//! - `body`: request body decoding middleware + extractor
//! - `reply`: JSON responses with an observable serialized body
//! - `ws`: per-connection WebSocket loop

pub mod body;
pub mod reply;
pub mod ws;
