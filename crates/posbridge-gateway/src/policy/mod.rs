//! Request policy applied before routing.
//!
//! Currently the origin (CORS) policy only.

pub mod origin;

pub use origin::{apply_origin_policy, OriginPolicy};
