//! Route delegation.
//!
//! Business endpoints are supplied by a [`RouteRegistrar`]; the gateway only
//! contributes its own pipeline and event endpoints.

mod registrar;

pub use registrar::{no_business_routes, RouteRegistrar};
