//! Axum router wiring.
//!
//! Request order through the pipeline (outermost first):
//! origin policy -> body decoder -> access log -> [panic catcher] -> routes.

use axum::{middleware, routing::get, Router};
use tower_http::catch_panic::CatchPanicLayer;

use crate::{app_state::AppState, error, obs, policy, services, transport};

/// Routes the gateway registers before handing the app to the route delegate.
pub fn base_routes() -> Router<AppState> {
    Router::new().route(services::hello::HELLO_PATH, get(services::hello::hello))
}

/// Wrap `routes` in the request pipeline and bind the state.
pub fn pipeline(routes: Router<AppState>, state: AppState, catch_panics: bool) -> Router {
    let routes = if catch_panics {
        routes.layer(CatchPanicLayer::custom(error::panic_response))
    } else {
        routes
    };

    routes
        .layer(middleware::from_fn_with_state(
            state.clone(),
            obs::access_log::log_api_responses,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            transport::body::decode_body,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            policy::apply_origin_policy,
        ))
        .with_state(state)
}

/// Gateway-owned routes (hello + event bridge) behind the full pipeline.
pub fn build_router(state: AppState) -> Router {
    pipeline(
        base_routes().merge(services::bridge::routes()),
        state,
        true,
    )
}
