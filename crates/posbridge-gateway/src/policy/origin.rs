//! Origin policy (CORS).
//!
//! Runs first in the pipeline. The allow/deny decision is computed from the
//! request's `Origin` before anything downstream executes, and the resulting
//! headers are stamped on every response. Pre-flight requests never reach the
//! rest of the pipeline.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::app_state::AppState;
use crate::config::CorsSection;

pub const ALLOW_HEADERS: &str =
    "Origin, X-Requested-With, Content-Type, Accept, Authorization, x-tenant-id";
pub const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, PATCH, OPTIONS";

/// Compiled, immutable origin allowlist.
#[derive(Debug, Clone)]
pub struct OriginPolicy {
    exact: Vec<String>,
    substrings: Vec<String>,
}

impl OriginPolicy {
    pub fn new(exact: Vec<String>, substrings: Vec<String>) -> Self {
        Self { exact, substrings }
    }

    pub fn from_config(cfg: &CorsSection) -> Self {
        Self::new(cfg.allowed_origins.clone(), cfg.allowed_substrings.clone())
    }

    pub fn is_allowed(&self, origin: &str) -> bool {
        self.exact.iter().any(|o| o == origin)
            || self.substrings.iter().any(|s| origin.contains(s.as_str()))
    }

    /// Value for `Access-Control-Allow-Origin`: the origin itself when allowed, `*` otherwise.
    pub fn allow_origin(&self, origin: Option<&HeaderValue>) -> HeaderValue {
        match origin {
            Some(v) if v.to_str().map(|s| self.is_allowed(s)).unwrap_or(false) => v.clone(),
            _ => HeaderValue::from_static("*"),
        }
    }

    /// Full CORS header set for a request carrying `origin`.
    pub fn headers_for(&self, origin: Option<&HeaderValue>) -> HeaderMap {
        let mut h = HeaderMap::with_capacity(4);
        h.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        );
        h.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        );
        h.insert(
            header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        );
        h.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, self.allow_origin(origin));
        h
    }
}

pub async fn apply_origin_policy(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let cors = state.origin_policy().headers_for(req.headers().get(header::ORIGIN));

    let mut res = if req.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(req).await
    };

    res.headers_mut().extend(cors);
    res
}
