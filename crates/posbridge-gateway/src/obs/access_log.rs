//! Access log for `/api` traffic.
//!
//! One line per completed `/api*` request:
//! `<METHOD> <PATH> <STATUS> in <MS>ms[ :: <JSON>]`
//!
//! The JSON suffix is the exact body produced by [`JsonReply`](crate::transport::reply::JsonReply),
//! read from the response extension; the response itself is passed through untouched.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::Response,
};

use crate::app_state::AppState;
use crate::transport::reply::CapturedJson;

pub const ACCESS_TARGET: &str = "posbridge::access";

/// Destination for access-log lines.
pub trait AccessLog: Send + Sync {
    fn record(&self, line: &str);
}

/// Default sink: one `info` event on the `posbridge::access` target.
#[derive(Debug, Default)]
pub struct TracingAccessLog;

impl AccessLog for TracingAccessLog {
    fn record(&self, line: &str) {
        tracing::info!(target: ACCESS_TARGET, "{line}");
    }
}

/// In-memory sink, mostly for tests.
#[derive(Debug, Default)]
pub struct MemoryAccessLog {
    lines: Mutex<Vec<String>>,
}

impl MemoryAccessLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

impl AccessLog for MemoryAccessLog {
    fn record(&self, line: &str) {
        if let Ok(mut l) = self.lines.lock() {
            l.push(line.to_string());
        }
    }
}

pub fn is_logged_path(path: &str) -> bool {
    path.starts_with("/api")
}

pub fn format_line(
    method: &Method,
    path: &str,
    status: u16,
    elapsed: Duration,
    body: Option<&CapturedJson>,
) -> String {
    let mut line = format!("{method} {path} {status} in {}ms", elapsed.as_millis());
    if let Some(body) = body {
        line.push_str(" :: ");
        line.push_str(&body.as_text());
    }
    line
}

pub async fn log_api_responses(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    let res = next.run(req).await;

    if is_logged_path(&path) {
        let line = format_line(
            &method,
            &path,
            res.status().as_u16(),
            start.elapsed(),
            res.extensions().get::<CapturedJson>(),
        );
        let sink = state.access_log();
        if catch_unwind(AssertUnwindSafe(|| sink.record(&line))).is_err() {
            tracing::warn!(%path, "access log sink panicked; line dropped");
        }
    }

    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn line_without_body() {
        let line = format_line(&Method::GET, "/api/x", 404, Duration::from_millis(7), None);
        assert_eq!(line, "GET /api/x 404 in 7ms");
    }

    #[test]
    fn line_with_body_uses_captured_bytes() {
        let body = CapturedJson(Bytes::from_static(br#"{"message":"ok"}"#));
        let line = format_line(
            &Method::POST,
            "/api/y",
            200,
            Duration::from_micros(1_999),
            Some(&body),
        );
        assert_eq!(line, r#"POST /api/y 200 in 1ms :: {"message":"ok"}"#);
    }

    #[test]
    fn only_api_paths_are_logged() {
        assert!(is_logged_path("/api"));
        assert!(is_logged_path("/api/hello"));
        assert!(!is_logged_path("/"));
        assert!(!is_logged_path("/ws"));
        assert!(!is_logged_path("/static/api"));
    }
}
