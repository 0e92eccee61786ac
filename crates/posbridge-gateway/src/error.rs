//! Fallback error responder.
//!
//! Every error that escapes a handler ends up here and becomes
//! `{"message": ...}` with the error's status (500 when it carries none).
//! Panics are caught by the pipeline and answered the same way.

use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use posbridge_core::error::{BridgeError, DEFAULT_MESSAGE};

use crate::transport::reply::JsonReply;

/// HTTP-facing wrapper so handlers can return `Result<_, ApiError>` and use `?`.
#[derive(Debug)]
pub struct ApiError(pub BridgeError);

impl From<BridgeError> for ApiError {
    fn from(e: BridgeError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(
                code = self.0.client_code().as_str(),
                status = status.as_u16(),
                error = ?self.0,
                "server error"
            );
        }
        JsonReply::with_status(status, &json!({ "message": self.0.message() })).into_response()
    }
}

/// Response used when a handler panics. Installed through `CatchPanicLayer::custom`.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    };
    tracing::error!(panic = %detail, "handler panicked");
    JsonReply::with_status(
        StatusCode::INTERNAL_SERVER_ERROR,
        &json!({ "message": DEFAULT_MESSAGE }),
    )
    .into_response()
}
