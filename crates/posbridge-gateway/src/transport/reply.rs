//! JSON responses whose serialized body stays observable.
//!
//! The payload is serialized exactly once. The same bytes go on the wire and
//! into a [`CapturedJson`] response extension that the access log reads.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde::Serialize;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Serialized JSON body of a response, as sent.
#[derive(Debug, Clone)]
pub struct CapturedJson(pub Bytes);

impl CapturedJson {
    pub fn as_text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }
}

#[derive(Debug)]
pub struct JsonReply {
    status: StatusCode,
    body: Result<Bytes, String>,
}

impl JsonReply {
    pub fn ok<T: Serialize + ?Sized>(value: &T) -> Self {
        Self::with_status(StatusCode::OK, value)
    }

    pub fn with_status<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> Self {
        let body = serde_json::to_vec(value)
            .map(Bytes::from)
            .map_err(|e| e.to_string());
        Self { status, body }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for JsonReply {
    fn into_response(self) -> Response {
        match self.body {
            Ok(bytes) => {
                let mut res = (
                    self.status,
                    [(header::CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))],
                    bytes.clone(),
                )
                    .into_response();
                res.extensions_mut().insert(CapturedJson(bytes));
                res
            }
            Err(e) => {
                tracing::error!(error = %e, "json encode failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn captured_bytes_match_serialized_payload() {
        let res = JsonReply::ok(&json!({ "message": "hi" })).into_response();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers().get(header::CONTENT_TYPE).unwrap(),
            JSON_CONTENT_TYPE
        );
        let captured = res.extensions().get::<CapturedJson>().unwrap();
        assert_eq!(captured.as_text(), r#"{"message":"hi"}"#);
    }
}
