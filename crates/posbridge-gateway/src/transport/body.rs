//! Request body decoding.
//!
//! Runs before routing: the body is buffered (bounded), parsed according to
//! its content type, and attached to the request as [`ParsedBody`]. Handlers
//! read it through the [`Payload`] extractor.
//!
//! - `application/json` (and `+json`): strict, top level must be an object or array
//! - `application/x-www-form-urlencoded`: flat object of strings, repeated keys become arrays
//! - anything else: empty object

use axum::{
    async_trait,
    body::Body,
    extract::{FromRequest, FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, Method},
    middleware::Next,
    response::{IntoResponse, Response},
    Form,
};
use bytes::Bytes;
use http_body_util::LengthLimitError;
use serde_json::{Map, Value};

use posbridge_core::error::{BridgeError, Result};

use crate::app_state::AppState;
use crate::error::ApiError;

/// Decoded request body.
#[derive(Debug, Clone)]
pub struct ParsedBody(pub Value);

impl Default for ParsedBody {
    fn default() -> Self {
        ParsedBody(Value::Object(Map::new()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Json,
    Form,
    Other,
}

impl BodyKind {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let Some(ct) = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        else {
            return BodyKind::Other;
        };
        let mime = ct.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
        if mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json")) {
            BodyKind::Json
        } else if mime == "application/x-www-form-urlencoded" {
            BodyKind::Form
        } else {
            BodyKind::Other
        }
    }
}

pub async fn decode_body(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let limit = state.cfg().body.limit_bytes;
    let (parts, body) = req.into_parts();
    let kind = BodyKind::from_headers(&parts.headers);

    let decoded = async {
        let bytes = read_limited(body, limit).await?;
        let parsed = parse(kind, &bytes).await?;
        Ok::<_, BridgeError>((bytes, parsed))
    }
    .await;

    match decoded {
        Ok((bytes, parsed)) => {
            let mut req = Request::from_parts(parts, Body::from(bytes));
            req.extensions_mut().insert(ParsedBody(parsed));
            next.run(req).await
        }
        Err(e) => {
            tracing::debug!(method = %parts.method, path = %parts.uri.path(), error = %e, "body rejected");
            ApiError(e).into_response()
        }
    }
}

async fn read_limited(body: Body, limit: usize) -> Result<Bytes> {
    axum::body::to_bytes(body, limit).await.map_err(|e| {
        let inner = e.into_inner();
        if inner.is::<LengthLimitError>() {
            BridgeError::PayloadTooLarge
        } else {
            BridgeError::BadRequest(format!("request aborted: {inner}"))
        }
    })
}

pub async fn parse(kind: BodyKind, bytes: &Bytes) -> Result<Value> {
    match kind {
        BodyKind::Json => parse_json(bytes),
        BodyKind::Form => parse_form(bytes.clone()).await,
        BodyKind::Other => Ok(Value::Object(Map::new())),
    }
}

fn parse_json(bytes: &[u8]) -> Result<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    let v: Value = serde_json::from_slice(bytes)
        .map_err(|e| BridgeError::BadRequest(format!("invalid json body: {e}")))?;
    match v {
        Value::Object(_) | Value::Array(_) => Ok(v),
        _ => Err(BridgeError::BadRequest(
            "json body must be an object or an array".into(),
        )),
    }
}

async fn parse_form(bytes: Bytes) -> Result<Value> {
    // Reuse axum's form deserializer on a synthetic request.
    let form_request = axum::http::Request::builder()
        .method(Method::POST)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(bytes))
        .map_err(|e| BridgeError::Internal(format!("form decode: {e}")))?;
    let Form(pairs) = Form::<Vec<(String, String)>>::from_request(form_request, &())
        .await
        .map_err(|e| BridgeError::BadRequest(format!("invalid form body: {}", e.body_text())))?;

    let mut out = Map::new();
    for (k, v) in pairs {
        match out.get_mut(&k) {
            Some(Value::Array(items)) => items.push(Value::String(v)),
            Some(prev) => {
                let first = prev.take();
                *prev = Value::Array(vec![first, Value::String(v)]);
            }
            None => {
                out.insert(k, Value::String(v));
            }
        }
    }
    Ok(Value::Object(out))
}

/// Handler-side access to the decoded body. Empty object when nothing was decoded.
#[derive(Debug, Clone)]
pub struct Payload(pub Value);

#[async_trait]
impl<S> FromRequestParts<S> for Payload
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> std::result::Result<Self, Self::Rejection> {
        let ParsedBody(v) = parts.extensions.get::<ParsedBody>().cloned().unwrap_or_default();
        Ok(Payload(v))
    }
}
