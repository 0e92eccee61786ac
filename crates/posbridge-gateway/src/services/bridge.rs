//! Event bridge: HTTP notifications -> WebSocket broadcasts.
//!
//! Both endpoints answer immediately. The broadcast is handed to a spawned
//! task, so the response never waits on the WebSocket subsystem.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::{json, Value};

use posbridge_core::error::{BridgeError, Result};

use crate::app_state::AppState;
use crate::bootstrap::ServerHandle;
use crate::realtime::WsSubsystem;
use crate::transport::body::Payload;
use crate::transport::reply::JsonReply;

pub const POPUP_CLOSE_PATH: &str = "/api/popup/close";
pub const RECEIVE_NOTIFY_PATH: &str = "/api/NotifyPos/ReceiveNotify";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(POPUP_CLOSE_PATH, post(popup_close))
        .route(RECEIVE_NOTIFY_PATH, post(receive_notify))
}

/// Register the bridge endpoints on an assembled server.
///
/// Never fails: a path the route delegate already serves keeps the
/// delegate's handler and the bridge endpoint is skipped.
pub fn mount(server: &mut ServerHandle) {
    for (path, handler) in [
        (POPUP_CLOSE_PATH, post(popup_close)),
        (RECEIVE_NOTIFY_PATH, post(receive_notify)),
    ] {
        if let Err(e) = server.try_route(path, handler) {
            tracing::warn!(%path, error = %e, "bridge endpoint skipped; keeping existing handler");
        }
    }
}

fn fire<F>(ws: Arc<dyn WsSubsystem>, f: F)
where
    F: FnOnce(&dyn WsSubsystem) + Send + 'static,
{
    tokio::spawn(async move { f(ws.as_ref()) });
}

async fn popup_close(State(state): State<AppState>, Payload(body): Payload) -> JsonReply {
    let success = body.get("success").map(truthy).unwrap_or(false);
    fire(state.ws(), move |ws| ws.broadcast_popup_close(success));
    JsonReply::ok(&json!({ "success": true, "message": "Popup close signal sent" }))
}

async fn receive_notify(State(state): State<AppState>, Payload(body): Payload) -> Response {
    match transaction_uuid(&body) {
        Ok(id) => {
            tracing::info!(transaction_uuid = %id, "received payment notification");
            fire(state.ws(), move |ws| ws.broadcast_payment_success(&id));
            JsonReply::ok(&json!({ "message": "Notification received successfully." })).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "error processing payment notification");
            JsonReply::with_status(
                StatusCode::INTERNAL_SERVER_ERROR,
                &json!({ "error": "Failed to process notification" }),
            )
            .into_response()
        }
    }
}

/// Boolean reading of a body field; form bodies deliver strings.
fn truthy(v: &Value) -> bool {
    match v {
        Value::Bool(b) => *b,
        Value::String(s) => matches!(s.as_str(), "true" | "1"),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        _ => false,
    }
}

fn transaction_uuid(body: &Value) -> Result<String> {
    let obj = body
        .as_object()
        .ok_or_else(|| BridgeError::BadRequest("notification body must be an object".into()))?;
    let id = match obj.get("TransactionUuid") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(_) => {
            return Err(BridgeError::BadRequest(
                "TransactionUuid must be a string".into(),
            ))
        }
        None => return Err(BridgeError::BadRequest("missing TransactionUuid".into())),
    };
    if id.is_empty() {
        return Err(BridgeError::BadRequest("empty TransactionUuid".into()));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthy_accepts_json_and_form_values() {
        assert!(truthy(&json!(true)));
        assert!(truthy(&json!("true")));
        assert!(truthy(&json!(1)));
        assert!(!truthy(&json!(false)));
        assert!(!truthy(&json!("false")));
        assert!(!truthy(&Value::Null));
    }

    #[test]
    fn transaction_uuid_extraction() {
        assert_eq!(transaction_uuid(&json!({ "TransactionUuid": "abc-123" })).unwrap(), "abc-123");
        assert_eq!(transaction_uuid(&json!({ "TransactionUuid": 42 })).unwrap(), "42");
        assert!(transaction_uuid(&json!({})).is_err());
        assert!(transaction_uuid(&json!({ "TransactionUuid": "" })).is_err());
        assert_eq!(
            transaction_uuid(&json!({ "TransactionUuid": " abc-123 " })).unwrap(),
            " abc-123 "
        );
        assert!(transaction_uuid(&json!({ "TransactionUuid": {"x": 1} })).is_err());
        assert!(transaction_uuid(&json!(["abc-123"])).is_err());
    }
}
