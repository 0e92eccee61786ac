use serde_json::json;

use crate::transport::reply::JsonReply;

pub const HELLO_PATH: &str = "/api/hello";

/// Liveness check for browser clients.
pub async fn hello() -> JsonReply {
    JsonReply::ok(&json!({ "message": "Hello from backend!" }))
}
