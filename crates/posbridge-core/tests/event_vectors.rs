//! Broadcast event wire vectors.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::fs;

use posbridge_core::protocol::BroadcastEvent;

fn load(name: &str) -> String {
    fs::read_to_string(format!("tests/vectors/{name}")).unwrap()
}

#[test]
fn popup_close_matches_vector() {
    let expected: serde_json::Value = serde_json::from_str(&load("popup_close.json")).unwrap();
    let text = BroadcastEvent::PopupClose { success: true }.to_text().unwrap();
    let actual: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(actual, expected);
}

#[test]
fn payment_success_matches_vector() {
    let ev: BroadcastEvent = serde_json::from_str(&load("payment_success.json")).unwrap();
    assert_eq!(
        ev,
        BroadcastEvent::PaymentSuccess { transaction_id: "abc-123".into() }
    );
    assert_eq!(ev.kind(), "payment_success");
}

#[test]
fn unknown_type_is_rejected() {
    let r = serde_json::from_str::<BroadcastEvent>(r#"{"type":"refund","id":"x"}"#);
    assert!(r.is_err());
}
