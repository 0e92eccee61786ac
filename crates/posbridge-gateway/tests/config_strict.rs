#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use posbridge_gateway::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
server:
  port: 5000
cors:
  allowed_origin: ["https://a.example"] # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "CONFIG");
}

#[test]
fn ok_minimal_config() {
    let ok = r#"
server:
  port: 8081
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.server.port, 8081);
    assert_eq!(cfg.server.host, "0.0.0.0");
    assert_eq!(cfg.ws.path, "/ws");
    assert!(cfg.cors.allowed_origins.iter().any(|o| o == "http://localhost:3000"));
    assert_eq!(cfg.cors.allowed_substrings, vec!["replit.dev", "vercel.app"]);
}

#[test]
fn defaults_listen_on_5000() {
    let mut cfg = config::GatewayConfig::default();
    config::apply_port(&mut cfg, None).unwrap();
    assert_eq!(cfg.server.port, 5000);

    config::apply_port(&mut cfg, Some("  ")).unwrap();
    assert_eq!(cfg.server.port, 5000);
}

#[test]
fn port_env_overrides_file() {
    let mut cfg = config::load_from_str("server:\n  port: 7000\n").unwrap();
    config::apply_port(&mut cfg, Some("6123")).unwrap();
    assert_eq!(cfg.server.port, 6123);
}

#[test]
fn non_numeric_port_is_rejected() {
    let mut cfg = config::GatewayConfig::default();
    let err = config::apply_port(&mut cfg, Some("eighty")).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "CONFIG");
    assert_eq!(cfg.server.port, 5000);
}

#[test]
fn ws_timers_are_validated() {
    let bad = r#"
ws:
  ping_interval_ms: 30000
  idle_timeout_ms: 20000
"#;
    assert!(config::load_from_str(bad).is_err());
}
