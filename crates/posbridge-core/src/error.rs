//! Shared error type across posbridge crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed body.
    BadRequest,
    /// Body exceeded the configured limit.
    PayloadTooLarge,
    /// Explicit status supplied by a route handler.
    Http,
    /// Invalid process configuration.
    Config,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            ClientCode::Http => "HTTP",
            ClientCode::Config => "CONFIG",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Unified error type used by core and gateway.
///
/// Every variant resolves to an HTTP status through [`BridgeError::status`];
/// variants without an explicit status fall back to 500.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("{0}")]
    BadRequest(String),
    #[error("request entity too large")]
    PayloadTooLarge,
    /// Error raised by a route handler that carries its own status and/or message.
    #[error("{}", message.as_deref().unwrap_or(DEFAULT_MESSAGE))]
    Http {
        status: Option<u16>,
        message: Option<String>,
    },
    #[error("invalid config: {0}")]
    Config(String),
    #[error("internal: {0}")]
    Internal(String),
}

/// Message used when an error carries none of its own.
pub const DEFAULT_MESSAGE: &str = "Internal Server Error";

impl BridgeError {
    /// Build an error with an explicit status and message.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        BridgeError::Http {
            status: Some(status),
            message: Some(message.into()),
        }
    }

    /// Explicit status carried by the error, if any.
    pub fn explicit_status(&self) -> Option<u16> {
        match self {
            BridgeError::BadRequest(_) => Some(400),
            BridgeError::PayloadTooLarge => Some(413),
            BridgeError::Http { status, .. } => *status,
            BridgeError::Config(_) | BridgeError::Internal(_) => None,
        }
    }

    /// Resolved status: explicit status or 500.
    pub fn status(&self) -> u16 {
        match self.explicit_status() {
            Some(s) if (100..=999).contains(&s) => s,
            _ => 500,
        }
    }

    /// Message exposed to clients.
    pub fn message(&self) -> String {
        match self {
            BridgeError::Http { message: None, .. } => DEFAULT_MESSAGE.to_string(),
            BridgeError::Http { message: Some(m), .. } if m.is_empty() => DEFAULT_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }

    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            BridgeError::BadRequest(_) => ClientCode::BadRequest,
            BridgeError::PayloadTooLarge => ClientCode::PayloadTooLarge,
            BridgeError::Http { .. } => ClientCode::Http,
            BridgeError::Config(_) => ClientCode::Config,
            BridgeError::Internal(_) => ClientCode::Internal,
        }
    }
}
