//! Error types for the referential client.
//!
//! # Design
//! Every non-2xx response lands in `Http` with the status and the decoded
//! error body; callers branch on `status()` (409 conflict, 500 internal) the
//! same way the console does. `Transport` is produced by the host when the
//! round-trip itself fails and therefore carries no status.
//!
//! `ApiError` is `Serialize` because it travels as the payload of
//! `DATA_FETCH_ERROR` actions.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Errors produced while building requests or parsing replies.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}{}", describe_body(.body))]
    Http { status: u16, body: Value },

    /// The request never produced a response.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The response body could not be decoded.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be encoded to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The payload did not match the normalization schema.
    #[error("normalization failed: {0}")]
    Normalization(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// The server-provided `message`, or this error's own description when
    /// the server sent none.
    pub fn message(&self) -> String {
        match self {
            ApiError::Http { body, .. } => body
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| self.to_string()),
            _ => self.to_string(),
        }
    }
}

fn describe_body(body: &Value) -> String {
    match body {
        Value::Null => String::new(),
        Value::String(text) if text.is_empty() => String::new(),
        Value::String(text) => format!(": {text}"),
        other => match other.get("message").and_then(Value::as_str) {
            Some(message) => format!(": {message}"),
            None => format!(": {other}"),
        },
    }
}
