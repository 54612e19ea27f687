//! The JSON envelope every endpoint answers with:
//! `{status, success, result | error, ...extra}`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Standard API response wrapper.
///
/// Successful responses carry `result`, failures carry `error`. A plain
/// string payload is wrapped as `{"message": "..."}`. Extra top-level keys
/// (e.g. `user`, `token`) are flattened next to the envelope fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `{"message": "..."}` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl<T> ApiResponse<T> {
    /// A 2xx response carrying `result`.
    pub fn with_status(status: u16, result: T) -> Self {
        Self {
            status,
            success: (200..300).contains(&status),
            result: Some(result),
            error: None,
            extra: Map::new(),
        }
    }

    pub fn ok(result: T) -> Self {
        Self::with_status(200, result)
    }

    pub fn created(result: T) -> Self {
        Self::with_status(201, result)
    }

    /// Attach an extra top-level key. Values that fail to serialize become `null`.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        self.extra.insert(key.into(), value);
        self
    }
}

impl ApiResponse<Message> {
    pub fn message(message: impl Into<String>) -> Self {
        Self::ok(Message::new(message))
    }
}

impl ApiResponse<()> {
    /// A failure response carrying `error`.
    pub fn error(status: u16, error: impl Serialize) -> Self {
        Self {
            status,
            success: false,
            result: None,
            error: Some(serde_json::to_value(error).unwrap_or(Value::Null)),
            extra: Map::new(),
        }
    }

    /// A failure whose payload is `{"message": "..."}`.
    pub fn error_message(status: u16, message: impl Into<String>) -> Self {
        Self::error(status, Message::new(message))
    }
}
