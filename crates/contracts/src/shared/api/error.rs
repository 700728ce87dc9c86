use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Keys of an error body that never name a form field
const RESERVED_KEYS: &[&str] = &[
    "detail",
    "message",
    "error",
    "errors",
    "status",
    "code",
    "success",
    "non_field_errors",
];

/// Classification of every failure the resource layer can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// No response was received
    NetworkError,
    /// The addressed record does not exist (any more)
    NotFound,
    /// The backend rejected the payload with field-level messages
    ValidationError,
    /// The response did not have the expected shape
    MalformedResponse,
    Unknown,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NetworkError => "network_error",
            Self::NotFound => "not_found",
            Self::ValidationError => "validation_error",
            Self::MalformedResponse => "malformed_response",
            Self::Unknown => "unknown",
        }
    }
}

/// Normalized error shape `{kind, message, field_errors}`
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub field_errors: BTreeMap<String, String>,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            field_errors: BTreeMap::new(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NetworkError, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn validation(message: impl Into<String>, field_errors: BTreeMap<String, String>) -> Self {
        Self {
            kind: ErrorKind::ValidationError,
            message: message.into(),
            field_errors,
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedResponse, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unknown, message)
    }

    /// The user can simply try again
    pub fn is_retryable(&self) -> bool {
        self.kind == ErrorKind::NetworkError
    }

    pub fn has_field_errors(&self) -> bool {
        !self.field_errors.is_empty()
    }

    /// Text for a notification. Malformed responses are defects; their
    /// details go to the log, not to the user.
    pub fn user_message(&self) -> String {
        match self.kind {
            ErrorKind::NetworkError => {
                format!("Could not reach the server: {}", self.message)
            }
            ErrorKind::MalformedResponse => {
                "The server returned an unexpected response".to_string()
            }
            _ => self.message.clone(),
        }
    }

    /// Normalize a non-success HTTP response
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let parsed: Option<Value> = serde_json::from_slice(body).ok();
        let message = parsed.as_ref().and_then(extract_message);

        match status {
            404 => Self::not_found(message.unwrap_or_else(|| "Record not found".to_string())),
            400 | 422 => {
                let field_errors = parsed
                    .as_ref()
                    .map(extract_field_errors)
                    .unwrap_or_default();
                if field_errors.is_empty() {
                    Self::unknown(
                        message.unwrap_or_else(|| format!("Request rejected (HTTP {})", status)),
                    )
                } else {
                    Self::validation(
                        message.unwrap_or_else(|| "Please correct the highlighted fields".to_string()),
                        field_errors,
                    )
                }
            }
            _ => Self::unknown(message.unwrap_or_else(|| format!("HTTP {}", status))),
        }
    }
}

fn extract_message(body: &Value) -> Option<String> {
    match body {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Object(map) => {
            for key in ["detail", "message", "error"] {
                if let Some(Value::String(s)) = map.get(key) {
                    if !s.trim().is_empty() {
                        return Some(s.clone());
                    }
                }
            }
            map.get("non_field_errors").and_then(messages_of)
        }
        _ => None,
    }
}

fn extract_field_errors(body: &Value) -> BTreeMap<String, String> {
    let map = match body {
        Value::Object(map) => map,
        _ => return BTreeMap::new(),
    };

    // Some endpoints nest the field map under "errors"
    let fields = match map.get("errors").or_else(|| map.get("field_errors")) {
        Some(Value::Object(nested)) => nested,
        _ => map,
    };

    fields
        .iter()
        .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
        .filter_map(|(key, value)| messages_of(value).map(|m| (key.clone(), m)))
        .collect()
}

/// Flatten `"msg"` or `["msg", ...]` into one line
fn messages_of(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
        Value::Null | Value::Bool(_) => String::new(),
        other => other.to_string(),
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
