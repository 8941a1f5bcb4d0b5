//! Error types for the client data layer.
//!
//! Provides the failure taxonomy shared by the HTTP adapter, the resource
//! cache, the mutation coordinator and the form pipeline, plus the mapping
//! from HTTP status to error class and the user-facing message for each.

use thiserror::Error;

use crate::form::ValidationErrors;

/// Errors surfaced by the client data layer.
///
/// `Clone` so that a cached error state can be handed to every waiter and
/// subscriber of a key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The request never produced a response (connect, timeout, body read).
    #[error("Network error: {message}")]
    Network { message: String },

    /// The server answered with a non-2xx status other than 401/403.
    #[error("HTTP error: {status} - {body}")]
    Http { status: u16, body: String },

    /// The server rejected the credential (401/403).
    #[error("Authorization failed: {status} - {body}")]
    Auth { status: u16, body: String },

    /// A 2xx body did not match the expected record shape.
    #[error("Unexpected response: {message}")]
    Decode { message: String },

    /// Client-side field rule violations; never sent over the wire.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Durable client storage could not be read or written.
    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl ClientError {
    /// Classify a non-2xx response.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => ClientError::Auth { status, body },
            _ => ClientError::Http { status, body },
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        ClientError::Network {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        ClientError::Decode {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        ClientError::Storage {
            message: message.into(),
        }
    }

    /// HTTP status, when the server responded at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } | ClientError::Auth { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the session credential must be cleared and the user
    /// asked to sign in again.
    pub fn is_auth(&self) -> bool {
        matches!(self, ClientError::Auth { .. })
    }

    /// Stable error tag for logs and machine-readable output.
    pub fn error_type(&self) -> &'static str {
        match self {
            ClientError::Network { .. } => "network_error",
            ClientError::Http { .. } => "http_error",
            ClientError::Auth { .. } => "auth_error",
            ClientError::Decode { .. } => "decode_error",
            ClientError::Validation(_) => "validation_error",
            ClientError::Storage { .. } => "storage_error",
        }
    }

    /// Text for a transient notification.
    ///
    /// Prefers the `message` (or `error`) field of a JSON error body.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Network { .. } => "Could not reach the server".to_string(),
            ClientError::Http { status, body } => server_message(body)
                .unwrap_or_else(|| format!("Request failed ({})", status)),
            ClientError::Auth { body, .. } => server_message(body)
                .unwrap_or_else(|| "Session expired, please sign in again".to_string()),
            ClientError::Decode { .. } => "The server sent an unexpected response".to_string(),
            ClientError::Validation(_) => "Please fix the highlighted fields".to_string(),
            ClientError::Storage { .. } => "Local storage is unavailable".to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::network(err.to_string())
    }
}

impl From<ValidationErrors> for ClientError {
    fn from(errors: ValidationErrors) -> Self {
        ClientError::Validation(errors)
    }
}

fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|field| value.get(*field).and_then(|v| v.as_str()))
        .map(str::to_string)
}
