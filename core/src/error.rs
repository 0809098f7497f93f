//! Error types for the items API client.
//!
//! # Design
//! Only two failure kinds matter to callers: no response at all
//! (`Transport`) and a non-2xx response (`Server`). Status codes are kept
//! for diagnostics but are not split into separate variants; a 401 and a 404
//! both surface the server's `error` message.

use serde::Deserialize;
use thiserror::Error;

/// Errors returned by `ItemsClient` parse methods and `ApiClient` calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No response was received: connection refused, DNS failure, broken body.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Server { status: u16, message: String },

    /// A 2xx body did not decode into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// Text suitable for showing to a user. For server failures this is the
    /// backend's own `error` message.
    pub fn message(&self) -> String {
        match self {
            ApiError::Server { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }

    /// Build a `Server` error from a non-2xx response body.
    pub(crate) fn from_response(status: u16, body: &str) -> Self {
        ApiError::Server {
            status,
            message: server_message(status, body),
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// `{"error": "..."}` wins; otherwise fall back to the raw body, then to the
/// status line.
fn server_message(status: u16, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return parsed.error;
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {status}")
    } else {
        trimmed.to_string()
    }
}
