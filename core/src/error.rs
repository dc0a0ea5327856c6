//! Error types for the Referoo API client.
//!
//! # Design
//! Any status other than 200 lands in `Transport` with the raw status code.
//! Write operations also keep the response body, since the service explains
//! validation failures there. Everything else is a local failure: the
//! round-trip itself, JSON handling or configuration.

use thiserror::Error;

/// Errors returned by `RefereeClient`, `RefereeApi` and `ClientConfig`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a status other than 200.
    #[error("HTTP status {status}{}", body_suffix(.body))]
    Transport { status: u16, body: Option<String> },

    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("connection failed: {0}")]
    Connection(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// Client configuration is missing or malformed.
    #[error("configuration error: {0}")]
    Config(String),
}

fn body_suffix(body: &Option<String>) -> String {
    match body {
        Some(body) => format!(". Error: {body}"),
        None => String::new(),
    }
}

/// Alias for Result with our error type.
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// HTTP status carried by a `Transport` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Response body carried by a `Transport` error from a write operation.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Transport { body, .. } => body.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_exposes_status_and_body() {
        let err = ApiError::Transport {
            status: 422,
            body: Some("email is required".to_string()),
        };
        assert_eq!(err.status(), Some(422));
        assert_eq!(err.body(), Some("email is required"));
        assert_eq!(err.to_string(), "HTTP status 422. Error: email is required");
    }

    #[test]
    fn get_failure_message_has_status_only() {
        let err = ApiError::Transport {
            status: 404,
            body: None,
        };
        assert_eq!(err.to_string(), "HTTP status 404");
    }

    #[test]
    fn local_errors_have_no_status() {
        let err = ApiError::config("REFEROO_ACCESS_TOKEN is not set");
        assert_eq!(err.status(), None);
        assert_eq!(
            err.to_string(),
            "configuration error: REFEROO_ACCESS_TOKEN is not set"
        );
    }
}
