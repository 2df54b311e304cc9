//! Error types for the voicemail relay.

use axum::Json;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

/// Top-level error type for the relay.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Inbound webhook body could not be read or decoded.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("Failed to read request body: {0}")]
    Body(String),

    #[error("Invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid form body: {0}")]
    Form(String),

    #[error("Webhook body must be a JSON object")]
    NotAnObject,
}

/// Speech-to-text failures. Never fatal to a webhook invocation.
#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("Failed to download audio: {0}")]
    Download(String),

    #[error("{provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("{provider} API error ({status}): {body}")]
    Api {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("Failed to parse {provider} response: {reason}")]
    InvalidResponse { provider: String, reason: String },
}

/// Email delivery failures. Always fatal to a webhook invocation.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("{provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("{provider} API error ({status}): {body}")]
    Api {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("{provider} non-JSON response: {body}")]
    InvalidResponse { provider: String, body: String },
}

/// Outcome classes of a webhook invocation that end in a non-200 response.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("No recipient configured for this number")]
    NoRecipient,

    #[error(transparent)]
    Payload(#[from] PayloadError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

impl WebhookError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::NoRecipient => StatusCode::BAD_REQUEST,
            Self::Payload(_) | Self::Delivery(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            Self::MethodNotAllowed | Self::NoRecipient => {
                serde_json::json!({ "error": self.to_string() })
            }
            Self::Payload(_) | Self::Delivery(_) => serde_json::json!({
                "error": "Internal server error",
                "message": self.to_string(),
            }),
        };
        if matches!(self, Self::MethodNotAllowed) {
            return (status, [(header::ALLOW, "POST")], Json(body)).into_response();
        }
        (status, Json(body)).into_response()
    }
}

/// Result type alias for the relay.
pub type Result<T> = std::result::Result<T, Error>;
