//! Error types for llm-relay
//!
//! Every failure is surfaced to the caller as a JSON body with an `error`
//! message and, where available, diagnostic detail such as the upstream
//! status and body. Nothing is retried.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

/// Message returned when the inbound message is missing or blank
pub const NO_MESSAGE: &str = "No message provided";

/// Message returned when Anthropic is requested without a credential
pub const ANTHROPIC_NOT_CONFIGURED: &str =
    "Anthropic provider requested but ANTHROPIC_API_KEY not set";

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    /// A required inbound field is missing or blank
    #[error("{0}")]
    Validation(String),

    /// The inbound body could not be read as a chat request
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// A credential required for the selected provider is missing
    #[error("{0}")]
    Configuration(String),

    /// The upstream could not be reached or did not answer in time
    #[error("Request exception: {details}")]
    Transport { details: String, timed_out: bool },

    /// The upstream answered with something that is not JSON
    #[error("Upstream did not return JSON (status {status})")]
    UpstreamNotJson { status: u16, details: String },

    /// The upstream JSON matched none of the known reply shapes
    #[error("Unexpected response shape (status {status})")]
    UnexpectedShape { status: u16, body: Value },

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Transport error from a failed reqwest call
    pub fn transport(error: &reqwest::Error) -> Self {
        AppError::Transport {
            details: error.to_string(),
            timed_out: error.is_timeout(),
        }
    }

    /// Short machine-friendly label, used for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::InvalidBody(_) => "invalid_body",
            AppError::Configuration(_) => "configuration_error",
            AppError::Transport { .. } => "transport_error",
            AppError::UpstreamNotJson { .. } => "upstream_not_json",
            AppError::UnexpectedShape { .. } => "unexpected_shape",
            AppError::Internal(_) => "internal_error",
        }
    }

    /// HTTP status returned to the caller
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidBody(_) | AppError::Configuration(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Transport { .. } | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::UpstreamNotJson { .. } | AppError::UnexpectedShape { .. } => {
                StatusCode::BAD_GATEWAY
            }
        }
    }

    /// JSON body returned to the caller
    pub fn body(&self) -> Value {
        match self {
            AppError::Validation(msg) | AppError::Configuration(msg) => json!({ "error": msg }),
            AppError::InvalidBody(details) => json!({
                "error": "Invalid request body",
                "details": details,
            }),
            AppError::Transport { details, .. } => json!({
                "error": "Request exception",
                "details": details,
            }),
            AppError::UpstreamNotJson { status, details } => json!({
                "error": "Upstream did not return JSON",
                "status": status,
                "details": details,
            }),
            AppError::UnexpectedShape { status, body } => json!({
                "error": "Unexpected response shape",
                "status": status,
                "body": body,
            }),
            AppError::Internal(_) => json!({ "error": "Internal server error" }),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.body())).into_response()
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
