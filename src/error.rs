//! Error types for the search proxy
//!
//! Provides unified error handling using thiserror. Every variant maps to a
//! JSON response body so no failure escapes the request that caused it.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Gateway Error Enum ==
/// Unified error type for the search proxy.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// One or more required query parameters are missing or malformed
    #[error("{0}")]
    Validation(String),

    /// The upstream credential is not configured
    #[error("API key not configured: {0}")]
    Configuration(String),

    /// The upstream service answered with a non-success status
    #[error("Upstream API error ({status})")]
    Upstream { status: u16, body: String },

    /// The client exceeded its request allowance for the current window
    #[error("Too many requests, please try again later.")]
    RateLimited { retry_after_secs: u64 },

    /// Anything else: transport failures, undecodable bodies
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl GatewayError {
    /// Builds a validation error naming every missing field.
    pub fn missing_fields(fields: &[&str]) -> Self {
        GatewayError::Validation(format!(
            "Missing required parameters: {}",
            fields.join(", ")
        ))
    }

    /// HTTP status the error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
            GatewayError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            GatewayError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            GatewayError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Unexpected(err.to_string())
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Unexpected(format!("Invalid upstream response: {}", err))
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match &self {
            GatewayError::Validation(msg) => json!({ "error": msg }),
            GatewayError::Configuration(msg) => json!({
                "error": "API key not configured",
                "message": msg,
            }),
            GatewayError::Upstream { status, body } => json!({
                "error": "Upstream API error",
                "status": status,
                "details": body,
            }),
            GatewayError::RateLimited { .. } => json!({ "error": self.to_string() }),
            GatewayError::Unexpected(msg) => json!({
                "error": "Internal server error",
                "message": msg,
            }),
        };

        let mut response = (status, Json(body)).into_response();
        if let GatewayError::RateLimited { retry_after_secs } = self {
            if let Ok(value) = HeaderValue::from_str(&retry_after_secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        response
    }
}

// == Result Type Alias ==
/// Convenience Result type for the search proxy.
pub type Result<T> = std::result::Result<T, GatewayError>;
