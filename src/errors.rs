use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("bad request: {message}")]
    BadRequest {
        code: &'static str,
        message: &'static str,
    },
    #[error("not found: {message}")]
    NotFound { code: &'static str, message: String },
    #[error("upstream failure: {message}")]
    Upstream { code: &'static str, message: String },
}

/// Failures talking to the provider registry (or a forwarding service).
///
/// A missing provider is never one of these; lookups report it as `Ok(None)`.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("NPI API unavailable: {reason}")]
    Unavailable { reason: String },
    #[error("NPI API returned error: {status}")]
    Status { status: u16 },
    #[error("NPI API rejected the query: {message}")]
    Rejected { message: String },
    #[error("NPI API response did not match the expected schema: {reason}")]
    SchemaMismatch { reason: String },
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub details: serde_json::Value,
}

impl AppError {
    pub fn bad_request(code: &'static str, message: &'static str) -> Self {
        Self::BadRequest { code, message }
    }

    pub fn not_found(code: &'static str, message: impl Into<String>) -> Self {
        Self::NotFound {
            code,
            message: message.into(),
        }
    }
}

impl From<UpstreamError> for AppError {
    fn from(err: UpstreamError) -> Self {
        Self::Upstream {
            code: "upstream_error",
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::SchemaMismatch {
                reason: err.to_string(),
            };
        }

        match err.status() {
            Some(status) => Self::Status {
                status: status.as_u16(),
            },
            None => Self::Unavailable {
                reason: err.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::BadRequest { code, message } => {
                (StatusCode::BAD_REQUEST, code, message.to_string())
            }
            Self::NotFound { code, message } => (StatusCode::NOT_FOUND, code, message),
            Self::Upstream { code, message } => {
                tracing::warn!(error = %message, "request failed with upstream error");
                (StatusCode::BAD_GATEWAY, code, message)
            }
        };

        (
            status,
            Json(ErrorResponse {
                code: code.to_string(),
                message,
                details: json!({}),
            }),
        )
            .into_response()
    }
}
