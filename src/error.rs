//! Domain-specific error types for sdg-insights

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Main error type for the insight pipeline and its HTTP surface
#[derive(Error, Debug)]
pub enum InsightError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Unknown goal: {goal_id} (catalog covers 1..=17)")]
    Catalog { goal_id: u8 },

    #[error("Annotation error: {message}")]
    Annotation { message: String },

    #[error("PDF extraction error: {message}")]
    Pdf { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Timeout error: {operation} timed out after {timeout_ms}ms")]
    Timeout { operation: String, timeout_ms: u64 },

    #[error("I/O error: {message}")]
    Io { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<anyhow::Error> for InsightError {
    fn from(err: anyhow::Error) -> Self {
        InsightError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for InsightError {
    fn from(err: serde_json::Error) -> Self {
        InsightError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for InsightError {
    fn from(err: std::io::Error) -> Self {
        InsightError::Io {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for InsightError {
    fn from(err: reqwest::Error) -> Self {
        InsightError::Annotation {
            message: format!("HTTP request failed: {}", err),
        }
    }
}

/// Convert InsightError to an HTTP response
impl IntoResponse for InsightError {
    fn into_response(self) -> Response {
        let (status, label, details) = match self {
            InsightError::Config { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Configuration error",
                message,
            ),
            InsightError::Catalog { goal_id } => (
                StatusCode::NOT_FOUND,
                "Unknown goal",
                format!("goal {goal_id} is outside the catalog"),
            ),
            InsightError::Annotation { message } => {
                (StatusCode::BAD_GATEWAY, "Annotation error", message)
            }
            InsightError::Pdf { message } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "PDF extraction error",
                message,
            ),
            InsightError::Serialization { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Serialization error",
                message,
            ),
            InsightError::Timeout {
                operation,
                timeout_ms,
            } => (
                StatusCode::GATEWAY_TIMEOUT,
                "Operation timeout",
                format!("{operation} timed out after {timeout_ms}ms"),
            ),
            InsightError::Io { message } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "I/O error", message)
            }
            InsightError::Validation { message } => {
                (StatusCode::BAD_REQUEST, "Validation error", message)
            }
            InsightError::Internal { message } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error", message)
            }
        };

        let body = axum::Json(json!({
            "error": label,
            "details": details,
        }));
        (status, body).into_response()
    }
}

/// Result type alias for insight operations
pub type Result<T> = std::result::Result<T, InsightError>;
