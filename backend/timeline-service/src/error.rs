//! Error types for the timeline service
//!
//! Every service operation returns one of the typed kinds below; the
//! `ResponseError` impl maps each kind to an HTTP response so handlers
//! never build error payloads themselves.

use actix_web::{http::StatusCode, HttpResponse};
use thiserror::Error;

/// Result type for timeline-service operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// Referenced post, comment or user is absent
    #[error("not found: {0}")]
    NotFound(String),

    /// Actor is not the owner of the resource it tries to mutate
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Field content failed validation (length, emptiness, format)
    #[error("validation error: {0}")]
    Validation(String),

    /// Duplicate resource (e.g. email already registered)
    #[error("conflict: {0}")]
    Conflict(String),

    /// Unexpected database failure, surfaced opaquely
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Any other internal failure
    #[error("internal error: {0}")]
    Internal(String),
}

impl actix_web::error::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        // Do not leak database details to API clients
        let message = match self {
            AppError::Database(err) => {
                tracing::error!(error = %err, "database error");
                "internal server error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(status).json(serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        }))
    }
}
