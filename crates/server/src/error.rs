//! Unified error handling.
//!
//! Provides a unified `AppError` type mapping every failure to an HTTP
//! status and a `{"message": ...}` JSON body. All route handlers return
//! `Result<T, AppError>`; nothing formats errors anywhere else.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;

/// Application-level error type for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad input shape or range.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Duplicate unique field.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Missing authentication.
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Invalid token, or valid identity lacking the required role.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Uniform error body: `{"message": "..."}`.
#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(
            self,
            Self::Database(_)
                | Self::Internal(_)
                | Self::Auth(AuthError::Repository(_) | AuthError::PasswordHash(_))
        ) {
            tracing::error!(error = %self, "Request error");
        }

        let status = match &self {
            Self::Validation(_) | Self::Conflict(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Auth(err) => match err {
                AuthError::EmailTaken | AuthError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::PasswordHash(_) | AuthError::Repository(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Validation(msg)
            | Self::Conflict(msg)
            | Self::Unauthenticated(msg)
            | Self::Forbidden(msg)
            | Self::NotFound(msg) => msg.clone(),
            Self::Auth(err) => match err {
                AuthError::EmailTaken => "Email already in use".to_string(),
                AuthError::InvalidEmail(e) => e.to_string(),
                AuthError::InvalidCredentials => "Invalid email or password".to_string(),
                AuthError::PasswordHash(_) | AuthError::Repository(_) => {
                    "Internal server error".to_string()
                }
            },
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
        };

        (status, Json(ErrorBody { message })).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
