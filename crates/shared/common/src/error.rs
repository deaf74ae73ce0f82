//! Unified error handling.
//!
//! A single error type classified once at the call site and converted to
//! Axum HTTP responses for the gateway.

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::DomainError;
use serde::Serialize;
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication & Authorization
    #[error("{0}")]
    Unauthenticated(String),

    #[error("not enough rights")]
    Forbidden,

    #[error("Wrong email or password entered")]
    InvalidCredentials,

    #[error("this user (id = {0}) is deactivated")]
    AccountDeactivated(i32),

    // Business rejections
    #[error("User with such an email already exists")]
    DuplicateEmail,

    #[error("Incorrect role came from the request: {0}")]
    InvalidRole(String),

    #[error("user with this email does not exist")]
    EmailNotFound,

    #[error("Resource not found")]
    NotFound,

    // Validation
    #[error("{0}")]
    Validation(String),

    #[error("Incorrect data came from the request")]
    InvalidFields(BTreeMap<String, String>),

    #[error("Invalid input: {0}")]
    BadRequest(String),

    // External service errors
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Identity authority error: {0}")]
    Upstream(String),

    #[error("{0} is not supported")]
    Unsupported(&'static str),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body for HTTP
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<BTreeMap<String, String>>,
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthenticated(_) => "UNAUTHENTICATED",
            AppError::Forbidden => "FORBIDDEN",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::AccountDeactivated(_) => "ACCOUNT_DEACTIVATED",
            AppError::DuplicateEmail => "DUPLICATE_EMAIL",
            AppError::InvalidRole(_) => "INVALID_ROLE",
            AppError::EmailNotFound => "EMAIL_NOT_FOUND",
            AppError::NotFound => "NOT_FOUND",
            AppError::Validation(_) | AppError::InvalidFields(_) => "VALIDATION_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Persistence(_) => "PERSISTENCE_ERROR",
            AppError::Upstream(_) => "UPSTREAM_ERROR",
            AppError::Unsupported(_) => "UNSUPPORTED",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code.
    ///
    /// Insufficient rights answer 401, like every other authorization failure.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated(_)
            | AppError::Forbidden
            | AppError::InvalidCredentials
            | AppError::AccountDeactivated(_) => StatusCode::UNAUTHORIZED,
            AppError::DuplicateEmail
            | AppError::InvalidRole(_)
            | AppError::EmailNotFound
            | AppError::Validation(_)
            | AppError::InvalidFields(_)
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Unsupported(_) => StatusCode::NOT_IMPLEMENTED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::AccountDeactivated(_) => "this account is deactivated".to_string(),
            AppError::InvalidRole(_) => "Incorrect role came from the request".to_string(),

            AppError::Persistence(msg) => {
                tracing::error!("Persistence error: {}", msg);
                "A database error occurred".to_string()
            }
            AppError::Upstream(msg) => {
                tracing::error!("Identity authority error: {}", msg);
                format!("identity authority failure: {}", msg)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            _ => self.to_string(),
        }
    }
}

// =============================================================================
// HTTP Response (Axum)
// =============================================================================

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.user_message();
        let code = self.code().to_string();
        let fields = match self {
            AppError::InvalidFields(fields) => Some(fields),
            _ => None,
        };
        let body = ErrorResponse {
            error: ErrorBody {
                code,
                message,
                fields,
            },
        };

        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Database Error Conversion (SeaORM)
// =============================================================================

#[cfg(feature = "database")]
impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        AppError::Persistence(err.to_string())
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AppError::Validation(msg),
            DomainError::PolicyViolation(msg) => AppError::Validation(msg),
            DomainError::Hashing(msg) => AppError::Internal(format!("password hashing: {}", msg)),
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Convenience constructors
impl AppError {
    pub fn unauthenticated(msg: impl Into<String>) -> Self {
        AppError::Unauthenticated(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn persistence(msg: impl Into<String>) -> Self {
        AppError::Persistence(msg.into())
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        AppError::Upstream(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
