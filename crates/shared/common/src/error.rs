//! Application error shared by the store service and the HTTP gateway.
//!
//! Errors render as `{"error": {"code", "message"}}` with a matching status.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::DomainError;
use serde::Serialize;
use thiserror::Error;

/// MongoDB server error code for unique index violations
#[cfg(feature = "database")]
pub const DUPLICATE_KEY_CODE: i32 = 11000;

/// Every failure a storefront operation can report to a client.
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing, malformed or rejected ID token
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Resource not found")]
    NotFound,

    /// Holds the entity, e.g. `Product P-1`
    #[error("{0} already exists")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    /// Throttling reported by the identity provider
    #[error("Too many requests")]
    TooManyRequests,

    #[cfg(feature = "database")]
    #[error("Database error")]
    Database(#[from] mongodb::error::Error),

    #[cfg(feature = "database")]
    #[error("Serialization error")]
    Serialization(#[from] mongodb::bson::ser::Error),

    /// Names the dependency that could not be reached
    #[error("Service unavailable")]
    ServiceUnavailable(String),

    #[error("Internal server error")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl AppError {
    /// HTTP status and machine-readable code sent to the client.
    fn classify(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
            AppError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::TooManyRequests => (StatusCode::TOO_MANY_REQUESTS, "TOO_MANY_REQUESTS"),
            #[cfg(feature = "database")]
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            #[cfg(feature = "database")]
            AppError::Serialization(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "SERIALIZATION_ERROR")
            }
            AppError::ServiceUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE")
            }
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    pub fn code(&self) -> &'static str {
        self.classify().1
    }

    pub fn status(&self) -> StatusCode {
        self.classify().0
    }

    /// Message safe to show a client. Server-side failures are logged and replaced.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Conflict(entity) if entity.ends_with("already exists") => entity.clone(),
            #[cfg(feature = "database")]
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            #[cfg(feature = "database")]
            AppError::Serialization(e) => {
                tracing::error!("Document serialization failed: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
            AppError::ServiceUnavailable(service) => {
                tracing::error!("{} is unreachable", service);
                format!("Service {} is unavailable", service)
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
        let (status, code) = self.classify();
        let body = ErrorResponse {
            error: ErrorBody {
                code,
                message: self.user_message(),
            },
        };

        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Database Write Errors (MongoDB)
// =============================================================================

#[cfg(feature = "database")]
impl AppError {
    /// Convert a failed write, turning unique index violations into a conflict on `entity`.
    pub fn from_write(err: mongodb::error::Error, entity: impl Into<String>) -> Self {
        if is_duplicate_key(&err) {
            AppError::Conflict(entity.into())
        } else {
            AppError::Database(err)
        }
    }
}

/// Check if a MongoDB error is a unique index violation.
#[cfg(feature = "database")]
pub fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};

    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            write_error.code == DUPLICATE_KEY_CODE
        }
        _ => false,
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AppError::Validation(msg),
            err @ DomainError::InsufficientStock { .. } => AppError::Validation(err.to_string()),
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::NotFound)
    }
}

/// Convenience constructors
impl AppError {
    pub fn conflict(entity: impl Into<String>) -> Self {
        AppError::Conflict(entity.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    pub fn service_unavailable(service: impl Into<String>) -> Self {
        AppError::ServiceUnavailable(service.into())
    }
}
