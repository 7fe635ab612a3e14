//! # API Errors
//!
//! What an HTTP client sees when a request fails.
//!
//! ## Mapping
//! ```text
//! ┌──────────────────────────────────────┬────────┬──────────────────────┐
//! │ Source                               │ Status │ code                 │
//! ├──────────────────────────────────────┼────────┼──────────────────────┤
//! │ ServiceError::NotFound               │  404   │ NOT_FOUND            │
//! │ ServiceError::Validation             │  400   │ VALIDATION_ERROR     │
//! │ DbError::ForeignKey / Check          │  400   │ VALIDATION_ERROR     │
//! │ DbError::UniqueViolation             │  409   │ CONFLICT             │
//! │ bad limit / id / path / query / body │  422   │ INVALID_REQUEST      │
//! │ other DbError                        │  500   │ DATABASE_ERROR       │
//! │ password hashing                     │  500   │ INTERNAL             │
//! └──────────────────────────────────────┴────────┴──────────────────────┘
//! ```
//!
//! Body: `{"code": "NOT_FOUND", "message": "Client not found: 7"}`.
//! Server-side failures are logged with their details and answered with a
//! generic message.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use digicheese_core::ValidationError;
use digicheese_db::DbError;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::services::ServiceError;

/// Machine-readable error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    ValidationError,
    InvalidRequest,
    Conflict,
    DatabaseError,
    Internal,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::InvalidRequest => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::DatabaseError | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Malformed request parameters (422).
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Conversions
// =============================================================================

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::new(ErrorCode::ValidationError, err.to_string())
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => ApiError::not_found(err.to_string()),
            DbError::UniqueViolation { ref field } => ApiError::new(
                ErrorCode::Conflict,
                format!("A record with this {} already exists", column_name(field)),
            ),
            DbError::ForeignKeyViolation { .. } => ApiError::new(
                ErrorCode::ValidationError,
                "Referenced record does not exist or is still in use",
            ),
            DbError::CheckViolation { .. } => ApiError::new(
                ErrorCode::ValidationError,
                "Value violates a data constraint",
            ),
            other => {
                error!(error = %other, "Database error");
                ApiError::new(ErrorCode::DatabaseError, "Database error")
            }
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(e) => e.into(),
            ServiceError::NotFound { .. } => ApiError::not_found(err.to_string()),
            ServiceError::Db(e) => e.into(),
            ServiceError::PasswordHash(reason) => {
                error!(reason = %reason, "Password hashing failed");
                ApiError::new(ErrorCode::Internal, "Internal server error")
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::invalid_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::invalid_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::invalid_request(rejection.body_text())
    }
}

/// `"users.email"` → `"email"`.
fn column_name(field: &str) -> &str {
    field.rsplit('.').next().unwrap_or(field)
}
