use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;

use crate::validation::FieldError;

/// Request-terminal failures. Validation errors carry the offending field;
/// storage-level integrity violations surface as generic conflicts or 500s.
#[derive(Debug)]
pub enum ApiError {
    /// Per-field derive-level failures from the `validator` crate.
    Payload(validator::ValidationErrors),
    /// A cross-field domain rule was violated.
    Validation(FieldError),
    /// Duplicate-key conflict (e.g. second review for the same pair).
    Conflict(FieldError),
    NotFound(&'static str),
    Unauthorized,
    Database(sqlx::Error),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Payload(e) => write!(f, "invalid payload: {}", e),
            ApiError::Validation(e) => write!(f, "validation failed: {}", e),
            ApiError::Conflict(e) => write!(f, "conflict: {}", e),
            ApiError::NotFound(what) => write!(f, "{} not found", what),
            ApiError::Unauthorized => write!(f, "authentication required"),
            ApiError::Database(e) => write!(f, "database error: {}", e),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Payload(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Payload(e) => HttpResponse::BadRequest().json(e),
            ApiError::Validation(e) | ApiError::Conflict(e) => HttpResponse::build(
                self.status_code(),
            )
            .json(json!({ "field": e.field, "error": e.message })),
            ApiError::NotFound(what) => {
                HttpResponse::NotFound().json(json!({ "error": format!("{} not found", what) }))
            }
            ApiError::Unauthorized => HttpResponse::Unauthorized()
                .json(json!({ "error": "Authentication credentials were not provided." })),
            ApiError::Database(e) => {
                log::error!("database error: {}", e);
                HttpResponse::InternalServerError().json(json!({ "error": "Database error" }))
            }
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(e: validator::ValidationErrors) -> Self {
        ApiError::Payload(e)
    }
}

impl From<FieldError> for ApiError {
    fn from(e: FieldError) -> Self {
        ApiError::Validation(e)
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Database(e)
    }
}

/// Maps a unique-index violation on insert to a 409 with the given field
/// error; everything else stays a generic database failure.
pub fn conflict_on_unique(e: sqlx::Error, conflict: FieldError) -> ApiError {
    match e.as_database_error().map(|d| d.kind()) {
        Some(sqlx::error::ErrorKind::UniqueViolation) => ApiError::Conflict(conflict),
        _ => ApiError::Database(e),
    }
}
