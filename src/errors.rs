use std::sync::atomic::{AtomicBool, Ordering};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::error::{DbErr, SqlErr};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

/// When enabled, 5xx responses carry the underlying error text in `errors`.
/// Only flipped on for development-like environments at startup.
static EXPOSE_INTERNAL: AtomicBool = AtomicBool::new(false);

pub fn expose_internal_errors(enabled: bool) {
    EXPOSE_INTERNAL.store(enabled, Ordering::Relaxed);
}

fn internal_errors_exposed() -> bool {
    EXPOSE_INTERNAL.load(Ordering::Relaxed)
}

/// Failure envelope returned by every error path
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "success": false,
    "message": "Not found: product 42"
}))]
pub struct ErrorBody {
    #[schema(example = false)]
    pub success: bool,
    /// Human-readable error description
    #[schema(example = "Not found: product 42")]
    pub message: String,
    /// Field-level validation failures, or internal detail in development mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed")]
    ValidationError(Vec<String>),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),

    #[error("A shift is already open")]
    ShiftAlreadyOpen,

    #[error("Shift is not open: {0}")]
    ShiftNotOpen(String),

    #[error("Invalid reading: {0}")]
    InvalidReading(String),

    #[error("Hash error: {0}")]
    HashError(String),

    #[error("Token error: {0}")]
    TokenError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        let details = err
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map(|m| format!("{}: {}", field, m))
                        .unwrap_or_else(|| format!("{}: invalid value", field))
                })
            })
            .collect();
        ServiceError::ValidationError(details)
    }
}

impl ServiceError {
    /// Returns the HTTP status code for this error.
    /// This is the single source of truth for error-to-status mapping.
    pub fn status_code(&self) -> StatusCode {
        match self {
            // Constraint violations surface as client errors; anything else
            // from the store is an internal failure.
            Self::DatabaseError(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_))
                | Some(SqlErr::ForeignKeyConstraintViolation(_)) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ValidationError(_)
            | Self::InvalidInput(_)
            | Self::InsufficientStock(_)
            | Self::ShiftAlreadyOpen
            | Self::ShiftNotOpen(_)
            | Self::InvalidReading(_) => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials | Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::HashError(_) | Self::TokenError(_) | Self::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns the error message suitable for HTTP responses.
    /// Internal errors return generic messages to avoid leaking implementation details.
    pub fn response_message(&self) -> String {
        match self {
            Self::DatabaseError(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    "A record with those values already exists".to_string()
                }
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                    "Invalid reference to a related record".to_string()
                }
                _ => "Database error".to_string(),
            },
            Self::HashError(_) | Self::TokenError(_) | Self::InternalError(_) => {
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let errors = match &self {
            ServiceError::ValidationError(details) => Some(details.clone()),
            _ if status == StatusCode::INTERNAL_SERVER_ERROR && internal_errors_exposed() => {
                Some(vec![self.to_string()])
            }
            _ => None,
        };

        let body = ErrorBody {
            success: false,
            message: self.response_message(),
            errors,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn status_code_mapping() {
        assert_eq!(
            ServiceError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::InvalidInput("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ServiceError::Unauthenticated("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ServiceError::Forbidden("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ServiceError::InsufficientStock("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::ShiftAlreadyOpen.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::ShiftNotOpen("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::InvalidReading("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::InternalError("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn response_message_hides_internal_details() {
        assert_eq!(
            ServiceError::HashError("argon2 params".into()).response_message(),
            "Internal server error"
        );
        assert_eq!(
            ServiceError::InternalError("pool exhausted".into()).response_message(),
            "Internal server error"
        );

        // User-facing errors keep their actual message
        assert_eq!(
            ServiceError::NotFound("product 42".into()).response_message(),
            "Not found: product 42"
        );
        assert_eq!(
            ServiceError::ShiftAlreadyOpen.response_message(),
            "A shift is already open"
        );
    }

    #[tokio::test]
    async fn error_response_uses_failure_envelope() {
        let response = ServiceError::NotFound("missing".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: ErrorBody = serde_json::from_slice(&body).unwrap();
        assert!(!payload.success);
        assert_eq!(payload.message, "Not found: missing");
        assert!(payload.errors.is_none());
    }

    #[tokio::test]
    async fn validation_error_carries_field_details() {
        let response =
            ServiceError::ValidationError(vec!["nombre: too short".into()]).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: ErrorBody = serde_json::from_slice(&body).unwrap();
        assert_eq!(payload.errors, Some(vec!["nombre: too short".to_string()]));
    }
}
