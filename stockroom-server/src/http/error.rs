//! API error types with IntoResponse
//!
//! Every failure renders as `{ "error": <message> }`. Storage details are
//! logged here and never echoed beyond their message.

use std::fmt::Display;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::DbError;
use crate::models::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Input rejected before touching storage (400)
    Validation(ValidationError),

    /// Resource not found (404)
    NotFound { resource: &'static str, id: String },

    /// Known path, unsupported method (405)
    MethodNotAllowed,

    /// Unique constraint violated (409)
    Conflict { message: String },

    /// Uncategorised storage failure on a single-entity route (400)
    BadRequest { message: String },

    /// Uncategorised failure on a listing route (500, logged)
    Internal { message: String },
}

impl ApiError {
    pub fn not_found(resource: &'static str, id: impl Display) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    /// Translate a storage failure from a read-only listing.
    ///
    /// Uncategorised failures become a generic 500 instead of echoing
    /// the storage message.
    pub fn listing(e: DbError) -> Self {
        match e {
            DbError::Other(message) => Self::Internal { message },
            other => other.into(),
        }
    }
}

fn conflict_message(field: &str) -> String {
    match field {
        "email" => "email already registered".to_owned(),
        "userId" => "user already has a store".to_owned(),
        other => format!("duplicate value for {}", other),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Validation(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            Self::NotFound { resource, id } => (
                StatusCode::NOT_FOUND,
                format!("{} '{}' not found", resource, id),
            ),
            Self::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "method not allowed".to_owned(),
            ),
            Self::Conflict { message } => (StatusCode::CONFLICT, message),
            Self::BadRequest { message } => {
                tracing::warn!("Storage error: {}", message);
                (StatusCode::BAD_REQUEST, message)
            }
            Self::Internal { message } => {
                // Log the actual error, return generic message
                tracing::error!("Internal error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "an internal error occurred".to_owned(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::UniqueViolation { field } => Self::Conflict {
                message: conflict_message(field),
            },
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            DbError::Other(message) => Self::BadRequest { message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn render(err: ApiError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn validation_error_is_400() {
        let (status, body) = render(ValidationError::Empty { field: "name" }.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "name cannot be empty" }));
    }

    #[tokio::test]
    async fn unique_violation_is_409() {
        let (status, body) = render(DbError::UniqueViolation { field: "email" }.into()).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body, json!({ "error": "email already registered" }));
    }

    #[tokio::test]
    async fn not_found_is_404() {
        let (status, body) = render(DbError::not_found("store", 3).into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "store '3' not found" }));
    }

    #[tokio::test]
    async fn method_not_allowed_is_405() {
        let (status, body) = render(ApiError::MethodNotAllowed).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, json!({ "error": "method not allowed" }));
    }

    #[tokio::test]
    async fn uncategorised_storage_error_is_400_with_message() {
        let (status, body) = render(DbError::Other("deadlock detected".into()).into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "deadlock detected" }));
    }

    #[tokio::test]
    async fn listing_failure_hides_storage_message() {
        let (status, body) = render(ApiError::listing(DbError::Other("boom".into()))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "an internal error occurred" }));
    }

    #[tokio::test]
    async fn listing_keeps_categorised_errors() {
        let err = ApiError::listing(DbError::not_found("user", 1));
        assert!(matches!(err, ApiError::NotFound { .. }));
    }
}
