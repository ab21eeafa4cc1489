//! HTTP error handling and response types.
//!
//! Every error body has a single `detail` key: a string for not-found and
//! fault responses, a list of [`FieldError`] for validation failures.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

use crate::api::FieldError;
use crate::db::RepositoryError;

pub const ITEM_NOT_FOUND: &str = "Item not found";
const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

/// Error body carrying a plain message.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    pub detail: String,
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// No item stored under the requested id
    NotFound,
    /// Request failed schema validation
    Validation(Vec<FieldError>),
    /// Body sent without a JSON content type
    UnsupportedMediaType,
    /// Request was rejected before validation (body could not be read)
    Rejected { status: StatusCode, detail: String },
    /// Storage fault
    Repository(RepositoryError),
}

impl AppError {
    pub fn validation(error: FieldError) -> Self {
        AppError::Validation(vec![error])
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::Rejected { status, .. } => *status,
            AppError::Repository(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            AppError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match self {
            AppError::Validation(errors) => {
                return (status, Json(json!({ "detail": errors }))).into_response();
            }
            AppError::NotFound => ITEM_NOT_FOUND.to_string(),
            AppError::UnsupportedMediaType => {
                "Expected request with `Content-Type: application/json`".to_string()
            }
            AppError::Rejected { detail, .. } => detail,
            AppError::Repository(e) if e.is_not_found() => ITEM_NOT_FOUND.to_string(),
            AppError::Repository(e) => {
                tracing::error!(error = %e, retryable = e.is_retryable(), "Storage fault");
                INTERNAL_SERVER_ERROR.to_string()
            }
        };

        (status, Json(ErrorDetail { detail })).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

impl From<Vec<FieldError>> for AppError {
    fn from(errors: Vec<FieldError>) -> Self {
        AppError::Validation(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(error: AppError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_not_found_body() {
        let (status, body) = body_json(AppError::NotFound).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"detail": "Item not found"}));
    }

    #[tokio::test]
    async fn test_validation_body_lists_field_errors() {
        let (status, body) = body_json(AppError::validation(FieldError::missing("title"))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["detail"][0]["loc"], json!(["body", "title"]));
        assert_eq!(body["detail"][0]["type"], "missing");
    }

    #[tokio::test]
    async fn test_repository_fault_is_not_leaked() {
        let err = RepositoryError::connection("password authentication failed for user items");
        let (status, body) = body_json(err.into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"detail": "Internal Server Error"}));
    }

    #[tokio::test]
    async fn test_repository_not_found_maps_to_404() {
        let (status, _) = body_json(RepositoryError::not_found("gone").into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
