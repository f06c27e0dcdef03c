//! The `{success, data|message}` response envelope and error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use tracing::error;

use iafa_shared::AppError;

/// Handler result type: either an enveloped success or a mapped error.
pub type ApiResult<T> = Result<T, ApiError>;

/// Wraps `data` in the success envelope.
pub fn success<T: Serialize>(data: T) -> Response {
    (
        StatusCode::OK,
        Json(json!({ "success": true, "data": data })),
    )
        .into_response()
}

/// As [`success`], but with 201 Created.
pub fn created<T: Serialize>(data: T) -> Response {
    (
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": data })),
    )
        .into_response()
}

/// An application error crossing the HTTP boundary.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(error = %err, "request failed");
        }
        // Storage details stay out of client responses.
        let message = match &err {
            AppError::Storage(_) | AppError::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };
        (
            status,
            Json(json!({
                "success": false,
                "code": err.error_code(),
                "message": message,
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_details_are_not_leaked() {
        let err = ApiError(AppError::Storage("connection refused to 10.0.0.5".into()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_maps_to_400() {
        let err = ApiError(AppError::Validation("amount must be positive".into()));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
