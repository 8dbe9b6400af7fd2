//! Rendering of application errors as JSON responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use orbis_shared::AppError;
use serde_json::json;

/// Handler error; renders as `{ "error": code, "message": msg }`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl<E> From<E> for ApiError
where
    E: Into<AppError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let message = if self.0.is_client_error() {
            tracing::debug!(error = %self.0, "request rejected");
            inner_message(&self.0)
        } else {
            tracing::error!(error = %self.0, "request failed");
            "An error occurred".to_string()
        };

        (
            status,
            Json(json!({
                "error": self.0.error_code(),
                "message": message,
            })),
        )
            .into_response()
    }
}

fn inner_message(err: &AppError) -> String {
    match err {
        AppError::NotFound(m)
        | AppError::Validation(m)
        | AppError::BusinessRule(m)
        | AppError::Conflict(m)
        | AppError::Database(m)
        | AppError::Internal(m) => m.clone(),
    }
}
