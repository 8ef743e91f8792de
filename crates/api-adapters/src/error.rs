//! Maps domain outcomes onto HTTP statuses. Validation failures carry
//! their field errors in the body; internal failures are logged and
//! masked.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use domains::AppError;

pub struct ApiError(pub AppError);

pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self.0 {
            AppError::NotFound(..) => (
                StatusCode::NOT_FOUND,
                json!({ "detail": self.0.to_string() }),
            ),
            AppError::Validation(fields) => {
                (StatusCode::BAD_REQUEST, json!({ "field_errors": fields }))
            }
            AppError::Unauthorized(_) => (
                StatusCode::UNAUTHORIZED,
                json!({ "detail": self.0.to_string() }),
            ),
            AppError::Forbidden(_) => (
                StatusCode::FORBIDDEN,
                json!({ "detail": self.0.to_string() }),
            ),
            AppError::Conflict(_) => (
                StatusCode::CONFLICT,
                json!({ "detail": self.0.to_string() }),
            ),
            AppError::Internal(reason) => {
                tracing::error!(%reason, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "detail": "internal server error" }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
