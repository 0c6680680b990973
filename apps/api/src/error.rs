use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use galley_core::AppError;
use serde::Serialize;
use serde_json::Value;
use tracing::error;
use ts_rs::TS;

#[cfg(test)]
mod tests;

/// API error payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/error-response.ts"
)]
pub struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(type = "unknown")]
    details: Option<Value>,
}

/// HTTP API error wrapper around core application errors.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(AppError::Validation(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, details) = match self.0 {
            AppError::Validation(message) => (StatusCode::BAD_REQUEST, message, None),
            AppError::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message, None),
            AppError::Forbidden(message) => (StatusCode::FORBIDDEN, message, None),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message, None),
            AppError::Configuration(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, message, None)
            }
            AppError::Upstream { message, details } => (StatusCode::BAD_GATEWAY, message, details),
            AppError::Unavailable(message) => (StatusCode::SERVICE_UNAVAILABLE, message, None),
            AppError::Internal(message) => {
                error!(error = %message, "internal error while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_owned(),
                    None,
                )
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: message,
                details,
            }),
        )
            .into_response()
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;
