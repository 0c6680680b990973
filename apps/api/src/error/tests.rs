use axum::body::to_bytes;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use galley_core::AppError;
use serde_json::{Value, json};

use super::ApiError;

async fn render(error: AppError) -> (StatusCode, Value) {
    let response = ApiError(error).into_response();
    let status = response.status();
    let body = match to_bytes(response.into_body(), usize::MAX).await {
        Ok(body) => body,
        Err(error) => panic!("failed to read error body: {error}"),
    };

    (
        status,
        serde_json::from_slice(&body).unwrap_or(Value::Null),
    )
}

#[tokio::test]
async fn errors_map_to_statuses() {
    let cases = [
        (AppError::Validation("table is required".to_owned()), StatusCode::BAD_REQUEST),
        (AppError::Unauthorized("missing bearer token".to_owned()), StatusCode::UNAUTHORIZED),
        (AppError::Forbidden("blocked".to_owned()), StatusCode::FORBIDDEN),
        (AppError::NotFound("unknown portal".to_owned()), StatusCode::NOT_FOUND),
        (
            AppError::Configuration("records service is not configured".to_owned()),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
        (AppError::upstream("records vendor request failed"), StatusCode::BAD_GATEWAY),
        (
            AppError::Unavailable("identity provider unreachable".to_owned()),
            StatusCode::SERVICE_UNAVAILABLE,
        ),
    ];

    for (error, expected) in cases {
        let (status, _) = render(error).await;
        assert_eq!(status, expected);
    }
}

#[tokio::test]
async fn validation_message_is_returned_verbatim() {
    let (_, body) = render(AppError::Validation("table is required".to_owned())).await;

    assert_eq!(body, json!({"error": "table is required"}));
}

#[tokio::test]
async fn upstream_details_are_attached() {
    let (status, body) = render(AppError::Upstream {
        message: "records vendor returned status 422 Unprocessable Entity".to_owned(),
        details: Some(json!({"error": {"type": "INVALID_FILTER_BY_FORMULA"}})),
    })
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(
        body["details"],
        json!({"error": {"type": "INVALID_FILTER_BY_FORMULA"}})
    );
}

#[tokio::test]
async fn internal_errors_hide_their_cause() {
    let (status, body) = render(AppError::Internal("connection reset by peer".to_owned())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "internal server error"}));
}
