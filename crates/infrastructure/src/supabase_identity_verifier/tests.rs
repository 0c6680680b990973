use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use axum::routing::get;
use galley_application::IdentityVerifier;
use galley_core::AppError;
use serde_json::json;

use super::SupabaseIdentityVerifier;
use crate::test_support::spawn_stub;

const SERVICE_KEY: &str = "service-role-key";

async fn user_endpoint(headers: HeaderMap) -> Response {
    let api_key = headers.get("apikey").and_then(|value| value.to_str().ok());
    let authorization = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok());

    if api_key != Some(SERVICE_KEY) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "missing apikey").into_response();
    }

    match authorization {
        Some("Bearer good-token") => {
            Json(json!({"id": "u1", "email": "cook@example.com"})).into_response()
        }
        Some("Bearer flaky-token") => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"msg": "invalid JWT"})),
        )
            .into_response(),
    }
}

async fn verifier() -> SupabaseIdentityVerifier {
    let base_url = spawn_stub(Router::new().route("/auth/v1/user", get(user_endpoint))).await;
    match SupabaseIdentityVerifier::new(reqwest::Client::new(), base_url.as_str(), SERVICE_KEY) {
        Ok(verifier) => verifier,
        Err(error) => panic!("failed to build verifier: {error}"),
    }
}

#[tokio::test]
async fn valid_token_resolves_user() {
    let verifier = verifier().await;

    let user = match verifier.verify_access_token("good-token").await {
        Ok(user) => user,
        Err(error) => panic!("expected verified user, got {error}"),
    };

    assert_eq!(user.user_id().as_str(), "u1");
    assert_eq!(user.email(), Some("cook@example.com"));
}

#[tokio::test]
async fn rejected_token_is_unauthorized() {
    let verifier = verifier().await;

    let result = verifier.verify_access_token("expired-token").await;

    assert!(matches!(result, Err(AppError::Unauthorized(_))));
}

#[tokio::test]
async fn provider_outage_is_unavailable() {
    let verifier = verifier().await;

    let result = verifier.verify_access_token("flaky-token").await;

    assert!(matches!(result, Err(AppError::Unavailable(_))));
}

#[tokio::test]
async fn unreachable_provider_is_unavailable() {
    let verifier = match SupabaseIdentityVerifier::new(
        reqwest::Client::new(),
        "http://127.0.0.1:9",
        SERVICE_KEY,
    ) {
        Ok(verifier) => verifier,
        Err(error) => panic!("failed to build verifier: {error}"),
    };

    let result = verifier.verify_access_token("good-token").await;

    assert!(matches!(result, Err(AppError::Unavailable(_))));
}
