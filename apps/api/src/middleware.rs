use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

use crate::error::ApiResult;
use crate::state::AppState;

pub async fn require_bearer_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let user = state
        .token_verification_service
        .verify_authorization(authorization)
        .await
        .inspect_err(|error| debug!(path = %request.uri().path(), error = %error, "bearer check failed"))?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
