use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use galley_application::AccessContext;
use galley_core::VerifiedUser;
use tracing::info;

use crate::dto::{SessionResponse, SetActiveRequest, SetActiveResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn get_session_handler(
    State(state): State<AppState>,
    Extension(user): Extension<VerifiedUser>,
) -> ApiResult<Json<SessionResponse>> {
    let resolver = state.session_registry()?.open(user.user_id()).await;
    Ok(Json(SessionResponse::from(resolver.snapshot().await)))
}

pub async fn refresh_session_handler(
    State(state): State<AppState>,
    Extension(user): Extension<VerifiedUser>,
) -> ApiResult<Json<SessionResponse>> {
    let resolver = state.session_registry()?.refresh(user.user_id()).await;
    Ok(Json(SessionResponse::from(resolver.snapshot().await)))
}

pub async fn set_active_location_handler(
    State(state): State<AppState>,
    Extension(user): Extension<VerifiedUser>,
    payload: Result<Json<SetActiveRequest>, JsonRejection>,
) -> ApiResult<Json<SetActiveResponse>> {
    let Json(payload) = payload?;
    let resolver = state.session_registry()?.open(user.user_id()).await;
    let accepted = resolver.set_active_location(payload.id.as_str()).await;

    Ok(Json(SetActiveResponse {
        accepted,
        session: SessionResponse::from(resolver.snapshot().await),
    }))
}

pub async fn set_active_brand_handler(
    State(state): State<AppState>,
    Extension(user): Extension<VerifiedUser>,
    payload: Result<Json<SetActiveRequest>, JsonRejection>,
) -> ApiResult<Json<SetActiveResponse>> {
    let Json(payload) = payload?;
    let resolver = state.session_registry()?.open(user.user_id()).await;
    let accepted = resolver.set_active_brand(payload.id.as_str()).await;

    Ok(Json(SetActiveResponse {
        accepted,
        session: SessionResponse::from(resolver.snapshot().await),
    }))
}

pub async fn mark_intro_seen_handler(
    State(state): State<AppState>,
    Extension(user): Extension<VerifiedUser>,
) -> ApiResult<StatusCode> {
    let resolver = state.session_registry()?.open(user.user_id()).await;
    resolver.mark_intro_seen().await;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn sign_out_handler(
    State(state): State<AppState>,
    Extension(user): Extension<VerifiedUser>,
) -> ApiResult<StatusCode> {
    state.session_registry()?.close(user.user_id()).await;
    info!(user_id = %user.user_id(), "session closed by client");
    Ok(StatusCode::NO_CONTENT)
}
