use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, State};
use galley_core::VerifiedUser;
use serde_json::Value;

use crate::dto::{RecordsCreateRequest, RecordsQueryRequest, WorkflowExecuteRequest};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn records_query_handler(
    State(state): State<AppState>,
    Extension(user): Extension<VerifiedUser>,
    payload: Result<Json<RecordsQueryRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(payload) = payload?;
    let result = state
        .proxy_service
        .records_query(&user, payload.into())
        .await?;

    Ok(Json(result))
}

pub async fn records_create_handler(
    State(state): State<AppState>,
    Extension(user): Extension<VerifiedUser>,
    payload: Result<Json<RecordsCreateRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(payload) = payload?;
    let result = state
        .proxy_service
        .records_create(&user, payload.into())
        .await?;

    Ok(Json(result))
}

pub async fn workflow_execute_handler(
    State(state): State<AppState>,
    Extension(user): Extension<VerifiedUser>,
    payload: Result<Json<WorkflowExecuteRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(payload) = payload?;
    let result = state
        .proxy_service
        .workflow_execute(&user, payload.into())
        .await?;

    Ok(Json(result))
}
