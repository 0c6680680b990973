use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, Path, State};
use galley_core::VerifiedUser;
use galley_domain::Portal;

use crate::dto::GateResponse;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn portal_gate_handler(
    State(state): State<AppState>,
    Extension(user): Extension<VerifiedUser>,
    Path(portal): Path<String>,
) -> ApiResult<Json<GateResponse>> {
    let portal = Portal::from_str(portal.as_str())?;
    let resolver = state.session_registry()?.open(user.user_id()).await;
    let decision = resolver.gate(portal).await;

    Ok(Json(GateResponse::new(portal, decision)))
}
