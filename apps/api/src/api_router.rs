use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post, put};
use galley_core::AppError;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

mod cors;


/// Alternate base path some deployments route the API through.
const BRAIN_PREFIX: &str = "/api/brain";

pub fn build_router(app_state: AppState, allowed_origins: &[String]) -> Result<Router, AppError> {
    let api_routes = api_routes(app_state.clone());

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .nest("/api", api_routes.clone())
        .nest(BRAIN_PREFIX, api_routes)
        .layer(cors::build_cors_layer(allowed_origins)?)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state))
}

fn api_routes(app_state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .route(
            "/airtable/query",
            post(handlers::proxy::records_query_handler),
        )
        .route(
            "/records/query",
            post(handlers::proxy::records_query_handler),
        )
        .route(
            "/airtable/create",
            post(handlers::proxy::records_create_handler),
        )
        .route(
            "/records/create",
            post(handlers::proxy::records_create_handler),
        )
        .route(
            "/n8n/execute",
            post(handlers::proxy::workflow_execute_handler),
        )
        .route(
            "/workflow/execute",
            post(handlers::proxy::workflow_execute_handler),
        )
        .route("/session", get(handlers::session::get_session_handler))
        .route(
            "/session/refresh",
            post(handlers::session::refresh_session_handler),
        )
        .route(
            "/session/active-location",
            put(handlers::session::set_active_location_handler),
        )
        .route(
            "/session/active-brand",
            put(handlers::session::set_active_brand_handler),
        )
        .route(
            "/session/intro-seen",
            put(handlers::session::mark_intro_seen_handler),
        )
        .route(
            "/session/sign-out",
            post(handlers::session::sign_out_handler),
        )
        .route(
            "/portals/{portal}/gate",
            get(handlers::portals::portal_gate_handler),
        )
        .route_layer(from_fn_with_state(
            app_state,
            middleware::require_bearer_auth,
        ));

    Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(protected_routes)
}
