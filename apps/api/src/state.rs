use galley_application::{ProxyService, SessionRegistry, TokenVerificationService};
use galley_core::AppError;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub service_name: String,
    pub token_verification_service: TokenVerificationService,
    pub proxy_service: ProxyService,
    pub session_registry: Option<SessionRegistry>,
}

impl AppState {
    /// Session registry, or a configuration error when no profile store is wired.
    pub fn session_registry(&self) -> Result<&SessionRegistry, AppError> {
        self.session_registry.as_ref().ok_or_else(|| {
            AppError::Configuration("profile database is not configured".to_owned())
        })
    }
}
