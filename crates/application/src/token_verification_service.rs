use std::sync::Arc;

use galley_core::{AppError, AppResult, VerifiedUser};
use tracing::{debug, error};

use crate::IdentityVerifier;

const BEARER_SCHEME: &str = "bearer";

/// Application service gating proxy calls on a verified bearer token.
///
/// Without a configured identity provider every call is denied.
#[derive(Clone)]
pub struct TokenVerificationService {
    verifier: Option<Arc<dyn IdentityVerifier>>,
}

impl TokenVerificationService {
    /// Creates the service; `None` means the identity provider is unconfigured.
    #[must_use]
    pub fn new(verifier: Option<Arc<dyn IdentityVerifier>>) -> Self {
        Self { verifier }
    }

    /// Verifies the raw `Authorization` header value.
    pub async fn verify_authorization(&self, authorization: Option<&str>) -> AppResult<VerifiedUser> {
        let token = parse_bearer_token(authorization)?;

        let Some(verifier) = &self.verifier else {
            error!("identity provider is not configured; denying request");
            return Err(AppError::Configuration(
                "identity provider is not configured".to_owned(),
            ));
        };

        let user = verifier.verify_access_token(token).await?;
        debug!(user_id = %user.user_id(), "bearer token verified");
        Ok(user)
    }
}

/// Extracts the token from a `Bearer <token>` header value.
pub fn parse_bearer_token(authorization: Option<&str>) -> AppResult<&str> {
    let header = authorization
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_owned()))?;

    let (scheme, token) = header
        .split_once(char::is_whitespace)
        .ok_or_else(|| AppError::Unauthorized("malformed authorization header".to_owned()))?;

    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return Err(AppError::Unauthorized(
            "authorization scheme must be Bearer".to_owned(),
        ));
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AppError::Unauthorized("missing bearer token".to_owned()));
    }

    Ok(token)
}
