use async_trait::async_trait;
use galley_application::IdentityVerifier;
use galley_core::{AppError, AppResult, UserId, VerifiedUser};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::warn;
use url::Url;

use crate::vendor_http::{endpoint, parse_base_url};

#[cfg(test)]
mod tests;

/// Identity verifier backed by the Supabase auth `user` endpoint.
#[derive(Clone)]
pub struct SupabaseIdentityVerifier {
    http_client: reqwest::Client,
    user_endpoint: Url,
    service_key: String,
}

#[derive(Debug, Deserialize)]
struct SupabaseUser {
    id: Option<String>,
    email: Option<String>,
}

impl SupabaseIdentityVerifier {
    /// Creates a verifier for one Supabase project.
    pub fn new(
        http_client: reqwest::Client,
        project_url: &str,
        service_key: impl Into<String>,
    ) -> AppResult<Self> {
        let base = parse_base_url("SUPABASE_URL", project_url)?;

        Ok(Self {
            http_client,
            user_endpoint: endpoint(&base, &["auth", "v1", "user"])?,
            service_key: service_key.into(),
        })
    }
}

#[async_trait]
impl IdentityVerifier for SupabaseIdentityVerifier {
    async fn verify_access_token(&self, access_token: &str) -> AppResult<VerifiedUser> {
        let response = self
            .http_client
            .get(self.user_endpoint.clone())
            .header("apikey", self.service_key.as_str())
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|error| {
                warn!(error = %error, "identity provider unreachable");
                AppError::Unavailable(format!("identity provider unreachable: {error}"))
            })?;

        let status = response.status();
        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            warn!(status = status.as_u16(), "identity provider failed");
            return Err(AppError::Unavailable(format!(
                "identity provider returned status {status}"
            )));
        }
        if !status.is_success() {
            return Err(AppError::Unauthorized("invalid or expired token".to_owned()));
        }

        let user = response.json::<SupabaseUser>().await.map_err(|error| {
            AppError::Unauthorized(format!("identity provider returned no user: {error}"))
        })?;
        let user_id = user
            .id
            .ok_or_else(|| AppError::Unauthorized("identity provider returned no user".to_owned()))
            .and_then(|id| {
                UserId::new(id).map_err(|_| {
                    AppError::Unauthorized("identity provider returned no user".to_owned())
                })
            })?;

        Ok(VerifiedUser::new(user_id, user.email))
    }
}
