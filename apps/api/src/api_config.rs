use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use galley_core::AppError;
use tracing::warn;
use tracing_subscriber::EnvFilter;


const DEFAULT_AIRTABLE_API_URL: &str = "https://api.airtable.com";
const DEFAULT_PREFERENCE_KEY_PREFIX: &str = "galley:prefs";
const DEFAULT_PROXY_HTTP_TIMEOUT_SECS: u64 = 15;
const DEFAULT_SESSION_IDLE_TTL_SECS: u64 = 30 * 60;
const DEFAULT_SESSION_UNAUTHENTICATED_RETRY_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityProviderConfig {
    pub url: String,
    pub service_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordsVendorConfig {
    pub api_url: String,
    pub base_id: String,
    pub api_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowVendorConfig {
    pub webhook_base_url: String,
    pub webhook_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub api_host: String,
    pub api_port: u16,
    pub database_url: Option<String>,
    pub redis_url: Option<String>,
    pub preference_key_prefix: String,
    pub cors_allowed_origins: Vec<String>,
    pub proxy_http_timeout_secs: u64,
    pub session_idle_ttl_secs: u64,
    pub session_unauthenticated_retry_secs: u64,
    pub identity_provider: Option<IdentityProviderConfig>,
    pub records_vendor: Option<RecordsVendorConfig>,
    pub workflow_vendor: Option<WorkflowVendorConfig>,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");
        Self::from_lookup(migrate_only, |name| env::var(name).ok())
    }

    pub fn from_lookup<F>(migrate_only: bool, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };
        let first_of = |names: &[&str]| names.iter().copied().find_map(|name| optional(name));

        let database_url = optional("DATABASE_URL");
        if migrate_only && database_url.is_none() {
            return Err(AppError::Configuration(
                "DATABASE_URL is required to run migrations".to_owned(),
            ));
        }

        let api_host = optional("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = optional("API_PORT")
            .map(|value| {
                value
                    .parse::<u16>()
                    .map_err(|error| AppError::Validation(format!("invalid API_PORT: {error}")))
            })
            .transpose()?
            .unwrap_or(3001);

        let seconds = |name: &str, default: u64| -> Result<u64, AppError> {
            let value = optional(name)
                .map(|value| {
                    value
                        .parse::<u64>()
                        .map_err(|error| AppError::Validation(format!("invalid {name}: {error}")))
                })
                .transpose()?
                .unwrap_or(default);
            if value == 0 {
                return Err(AppError::Validation(format!(
                    "{name} must be greater than zero"
                )));
            }
            Ok(value)
        };

        let proxy_http_timeout_secs =
            seconds("PROXY_HTTP_TIMEOUT_SECS", DEFAULT_PROXY_HTTP_TIMEOUT_SECS)?;
        let session_idle_ttl_secs = seconds("SESSION_IDLE_TTL_SECS", DEFAULT_SESSION_IDLE_TTL_SECS)?;
        let session_unauthenticated_retry_secs = seconds(
            "SESSION_UNAUTHENTICATED_RETRY_SECS",
            DEFAULT_SESSION_UNAUTHENTICATED_RETRY_SECS,
        )?;

        let cors_allowed_origins = optional("CORS_ALLOWED_ORIGINS")
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        let identity_provider = match (
            first_of(&["SUPABASE_URL", "EXPO_PUBLIC_SUPABASE_URL"]),
            first_of(&["SUPABASE_SERVICE_ROLE_KEY", "SUPABASE_SERVICE_KEY"]),
        ) {
            (Some(url), Some(service_key)) => Some(IdentityProviderConfig { url, service_key }),
            (None, None) => None,
            _ => {
                warn!("identity provider is partially configured; bearer routes will deny");
                None
            }
        };

        let records_vendor = match (optional("AIRTABLE_API_KEY"), optional("AIRTABLE_BASE_ID")) {
            (Some(api_key), Some(base_id)) => Some(RecordsVendorConfig {
                api_url: optional("AIRTABLE_API_URL")
                    .unwrap_or_else(|| DEFAULT_AIRTABLE_API_URL.to_owned()),
                base_id,
                api_key,
            }),
            (None, None) => None,
            _ => {
                warn!("records vendor is partially configured; records routes will fail");
                None
            }
        };

        let workflow_vendor =
            first_of(&["N8N_WEBHOOK_BASE_URL", "N8N_BASE_URL"]).map(|webhook_base_url| {
                WorkflowVendorConfig {
                    webhook_base_url,
                    webhook_token: optional("N8N_WEBHOOK_TOKEN"),
                }
            });

        Ok(Self {
            migrate_only,
            api_host,
            api_port,
            database_url,
            redis_url: optional("REDIS_URL"),
            preference_key_prefix: optional("PREFERENCE_KEY_PREFIX")
                .unwrap_or_else(|| DEFAULT_PREFERENCE_KEY_PREFIX.to_owned()),
            cors_allowed_origins,
            proxy_http_timeout_secs,
            session_idle_ttl_secs,
            session_unauthenticated_retry_secs,
            identity_provider,
            records_vendor,
            workflow_vendor,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Validation(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
