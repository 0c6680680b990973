use std::sync::Arc;
use std::time::Duration;

use galley_application::{
    AccessService, IdentityVerifier, PreferenceStore, ProxyService, RecordsGateway,
    SessionRegistry, TokenVerificationService, WorkflowGateway,
};
use galley_core::AppError;
use galley_infrastructure::{
    AirtableRecordsGateway, InMemoryPreferenceStore, N8nWorkflowGateway,
    PostgresAccessCatalogRepository, PostgresProfileRepository, RedisPreferenceStore,
    SupabaseIdentityVerifier,
};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

use crate::api_config::ApiConfig;
use crate::state::AppState;

const SERVICE_NAME: &str = "galley-api";

pub async fn connect_database(config: &ApiConfig) -> Result<Option<PgPool>, AppError> {
    let Some(database_url) = config.database_url.as_deref() else {
        warn!("DATABASE_URL is not set; session routes are disabled");
        return Ok(None);
    };

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    galley_infrastructure::MIGRATOR
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    Ok(Some(pool))
}

pub fn build_app_state(config: &ApiConfig, pool: Option<PgPool>) -> Result<AppState, AppError> {
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.proxy_http_timeout_secs))
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build http client: {error}")))?;

    let identity_verifier: Option<Arc<dyn IdentityVerifier>> = match &config.identity_provider {
        Some(provider) => Some(Arc::new(SupabaseIdentityVerifier::new(
            http_client.clone(),
            provider.url.as_str(),
            provider.service_key.clone(),
        )?)),
        None => {
            warn!("identity provider is not configured; every bearer route will deny");
            None
        }
    };

    let records_gateway: Option<Arc<dyn RecordsGateway>> = match &config.records_vendor {
        Some(vendor) => Some(Arc::new(AirtableRecordsGateway::new(
            http_client.clone(),
            vendor.api_url.as_str(),
            vendor.base_id.clone(),
            vendor.api_key.clone(),
        )?)),
        None => None,
    };

    let workflow_gateway: Option<Arc<dyn WorkflowGateway>> = match &config.workflow_vendor {
        Some(vendor) => Some(Arc::new(N8nWorkflowGateway::new(
            http_client,
            vendor.webhook_base_url.as_str(),
            vendor.webhook_token.clone(),
        )?)),
        None => None,
    };

    info!(
        identity_provider = identity_verifier.is_some(),
        records_vendor = records_gateway.is_some(),
        workflow_vendor = workflow_gateway.is_some(),
        profile_database = pool.is_some(),
        "integrations resolved"
    );

    let session_registry = match pool {
        Some(pool) => {
            let access_service = AccessService::new(
                Arc::new(PostgresProfileRepository::new(pool.clone())),
                Arc::new(PostgresAccessCatalogRepository::new(pool)),
                build_preference_store(config)?,
            );
            Some(
                SessionRegistry::new(access_service)
                    .with_idle_ttl(Duration::from_secs(config.session_idle_ttl_secs))
                    .with_unauthenticated_retry(Duration::from_secs(
                        config.session_unauthenticated_retry_secs,
                    )),
            )
        }
        None => None,
    };

    Ok(AppState {
        service_name: SERVICE_NAME.to_owned(),
        token_verification_service: TokenVerificationService::new(identity_verifier),
        proxy_service: ProxyService::new(records_gateway, workflow_gateway),
        session_registry,
    })
}

fn build_preference_store(config: &ApiConfig) -> Result<Arc<dyn PreferenceStore>, AppError> {
    match config.redis_url.as_deref() {
        Some(redis_url) => {
            let client = redis::Client::open(redis_url).map_err(|error| {
                AppError::Configuration(format!("invalid REDIS_URL: {error}"))
            })?;
            Ok(Arc::new(RedisPreferenceStore::new(
                client,
                config.preference_key_prefix.clone(),
            )))
        }
        None => {
            info!("REDIS_URL is not set; preferences are kept in process memory");
            Ok(Arc::new(InMemoryPreferenceStore::new()))
        }
    }
}
