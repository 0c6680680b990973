//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod airtable_records_gateway;
#[cfg(any(test, feature = "test-support"))]
mod in_memory_access_directory;
mod in_memory_preference_store;
mod n8n_workflow_gateway;
mod postgres_access_catalog_repository;
mod postgres_profile_repository;
mod redis_preference_store;
mod supabase_identity_verifier;
#[cfg(test)]
mod test_support;
mod vendor_http;

pub use airtable_records_gateway::AirtableRecordsGateway;
#[cfg(any(test, feature = "test-support"))]
pub use in_memory_access_directory::InMemoryAccessDirectory;
pub use in_memory_preference_store::InMemoryPreferenceStore;
pub use n8n_workflow_gateway::N8nWorkflowGateway;
pub use postgres_access_catalog_repository::PostgresAccessCatalogRepository;
pub use postgres_profile_repository::PostgresProfileRepository;
pub use redis_preference_store::RedisPreferenceStore;
pub use supabase_identity_verifier::SupabaseIdentityVerifier;

/// Embedded migrations for the profile and access catalog schema.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
