//! Redis-backed preference store.

use async_trait::async_trait;
use galley_application::{PreferenceKey, PreferenceStore};
use galley_core::{AppError, AppResult, UserId};
use redis::AsyncCommands;

/// Redis implementation of the preference store port.
///
/// Keys are namespaced per user: `{prefix}:{user_id}:{key}`.
#[derive(Clone)]
pub struct RedisPreferenceStore {
    client: redis::Client,
    key_prefix: String,
}

impl RedisPreferenceStore {
    /// Creates a store with a configured Redis client and key prefix.
    #[must_use]
    pub fn new(client: redis::Client, key_prefix: impl Into<String>) -> Self {
        Self {
            client,
            key_prefix: key_prefix.into(),
        }
    }

    fn key_for(&self, user_id: &UserId, key: PreferenceKey) -> String {
        format!("{}:{user_id}:{}", self.key_prefix, key.as_str())
    }

    async fn connection(&self) -> AppResult<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|error| AppError::Internal(format!("failed to connect to redis: {error}")))
    }
}

#[async_trait]
impl PreferenceStore for RedisPreferenceStore {
    async fn get(&self, user_id: &UserId, key: PreferenceKey) -> AppResult<Option<String>> {
        let redis_key = self.key_for(user_id, key);
        let mut connection = self.connection().await?;

        let value: Option<String> = connection.get(redis_key).await.map_err(|error| {
            AppError::Internal(format!(
                "failed to read preference '{}': {error}",
                key.as_str()
            ))
        })?;

        Ok(value)
    }

    async fn set(&self, user_id: &UserId, key: PreferenceKey, value: &str) -> AppResult<()> {
        let redis_key = self.key_for(user_id, key);
        let mut connection = self.connection().await?;

        connection
            .set::<_, _, ()>(redis_key, value)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to write preference '{}': {error}",
                    key.as_str()
                ))
            })
    }

    async fn remove(&self, user_id: &UserId, keys: &[PreferenceKey]) -> AppResult<()> {
        if keys.is_empty() {
            return Ok(());
        }

        let redis_keys = keys
            .iter()
            .map(|key| self.key_for(user_id, *key))
            .collect::<Vec<_>>();
        let mut connection = self.connection().await?;

        connection
            .del::<_, ()>(redis_keys)
            .await
            .map_err(|error| AppError::Internal(format!("failed to clear preferences: {error}")))
    }
}
