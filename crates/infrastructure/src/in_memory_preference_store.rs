use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use galley_application::{PreferenceKey, PreferenceStore};
use galley_core::{AppResult, UserId};
use tokio::sync::RwLock;

/// Process-local preference store used when Redis is not configured.
#[derive(Clone, Default)]
pub struct InMemoryPreferenceStore {
    values: Arc<RwLock<HashMap<(UserId, PreferenceKey), String>>>,
}

impl InMemoryPreferenceStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferenceStore for InMemoryPreferenceStore {
    async fn get(&self, user_id: &UserId, key: PreferenceKey) -> AppResult<Option<String>> {
        Ok(self
            .values
            .read()
            .await
            .get(&(user_id.clone(), key))
            .cloned())
    }

    async fn set(&self, user_id: &UserId, key: PreferenceKey, value: &str) -> AppResult<()> {
        self.values
            .write()
            .await
            .insert((user_id.clone(), key), value.to_owned());
        Ok(())
    }

    async fn remove(&self, user_id: &UserId, keys: &[PreferenceKey]) -> AppResult<()> {
        let mut values = self.values.write().await;
        for key in keys {
            values.remove(&(user_id.clone(), *key));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use galley_application::{PreferenceKey, PreferenceStore};
    use galley_core::UserId;

    use super::InMemoryPreferenceStore;

    fn user(value: &str) -> UserId {
        match UserId::new(value) {
            Ok(user_id) => user_id,
            Err(error) => panic!("invalid test user id: {error}"),
        }
    }

    #[tokio::test]
    async fn values_are_scoped_to_user() {
        let store = InMemoryPreferenceStore::new();
        assert!(
            store
                .set(&user("u1"), PreferenceKey::ActiveLocation, "loc-42")
                .await
                .is_ok()
        );

        let own = store.get(&user("u1"), PreferenceKey::ActiveLocation).await;
        let other = store.get(&user("u2"), PreferenceKey::ActiveLocation).await;

        assert_eq!(own.ok().flatten().as_deref(), Some("loc-42"));
        assert_eq!(other.ok().flatten(), None);
    }

    #[tokio::test]
    async fn remove_only_touches_listed_keys() {
        let store = InMemoryPreferenceStore::new();
        let user_id = user("u1");
        for (key, value) in [
            (PreferenceKey::ActiveLocation, "loc-42"),
            (PreferenceKey::ActiveBrand, "brand-taco"),
            (PreferenceKey::IntroSeen, "true"),
        ] {
            assert!(store.set(&user_id, key, value).await.is_ok());
        }

        assert!(
            store
                .remove(&user_id, PreferenceKey::selection_keys())
                .await
                .is_ok()
        );

        let location = store.get(&user_id, PreferenceKey::ActiveLocation).await;
        let intro = store.get(&user_id, PreferenceKey::IntroSeen).await;
        assert_eq!(location.ok().flatten(), None);
        assert_eq!(intro.ok().flatten().as_deref(), Some("true"));
    }
}
