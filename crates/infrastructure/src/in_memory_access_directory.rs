use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use galley_application::{AccessCatalogRepository, ProfileRepository};
use galley_core::{AppError, AppResult, UserId};
use galley_domain::{CatalogEntry, CatalogKind, Profile};
use tokio::sync::RwLock;

#[cfg(test)]
mod tests;

/// In-memory profile and catalog directory.
///
/// Serves both repository ports from one set of tables, mirroring the
/// relational layout: catalog rows plus per-user grant rows.
#[derive(Debug, Default)]
pub struct InMemoryAccessDirectory {
    profiles: RwLock<HashMap<UserId, Profile>>,
    catalogs: RwLock<HashMap<CatalogKind, BTreeMap<String, String>>>,
    grants: RwLock<HashMap<(UserId, CatalogKind), HashSet<String>>>,
}

impl InMemoryAccessDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a profile.
    pub async fn upsert_profile(&self, profile: Profile) {
        self.profiles
            .write()
            .await
            .insert(profile.user_id().clone(), profile);
    }

    /// Inserts or renames a catalog row.
    pub async fn upsert_entry(&self, kind: CatalogKind, entry: CatalogEntry) {
        self.catalogs
            .write()
            .await
            .entry(kind)
            .or_default()
            .insert(entry.id, entry.name);
    }

    /// Grants `user_id` access to an existing catalog row.
    pub async fn grant(&self, user_id: &UserId, kind: CatalogKind, id: &str) -> AppResult<()> {
        let known = self
            .catalogs
            .read()
            .await
            .get(&kind)
            .is_some_and(|entries| entries.contains_key(id));
        if !known {
            return Err(AppError::NotFound(format!(
                "{} '{id}' does not exist",
                kind.as_str()
            )));
        }

        self.grants
            .write()
            .await
            .entry((user_id.clone(), kind))
            .or_default()
            .insert(id.to_owned());
        Ok(())
    }

    /// Removes one grant; missing grants are ignored.
    pub async fn revoke(&self, user_id: &UserId, kind: CatalogKind, id: &str) {
        if let Some(granted) = self.grants.write().await.get_mut(&(user_id.clone(), kind)) {
            granted.remove(id);
        }
    }
}

#[async_trait]
impl ProfileRepository for InMemoryAccessDirectory {
    async fn find_profile(&self, user_id: &UserId) -> AppResult<Option<Profile>> {
        Ok(self.profiles.read().await.get(user_id).cloned())
    }
}

#[async_trait]
impl AccessCatalogRepository for InMemoryAccessDirectory {
    async fn list_catalog(&self, kind: CatalogKind) -> AppResult<Vec<CatalogEntry>> {
        let catalogs = self.catalogs.read().await;
        Ok(catalogs
            .get(&kind)
            .map(|entries| {
                entries
                    .iter()
                    .map(|(id, name)| CatalogEntry::new(id.clone(), name.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn list_granted(
        &self,
        user_id: &UserId,
        kind: CatalogKind,
    ) -> AppResult<Vec<CatalogEntry>> {
        let grants = self.grants.read().await;
        let Some(granted) = grants.get(&(user_id.clone(), kind)) else {
            return Ok(Vec::new());
        };

        Ok(self
            .list_catalog(kind)
            .await?
            .into_iter()
            .filter(|entry| granted.contains(&entry.id))
            .collect())
    }
}
