//! Profile and access-list resolution.
//!
//! Every read failure degrades at this boundary: a profile that cannot be
//! loaded becomes "no profile", a list that cannot be loaded becomes empty.
//! Callers only ever see the degraded value and a `warn!` record.

use std::sync::Arc;

use galley_core::{AppResult, UserId};
use galley_domain::{AccessLists, ActiveSelection, CatalogEntry, CatalogKind, Profile};
use tracing::{debug, info, warn};

use crate::{AccessCatalogRepository, PreferenceKey, PreferenceStore, ProfileRepository};


const INTRO_SEEN_VALUE: &str = "true";

/// Application service resolving profiles, access lists and active selections.
#[derive(Clone)]
pub struct AccessService {
    profile_repository: Arc<dyn ProfileRepository>,
    catalog_repository: Arc<dyn AccessCatalogRepository>,
    preference_store: Arc<dyn PreferenceStore>,
}

impl AccessService {
    /// Creates a new access service.
    #[must_use]
    pub fn new(
        profile_repository: Arc<dyn ProfileRepository>,
        catalog_repository: Arc<dyn AccessCatalogRepository>,
        preference_store: Arc<dyn PreferenceStore>,
    ) -> Self {
        Self {
            profile_repository,
            catalog_repository,
            preference_store,
        }
    }

    /// Fetches the profile for a signed-in user.
    ///
    /// Returns `None` when the row is missing or cannot be read.
    pub async fn resolve_profile(&self, user_id: &UserId) -> Option<Profile> {
        match self.profile_repository.find_profile(user_id).await {
            Ok(Some(profile)) => Some(profile),
            Ok(None) => {
                info!(user_id = %user_id, "no profile row for signed-in user");
                None
            }
            Err(error) => {
                warn!(user_id = %user_id, error = %error, "profile fetch failed");
                None
            }
        }
    }

    /// Loads the locations and brands the profile may act on.
    pub async fn resolve_access_lists(&self, profile: &Profile) -> AccessLists {
        let locations = self.resolve_list(profile, CatalogKind::Location).await;
        let brands = self.resolve_list(profile, CatalogKind::Brand).await;

        AccessLists::new(locations, brands)
    }

    async fn resolve_list(&self, profile: &Profile, kind: CatalogKind) -> Vec<CatalogEntry> {
        let result = if profile.role().sees_full_catalog() {
            self.catalog_repository.list_catalog(kind).await
        } else {
            self.catalog_repository
                .list_granted(profile.user_id(), kind)
                .await
        };

        result.unwrap_or_else(|error| {
            warn!(
                user_id = %profile.user_id(),
                role = profile.role().as_str(),
                catalog = kind.as_str(),
                error = %error,
                "access list fetch failed"
            );
            Vec::new()
        })
    }

    /// Picks the initial active location and brand after sign-in.
    ///
    /// Per dimension the first valid candidate wins: persisted choice, profile
    /// default, first list entry. Persisted values outside the lists are
    /// ignored here and overwritten by [`AccessService::store_selection`].
    pub async fn resolve_initial_selection(
        &self,
        profile: &Profile,
        access_lists: &AccessLists,
    ) -> ActiveSelection {
        let mut selection = ActiveSelection::default();
        for kind in [CatalogKind::Location, CatalogKind::Brand] {
            let resolved = self.resolve_initial(profile, access_lists, kind).await;
            selection.set(kind, resolved);
        }

        selection
    }

    async fn resolve_initial(
        &self,
        profile: &Profile,
        access_lists: &AccessLists,
        kind: CatalogKind,
    ) -> Option<String> {
        let user_id = profile.user_id();
        let key = PreferenceKey::for_selection(kind);
        let persisted = match self.preference_store.get(user_id, key).await {
            Ok(value) => value,
            Err(error) => {
                warn!(user_id = %user_id, key = key.as_str(), error = %error, "preference read failed");
                None
            }
        };

        let profile_default = match kind {
            CatalogKind::Location => profile.default_location_id(),
            CatalogKind::Brand => profile.default_brand_id(),
        };

        if let Some(stale) = persisted
            .as_deref()
            .filter(|value| !access_lists.contains(kind, value))
        {
            debug!(user_id = %user_id, key = key.as_str(), stale, "discarding persisted selection");
        }

        [persisted.as_deref(), profile_default]
            .into_iter()
            .flatten()
            .find(|candidate| access_lists.contains(kind, candidate))
            .or_else(|| access_lists.first_id(kind))
            .map(str::to_owned)
    }

    /// Persists a resolved selection, removing keys for empty dimensions.
    ///
    /// Write failures are logged and otherwise ignored.
    pub async fn store_selection(&self, user_id: &UserId, selection: &ActiveSelection) {
        for kind in [CatalogKind::Location, CatalogKind::Brand] {
            let key = PreferenceKey::for_selection(kind);
            let write = match selection.get(kind) {
                Some(value) => self.preference_store.set(user_id, key, value).await,
                None => self.preference_store.remove(user_id, &[key]).await,
            };
            if let Err(error) = write {
                warn!(user_id = %user_id, key = key.as_str(), error = %error, "preference write failed");
            }
        }
    }

    /// Switches the active location; see [`AccessService::set_active`].
    pub async fn set_active_location(
        &self,
        user_id: &UserId,
        access_lists: &AccessLists,
        selection: &mut ActiveSelection,
        location_id: &str,
    ) -> bool {
        self.set_active(
            user_id,
            access_lists,
            selection,
            CatalogKind::Location,
            location_id,
        )
        .await
    }

    /// Switches the active brand; see [`AccessService::set_active`].
    pub async fn set_active_brand(
        &self,
        user_id: &UserId,
        access_lists: &AccessLists,
        selection: &mut ActiveSelection,
        brand_id: &str,
    ) -> bool {
        self.set_active(user_id, access_lists, selection, CatalogKind::Brand, brand_id)
            .await
    }

    /// Switches the active entry of one dimension.
    ///
    /// Returns `false` and keeps the previous value when `id` is not in the
    /// resolved list. A failed persistence write still updates `selection`.
    pub async fn set_active(
        &self,
        user_id: &UserId,
        access_lists: &AccessLists,
        selection: &mut ActiveSelection,
        kind: CatalogKind,
        id: &str,
    ) -> bool {
        if !access_lists.contains(kind, id) {
            debug!(user_id = %user_id, catalog = kind.as_str(), id, "ignoring selection outside access list");
            return false;
        }

        selection.set(kind, Some(id.to_owned()));

        let key = PreferenceKey::for_selection(kind);
        if let Err(error) = self.preference_store.set(user_id, key, id).await {
            warn!(user_id = %user_id, key = key.as_str(), error = %error, "preference write failed");
        }

        true
    }

    /// Removes the persisted active location and brand of a user.
    pub async fn clear_session_preferences(&self, user_id: &UserId) -> AppResult<()> {
        self.preference_store
            .remove(user_id, PreferenceKey::selection_keys())
            .await
    }

    /// Returns whether the user dismissed the intro screen.
    pub async fn intro_seen(&self, user_id: &UserId) -> bool {
        match self
            .preference_store
            .get(user_id, PreferenceKey::IntroSeen)
            .await
        {
            Ok(value) => value.as_deref() == Some(INTRO_SEEN_VALUE),
            Err(error) => {
                warn!(user_id = %user_id, error = %error, "intro flag read failed");
                false
            }
        }
    }

    /// Records that the user dismissed the intro screen.
    pub async fn mark_intro_seen(&self, user_id: &UserId) -> AppResult<()> {
        self.preference_store
            .set(user_id, PreferenceKey::IntroSeen, INTRO_SEEN_VALUE)
            .await
    }
}
