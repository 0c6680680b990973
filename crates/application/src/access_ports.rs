use async_trait::async_trait;
use galley_core::{AppResult, UserId};
use galley_domain::{CatalogEntry, CatalogKind, Profile};

/// Repository port for profile rows.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Returns the profile owned by `user_id`, if one exists.
    ///
    /// Rows carrying a role outside the known set are reported as errors.
    async fn find_profile(&self, user_id: &UserId) -> AppResult<Option<Profile>>;
}

/// Repository port for location and brand catalogs and their grant joins.
#[async_trait]
pub trait AccessCatalogRepository: Send + Sync {
    /// Lists every catalog row of one kind.
    async fn list_catalog(&self, kind: CatalogKind) -> AppResult<Vec<CatalogEntry>>;

    /// Lists catalog rows of one kind reachable through the user's grant rows.
    async fn list_granted(&self, user_id: &UserId, kind: CatalogKind)
    -> AppResult<Vec<CatalogEntry>>;
}

/// Keys persisted per user in the preference store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceKey {
    /// Whether the user dismissed the intro screen.
    IntroSeen,
    /// Last chosen active location.
    ActiveLocation,
    /// Last chosen active brand.
    ActiveBrand,
}

impl PreferenceKey {
    /// Returns the stable storage name of this key.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IntroSeen => "intro_seen",
            Self::ActiveLocation => "active_location",
            Self::ActiveBrand => "active_brand",
        }
    }

    /// Returns the selection key for one catalog dimension.
    #[must_use]
    pub fn for_selection(kind: CatalogKind) -> Self {
        match kind {
            CatalogKind::Location => Self::ActiveLocation,
            CatalogKind::Brand => Self::ActiveBrand,
        }
    }

    /// Keys holding the active selection, cleared on sign-out.
    #[must_use]
    pub fn selection_keys() -> &'static [Self] {
        &[Self::ActiveLocation, Self::ActiveBrand]
    }
}

/// Key-value port for per-user preferences.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Reads one preference value.
    async fn get(&self, user_id: &UserId, key: PreferenceKey) -> AppResult<Option<String>>;

    /// Writes one preference value, replacing any previous one.
    async fn set(&self, user_id: &UserId, key: PreferenceKey, value: &str) -> AppResult<()>;

    /// Removes the given keys; missing keys are ignored.
    async fn remove(&self, user_id: &UserId, keys: &[PreferenceKey]) -> AppResult<()>;
}
