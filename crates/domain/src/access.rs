use serde::{Deserialize, Serialize};

/// Catalog dimension a user can be scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    /// Physical restaurant location.
    Location,
    /// Restaurant brand.
    Brand,
}

impl CatalogKind {
    /// Returns a stable value used in logs and storage keys.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Location => "location",
            Self::Brand => "brand",
        }
    }
}

/// One location or brand row as exposed to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Stable catalog identifier.
    pub id: String,
    /// Display name, also the sort key.
    pub name: String,
}

impl CatalogEntry {
    /// Creates a catalog entry.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Effective locations and brands a user may act on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessLists {
    locations: Vec<CatalogEntry>,
    brands: Vec<CatalogEntry>,
}

impl AccessLists {
    /// Creates access lists ordered by name, ties broken by id.
    #[must_use]
    pub fn new(mut locations: Vec<CatalogEntry>, mut brands: Vec<CatalogEntry>) -> Self {
        sort_entries(&mut locations);
        sort_entries(&mut brands);

        Self { locations, brands }
    }

    /// Returns the list for one catalog dimension.
    #[must_use]
    pub fn entries(&self, kind: CatalogKind) -> &[CatalogEntry] {
        match kind {
            CatalogKind::Location => self.locations.as_slice(),
            CatalogKind::Brand => self.brands.as_slice(),
        }
    }

    /// Returns accessible locations.
    #[must_use]
    pub fn locations(&self) -> &[CatalogEntry] {
        self.entries(CatalogKind::Location)
    }

    /// Returns accessible brands.
    #[must_use]
    pub fn brands(&self) -> &[CatalogEntry] {
        self.entries(CatalogKind::Brand)
    }

    /// Whether `id` is a member of the given list.
    #[must_use]
    pub fn contains(&self, kind: CatalogKind, id: &str) -> bool {
        self.entries(kind).iter().any(|entry| entry.id == id)
    }

    /// Returns the first entry of the given list.
    #[must_use]
    pub fn first_id(&self, kind: CatalogKind) -> Option<&str> {
        self.entries(kind).first().map(|entry| entry.id.as_str())
    }

    /// Whether both lists are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty() && self.brands.is_empty()
    }
}

fn sort_entries(entries: &mut [CatalogEntry]) {
    entries.sort_by(|left, right| {
        left.name
            .cmp(&right.name)
            .then_with(|| left.id.cmp(&right.id))
    });
}

/// The location and brand a user is currently operating against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSelection {
    /// Active location identifier.
    pub location_id: Option<String>,
    /// Active brand identifier.
    pub brand_id: Option<String>,
}

impl ActiveSelection {
    /// Returns the active identifier for one dimension.
    #[must_use]
    pub fn get(&self, kind: CatalogKind) -> Option<&str> {
        match kind {
            CatalogKind::Location => self.location_id.as_deref(),
            CatalogKind::Brand => self.brand_id.as_deref(),
        }
    }

    /// Replaces the active identifier for one dimension.
    pub fn set(&mut self, kind: CatalogKind, value: Option<String>) {
        match kind {
            CatalogKind::Location => self.location_id = value,
            CatalogKind::Brand => self.brand_id = value,
        }
    }
}
