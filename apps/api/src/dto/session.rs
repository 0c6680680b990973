use galley_application::SessionSnapshot;
use galley_domain::{CatalogEntry, GateDecision, Portal, Profile};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// API representation of one location or brand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/catalog-entry-response.ts"
)]
pub struct CatalogEntryResponse {
    pub id: String,
    pub name: String,
}

impl From<&CatalogEntry> for CatalogEntryResponse {
    fn from(value: &CatalogEntry) -> Self {
        Self {
            id: value.id.clone(),
            name: value.name.clone(),
        }
    }
}

/// API representation of a user profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/profile-response.ts"
)]
pub struct ProfileResponse {
    pub user_id: String,
    pub role: String,
    pub default_location_id: Option<String>,
    pub default_brand_id: Option<String>,
}

impl From<&Profile> for ProfileResponse {
    fn from(value: &Profile) -> Self {
        Self {
            user_id: value.user_id().to_string(),
            role: value.role().as_str().to_owned(),
            default_location_id: value.default_location_id().map(str::to_owned),
            default_brand_id: value.default_brand_id().map(str::to_owned),
        }
    }
}

/// Resolved session of the calling user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/session-response.ts"
)]
pub struct SessionResponse {
    pub user_id: Option<String>,
    pub loading: bool,
    pub profile: Option<ProfileResponse>,
    pub locations: Vec<CatalogEntryResponse>,
    pub brands: Vec<CatalogEntryResponse>,
    pub active_location_id: Option<String>,
    pub active_brand_id: Option<String>,
    pub intro_seen: bool,
    pub home_route: Option<String>,
}

impl From<SessionSnapshot> for SessionResponse {
    fn from(value: SessionSnapshot) -> Self {
        let home_route = value.home_route().map(|route| route.path().to_owned());

        Self {
            user_id: value.user_id.as_ref().map(ToString::to_string),
            loading: value.loading,
            profile: value.profile.as_ref().map(ProfileResponse::from),
            locations: value
                .access_lists
                .locations()
                .iter()
                .map(CatalogEntryResponse::from)
                .collect(),
            brands: value
                .access_lists
                .brands()
                .iter()
                .map(CatalogEntryResponse::from)
                .collect(),
            active_location_id: value.selection.location_id,
            active_brand_id: value.selection.brand_id,
            intro_seen: value.intro_seen,
            home_route,
        }
    }
}

/// Incoming payload for switching the active location or brand.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/set-active-request.ts"
)]
pub struct SetActiveRequest {
    pub id: String,
}

/// Outcome of an active location or brand switch.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/set-active-response.ts"
)]
pub struct SetActiveResponse {
    pub accepted: bool,
    pub session: SessionResponse,
}

/// Access gate decision for one portal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/gate-response.ts"
)]
pub struct GateResponse {
    pub portal: String,
    pub decision: String,
    pub redirect_to: Option<String>,
}

impl GateResponse {
    pub fn new(portal: Portal, decision: GateDecision) -> Self {
        let (decision, redirect_to) = match decision {
            GateDecision::Loading => ("loading", None),
            GateDecision::Render => ("render", None),
            GateDecision::Redirect(route) => ("redirect", Some(route.path().to_owned())),
        };

        Self {
            portal: portal.as_str().to_owned(),
            decision: decision.to_owned(),
            redirect_to,
        }
    }
}
