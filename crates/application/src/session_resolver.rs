//! Per-client session state machine.
//!
//! `Booting -> {Unauthenticated | Authenticated}`. Resolutions are sequential
//! (profile, then access lists, then selection) and tagged with a generation
//! number; sign-out and newer sign-ins bump the generation so a late result
//! for a superseded user is dropped instead of committed.

use async_trait::async_trait;
use galley_core::UserId;
use galley_domain::{
    AccessGate, AccessLists, ActiveSelection, CatalogKind, GateDecision, GateState, Portal,
    Profile, Route,
};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::AccessService;


/// Resolved state of a signed-in user with a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedSession {
    /// Profile row of the user.
    pub profile: Profile,
    /// Locations and brands the user may act on.
    pub access_lists: AccessLists,
    /// Current working selection.
    pub selection: ActiveSelection,
}

/// Lifecycle phase of a session resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    /// Restoring a session has not finished yet.
    Booting,
    /// No session, or a session without a profile.
    Unauthenticated,
    /// Profile and access lists are resolved.
    Authenticated(AuthenticatedSession),
}

/// Point-in-time copy of resolver state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Identity-provider user of the current session.
    pub user_id: Option<UserId>,
    /// Whether a resolution is in flight.
    pub loading: bool,
    /// Resolved profile.
    pub profile: Option<Profile>,
    /// Resolved access lists; empty when signed out.
    pub access_lists: AccessLists,
    /// Active selection; empty when signed out.
    pub selection: ActiveSelection,
    /// Whether the intro screen was dismissed.
    pub intro_seen: bool,
}

impl SessionSnapshot {
    /// Resolver state as consumed by the access gate.
    #[must_use]
    pub fn gate_state(&self) -> GateState {
        match (&self.profile, self.loading) {
            (_, true) => GateState::Loading,
            (Some(profile), false) => GateState::SignedIn(profile.role()),
            (None, false) => GateState::SignedOut,
        }
    }

    /// Screen a freshly resolved session lands on.
    #[must_use]
    pub fn home_route(&self) -> Option<Route> {
        match self.gate_state() {
            GateState::Loading => None,
            GateState::SignedOut => Some(Route::SignIn),
            GateState::SignedIn(role) => Some(Route::RoleHome(role)),
        }
    }
}

/// Narrow capability handed to screens instead of the whole resolver.
#[async_trait]
pub trait AccessContext: Send + Sync {
    /// Current session user, if any.
    async fn session(&self) -> Option<UserId>;

    /// Resolved profile, if any.
    async fn profile(&self) -> Option<Profile>;

    /// Resolved access lists.
    async fn access_lists(&self) -> AccessLists;

    /// Switches the active location; `false` when rejected.
    async fn set_active_location(&self, location_id: &str) -> bool;

    /// Switches the active brand; `false` when rejected.
    async fn set_active_brand(&self, brand_id: &str) -> bool;
}

struct ResolverState {
    generation: u64,
    phase: SessionPhase,
    loading: bool,
    session_user: Option<UserId>,
    pending_user: Option<UserId>,
    intro_seen: bool,
}

/// Session resolver owned by one client.
pub struct SessionResolver {
    access_service: AccessService,
    state: RwLock<ResolverState>,
    // Orders selection writes of a resolution against the clears of sign-out.
    persistence: Mutex<()>,
}

impl SessionResolver {
    /// Creates a resolver in the `Booting` phase.
    #[must_use]
    pub fn new(access_service: AccessService) -> Self {
        Self {
            access_service,
            state: RwLock::new(ResolverState {
                generation: 0,
                phase: SessionPhase::Booting,
                loading: true,
                session_user: None,
                pending_user: None,
                intro_seen: false,
            }),
            persistence: Mutex::new(()),
        }
    }

    /// Finishes booting with the session restored by the identity provider.
    pub async fn boot(&self, restored_user: Option<UserId>) -> bool {
        match restored_user {
            Some(user_id) => self.sign_in(user_id).await,
            None => {
                let mut state = self.state.write().await;
                state.generation = state.generation.wrapping_add(1);
                state.phase = SessionPhase::Unauthenticated;
                state.loading = false;
                state.session_user = None;
                state.pending_user = None;
                true
            }
        }
    }

    /// Resolves profile, access lists and selection for `user_id`.
    ///
    /// Returns `false` when a sign-out or newer sign-in superseded this
    /// resolution before it finished; nothing is committed in that case.
    pub async fn sign_in(&self, user_id: UserId) -> bool {
        let generation = {
            let mut state = self.state.write().await;
            state.generation = state.generation.wrapping_add(1);
            state.loading = true;
            state.pending_user = Some(user_id.clone());
            state.generation
        };

        let phase = match self.access_service.resolve_profile(&user_id).await {
            Some(profile) => {
                let access_lists = self.access_service.resolve_access_lists(&profile).await;
                let selection = self
                    .access_service
                    .resolve_initial_selection(&profile, &access_lists)
                    .await;
                SessionPhase::Authenticated(AuthenticatedSession {
                    profile,
                    access_lists,
                    selection,
                })
            }
            None => SessionPhase::Unauthenticated,
        };
        let intro_seen = self.access_service.intro_seen(&user_id).await;

        {
            let _persistence = self.persistence.lock().await;
            if self.state.read().await.generation != generation {
                debug!(user_id = %user_id, generation, "dropping superseded session resolution");
                return false;
            }
            if let SessionPhase::Authenticated(session) = &phase {
                self.access_service
                    .store_selection(&user_id, &session.selection)
                    .await;
            }
        }

        let mut state = self.state.write().await;
        if state.generation != generation {
            debug!(user_id = %user_id, generation, "dropping superseded session resolution");
            return false;
        }

        info!(
            user_id = %user_id,
            authenticated = matches!(phase, SessionPhase::Authenticated(_)),
            "session resolved"
        );
        state.phase = phase;
        state.loading = false;
        state.session_user = Some(user_id);
        state.pending_user = None;
        state.intro_seen = intro_seen;
        true
    }

    /// Re-runs resolution for the current session user.
    pub async fn refresh(&self) -> bool {
        let current = self.state.read().await.session_user.clone();
        match current {
            Some(user_id) => self.sign_in(user_id).await,
            None => false,
        }
    }

    /// Drops the session and clears the persisted selection of its user.
    ///
    /// A sign-in still in flight is cancelled and its user's selection is
    /// cleared as well.
    pub async fn sign_out(&self) {
        let users = {
            let mut state = self.state.write().await;
            state.generation = state.generation.wrapping_add(1);
            state.phase = SessionPhase::Unauthenticated;
            state.loading = false;
            state.intro_seen = false;
            let mut users: Vec<UserId> = state.session_user.take().into_iter().collect();
            if let Some(pending) = state.pending_user.take()
                && !users.contains(&pending)
            {
                users.push(pending);
            }
            users
        };

        let _persistence = self.persistence.lock().await;
        for user_id in users {
            if let Err(error) = self.access_service.clear_session_preferences(&user_id).await {
                warn!(user_id = %user_id, error = %error, "failed to clear persisted selection");
            }
            info!(user_id = %user_id, "session signed out");
        }
    }

    /// Records that the current user dismissed the intro screen.
    pub async fn mark_intro_seen(&self) -> bool {
        let mut state = self.state.write().await;
        let Some(user_id) = state.session_user.clone() else {
            return false;
        };

        if let Err(error) = self.access_service.mark_intro_seen(&user_id).await {
            warn!(user_id = %user_id, error = %error, "failed to persist intro flag");
        }
        state.intro_seen = true;
        true
    }

    /// Returns the current lifecycle phase.
    pub async fn phase(&self) -> SessionPhase {
        self.state.read().await.phase.clone()
    }

    /// Whether a resolution is in flight.
    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    /// Returns a copy of the current state.
    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.read().await;
        let (profile, access_lists, selection) = match &state.phase {
            SessionPhase::Authenticated(session) => (
                Some(session.profile.clone()),
                session.access_lists.clone(),
                session.selection.clone(),
            ),
            SessionPhase::Booting | SessionPhase::Unauthenticated => {
                (None, AccessLists::default(), ActiveSelection::default())
            }
        };

        SessionSnapshot {
            user_id: state.session_user.clone(),
            loading: state.loading,
            profile,
            access_lists,
            selection,
            intro_seen: state.intro_seen,
        }
    }

    /// Evaluates the access gate for one portal against the current state.
    pub async fn gate(&self, portal: Portal) -> GateDecision {
        AccessGate::evaluate_portal(self.snapshot().await.gate_state(), portal)
    }

    async fn set_active(&self, kind: CatalogKind, id: &str) -> bool {
        let mut state = self.state.write().await;
        let SessionPhase::Authenticated(session) = &mut state.phase else {
            return false;
        };

        let AuthenticatedSession {
            profile,
            access_lists,
            selection,
        } = session;
        self.access_service
            .set_active(profile.user_id(), access_lists, selection, kind, id)
            .await
    }
}

#[async_trait]
impl AccessContext for SessionResolver {
    async fn session(&self) -> Option<UserId> {
        self.state.read().await.session_user.clone()
    }

    async fn profile(&self) -> Option<Profile> {
        self.snapshot().await.profile
    }

    async fn access_lists(&self) -> AccessLists {
        self.snapshot().await.access_lists
    }

    async fn set_active_location(&self, location_id: &str) -> bool {
        self.set_active(CatalogKind::Location, location_id).await
    }

    async fn set_active_brand(&self, brand_id: &str) -> bool {
        self.set_active(CatalogKind::Brand, brand_id).await
    }
}
