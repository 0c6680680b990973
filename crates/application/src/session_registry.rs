use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use galley_core::UserId;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::{AccessService, SessionPhase, SessionResolver};


const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(30 * 60);
const DEFAULT_UNAUTHENTICATED_RETRY: Duration = Duration::from_secs(30);

struct RegistryEntry {
    resolver: Arc<SessionResolver>,
    last_seen: Instant,
    resolved_at: Instant,
}

/// Server-side home of one session resolver per verified user.
///
/// Resolvers idle for longer than the idle TTL are dropped, so the next
/// request boots a fresh one. A resolver that settled without a profile is
/// resolved again once the retry interval has passed.
#[derive(Clone)]
pub struct SessionRegistry {
    access_service: AccessService,
    idle_ttl: Duration,
    unauthenticated_retry: Duration,
    entries: Arc<Mutex<HashMap<UserId, RegistryEntry>>>,
}

impl SessionRegistry {
    /// Creates an empty registry with default timings.
    #[must_use]
    pub fn new(access_service: AccessService) -> Self {
        Self {
            access_service,
            idle_ttl: DEFAULT_IDLE_TTL,
            unauthenticated_retry: DEFAULT_UNAUTHENTICATED_RETRY,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Sets how long an unused resolver is kept.
    #[must_use]
    pub fn with_idle_ttl(mut self, idle_ttl: Duration) -> Self {
        self.idle_ttl = idle_ttl;
        self
    }

    /// Sets how often a session without a profile is re-resolved.
    #[must_use]
    pub fn with_unauthenticated_retry(mut self, retry: Duration) -> Self {
        self.unauthenticated_retry = retry;
        self
    }

    /// Returns the resolver of `user_id`, booting it on first use.
    ///
    /// A caller racing the first sign-in may observe the resolver while it
    /// is still loading.
    pub async fn open(&self, user_id: &UserId) -> Arc<SessionResolver> {
        let (resolver, resolve) = self.checkout(user_id, false).await;
        if resolve {
            resolver.boot(Some(user_id.clone())).await;
        }
        resolver
    }

    /// Re-resolves the session of `user_id` against current data.
    pub async fn refresh(&self, user_id: &UserId) -> Arc<SessionResolver> {
        let (resolver, _) = self.checkout(user_id, true).await;
        resolver.sign_in(user_id.clone()).await;
        resolver
    }

    /// Signs `user_id` out and forgets its resolver.
    pub async fn close(&self, user_id: &UserId) {
        let entry = self.entries.lock().await.remove(user_id);
        match entry {
            Some(entry) => entry.resolver.sign_out().await,
            None => {
                if let Err(error) = self
                    .access_service
                    .clear_session_preferences(user_id)
                    .await
                {
                    warn!(user_id = %user_id, error = %error, "failed to clear persisted selection");
                }
            }
        }
    }

    /// Looks up or creates the entry of `user_id`, evicting idle entries.
    ///
    /// The flag tells the caller to run a resolution; it is set for new
    /// entries, for `force`, and for stale unauthenticated entries.
    async fn checkout(&self, user_id: &UserId, force: bool) -> (Arc<SessionResolver>, bool) {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;

        let before = entries.len();
        entries.retain(|id, entry| {
            id == user_id || now.duration_since(entry.last_seen) < self.idle_ttl
        });
        let evicted = before - entries.len();
        if evicted > 0 {
            debug!(evicted, remaining = entries.len(), "evicted idle session resolvers");
        }

        if let Some(entry) = entries.get_mut(user_id) {
            let idle = now.duration_since(entry.last_seen) >= self.idle_ttl;
            entry.last_seen = now;
            let resolve = force
                || idle
                || (now.duration_since(entry.resolved_at) >= self.unauthenticated_retry
                    && !entry.resolver.is_loading().await
                    && entry.resolver.phase().await == SessionPhase::Unauthenticated);
            if resolve {
                debug!(user_id = %user_id, force, idle, "re-resolving cached session");
                entry.resolved_at = now;
            }
            return (entry.resolver.clone(), resolve);
        }

        debug!(user_id = %user_id, "opening session resolver");
        let resolver = Arc::new(SessionResolver::new(self.access_service.clone()));
        entries.insert(
            user_id.clone(),
            RegistryEntry {
                resolver: resolver.clone(),
                last_seen: now,
                resolved_at: now,
            },
        );
        (resolver, true)
    }
}
