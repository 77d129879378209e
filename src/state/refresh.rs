// Refresh coordinator.
// Decides per data kind whether to hit the network, runs the needed
// fetches concurrently, merges results into the observable state, and
// flushes them to the cache once every launched fetch has settled.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::cache::CacheStore;
use crate::github::{ContributionDay, RemoteSource, RepoSummary};
use crate::prefs::{Credentials, CredentialStore};

use super::dashboard::{DashboardState, ObservableState};
use super::freshness::{DataKind, FreshnessPolicy};

/// Read-through refresh coordinator.
///
/// Serves whatever the cache seeded immediately; `refresh` decides per
/// kind whether a background fetch is warranted. At most one fetch is in
/// flight per kind at any time; overlapping calls coalesce.
pub struct RefreshCoordinator {
    credentials: Arc<dyn CredentialStore>,
    source: Arc<dyn RemoteSource>,
    cache: CacheStore,
    policy: FreshnessPolicy,
    state: ObservableState,
    in_flight: Mutex<HashSet<DataKind>>,
}

impl RefreshCoordinator {
    /// Build a coordinator whose state is seeded from the cache, before
    /// any network activity.
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        source: Arc<dyn RemoteSource>,
        cache: CacheStore,
        policy: FreshnessPolicy,
    ) -> Self {
        let state = ObservableState::seeded_from(&cache);
        Self {
            credentials,
            source,
            cache,
            policy,
            state,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// The observable snapshot this coordinator maintains.
    pub fn state(&self) -> &ObservableState {
        &self.state
    }

    /// Subscribe to state changes; completion of a refresh is observed
    /// here, not through a return value.
    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.state.subscribe()
    }

    /// Fire-and-forget refresh. Must be called from within a tokio
    /// runtime; the caller is never blocked.
    pub fn refresh(self: &Arc<Self>, force: bool) {
        let this = Arc::clone(self);
        tokio::spawn(async move { this.refresh_now(force).await });
    }

    /// Run one refresh cycle to completion.
    pub async fn refresh_now(&self, force: bool) {
        let credentials = self.credentials.credentials();
        if !credentials.is_complete() {
            debug!("credentials incomplete, skipping refresh");
            return;
        }

        let claimed = self.claim_stale_kinds(force);
        if claimed.is_empty() {
            debug!("nothing stale, skipping refresh");
            return;
        }

        let want_repos = claimed.contains(&DataKind::Repositories);
        let want_contributions = claimed.contains(&DataKind::Contributions);

        // Fan out the claimed fetches; each one merges its own field into
        // the observable state as it completes.
        let (repositories, contributions) = tokio::join!(
            async {
                if want_repos {
                    self.run_repositories(&credentials).await
                } else {
                    None
                }
            },
            async {
                if want_contributions {
                    self.run_contributions(&credentials).await
                } else {
                    None
                }
            },
        );

        // Flush to the cache only after the barrier. The in-flight flags
        // are still held, so no other cycle can write the same kind.
        if let Some(repos) = repositories
            && let Err(err) = self.cache.save(DataKind::Repositories, &repos)
        {
            warn!(error = %err, "failed to persist repositories cache");
        }
        if let Some(days) = contributions
            && let Err(err) = self.cache.save(DataKind::Contributions, &days)
        {
            warn!(error = %err, "failed to persist contributions cache");
        }

        self.release(&claimed);
        debug!(kinds = claimed.len(), "refresh cycle settled");
    }

    /// Claim every kind that is due and not already in flight. The
    /// loading flag flips inside the same critical section so a racing
    /// cycle's completion cannot clear it underneath us.
    fn claim_stale_kinds(&self, force: bool) -> Vec<DataKind> {
        let now = Utc::now();
        let mut in_flight = self.in_flight.lock().unwrap();

        let mut claimed = Vec::new();
        for kind in DataKind::ALL {
            if in_flight.contains(&kind) {
                continue;
            }
            if self
                .policy
                .needs_refresh(kind, self.cache.fetched_at(kind), now, force)
            {
                in_flight.insert(kind);
                claimed.push(kind);
            }
        }

        if !claimed.is_empty() {
            self.state.update(|s| {
                s.is_loading = true;
                s.last_error = None;
            });
        }
        claimed
    }

    /// Release this cycle's kinds; the loading flag drops only once no
    /// cycle has anything outstanding.
    fn release(&self, claimed: &[DataKind]) {
        let mut in_flight = self.in_flight.lock().unwrap();
        for kind in claimed {
            in_flight.remove(kind);
        }
        if in_flight.is_empty() {
            self.state.update(|s| s.is_loading = false);
        }
    }

    async fn run_repositories(&self, credentials: &Credentials) -> Option<Vec<RepoSummary>> {
        match self.source.fetch_repositories(credentials).await {
            Ok(repos) => {
                self.state.update(|s| s.repositories = repos.clone());
                Some(repos)
            }
            Err(err) => {
                warn!(error = %err, "repository fetch failed, keeping cached data");
                self.state.update(|s| s.last_error = Some(err.to_string()));
                None
            }
        }
    }

    async fn run_contributions(&self, credentials: &Credentials) -> Option<Vec<ContributionDay>> {
        match self.source.fetch_contributions(credentials).await {
            Ok(days) => {
                self.state.update(|s| s.contributions = days.clone());
                Some(days)
            }
            Err(err) => {
                warn!(error = %err, "contribution fetch failed, keeping cached data");
                self.state.update(|s| s.last_error = Some(err.to_string()));
                None
            }
        }
    }
}
