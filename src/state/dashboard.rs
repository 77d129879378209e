// Observable dashboard state.
// The single snapshot UI consumers read and subscribe to; every mutation
// goes through the watch channel so each field change is atomic from the
// observer's viewpoint.

use tokio::sync::watch;
use tracing::debug;

use crate::cache::CacheStore;
use crate::github::{ContributionDay, RepoSummary};

use super::DataKind;

/// What the dashboard currently shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    /// Most recently updated repositories; a fetch replaces the whole list.
    pub repositories: Vec<RepoSummary>,
    /// Contribution calendar for the queried window (~1 year), day by day.
    pub contributions: Vec<ContributionDay>,
    /// True while at least one fetch is outstanding.
    pub is_loading: bool,
    /// Message from the most recent failed fetch, if any. Consumers may
    /// surface it or ignore it; the core only records it.
    pub last_error: Option<String>,
}

/// Shared handle to the dashboard snapshot.
pub struct ObservableState {
    tx: watch::Sender<DashboardState>,
}

impl ObservableState {
    pub fn new(initial: DashboardState) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Seed the initial snapshot from whatever the cache holds, before
    /// any network activity. Unreadable records leave the field empty.
    pub fn seeded_from(cache: &CacheStore) -> Self {
        let mut initial = DashboardState::default();

        match cache.load::<Vec<RepoSummary>>(DataKind::Repositories) {
            Ok(Some(record)) => initial.repositories = record.value,
            Ok(None) => {}
            Err(err) => debug!(error = %err, "ignoring unreadable repositories cache"),
        }
        match cache.load::<Vec<ContributionDay>>(DataKind::Contributions) {
            Ok(Some(record)) => initial.contributions = record.value,
            Ok(None) => {}
            Err(err) => debug!(error = %err, "ignoring unreadable contributions cache"),
        }

        Self::new(initial)
    }

    /// Clone the current snapshot.
    pub fn snapshot(&self) -> DashboardState {
        self.tx.borrow().clone()
    }

    /// Subscribe to state changes. The receiver wakes on every mutation;
    /// UI layers re-render from `snapshot` without polling.
    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.tx.subscribe()
    }

    /// Apply a mutation and notify subscribers.
    pub(crate) fn update(&self, mutate: impl FnOnce(&mut DashboardState)) {
        self.tx.send_modify(mutate);
    }
}
