// Freshness policy.
// Pure staleness rule deciding, per data kind, whether cached data is
// old enough to warrant hitting the network again.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// The two independently cached resources, each with its own TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataKind {
    Repositories,
    Contributions,
}

impl DataKind {
    pub const ALL: [DataKind; 2] = [DataKind::Repositories, DataKind::Contributions];

    /// Stable cache file name for this kind.
    pub fn file_name(self) -> &'static str {
        match self {
            DataKind::Repositories => "repositories.json",
            DataKind::Contributions => "contributions.json",
        }
    }
}

/// Default TTL for the repository listing: it changes with every push.
pub const REPOSITORIES_TTL: Duration = Duration::from_secs(30 * 60);

/// Default TTL for the contribution calendar: a year of history moves
/// slowly, so refreshing a few times a day is plenty.
pub const CONTRIBUTIONS_TTL: Duration = Duration::from_secs(6 * 60 * 60);

/// Per-kind TTL configuration. Defaults keep the repository listing much
/// fresher than the calendar.
#[derive(Debug, Clone, Copy)]
pub struct FreshnessPolicy {
    pub repositories_ttl: Duration,
    pub contributions_ttl: Duration,
}

impl Default for FreshnessPolicy {
    fn default() -> Self {
        Self {
            repositories_ttl: REPOSITORIES_TTL,
            contributions_ttl: CONTRIBUTIONS_TTL,
        }
    }
}

impl FreshnessPolicy {
    pub fn ttl(&self, kind: DataKind) -> Duration {
        match kind {
            DataKind::Repositories => self.repositories_ttl,
            DataKind::Contributions => self.contributions_ttl,
        }
    }

    /// Whether a kind needs refetching. Forced refreshes and never-fetched
    /// kinds always do; otherwise only once the cached copy has outlived
    /// its TTL.
    pub fn needs_refresh(
        &self,
        kind: DataKind,
        last_fetched_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
        force: bool,
    ) -> bool {
        if force {
            return true;
        }

        let Some(fetched_at) = last_fetched_at else {
            return true;
        };

        // Negative elapsed (clock skew) clamps to zero: not stale yet.
        let elapsed = now
            .signed_duration_since(fetched_at)
            .to_std()
            .unwrap_or(Duration::ZERO);

        elapsed > self.ttl(kind)
    }
}
