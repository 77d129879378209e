// State management module.
// Freshness decisions, the observable dashboard snapshot, and the
// refresh coordinator that ties them to the network and the cache.

pub mod dashboard;
pub mod freshness;
pub mod refresh;

pub use dashboard::{DashboardState, ObservableState};
pub use freshness::{CONTRIBUTIONS_TTL, DataKind, FreshnessPolicy, REPOSITORIES_TTL};
pub use refresh::RefreshCoordinator;
