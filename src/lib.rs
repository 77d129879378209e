// octobar: data-fetch and cache-refresh core for a GitHub menu-bar
// dashboard. Serves the last-known-good cache immediately, refreshes
// each data kind on its own TTL, and coalesces overlapping fetches.

pub mod cache;
pub mod error;
pub mod github;
pub mod prefs;
pub mod state;

pub use cache::{CacheRecord, CacheStore};
pub use error::{OctobarError, Result};
pub use github::{ContributionDay, GitHubClient, RemoteSource, RepoSummary};
pub use prefs::{CredentialStore, Credentials, Preferences, PreferencesStore};
pub use state::{
    DashboardState, DataKind, FreshnessPolicy, ObservableState, RefreshCoordinator,
};
