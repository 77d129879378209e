// GitHub API module.
// Provides the client, response types, and the remote source seam the
// refresh coordinator fetches through.

pub mod client;
pub mod endpoints;
pub mod types;

use async_trait::async_trait;

use crate::error::Result;
use crate::prefs::Credentials;

pub use client::GitHubClient;
pub use types::{ContributionDay, RepoSummary};

/// The two outbound calls the dashboard makes, abstracted so tests can
/// substitute a scripted double. Implementations must not touch shared
/// state; merging results is the coordinator's job.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Fetch the repository listing for the credentialed user.
    async fn fetch_repositories(&self, credentials: &Credentials) -> Result<Vec<RepoSummary>>;

    /// Fetch the contribution calendar, flattened to one day sequence.
    async fn fetch_contributions(&self, credentials: &Credentials)
    -> Result<Vec<ContributionDay>>;
}
