// GitHub API response types.
// Defines the domain structs persisted to cache and shown by the dashboard.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Summary of a repository from the REST listing.
///
/// Field names match the REST wire format so the same struct decodes the
/// API response and round-trips through the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoSummary {
    pub id: i64,
    pub name: String,
    pub full_name: String,
    pub html_url: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// One day of the contribution calendar, flattened out of the GraphQL
/// week/day nesting. `color` is the calendar cell color token as GitHub
/// reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionDay {
    pub date: NaiveDate,
    pub count: u32,
    pub color: String,
}
