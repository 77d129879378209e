// GitHub API endpoint functions.
// Typed fetches for the repository listing (REST) and the contribution
// calendar (GraphQL), plus the wire-shape structs they decode.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::{OctobarError, Result};
use crate::prefs::Credentials;

use super::RemoteSource;
use super::client::GitHubClient;
use super::types::{ContributionDay, RepoSummary};

/// The dashboard shows the five most recently updated repositories.
const REPO_PAGE_SIZE: u32 = 5;

const CONTRIBUTIONS_QUERY: &str = "\
query($login: String!) {
  user(login: $login) {
    contributionsCollection {
      contributionCalendar {
        weeks {
          contributionDays {
            date
            contributionCount
            color
          }
        }
      }
    }
  }
}";

/// GraphQL response envelope.
#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

/// GraphQL error entry.
#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ContributionsData {
    user: Option<UserNode>,
}

#[derive(Debug, Deserialize)]
struct UserNode {
    #[serde(rename = "contributionsCollection")]
    contributions_collection: ContributionsCollection,
}

#[derive(Debug, Deserialize)]
struct ContributionsCollection {
    #[serde(rename = "contributionCalendar")]
    contribution_calendar: ContributionCalendar,
}

#[derive(Debug, Deserialize, Default)]
struct ContributionCalendar {
    #[serde(default)]
    weeks: Vec<CalendarWeek>,
}

#[derive(Debug, Deserialize, Default)]
struct CalendarWeek {
    #[serde(rename = "contributionDays", default)]
    contribution_days: Vec<CalendarDay>,
}

/// Raw day entry; every field is optional so a single malformed day can
/// be dropped without failing the whole fetch.
#[derive(Debug, Deserialize, Default)]
struct CalendarDay {
    date: Option<String>,
    #[serde(rename = "contributionCount")]
    contribution_count: Option<i64>,
    color: Option<String>,
}

#[async_trait]
impl RemoteSource for GitHubClient {
    /// Fetch the most recently updated repositories for the user.
    async fn fetch_repositories(&self, credentials: &Credentials) -> Result<Vec<RepoSummary>> {
        let params = [
            ("sort", "updated".to_string()),
            ("per_page", REPO_PAGE_SIZE.to_string()),
        ];
        let response = self
            .get_with_params(
                &format!("/users/{}/repos", credentials.username),
                &params,
                &credentials.token,
            )
            .await?;

        // Decode from text so a malformed body maps to Decode, not Network.
        let body = response.text().await.map_err(OctobarError::Network)?;
        let repos: Vec<RepoSummary> = serde_json::from_str(&body)?;
        Ok(repos)
    }

    /// Fetch the contribution calendar and flatten it to one day sequence.
    async fn fetch_contributions(&self, credentials: &Credentials) -> Result<Vec<ContributionDay>> {
        let body = serde_json::json!({
            "query": CONTRIBUTIONS_QUERY,
            "variables": { "login": credentials.username },
        });
        let response = self.post_graphql(&body, &credentials.token).await?;

        let text = response.text().await.map_err(OctobarError::Network)?;
        let parsed: GraphQlResponse<ContributionsData> = serde_json::from_str(&text)?;

        if let Some(err) = parsed.errors.first() {
            return Err(OctobarError::Other(format!(
                "GraphQL error: {}",
                err.message
            )));
        }

        let user = parsed
            .data
            .and_then(|d| d.user)
            .ok_or_else(|| OctobarError::Other("GraphQL response missing user".to_string()))?;

        Ok(flatten_calendar(
            user.contributions_collection.contribution_calendar,
        ))
    }
}

/// Flatten the week/day nesting into one ordered day sequence, dropping
/// any entry that is missing a required field.
fn flatten_calendar(calendar: ContributionCalendar) -> Vec<ContributionDay> {
    calendar
        .weeks
        .into_iter()
        .flat_map(|week| week.contribution_days)
        .filter_map(|day| {
            let date = NaiveDate::parse_from_str(day.date.as_deref()?, "%Y-%m-%d").ok()?;
            let count = u32::try_from(day.contribution_count?).ok()?;
            Some(ContributionDay {
                date,
                count,
                color: day.color?,
            })
        })
        .collect()
}
