// GitHub API HTTP client.
// Handles common headers, per-request authentication, and response checking.

use std::time::Duration;

use reqwest::{
    Client, Response, StatusCode,
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT},
};

use crate::error::{OctobarError, Result};

const GITHUB_API_BASE: &str = "https://api.github.com";
const GITHUB_GRAPHQL_URL: &str = "https://api.github.com/graphql";
const GITHUB_API_VERSION: &str = "2022-11-28";

/// Bounded wait on every request; a timeout surfaces as a network error.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// GitHub API client for the two dashboard fetches.
///
/// Credentials are not baked into the client: the coordinator re-reads
/// them on every refresh, so each request carries its own auth header.
pub struct GitHubClient {
    client: Client,
    rest_base: String,
    graphql_url: String,
}

impl GitHubClient {
    /// Create a new client with the standard GitHub headers.
    pub fn new() -> Result<Self> {
        let mut headers = HeaderMap::new();

        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("octobar"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(OctobarError::Network)?;

        Ok(Self {
            client,
            rest_base: GITHUB_API_BASE.to_string(),
            graphql_url: GITHUB_GRAPHQL_URL.to_string(),
        })
    }

    /// Override the endpoint URLs (tests against a local server).
    pub fn with_base_urls(mut self, rest_base: &str, graphql_url: &str) -> Self {
        self.rest_base = rest_base.trim_end_matches('/').to_string();
        self.graphql_url = graphql_url.to_string();
        self
    }

    /// Make an authenticated GET request to the REST API.
    pub(crate) async fn get_with_params<T: serde::Serialize + ?Sized>(
        &self,
        endpoint: &str,
        params: &T,
        token: &str,
    ) -> Result<Response> {
        let url = format!("{}{}", self.rest_base, endpoint);
        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, auth_header("token", token)?)
            .query(params)
            .send()
            .await
            .map_err(OctobarError::Network)?;

        check_response(response).await
    }

    /// POST a GraphQL request body.
    pub(crate) async fn post_graphql(
        &self,
        body: &serde_json::Value,
        token: &str,
    ) -> Result<Response> {
        let response = self
            .client
            .post(&self.graphql_url)
            .header(AUTHORIZATION, auth_header("Bearer", token)?)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .json(body)
            .send()
            .await
            .map_err(OctobarError::Network)?;

        check_response(response).await
    }
}

fn auth_header(scheme: &str, token: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(&format!("{} {}", scheme, token))
        .map_err(|e| OctobarError::Other(e.to_string()))
}

/// Check response status and convert errors.
async fn check_response(response: Response) -> Result<Response> {
    match response.status() {
        StatusCode::OK | StatusCode::CREATED | StatusCode::ACCEPTED => Ok(response),
        StatusCode::UNAUTHORIZED => Err(OctobarError::Unauthorized),
        status => Err(OctobarError::Other(format!(
            "HTTP {}: {}",
            status,
            response.text().await.unwrap_or_default()
        ))),
    }
}
