//! GitHub Releases API client.

use async_trait::async_trait;
use reqwest::Client;
use setup_step_core::{Error, Release, ReleaseRegistry, Result};
use tracing::debug;

use crate::http::{authorize, build_client};

/// Public GitHub REST API endpoint.
pub const GITHUB_API_URL: &str = "https://api.github.com";

/// Looks up releases through the GitHub REST API.
pub struct GitHubReleaseClient {
    client: Client,
    api_url: String,
    token: Option<String>,
}

impl GitHubReleaseClient {
    /// Create a client for the public API.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new(token: Option<String>) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            api_url: GITHUB_API_URL.to_string(),
            token,
        })
    }

    /// Point the client at a different API root (GitHub Enterprise, tests).
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl ReleaseRegistry for GitHubReleaseClient {
    async fn latest_release(&self, owner: &str, repo: &str) -> Result<Release> {
        let url = format!("{}/repos/{}/{}/releases/latest", self.api_url, owner, repo);
        debug!(%url, "Fetching latest GitHub release");

        let request = authorize(
            self.client
                .get(&url)
                .header("Accept", "application/vnd.github+json"),
            self.token.as_deref(),
        );

        let response = request
            .send()
            .await
            .map_err(|e| Error::registry(format!("Failed to fetch release: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::registry(format!(
                "Latest release not found: {}/{} (HTTP {})",
                owner,
                repo,
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::registry(format!("Failed to parse release: {e}")))
    }
}
