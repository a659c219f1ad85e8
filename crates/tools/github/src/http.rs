//! Shared HTTP client setup.

use reqwest::{Client, RequestBuilder};
use setup_step_core::{Error, Result};

/// User agent sent with every request. GitHub rejects requests without one.
const USER_AGENT: &str = concat!("setup-step/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP client used for API calls and downloads.
pub(crate) fn build_client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| Error::registry(format!("Failed to create HTTP client: {e}")))
}

/// Attach a bearer token when one is configured.
pub(crate) fn authorize(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => request.header("Authorization", format!("Bearer {token}")),
        None => request,
    }
}

/// Read a token from `GITHUB_TOKEN`, falling back to `GH_TOKEN`.
#[must_use]
pub fn token_from_env() -> Option<String> {
    std::env::var("GITHUB_TOKEN")
        .or_else(|_| std::env::var("GH_TOKEN"))
        .ok()
        .filter(|token| !token.is_empty())
}
