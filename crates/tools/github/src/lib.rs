//! GitHub Releases collaborators for setup-step.
//!
//! Provides the network and disk side of an install:
//! - [`GitHubReleaseClient`] - latest-release lookup through the REST API
//! - [`LocalToolCache`] - asset download, archive extraction (zip, tar.gz)
//!   and the versioned on-disk tool cache
//!
//! Both send `GITHUB_TOKEN` as a bearer token when configured, which lifts
//! the anonymous API rate limit on shared CI runners.

#![warn(missing_docs)]

mod cache;
mod extract;
mod http;
mod release;

pub use cache::{LocalToolCache, default_cache_dir};
pub use extract::unpack;
pub use http::token_from_env;
pub use release::{GITHUB_API_URL, GitHubReleaseClient};
