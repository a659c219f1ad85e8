//! Version specifier parsing and release tag normalization.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

use crate::{Error, Result};

/// Input token that selects the most recent release.
pub const LATEST: &str = "latest";

/// `latest`, or three dot-separated alphanumeric components with optional
/// pre-release and build suffixes.
static VERSION_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"^(?:latest|[0-9A-Za-z]+\.[0-9A-Za-z]+\.[0-9A-Za-z]+(?:-[0-9A-Za-z.-]+)?(?:\+[0-9A-Za-z.-]+)?)$",
    )
    .ok()
});

/// A validated version request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VersionSpec {
    /// Install the registry's most recent release.
    Latest,
    /// Install exactly this version. Not checked against the registry.
    Exact(String),
}

impl VersionSpec {
    /// Validate a raw input value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidVersion`] when the input is neither `latest`
    /// nor semver-shaped.
    pub fn parse(input: &str) -> Result<Self> {
        let valid = VERSION_PATTERN
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(input));
        if !valid {
            return Err(Error::invalid_version(input));
        }
        if input == LATEST {
            Ok(Self::Latest)
        } else {
            Ok(Self::Exact(input.to_string()))
        }
    }

    /// Whether the registry must be consulted to resolve this request.
    #[must_use]
    pub const fn is_latest(&self) -> bool {
        matches!(self, Self::Latest)
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => f.write_str(LATEST),
            Self::Exact(version) => f.write_str(version),
        }
    }
}

/// Turn a release tag into a bare version by dropping any leading
/// non-digit prefix (`v1.2.3` becomes `1.2.3`).
#[must_use]
pub fn version_from_tag(tag: &str) -> &str {
    tag.trim_start_matches(|c: char| !c.is_ascii_digit())
}
