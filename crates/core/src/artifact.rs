//! Release artifact naming.

use serde::{Deserialize, Serialize};

use crate::platform::{ArchiveKind, Platform};

/// Host serving release downloads.
pub const GITHUB_URL: &str = "https://github.com";

/// A tool published through GitHub Releases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolRelease {
    /// Repository owner (e.g., "smallstep").
    pub owner: String,
    /// Repository name (e.g., "cli").
    pub repo: String,
    /// Binary name, also the cache key and artifact prefix (e.g., "step").
    pub binary: String,
}

impl ToolRelease {
    /// Create a new tool release description.
    #[must_use]
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        binary: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            binary: binary.into(),
        }
    }

    /// The smallstep `step` CLI.
    #[must_use]
    pub fn step_cli() -> Self {
        Self::new("smallstep", "cli", "step")
    }

    /// Describe the artifact for a concrete version and platform.
    #[must_use]
    pub fn artifact(&self, version: &str, platform: Platform) -> ArtifactDescriptor {
        let kind = platform.archive_kind();
        let file_name = format!(
            "{}_{}_{}_{}.{}",
            self.binary,
            platform.os.token(),
            version,
            platform.arch.token(),
            kind.extension()
        );
        let url = format!(
            "{}/{}/{}/releases/download/v{}/{}",
            GITHUB_URL, self.owner, self.repo, version, file_name
        );
        ArtifactDescriptor {
            file_name,
            url,
            kind,
        }
    }
}

/// A downloadable release archive for one version and platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactDescriptor {
    /// Archive file name.
    pub file_name: String,
    /// Full download URL.
    pub url: String,
    /// Archive format.
    pub kind: ArchiveKind,
}
