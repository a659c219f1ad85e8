//! Traits for the external systems the installer drives.
//!
//! The installer owns the decisions. Everything that touches the network,
//! the filesystem, the pipeline runner or child processes sits behind one of
//! these traits so it can be swapped for a recording double in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::Result;
use crate::platform::ArchiveKind;

/// Pipeline runner conventions: inputs, failure status and the search path.
pub trait Runner: Send + Sync {
    /// Read a named step input. Missing inputs read as an empty string.
    fn get_input(&self, name: &str) -> String;

    /// Mark the step as failed with `message`. Does not stop execution.
    fn set_failed(&self, message: &str);

    /// Append `dir` to the executable search path for this and later steps.
    ///
    /// # Errors
    ///
    /// Returns an error if the runner's path file cannot be written.
    fn add_path(&self, dir: &Path) -> Result<()>;
}

/// Release metadata returned by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Git tag of the release (e.g., "v0.28.6").
    pub tag_name: String,
}

/// Remote release registry.
#[async_trait]
pub trait ReleaseRegistry: Send + Sync {
    /// Fetch the most recent published release of `owner/repo`.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure or a non-success HTTP status.
    async fn latest_release(&self, owner: &str, repo: &str) -> Result<Release>;
}

/// Options applied when unpacking an archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtractOptions {
    /// Number of leading path components dropped from every entry.
    pub strip_components: usize,
}

impl ExtractOptions {
    /// Drop `count` leading path components from every entry.
    #[must_use]
    pub const fn strip_components(count: usize) -> Self {
        Self {
            strip_components: count,
        }
    }
}

/// Download, extraction and the persistent tool cache.
#[async_trait]
pub trait ToolCache: Send + Sync {
    /// Create `path` and any missing parents.
    async fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Download `url` to a fresh temporary file and return its path.
    async fn download_tool(&self, url: &str) -> Result<PathBuf>;

    /// Unpack `archive` into `dest` and return the extraction root.
    async fn extract(
        &self,
        archive: &Path,
        dest: &Path,
        kind: ArchiveKind,
        options: ExtractOptions,
    ) -> Result<PathBuf>;

    /// Copy `source` into the cache under `(tool, version)` and return the
    /// cached directory.
    async fn cache_dir(&self, source: &Path, tool: &str, version: &str) -> Result<PathBuf>;

    /// Look up a complete cache entry.
    fn find(&self, tool: &str, version: &str) -> Option<PathBuf>;

    /// List every cached version of `tool`.
    fn find_all_versions(&self, tool: &str) -> Vec<String>;
}

/// Subprocess execution.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run `program` with `args` to completion.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exits non-zero.
    async fn exec(&self, program: &str, args: &[&str]) -> Result<i32>;
}
