//! On-disk tool cache and release downloader.
//!
//! Default location: `~/.cache/setup-step/tools/`, or the runner's
//! `RUNNER_TOOL_CACHE` when the CLI passes it in.
//!
//! Structure:
//! ```text
//! <root>/
//! └── step/
//!     └── 0.28.6/
//!         ├── x64/           # Extracted release (bin/step, ...)
//!         └── x64.complete   # Written once the copy has finished
//! ```

use async_trait::async_trait;
use reqwest::Client;
use setup_step_core::{ArchiveKind, Error, ExtractOptions, Result, ToolCache};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, trace};
use uuid::Uuid;
use walkdir::WalkDir;

use crate::extract;
use crate::http::{authorize, build_client};

/// Default cache root when no runner tool cache is configured.
#[must_use]
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("setup-step")
        .join("tools")
}

/// Tool cache backed by a local directory, downloading over HTTPS.
#[derive(Debug, Clone)]
pub struct LocalToolCache {
    root: PathBuf,
    temp_dir: PathBuf,
    arch: String,
    client: Client,
    token: Option<String>,
}

impl LocalToolCache {
    /// Create a cache rooted at `root` that downloads into `temp_dir`.
    ///
    /// `arch` is the raw host architecture and names the per-arch entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(root: PathBuf, temp_dir: PathBuf, arch: impl Into<String>) -> Result<Self> {
        Ok(Self {
            root,
            temp_dir,
            arch: arch.into(),
            client: build_client()?,
            token: None,
        })
    }

    /// Send a bearer token with downloads.
    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Get the cache root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the entry for `(tool, version)`.
    #[must_use]
    pub fn entry_dir(&self, tool: &str, version: &str) -> PathBuf {
        self.root.join(tool).join(version).join(&self.arch)
    }

    /// Marker proving the entry for `(tool, version)` was fully written.
    #[must_use]
    pub fn marker_path(&self, tool: &str, version: &str) -> PathBuf {
        self.root
            .join(tool)
            .join(version)
            .join(format!("{}.complete", self.arch))
    }
}

#[async_trait]
impl ToolCache for LocalToolCache {
    async fn create_dir_all(&self, path: &Path) -> Result<()> {
        tokio::fs::create_dir_all(path).await?;
        Ok(())
    }

    async fn download_tool(&self, url: &str) -> Result<PathBuf> {
        debug!(%url, "Downloading release asset");

        let mut response = authorize(self.client.get(url), self.token.as_deref())
            .send()
            .await
            .map_err(|e| Error::download(format!("Failed to download {url}: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::download(format!(
                "Unexpected HTTP response: {}",
                response.status()
            )));
        }

        tokio::fs::create_dir_all(&self.temp_dir).await?;
        let dest = self.temp_dir.join(Uuid::new_v4().to_string());
        let mut file = tokio::fs::File::create(&dest).await?;

        let mut written: u64 = 0;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| Error::download(format!("Failed to read {url}: {e}")))?
        {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        debug!(?dest, bytes = written, "Downloaded release asset");
        Ok(dest)
    }

    async fn extract(
        &self,
        archive: &Path,
        dest: &Path,
        kind: ArchiveKind,
        options: ExtractOptions,
    ) -> Result<PathBuf> {
        let archive = archive.to_path_buf();
        let dest = dest.to_path_buf();
        tokio::task::spawn_blocking(move || extract::unpack(&archive, &dest, kind, options))
            .await
            .map_err(|e| Error::extraction(format!("Extraction task failed: {e}")))?
    }

    async fn cache_dir(&self, source: &Path, tool: &str, version: &str) -> Result<PathBuf> {
        let dest = self.entry_dir(tool, version);
        let marker = self.marker_path(tool, version);
        let source = source.to_path_buf();

        let copied_dest = dest.clone();
        tokio::task::spawn_blocking(move || -> Result<()> {
            // Replace any partial entry left by an interrupted run.
            if marker.exists() {
                std::fs::remove_file(&marker)?;
            }
            if copied_dest.exists() {
                std::fs::remove_dir_all(&copied_dest)?;
            }
            copy_dir(&source, &copied_dest)?;
            std::fs::write(&marker, b"")?;
            Ok(())
        })
        .await
        .map_err(|e| Error::cache(format!("Cache task failed: {e}")))??;

        debug!(%tool, %version, ?dest, "Stored in tool cache");
        Ok(dest)
    }

    fn find(&self, tool: &str, version: &str) -> Option<PathBuf> {
        let dir = self.entry_dir(tool, version);
        if dir.is_dir() && self.marker_path(tool, version).exists() {
            trace!(%tool, %version, ?dir, "Cache hit");
            Some(dir)
        } else {
            trace!(%tool, %version, "Cache miss");
            None
        }
    }

    fn find_all_versions(&self, tool: &str) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(self.root.join(tool)) else {
            return Vec::new();
        };

        let mut versions: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|version| self.find(tool, version).is_some())
            .collect();

        sort_versions(&mut versions);
        versions
    }
}

/// Semver names first in semver order, then any other names by string.
fn sort_versions(versions: &mut [String]) {
    versions.sort_by_cached_key(|name| match semver::Version::parse(name) {
        Ok(version) => (0, Some(version), name.clone()),
        Err(_) => (1, None, name.clone()),
    });
}

/// Recursively copy `source` into `dest`, preserving permissions.
fn copy_dir(source: &Path, dest: &Path) -> Result<()> {
    std::fs::create_dir_all(dest)?;
    for entry in WalkDir::new(source).min_depth(1) {
        let entry = entry
            .map_err(|e| Error::cache(format!("Failed to walk {}: {e}", source.display())))?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| Error::cache(e.to_string()))?;
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn cache_in(temp: &TempDir) -> LocalToolCache {
        LocalToolCache::new(temp.path().join("cache"), temp.path().join("tmp"), "x64").unwrap()
    }

    fn populated_source(temp: &TempDir) -> PathBuf {
        let source = temp.path().join("extracted");
        std::fs::create_dir_all(source.join("bin")).unwrap();
        std::fs::write(source.join("bin").join("step"), b"binary").unwrap();
        std::fs::write(source.join("README.md"), b"readme").unwrap();
        source
    }

    #[test]
    fn test_cache_paths() {
        let cache =
            LocalToolCache::new(PathBuf::from("/tmp/cache"), PathBuf::from("/tmp/t"), "arm64")
                .unwrap();

        assert_eq!(
            cache.entry_dir("step", "0.28.6"),
            PathBuf::from("/tmp/cache/step/0.28.6/arm64")
        );
        assert_eq!(
            cache.marker_path("step", "0.28.6"),
            PathBuf::from("/tmp/cache/step/0.28.6/arm64.complete")
        );
    }

    #[tokio::test]
    async fn test_cache_store_and_find() -> Result<()> {
        let temp = TempDir::new()?;
        let cache = cache_in(&temp);
        let source = populated_source(&temp);

        assert!(cache.find("step", "0.28.6").is_none());

        let cached = cache.cache_dir(&source, "step", "0.28.6").await?;

        assert_eq!(cached, cache.entry_dir("step", "0.28.6"));
        assert_eq!(cache.find("step", "0.28.6"), Some(cached.clone()));
        assert_eq!(std::fs::read(cached.join("bin").join("step"))?, b"binary");
        assert!(cached.join("README.md").exists());

        Ok(())
    }

    #[tokio::test]
    async fn test_recache_replaces_entry() -> Result<()> {
        let temp = TempDir::new()?;
        let cache = cache_in(&temp);
        let source = populated_source(&temp);

        let cached = cache.cache_dir(&source, "step", "1.0.0").await?;
        std::fs::write(cached.join("stale"), b"old")?;

        cache.cache_dir(&source, "step", "1.0.0").await?;

        assert!(!cached.join("stale").exists());
        assert!(cached.join("bin").join("step").exists());
        Ok(())
    }

    #[test]
    fn test_incomplete_entry_is_a_miss() {
        let temp = TempDir::new().unwrap();
        let cache = cache_in(&temp);
        std::fs::create_dir_all(cache.entry_dir("step", "0.1.0")).unwrap();

        assert!(cache.find("step", "0.1.0").is_none());
        assert!(cache.find_all_versions("step").is_empty());
    }

    #[tokio::test]
    async fn test_find_all_versions_sorted_by_semver() -> Result<()> {
        let temp = TempDir::new()?;
        let cache = cache_in(&temp);
        let source = populated_source(&temp);

        for version in ["0.10.0", "0.9.1", "0.28.6"] {
            cache.cache_dir(&source, "step", version).await?;
        }

        assert_eq!(
            cache.find_all_versions("step"),
            vec!["0.9.1".to_string(), "0.10.0".to_string(), "0.28.6".to_string()]
        );
        assert!(cache.find_all_versions("other").is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_download_tool_writes_temp_file() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/smallstep/cli/releases/download/v0.0.0/step_linux_0.0.0_amd64.tar.gz"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"archive-bytes".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let temp = TempDir::new()?;
        let cache = cache_in(&temp);
        let url = format!(
            "{}/smallstep/cli/releases/download/v0.0.0/step_linux_0.0.0_amd64.tar.gz",
            server.uri()
        );

        let downloaded = cache.download_tool(&url).await?;

        assert!(downloaded.starts_with(temp.path().join("tmp")));
        assert_eq!(std::fs::read(&downloaded)?, b"archive-bytes");
        Ok(())
    }

    #[tokio::test]
    async fn test_download_tool_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let temp = TempDir::new().unwrap();
        let cache = cache_in(&temp);

        let err = cache
            .download_tool(&format!("{}/missing.tar.gz", server.uri()))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Download { .. }));
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn test_sort_versions_mixes_semver_and_other_names() {
        let mut versions: Vec<String> = ["0.2.x", "0.10.0", "nightly", "0.9.1", "0.10.0-rc.1"]
            .into_iter()
            .map(String::from)
            .collect();

        sort_versions(&mut versions);

        assert_eq!(
            versions,
            vec!["0.9.1", "0.10.0-rc.1", "0.10.0", "0.2.x", "nightly"]
        );
    }

    #[test]
    fn test_default_cache_dir() {
        assert!(default_cache_dir().ends_with("setup-step/tools"));
    }
}
