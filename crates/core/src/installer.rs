//! Resolve, fetch, cache and activate a tool release.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

use crate::Result;
use crate::artifact::ToolRelease;
use crate::collaborators::{CommandExecutor, ExtractOptions, ReleaseRegistry, Runner, ToolCache};
use crate::platform::HostPlatform;
use crate::version::{VersionSpec, version_from_tag};

/// Argument passed to the installed binary to prove it runs.
pub const SMOKE_TEST_ARGS: &[&str] = &["version"];

/// Release archives wrap everything in one top-level directory.
const ARCHIVE_STRIP_COMPONENTS: usize = 1;

/// Something that can install a requested version.
#[async_trait]
pub trait Install: Send + Sync {
    /// Install `spec` and put it on the search path.
    async fn install(&self, spec: &VersionSpec) -> Result<Installation>;
}

/// Outcome of a successful install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Installation {
    /// Concrete version that was installed.
    pub version: String,
    /// Cached installation root.
    pub path: PathBuf,
    /// Directory added to the search path.
    pub bin_dir: PathBuf,
    /// Whether the install was served from the tool cache.
    pub cache_hit: bool,
}

/// External systems the installer drives.
#[derive(Clone)]
pub struct Collaborators {
    /// Pipeline runner, used for search path registration.
    pub runner: Arc<dyn Runner>,
    /// Release registry, consulted only for `latest`.
    pub registry: Arc<dyn ReleaseRegistry>,
    /// Download, extraction and tool cache.
    pub cache: Arc<dyn ToolCache>,
    /// Runs the smoke test.
    pub executor: Arc<dyn CommandExecutor>,
}

/// Installs one tool release for one host platform.
pub struct Installer {
    tool: ToolRelease,
    host: HostPlatform,
    work_dir: PathBuf,
    collaborators: Collaborators,
}

impl Installer {
    /// Create an installer.
    ///
    /// Archives are unpacked under `work_dir/<binary>` before being copied
    /// into the tool cache.
    #[must_use]
    pub fn new(
        tool: ToolRelease,
        host: HostPlatform,
        work_dir: impl Into<PathBuf>,
        collaborators: Collaborators,
    ) -> Self {
        Self {
            tool,
            host,
            work_dir: work_dir.into(),
            collaborators,
        }
    }

    /// The tool this installer manages.
    #[must_use]
    pub const fn tool(&self) -> &ToolRelease {
        &self.tool
    }

    /// Turn a request into a concrete version.
    async fn resolve_version(&self, spec: &VersionSpec) -> Result<String> {
        match spec {
            VersionSpec::Exact(version) => Ok(version.clone()),
            VersionSpec::Latest => {
                let release = self
                    .collaborators
                    .registry
                    .latest_release(&self.tool.owner, &self.tool.repo)
                    .await?;
                debug!(tag = %release.tag_name, "Resolved latest release");
                Ok(version_from_tag(&release.tag_name).to_string())
            }
        }
    }
}

#[async_trait]
impl Install for Installer {
    async fn install(&self, spec: &VersionSpec) -> Result<Installation> {
        let Collaborators {
            runner,
            cache,
            executor,
            ..
        } = &self.collaborators;
        let tool = &self.tool.binary;

        // Unsupported hosts fail before any I/O.
        let platform = self.host.resolve()?;
        let version = self.resolve_version(spec).await?;
        let artifact = self.tool.artifact(&version, platform);

        info!(%tool, %version, %platform, "Installing release");

        let (path, cache_hit) = if let Some(cached) = cache.find(tool, &version) {
            debug!(?cached, "Tool already cached");
            (cached, true)
        } else {
            let dest = self.work_dir.join(tool);
            cache.create_dir_all(&dest).await?;

            info!(url = %artifact.url, "Downloading release");
            let archive = cache.download_tool(&artifact.url).await?;

            let extracted = cache
                .extract(
                    &archive,
                    &dest,
                    artifact.kind,
                    ExtractOptions::strip_components(ARCHIVE_STRIP_COMPONENTS),
                )
                .await?;
            debug!(?extracted, kind = ?artifact.kind, "Extracted release");

            (cache.cache_dir(&extracted, tool, &version).await?, false)
        };

        let bin_dir = path.join("bin");
        runner.add_path(&bin_dir)?;
        info!(?bin_dir, "Added to PATH");

        executor.exec(tool, SMOKE_TEST_ARGS).await?;

        Ok(Installation {
            version,
            path,
            bin_dir,
            cache_hit,
        })
    }
}
