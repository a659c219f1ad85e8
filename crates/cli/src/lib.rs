//! setup-step command-line application.
//!
//! Wires the GitHub Actions runner, the GitHub Releases registry and tool
//! cache, and the process executor into an [`Installer`], then hands control
//! to the coordinator.

pub mod cli;
pub mod tracing;

use setup_step_actions::{GitHubActionsRunner, ProcessExecutor, SearchPath};
use setup_step_core::{
    Collaborators, HostPlatform, Installer, ToolCache, ToolRelease, coordinator,
};
use setup_step_tools_github::{GitHubReleaseClient, LocalToolCache};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use uuid::Uuid;

use crate::cli::{Cli, Commands};

/// Execute the parsed command line.
///
/// # Errors
///
/// Returns an error if the HTTP clients cannot be created. Install failures
/// are reported through the runner and surface as the exit code.
pub async fn run(cli: Cli) -> miette::Result<ExitCode> {
    let host = HostPlatform::detect();
    let tool = ToolRelease::step_cli();
    let token = cli.token();
    let cache = LocalToolCache::new(cli.cache_root(), cli.scratch_dir(), host.arch.clone())?
        .with_token(token.clone());

    match cli.command {
        Some(Commands::Cached) => {
            list_cached(&cache, &tool);
            Ok(ExitCode::SUCCESS)
        }
        None => {
            let search_path = SearchPath::new();
            let runner = Arc::new(GitHubActionsRunner::from_env(search_path.clone()));
            let collaborators = Collaborators {
                runner: runner.clone(),
                registry: Arc::new(GitHubReleaseClient::new(token)?),
                cache: Arc::new(cache),
                executor: Arc::new(ProcessExecutor::new(search_path)),
            };
            let work_dir = run_work_dir(&cli.scratch_dir());
            let installer = Installer::new(tool, host, work_dir.clone(), collaborators);

            coordinator::run(runner.as_ref(), &installer).await;

            if let Err(e) = tokio::fs::remove_dir_all(&work_dir).await {
                ::tracing::debug!(?work_dir, error = %e, "Work directory not removed");
            }

            Ok(if runner.failed() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
    }
}

/// Extraction directory unique to this run inside a shared scratch directory.
fn run_work_dir(scratch: &Path) -> PathBuf {
    scratch.join(format!("run-{}", Uuid::new_v4()))
}

#[allow(clippy::print_stdout)]
fn list_cached(cache: &LocalToolCache, tool: &ToolRelease) {
    let versions = cache.find_all_versions(&tool.binary);
    ::tracing::debug!(root = ?cache.root(), count = versions.len(), "Listing tool cache");
    for version in versions {
        println!("{version}");
    }
}
