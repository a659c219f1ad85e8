//! Command-line arguments and their runner environment fallbacks.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::tracing::{LogLevel, TracingFormat};

/// Command-line arguments. Runner environment variables fill in anything not
/// passed explicitly.
#[derive(Parser, Debug)]
#[command(name = "setup-step")]
#[command(about = "Install the smallstep step CLI on a CI runner")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    /// The subcommand to execute. Installs when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Root of the tool cache.
    #[arg(long, global = true, env = "RUNNER_TOOL_CACHE", value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Scratch directory for downloads and extraction.
    #[arg(long, global = true, env = "RUNNER_TEMP", value_name = "DIR")]
    pub temp_dir: Option<PathBuf>,

    /// Token sent to GitHub for release lookups and downloads.
    #[arg(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Logging verbosity level.
    #[arg(
        short = 'L',
        long,
        global = true,
        help = "Set logging level",
        default_value = "info",
        value_enum
    )]
    pub level: LogLevel,

    /// Log output format.
    #[arg(long, global = true, default_value = "compact", value_enum)]
    pub format: TracingFormat,

    /// Tracing filter directive, overriding `RUST_LOG` and `--level`.
    #[arg(long, global = true, value_name = "DIRECTIVE")]
    pub log_filter: Option<String>,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List the versions held in the tool cache.
    #[command(about = "List cached versions of step for this host")]
    Cached,
}

impl Cli {
    /// Tool cache root, falling back to the user cache directory.
    #[must_use]
    pub fn cache_root(&self) -> PathBuf {
        self.cache_dir
            .clone()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(setup_step_tools_github::default_cache_dir)
    }

    /// Scratch directory, falling back to the system temp directory.
    #[must_use]
    pub fn scratch_dir(&self) -> PathBuf {
        self.temp_dir
            .clone()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| std::env::temp_dir().join("setup-step"))
    }

    /// GitHub token from the flag, `GITHUB_TOKEN` or `GH_TOKEN`.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.github_token
            .clone()
            .filter(|token| !token.is_empty())
            .or_else(setup_step_tools_github::token_from_env)
    }
}
