//! GitHub Actions implementation of the step runner conventions.
//!
//! - Inputs arrive as `INPUT_<NAME>` environment variables
//! - Failures are `::error::` workflow commands on stdout plus a non-zero exit
//! - PATH additions are appended to the file named by `GITHUB_PATH`

use setup_step_core::{Error, Result, Runner};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};

use crate::search_path::SearchPath;

/// Runner adapter for GitHub Actions.
pub struct GitHubActionsRunner {
    path_file: Option<PathBuf>,
    search_path: SearchPath,
    output: Mutex<Box<dyn Write + Send>>,
    failed: AtomicBool,
}

impl GitHubActionsRunner {
    /// Create a runner that writes workflow commands to stdout.
    #[must_use]
    pub fn new(path_file: Option<PathBuf>, search_path: SearchPath) -> Self {
        Self::with_output(path_file, search_path, Box::new(std::io::stdout()))
    }

    /// Create a runner that writes workflow commands to `output`.
    #[must_use]
    pub fn with_output(
        path_file: Option<PathBuf>,
        search_path: SearchPath,
        output: Box<dyn Write + Send>,
    ) -> Self {
        Self {
            path_file,
            search_path,
            output: Mutex::new(output),
            failed: AtomicBool::new(false),
        }
    }

    /// Create a runner from the `GITHUB_PATH` environment variable.
    #[must_use]
    pub fn from_env(search_path: SearchPath) -> Self {
        let path_file = std::env::var_os("GITHUB_PATH")
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        if path_file.is_none() {
            debug!("GITHUB_PATH not set, PATH changes apply to this process only");
        }
        Self::new(path_file, search_path)
    }

    /// Whether a failure has been reported.
    #[must_use]
    pub fn failed(&self) -> bool {
        self.failed.load(Ordering::SeqCst)
    }
}

impl Runner for GitHubActionsRunner {
    fn get_input(&self, name: &str) -> String {
        std::env::var(input_env_name(name))
            .map(|value| value.trim().to_string())
            .unwrap_or_default()
    }

    fn set_failed(&self, message: &str) {
        self.failed.store(true, Ordering::SeqCst);
        let mut output = self.output.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = writeln!(output, "::error::{}", escape_data(message)) {
            warn!(error = %e, "Failed to write workflow command");
        }
    }

    fn add_path(&self, dir: &Path) -> Result<()> {
        if let Some(path_file) = &self.path_file {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path_file)
                .map_err(|e| {
                    Error::Io(std::io::Error::new(
                        e.kind(),
                        format!("Unable to open {}: {e}", path_file.display()),
                    ))
                })?;
            writeln!(file, "{}", dir.display())?;
        }
        self.search_path.prepend(dir);
        Ok(())
    }
}

/// Environment variable carrying a step input.
fn input_env_name(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

/// Escape a workflow command payload.
fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
