//! Executable search path shared between the runner and child processes.

use setup_step_core::{Error, Result};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// Directories added during this run, most recent first.
///
/// Child processes get these ahead of the inherited `PATH`, which mirrors
/// how the runner applies `GITHUB_PATH` to later steps. The process
/// environment itself is never mutated.
#[derive(Debug, Clone, Default)]
pub struct SearchPath {
    added: Arc<Mutex<Vec<PathBuf>>>,
}

impl SearchPath {
    /// Create an empty search path overlay.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `dir` ahead of everything added so far.
    pub fn prepend(&self, dir: &Path) {
        self.added
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(0, dir.to_path_buf());
    }

    /// Directories added so far, most recent first.
    #[must_use]
    pub fn added(&self) -> Vec<PathBuf> {
        self.added
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// `PATH` value for child processes: added directories, then `inherited`.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory contains the platform path separator.
    pub fn join_with(&self, inherited: Option<&OsStr>) -> Result<OsString> {
        let mut dirs = self.added();
        if let Some(inherited) = inherited {
            dirs.extend(std::env::split_paths(inherited));
        }
        std::env::join_paths(dirs).map_err(|e| Error::exec(format!("Invalid PATH entry: {e}")))
    }

    /// `PATH` value for child processes, layered over this process's `PATH`.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory contains the platform path separator.
    pub fn to_env(&self) -> Result<OsString> {
        self.join_with(std::env::var_os("PATH").as_deref())
    }
}
