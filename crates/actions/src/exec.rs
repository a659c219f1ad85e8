//! Child process execution with the run's search path applied.

use async_trait::async_trait;
use setup_step_core::{CommandExecutor, Error, Result};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

use crate::search_path::SearchPath;

/// Runs programs as child processes, inheriting stdout and stderr.
#[derive(Debug, Clone, Default)]
pub struct ProcessExecutor {
    search_path: SearchPath,
}

impl ProcessExecutor {
    /// Create an executor that resolves programs through `search_path`.
    #[must_use]
    pub const fn new(search_path: SearchPath) -> Self {
        Self { search_path }
    }
}

#[async_trait]
impl CommandExecutor for ProcessExecutor {
    async fn exec(&self, program: &str, args: &[&str]) -> Result<i32> {
        info!("[command]{program} {}", args.join(" "));

        let path = self.search_path.to_env()?;
        let status = Command::new(program)
            .args(args)
            .env("PATH", path)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| Error::exec(format!("Unable to locate executable file: {program}. {e}")))?;

        // Signal-terminated processes have no exit code.
        let code = status.code().unwrap_or(-1);
        debug!(%program, code, "Process exited");

        if code != 0 {
            return Err(Error::exec(format!(
                "The process '{program}' failed with exit code {code}"
            )));
        }
        Ok(code)
    }
}
