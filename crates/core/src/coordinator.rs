//! Step entrypoint: read the input, install, report.

use tracing::{error, info, warn};

use crate::collaborators::Runner;
use crate::installer::{Install, Installation};
use crate::version::VersionSpec;

/// Name of the step input holding the version specifier.
pub const VERSION_INPUT: &str = "version";

/// Run the step once.
///
/// Reads the `version` input, validates it, installs and maps the outcome
/// onto the runner. At most one failure is reported per call. Failures
/// without a message are logged and not reported.
///
/// Returns the installation on success so callers can log it.
pub async fn run(runner: &dyn Runner, installer: &dyn Install) -> Option<Installation> {
    let input = runner.get_input(VERSION_INPUT);

    let spec = match VersionSpec::parse(&input) {
        Ok(spec) => spec,
        Err(err) => {
            error!(%input, "Rejected version input");
            runner.set_failed(&err.to_string());
            return None;
        }
    };

    match installer.install(&spec).await {
        Ok(installation) => {
            info!(
                version = %installation.version,
                cache_hit = installation.cache_hit,
                "Installed"
            );
            Some(installation)
        }
        Err(err) => {
            if let Some(message) = err.report_message() {
                error!(%message, "Install failed");
                runner.set_failed(&message);
            } else {
                warn!(error = %err, "Install failed without a reportable message");
            }
            None
        }
    }
}
