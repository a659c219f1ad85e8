//! setup-step binary.

use clap::Parser;
use setup_step_cli::cli::Cli;
use setup_step_cli::tracing::{TracingConfig, init_tracing};
use std::process::ExitCode;

fn main() -> ExitCode {
    // NOTE: eprintln! is intentional here, tracing may be unusable during a panic.
    #[allow(clippy::print_stderr)]
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {panic_info}");
        eprintln!("Internal error occurred. Run with RUST_LOG=debug for more information.");
    }));

    let cli = Cli::parse();

    let config = TracingConfig {
        format: cli.format,
        level: cli.level.into(),
        filter: cli.log_filter.clone(),
    };
    if let Err(e) = init_tracing(config) {
        #[allow(clippy::print_stderr)]
        {
            eprintln!("{e:?}");
        }
        return ExitCode::FAILURE;
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!(error = %e, "Failed to create tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(setup_step_cli::run(cli)) {
        Ok(code) => code,
        Err(report) => {
            #[allow(clippy::print_stderr)]
            {
                eprintln!("{report:?}");
            }
            ExitCode::FAILURE
        }
    }
}
