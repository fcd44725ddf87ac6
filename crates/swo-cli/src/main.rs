//! `swo` — SolarWinds Observability command-line interface.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use swo_cli::signal::spawn_signal_listener;
use swo_cli::{Cli, run};
use swo_logs::ShutdownTrigger;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Diagnostics go to stderr so stdout stays pipeable.
    let default_filter = if cli.verbose {
        "warn,swo_cli=debug,swo_logs=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "swo starting");

    let (trigger, shutdown) = ShutdownTrigger::new();
    spawn_signal_listener(trigger);

    match run::run(cli, shutdown).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "command failed");
            ExitCode::FAILURE
        }
    }
}
