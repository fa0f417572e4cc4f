// Entrypoint for the `ecd` command.
// - Logs go to stderr, filtered by `ECD_LOG` (default `warn`).
// - Returns `anyhow::Result` so failures print their context chain.

use std::process::ExitCode;

use clap::Parser;
use ecd::{cli::Cli, ApiClient};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("ECD_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = ApiClient::from_env();
    ecd::cli::run(&client, &cli, &mut std::io::stdout().lock())
}
