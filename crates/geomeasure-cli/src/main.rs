//! GeoMeasure CLI - Command-line host for the measurement engine
//!
//! Feeds points and scripted commands into the engine and prints the
//! resulting measurements and events.

mod cli;
mod commands;
mod config_loader;
mod output;
mod output_types;
mod script;
mod storage;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

fn main() -> Result<()> {
    // Logs go to stderr so JSON on stdout stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    commands::execute(cli)
}
