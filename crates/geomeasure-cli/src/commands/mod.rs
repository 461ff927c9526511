//! Command implementations

mod clear;
mod config;
mod export;
mod list;
mod measure;
mod remove;
mod replay;
mod units;

use crate::cli::{Cli, Commands};
use crate::config_loader::load_config;
use crate::output::Printer;
use anyhow::Result;
use geomeasure_core::models::MeasurementMode;
use geomeasure_engine::MeasureEngine;

/// Execute a CLI command
pub fn execute(cli: Cli) -> Result<()> {
    let printer = Printer::new(cli.json);
    let layered = load_config(&cli)?;
    let resolved = layered.resolve();
    let engine = MeasureEngine::with_config(&resolved);

    match cli.command {
        Commands::Distance(args) => {
            measure::execute(args, MeasurementMode::Distance, &resolved, engine, &printer)
        }
        Commands::Area(args) => {
            measure::execute(args, MeasurementMode::Area, &resolved, engine, &printer)
        }
        Commands::Units => units::execute(&printer),
        Commands::Replay(args) => replay::execute(args, engine, &printer),
        Commands::List(args) => list::execute(args, engine, &printer),
        Commands::Remove(args) => remove::execute(args, engine, &printer),
        Commands::Clear(args) => clear::execute(args, engine, &printer),
        Commands::Export(args) => export::execute(args, engine, &printer),
        Commands::Config => config::execute(&layered, &printer),
    }
}
