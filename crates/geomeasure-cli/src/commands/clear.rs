//! Clear command implementation

use crate::cli::StoreArgs;
use crate::output::Printer;
use crate::output_types::ClearOutput;
use crate::storage::JsonFileRepository;
use anyhow::{Context, Result};
use geomeasure_engine::MeasureEngine;

pub fn execute(args: StoreArgs, mut engine: MeasureEngine, printer: &Printer) -> Result<()> {
    let repository = JsonFileRepository::open_existing(&args.store)?;
    engine
        .load_from(&repository)
        .with_context(|| format!("Failed to load {}", args.store.display()))?;

    let cleared = engine.clear_all();
    engine
        .save_to(&repository)
        .with_context(|| format!("Failed to save {}", args.store.display()))?;

    if printer.is_json() {
        return printer.envelope(ClearOutput { cleared: cleared.len() });
    }

    printer.done(format!("Cleared {} measurement(s) from {}", cleared.len(), args.store.display()));
    Ok(())
}
