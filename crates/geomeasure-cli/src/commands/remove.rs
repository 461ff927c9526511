//! Remove command implementation

use crate::cli::RemoveArgs;
use crate::output::Printer;
use crate::output_types::{MeasurementOutput, RemoveOutput};
use crate::storage::JsonFileRepository;
use anyhow::{bail, Context, Result};
use geomeasure_engine::MeasureEngine;

pub fn execute(args: RemoveArgs, mut engine: MeasureEngine, printer: &Printer) -> Result<()> {
    let repository = JsonFileRepository::open_existing(&args.store)?;
    engine
        .load_from(&repository)
        .with_context(|| format!("Failed to load {}", args.store.display()))?;

    let Some(removed) = engine.remove_measurement(args.id) else {
        bail!("No measurement with id {} in {}", args.id, args.store.display());
    };

    engine
        .save_to(&repository)
        .with_context(|| format!("Failed to save {}", args.store.display()))?;

    let result = RemoveOutput {
        removed: MeasurementOutput::new(&removed, &engine),
        remaining: engine.measurements().len(),
    };

    if printer.is_json() {
        return printer.envelope(result);
    }

    printer.done(format!(
        "Removed {} measurement {} ({})",
        result.removed.mode, result.removed.id, result.removed.display
    ));
    printer.field("Remaining", result.remaining);

    Ok(())
}
