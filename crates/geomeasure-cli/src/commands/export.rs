//! Export command implementation

use crate::cli::ExportArgs;
use crate::output::Printer;
use crate::output_types::ExportOutput;
use crate::storage::JsonFileRepository;
use anyhow::{Context, Result};
use geomeasure_engine::MeasureEngine;
use geomeasure_geo::export::measurements_to_collection;
use std::fs;

pub fn execute(args: ExportArgs, mut engine: MeasureEngine, printer: &Printer) -> Result<()> {
    let repository = JsonFileRepository::open_existing(&args.store)?;
    engine
        .load_from(&repository)
        .with_context(|| format!("Failed to load {}", args.store.display()))?;

    let collection = measurements_to_collection(&engine.measurements());

    let Some(path) = &args.output else {
        return printer.envelope(collection);
    };

    let content = serde_json::to_string_pretty(&collection)?;
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;

    let result = ExportOutput {
        path: path.display().to_string(),
        features: collection.features.len(),
    };

    if printer.is_json() {
        return printer.envelope(result);
    }

    printer.done(format!("Exported {} feature(s) to {}", result.features, result.path));
    Ok(())
}
