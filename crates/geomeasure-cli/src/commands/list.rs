//! List command implementation

use crate::cli::StoreArgs;
use crate::output::Printer;
use crate::output_types::{ListOutput, MeasurementOutput, MeasurementRow};
use crate::storage::JsonFileRepository;
use anyhow::{Context, Result};
use geomeasure_engine::MeasureEngine;

pub fn execute(args: StoreArgs, mut engine: MeasureEngine, printer: &Printer) -> Result<()> {
    let repository = JsonFileRepository::open_existing(&args.store)?;
    engine
        .load_from(&repository)
        .with_context(|| format!("Failed to load {}", args.store.display()))?;

    let measurements: Vec<MeasurementOutput> = engine
        .measurements()
        .iter()
        .map(|m| MeasurementOutput::new(m, &engine))
        .collect();

    let result = ListOutput { store: args.store.display().to_string(), measurements };

    if printer.is_json() {
        return printer.envelope(result);
    }

    printer.heading(format!("Measurements in {}", result.store));
    let rows: Vec<MeasurementRow> = result.measurements.iter().map(MeasurementRow::from).collect();
    printer.rows(rows);

    Ok(())
}
