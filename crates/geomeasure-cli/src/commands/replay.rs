//! Replay command implementation

use crate::cli::ReplayArgs;
use crate::output::Printer;
use crate::output_types::{MeasurementOutput, MeasurementRow, ReplayOutput};
use crate::script::{apply, load_script, record_events};
use crate::storage::JsonFileRepository;
use anyhow::{Context, Result};
use geomeasure_engine::MeasureEngine;

pub fn execute(args: ReplayArgs, mut engine: MeasureEngine, printer: &Printer) -> Result<()> {
    let commands = load_script(&args.script)?;

    let repository = args.store.as_ref().map(JsonFileRepository::new);
    if let Some(repository) = &repository {
        engine
            .load_from(repository)
            .with_context(|| format!("Failed to load {}", repository.path().display()))?;
    }

    let log = record_events(&mut engine);
    let mut events = Vec::new();

    if !printer.is_json() {
        printer.heading(format!("Replaying {}", args.script.display()));
    }

    for (step, command) in commands.iter().enumerate() {
        apply(&mut engine, command).with_context(|| format!("Command {} failed", step + 1))?;

        let emitted: Vec<_> = log.borrow_mut().drain(..).collect();
        if !printer.is_json() {
            for event in &emitted {
                printer.step(step + 1, event.describe(&engine));
            }
        }
        events.extend(emitted);
    }

    if let Some(repository) = &repository {
        engine
            .save_to(repository)
            .with_context(|| format!("Failed to save {}", repository.path().display()))?;
    }

    let measurements: Vec<MeasurementOutput> = engine
        .measurements()
        .iter()
        .map(|m| MeasurementOutput::new(m, &engine))
        .collect();

    let result = ReplayOutput {
        commands: commands.len(),
        events,
        measurements,
        stored_in: repository.as_ref().map(|r| r.path().display().to_string()),
    };

    if printer.is_json() {
        return printer.envelope(result);
    }

    printer.heading("Measurements");
    let rows: Vec<MeasurementRow> = result.measurements.iter().map(MeasurementRow::from).collect();
    printer.rows(rows);

    if let Some(live) = engine.live_display() {
        printer.caution(format!("Script ended mid-draft; unfinished reading {}", live));
    }
    if let Some(path) = &result.stored_in {
        printer.done(format!("Saved {} measurement(s) to {}", result.measurements.len(), path));
    }

    Ok(())
}
