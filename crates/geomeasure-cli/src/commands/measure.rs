//! Distance and area commands

use crate::cli::MeasureArgs;
use crate::output::Printer;
use crate::output_types::{MeasureOutput, MeasurementOutput};
use crate::storage::JsonFileRepository;
use anyhow::{bail, Context, Result};
use geomeasure_core::config::MeasureConfig;
use geomeasure_core::models::MeasurementMode;
use geomeasure_engine::events::DrawCancel;
use geomeasure_engine::MeasureEngine;
use geomeasure_geo::validation::validate_points;
use std::cell::RefCell;
use std::rc::Rc;
use tabled::Tabled;

pub fn execute(
    args: MeasureArgs,
    mode: MeasurementMode,
    config: &MeasureConfig,
    mut engine: MeasureEngine,
    printer: &Printer,
) -> Result<()> {
    let validation = validate_points(&args.points, mode, config.self_intersection);
    if !validation.is_valid {
        bail!("Cannot measure {}: {}", mode, validation.summary());
    }

    let repository = args.store.as_ref().map(JsonFileRepository::new);
    if let Some(repository) = &repository {
        engine
            .load_from(repository)
            .with_context(|| format!("Failed to load {}", repository.path().display()))?;
    }

    let cancelled = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&cancelled);
    engine.on::<DrawCancel>(move |payload| *sink.borrow_mut() = Some(payload.reason));

    engine.start(mode);
    for point in &args.points {
        engine.add_point(*point);
    }

    let Some(measurement) = engine.finish() else {
        match cancelled.borrow_mut().take() {
            Some(reason) => bail!("The {} measurement was discarded ({:?})", mode, reason),
            None => bail!("The {} measurement was discarded", mode),
        }
    };

    if let Some(repository) = &repository {
        engine
            .save_to(repository)
            .with_context(|| format!("Failed to save {}", repository.path().display()))?;
    }

    let result = MeasureOutput {
        measurement: MeasurementOutput::new(&measurement, &engine),
        stored_in: repository.as_ref().map(|r| r.path().display().to_string()),
    };

    if printer.is_json() {
        return printer.envelope(result);
    }

    let measured = &result.measurement;
    match mode {
        MeasurementMode::Distance => {
            printer.heading("Distance");
            printer.field("Total", &measured.display);
            printer.field("Points", measured.points.len());

            #[derive(Tabled)]
            struct SegmentRow {
                #[tabled(rename = "#")]
                index: usize,
                #[tabled(rename = "From")]
                from: String,
                #[tabled(rename = "To")]
                to: String,
                #[tabled(rename = "Length")]
                length: String,
            }

            let rows: Vec<SegmentRow> = measured
                .segments
                .iter()
                .enumerate()
                .map(|(i, segment)| SegmentRow {
                    index: i + 1,
                    from: segment.from.to_string(),
                    to: segment.to.to_string(),
                    length: segment.display.clone(),
                })
                .collect();

            printer.heading("Segments");
            printer.rows(rows);
        }
        MeasurementMode::Area => {
            printer.heading("Area");
            printer.field("Area", &measured.display);
            if let Some(perimeter) = &measured.perimeter_display {
                printer.field("Perimeter", perimeter);
            }
            printer.field("Vertices", measured.points.len());
            if measured.self_intersecting {
                printer.caution("The ring crosses itself; the area may not be meaningful");
            }
        }
    }

    if let Some(path) = &result.stored_in {
        printer.done(format!("Saved measurement {} to {}", measured.id, path));
    }

    Ok(())
}
