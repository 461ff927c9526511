//! Replay scripts: a JSON array of engine commands.
//!
//! ```json
//! [
//!   {"command": "start", "mode": "distance"},
//!   {"command": "add_point", "lng": 0.0, "lat": 0.0},
//!   {"command": "add_point", "lng": 1.0, "lat": 0.0},
//!   {"command": "finish"}
//! ]
//! ```

use anyhow::{bail, Context, Result};
use geojson::Geometry;
use geomeasure_core::models::{GeoPoint, Measurement, MeasurementId, MeasurementMode};
use geomeasure_core::units::{AreaUnit, DistanceUnit};
use geomeasure_engine::events::{
    Clear, DrawCancel, DrawCancelPayload, DrawEnd, DrawEndPayload, DrawStart, DrawUpdate,
    MeasurementAdd, MeasurementRemove, ModeChange, UnitChange, UnitSelection,
};
use geomeasure_engine::{MeasureEngine, SessionSnapshot};
use geomeasure_geo::export::points_to_geometry;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ScriptCommand {
    Start {
        #[serde(default)]
        mode: MeasurementMode,
    },
    AddPoint {
        lng: f64,
        lat: f64,
    },
    PreviewAt {
        lng: f64,
        lat: f64,
    },
    Finish,
    Cancel,
    SetMode {
        mode: MeasurementMode,
    },
    SetDistanceUnit {
        unit: DistanceUnit,
    },
    SetAreaUnit {
        unit: AreaUnit,
    },
    /// Remove by id, or by position in the current list (0 = most recent)
    Remove {
        #[serde(default)]
        id: Option<MeasurementId>,
        #[serde(default)]
        index: Option<usize>,
    },
    Clear,
}

/// Read and parse a script file
pub fn load_script(path: &Path) -> Result<Vec<ScriptCommand>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    parse_script(&content).with_context(|| format!("Invalid script {}", path.display()))
}

pub fn parse_script(content: &str) -> Result<Vec<ScriptCommand>> {
    let commands: Vec<ScriptCommand> = serde_json::from_str(content)?;
    Ok(commands)
}

/// Run one command against the engine
pub fn apply(engine: &mut MeasureEngine, command: &ScriptCommand) -> Result<()> {
    match command {
        ScriptCommand::Start { mode } => engine.start(*mode),
        ScriptCommand::AddPoint { lng, lat } => engine.add_point(GeoPoint::new(*lng, *lat)),
        ScriptCommand::PreviewAt { lng, lat } => engine.preview_at(GeoPoint::new(*lng, *lat)),
        ScriptCommand::Finish => {
            engine.finish();
        }
        ScriptCommand::Cancel => engine.cancel(),
        ScriptCommand::SetMode { mode } => engine.set_mode(*mode),
        ScriptCommand::SetDistanceUnit { unit } => engine.set_distance_unit(*unit),
        ScriptCommand::SetAreaUnit { unit } => engine.set_area_unit(*unit),
        ScriptCommand::Remove { id, index } => {
            let target = match (id, index) {
                (Some(id), _) => Some(*id),
                (None, Some(index)) => engine.measurements().get(*index).map(Measurement::id),
                (None, None) => bail!("remove needs an \"id\" or an \"index\""),
            };
            match target {
                Some(id) => {
                    engine.remove_measurement(id);
                }
                None => tracing::warn!("No measurement at index {:?} to remove", index),
            }
        }
        ScriptCommand::Clear => {
            engine.clear_all();
        }
    }
    Ok(())
}

/// An event as printed by the replay command
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "lowercase")]
pub enum RecordedEvent {
    DrawStart(SessionSnapshot),
    DrawUpdate(DraftUpdate),
    DrawEnd(DrawEndPayload),
    DrawCancel(DrawCancelPayload),
    MeasurementAdd(Measurement),
    MeasurementRemove(Measurement),
    ModeChange(SessionSnapshot),
    UnitChange(UnitSelection),
    Clear(Vec<Measurement>),
}

/// Draft snapshot plus the geometry a map would draw for it
#[derive(Debug, Clone, Serialize)]
pub struct DraftUpdate {
    #[serde(flatten)]
    pub session: SessionSnapshot,
    pub geometry: Option<Geometry>,
}

impl DraftUpdate {
    fn new(session: &SessionSnapshot) -> Self {
        let mut points = session.draft_points.clone();
        points.extend(session.preview_point);
        Self { geometry: points_to_geometry(&points, session.mode), session: session.clone() }
    }
}

impl RecordedEvent {
    /// One-line description in the engine's current units
    pub fn describe(&self, engine: &MeasureEngine) -> String {
        match self {
            RecordedEvent::DrawStart(session) => format!("drawstart ({})", session.mode),
            RecordedEvent::DrawUpdate(update) => {
                let session = &update.session;
                let preview = if session.preview_point.is_some() { ", preview" } else { "" };
                format!(
                    "drawupdate: {} point(s){}, live {}",
                    session.draft_points.len(),
                    preview,
                    engine.display_snapshot(session)
                )
            }
            RecordedEvent::DrawEnd(payload) => {
                format!("drawend: {}", engine.display_value(&payload.measurement))
            }
            RecordedEvent::DrawCancel(payload) => format!(
                "drawcancel: {} point(s) discarded ({:?})",
                payload.discarded_points.len(),
                payload.reason
            ),
            RecordedEvent::MeasurementAdd(measurement) => {
                format!("measurementadd: {}", measurement.id())
            }
            RecordedEvent::MeasurementRemove(measurement) => {
                format!("measurementremove: {}", measurement.id())
            }
            RecordedEvent::ModeChange(session) => format!("modechange: {}", session.mode),
            RecordedEvent::UnitChange(units) => {
                format!("unitchange: {} / {}", units.distance, units.area)
            }
            RecordedEvent::Clear(cleared) => format!("clear: {} measurement(s)", cleared.len()),
        }
    }
}

/// Subscribe to every event and collect them in emission order
pub fn record_events(engine: &mut MeasureEngine) -> Rc<RefCell<Vec<RecordedEvent>>> {
    let log = Rc::new(RefCell::new(Vec::new()));

    macro_rules! record {
        ($event:ty, $wrap:expr) => {{
            let log = Rc::clone(&log);
            engine.on::<$event>(move |payload| log.borrow_mut().push($wrap(payload)));
        }};
    }

    record!(DrawStart, |s: &SessionSnapshot| RecordedEvent::DrawStart(s.clone()));
    record!(DrawUpdate, |s: &SessionSnapshot| RecordedEvent::DrawUpdate(DraftUpdate::new(s)));
    record!(DrawEnd, |p: &DrawEndPayload| RecordedEvent::DrawEnd(p.clone()));
    record!(DrawCancel, |p: &DrawCancelPayload| RecordedEvent::DrawCancel(p.clone()));
    record!(MeasurementAdd, |m: &Measurement| RecordedEvent::MeasurementAdd(m.clone()));
    record!(MeasurementRemove, |m: &Measurement| RecordedEvent::MeasurementRemove(m.clone()));
    record!(ModeChange, |s: &SessionSnapshot| RecordedEvent::ModeChange(s.clone()));
    record!(UnitChange, |u: &UnitSelection| RecordedEvent::UnitChange(*u));
    record!(Clear, |c: &Vec<Measurement>| RecordedEvent::Clear(c.clone()));

    log
}
