use geomeasure_core::config::ConfigSource;
use geomeasure_core::models::{GeoPoint, MeasuredValue, Measurement, MeasurementMode};
use geomeasure_core::units::{Unit, UnitInfo};
use geomeasure_engine::MeasureEngine;
use serde::Serialize;
use std::collections::BTreeMap;
use tabled::Tabled;

use crate::script::RecordedEvent;

/// A measurement with its values rendered in the current units
#[derive(Debug, Serialize)]
pub struct MeasurementOutput {
    pub id: String,
    pub mode: MeasurementMode,
    pub points: Vec<GeoPoint>,
    /// Meters or square meters
    pub value: f64,
    pub display: String,
    pub segments: Vec<SegmentOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perimeter_meters: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perimeter_display: Option<String>,
    pub self_intersecting: bool,
    pub created_at: String,
}

impl MeasurementOutput {
    pub fn new(measurement: &Measurement, engine: &MeasureEngine) -> Self {
        let points = measurement.points().to_vec();
        let units = engine.units();

        let (segments, perimeter_meters) = match measurement.value() {
            MeasuredValue::Distance { segments_meters, .. } => {
                (SegmentOutput::pair_up(&points, segments_meters, engine), None)
            }
            MeasuredValue::Area { perimeter_meters, .. } => (Vec::new(), Some(*perimeter_meters)),
        };

        Self {
            id: measurement.id().to_string(),
            mode: measurement.mode(),
            value: measurement.value().primary(),
            display: engine.display_value(measurement),
            segments,
            perimeter_meters,
            perimeter_display: perimeter_meters
                .map(|meters| units.distance.format_value(meters, engine.precision())),
            self_intersecting: measurement.is_self_intersecting(),
            created_at: measurement.created_at().to_rfc3339(),
            points,
        }
    }
}

/// One leg of a distance measurement
#[derive(Debug, Serialize)]
pub struct SegmentOutput {
    pub from: GeoPoint,
    pub to: GeoPoint,
    pub meters: f64,
    pub display: String,
}

impl SegmentOutput {
    fn pair_up(points: &[GeoPoint], segments_meters: &[f64], engine: &MeasureEngine) -> Vec<Self> {
        let displays = engine.display_segments(segments_meters);
        points
            .windows(2)
            .zip(segments_meters.iter().zip(displays))
            .map(|(pair, (meters, display))| SegmentOutput {
                from: pair[0],
                to: pair[1],
                meters: *meters,
                display,
            })
            .collect()
    }
}

/// Output for distance and area commands
#[derive(Debug, Serialize)]
pub struct MeasureOutput {
    pub measurement: MeasurementOutput,
    pub stored_in: Option<String>,
}

/// Row of the unit tables
#[derive(Debug, Serialize, Tabled)]
pub struct UnitRow {
    #[tabled(rename = "Name")]
    pub name: &'static str,
    #[tabled(rename = "Label")]
    pub label: &'static str,
    #[tabled(rename = "Per base unit")]
    pub factor_from_base: f64,
}

impl UnitRow {
    pub fn all<U: Unit>() -> Vec<Self> {
        U::all().iter().map(|unit| Self::from(unit.info())).collect()
    }
}

impl From<&UnitInfo> for UnitRow {
    fn from(info: &UnitInfo) -> Self {
        Self { name: info.name, label: info.label, factor_from_base: info.factor_from_base }
    }
}

/// Output for units command
#[derive(Debug, Serialize)]
pub struct UnitsOutput {
    pub distance: Vec<UnitRow>,
    pub area: Vec<UnitRow>,
}

/// Output for replay command
#[derive(Debug, Serialize)]
pub struct ReplayOutput {
    pub commands: usize,
    pub events: Vec<RecordedEvent>,
    pub measurements: Vec<MeasurementOutput>,
    pub stored_in: Option<String>,
}

/// Output for list command
#[derive(Debug, Serialize)]
pub struct ListOutput {
    pub store: String,
    pub measurements: Vec<MeasurementOutput>,
}

/// Row of the measurement table
#[derive(Debug, Tabled)]
pub struct MeasurementRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Mode")]
    pub mode: String,
    #[tabled(rename = "Points")]
    pub points: usize,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Created")]
    pub created_at: String,
}

impl From<&MeasurementOutput> for MeasurementRow {
    fn from(output: &MeasurementOutput) -> Self {
        let mut value = output.display.clone();
        if output.self_intersecting {
            value.push_str(" (self-intersecting)");
        }

        Self {
            id: output.id.clone(),
            mode: output.mode.to_string(),
            points: output.points.len(),
            value,
            created_at: output.created_at.clone(),
        }
    }
}

/// Output for remove command
#[derive(Debug, Serialize)]
pub struct RemoveOutput {
    pub removed: MeasurementOutput,
    pub remaining: usize,
}

/// Output for clear command
#[derive(Debug, Serialize)]
pub struct ClearOutput {
    pub cleared: usize,
}

/// Output for export command
#[derive(Debug, Serialize)]
pub struct ExportOutput {
    pub path: String,
    pub features: usize,
}

/// Output for config command
#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    pub values: BTreeMap<String, ConfigEntry>,
}

#[derive(Debug, Serialize)]
pub struct ConfigEntry {
    pub value: String,
    pub source: ConfigSource,
}
