//! Finished measurement records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::GeoPoint;
use crate::error::{MeasureError, Result};

/// What a drawing session measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementMode {
    #[default]
    Distance,
    Area,
}

impl MeasurementMode {
    /// Minimum number of points a finished measurement of this mode needs
    pub fn min_points(&self) -> usize {
        match self {
            MeasurementMode::Distance => 2,
            MeasurementMode::Area => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementMode::Distance => "distance",
            MeasurementMode::Area => "area",
        }
    }
}

impl fmt::Display for MeasurementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MeasurementMode {
    type Err = MeasureError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "distance" | "line" => Ok(MeasurementMode::Distance),
            "area" | "polygon" => Ok(MeasurementMode::Area),
            _ => Err(MeasureError::ConfigInvalid {
                key: "mode".to_string(),
                reason: format!("Invalid measurement mode: {}. Use distance or area", s),
            }),
        }
    }
}

/// Unique identifier for a measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeasurementId(Uuid);

impl MeasurementId {
    /// Generate a fresh random identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The placeholder id of a measurement that no store has accepted yet
    pub fn unassigned() -> Self {
        Self(Uuid::nil())
    }

    pub fn is_unassigned(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for MeasurementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MeasurementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for MeasurementId {
    type Err = MeasureError;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| MeasureError::InvalidMeasurementId { input: s.to_string() })
    }
}

/// Computed result of a measurement, in base units (meters, square meters)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum MeasuredValue {
    Distance {
        total_meters: f64,
        /// One entry per consecutive point pair
        segments_meters: Vec<f64>,
    },
    Area {
        square_meters: f64,
        /// Length of the closed ring
        perimeter_meters: f64,
        /// The ring crosses itself; the area is still the absolute shoelace sum
        self_intersecting: bool,
    },
}

impl MeasuredValue {
    pub fn mode(&self) -> MeasurementMode {
        match self {
            MeasuredValue::Distance { .. } => MeasurementMode::Distance,
            MeasuredValue::Area { .. } => MeasurementMode::Area,
        }
    }

    /// The headline value: meters for distance, square meters for area
    pub fn primary(&self) -> f64 {
        match self {
            MeasuredValue::Distance { total_meters, .. } => *total_meters,
            MeasuredValue::Area { square_meters, .. } => *square_meters,
        }
    }
}

/// A completed distance or area measurement
///
/// Measurements are immutable once built. The only field a store may change
/// is the id, and only when accepting the measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredMeasurement")]
pub struct Measurement {
    id: MeasurementId,
    points: Vec<GeoPoint>,
    value: MeasuredValue,
    created_at: DateTime<Utc>,
}

/// Wire form of a measurement, checked before it becomes a [`Measurement`]
#[derive(Deserialize)]
struct StoredMeasurement {
    id: MeasurementId,
    points: Vec<GeoPoint>,
    value: MeasuredValue,
    created_at: DateTime<Utc>,
}

impl TryFrom<StoredMeasurement> for Measurement {
    type Error = MeasureError;

    fn try_from(stored: StoredMeasurement) -> Result<Self> {
        let invalid = |reason: String| MeasureError::InvalidMeasurement { reason };
        let mode = stored.value.mode();

        if stored.points.len() < mode.min_points() {
            return Err(invalid(format!(
                "{} measurement needs at least {} points, got {}",
                mode,
                mode.min_points(),
                stored.points.len()
            )));
        }
        if let Some(point) = stored.points.iter().find(|p| !p.is_finite()) {
            return Err(invalid(format!("non-finite point {}", point)));
        }

        let numbers: Vec<f64> = match &stored.value {
            MeasuredValue::Distance { total_meters, segments_meters } => {
                let expected = stored.points.len() - 1;
                if segments_meters.len() != expected {
                    return Err(invalid(format!(
                        "expected {} segment lengths, got {}",
                        expected,
                        segments_meters.len()
                    )));
                }
                std::iter::once(*total_meters).chain(segments_meters.iter().copied()).collect()
            }
            MeasuredValue::Area { square_meters, perimeter_meters, .. } => {
                vec![*square_meters, *perimeter_meters]
            }
        };
        if let Some(bad) = numbers.iter().find(|n| !n.is_finite() || **n < 0.0) {
            return Err(invalid(format!("value {} is not a non-negative number", bad)));
        }

        Ok(Self {
            id: stored.id,
            points: stored.points,
            value: stored.value,
            created_at: stored.created_at,
        })
    }
}

impl Measurement {
    /// Build a distance measurement from its points and per-segment lengths
    pub fn distance(points: Vec<GeoPoint>, total_meters: f64, segments_meters: Vec<f64>) -> Self {
        debug_assert_eq!(segments_meters.len(), points.len().saturating_sub(1));
        Self::from_value(points, MeasuredValue::Distance { total_meters, segments_meters })
    }

    /// Build an area measurement from its ring
    pub fn area(
        points: Vec<GeoPoint>,
        square_meters: f64,
        perimeter_meters: f64,
        self_intersecting: bool,
    ) -> Self {
        Self::from_value(
            points,
            MeasuredValue::Area { square_meters, perimeter_meters, self_intersecting },
        )
    }

    fn from_value(points: Vec<GeoPoint>, value: MeasuredValue) -> Self {
        Self { id: MeasurementId::unassigned(), points, value, created_at: Utc::now() }
    }

    /// Replace the identifier; used by stores when accepting a measurement
    pub fn with_id(mut self, id: MeasurementId) -> Self {
        self.id = id;
        self
    }

    pub fn id(&self) -> MeasurementId {
        self.id
    }

    pub fn mode(&self) -> MeasurementMode {
        self.value.mode()
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn value(&self) -> &MeasuredValue {
        &self.value
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Total length in meters; `None` for area measurements
    pub fn distance_meters(&self) -> Option<f64> {
        match &self.value {
            MeasuredValue::Distance { total_meters, .. } => Some(*total_meters),
            MeasuredValue::Area { .. } => None,
        }
    }

    /// Enclosed area in square meters; `None` for distance measurements
    pub fn area_square_meters(&self) -> Option<f64> {
        match &self.value {
            MeasuredValue::Area { square_meters, .. } => Some(*square_meters),
            MeasuredValue::Distance { .. } => None,
        }
    }

    /// Per-segment lengths in meters; `None` for area measurements
    pub fn segment_distances_meters(&self) -> Option<&[f64]> {
        match &self.value {
            MeasuredValue::Distance { segments_meters, .. } => Some(segments_meters),
            MeasuredValue::Area { .. } => None,
        }
    }

    pub fn is_self_intersecting(&self) -> bool {
        matches!(self.value, MeasuredValue::Area { self_intersecting: true, .. })
    }
}
