//! Geographic point type shared by every measurement component.

use crate::error::{MeasureError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A WGS 84 position in degrees
///
/// Longitude is not normalized; the host is responsible for wrapping it.
/// Latitude is expected to lie in [-90, 90].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lng: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Longitude/latitude pair in GeoJSON axis order
    pub fn coordinates(&self) -> [f64; 2] {
        [self.lng, self.lat]
    }

    /// Both coordinates are finite numbers
    pub fn is_finite(&self) -> bool {
        self.lng.is_finite() && self.lat.is_finite()
    }
}

impl From<[f64; 2]> for GeoPoint {
    fn from(coords: [f64; 2]) -> Self {
        Self::new(coords[0], coords[1])
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from((lng, lat): (f64, f64)) -> Self {
        Self::new(lng, lat)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.lng, self.lat)
    }
}

/// Parses `"lng,lat"` (whitespace around either number is allowed)
impl FromStr for GeoPoint {
    type Err = MeasureError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: &str| MeasureError::InvalidPoint {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let (lng, lat) = s.split_once(',').ok_or_else(|| invalid("expected 'lng,lat'"))?;
        let lng: f64 = lng.trim().parse().map_err(|_| invalid("longitude is not a number"))?;
        let lat: f64 = lat.trim().parse().map_err(|_| invalid("latitude is not a number"))?;

        Ok(Self::new(lng, lat))
    }
}
