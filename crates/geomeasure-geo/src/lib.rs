//! GeoMeasure Geo - Geodesic calculations, validation, and GeoJSON export
//!
//! This crate holds the pure geometry side of the measurement engine: spherical
//! distance and area, point and ring validation, and conversion of measurements
//! into GeoJSON for map hosts.

pub mod export;
pub mod geodesic;
pub mod validation;

pub use geodesic::{
    polygon_area, ring_perimeter, segment_distance, total_distance, DistanceSummary,
    EARTH_RADIUS_METERS,
};
