//! GeoJSON export for map hosts.
//!
//! Hosts render drafts and finished measurements from these features; the
//! engine itself never draws anything.

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};
use geomeasure_core::models::{GeoPoint, MeasuredValue, Measurement, MeasurementMode};

fn position(point: &GeoPoint) -> Vec<f64> {
    vec![point.lng, point.lat]
}

fn closed_ring(points: &[GeoPoint]) -> Vec<Vec<f64>> {
    let mut ring: Vec<Vec<f64>> = points.iter().map(position).collect();
    if let Some(first) = points.first() {
        if points.last() != Some(first) {
            ring.push(position(first));
        }
    }
    ring
}

/// Geometry for a point sequence drawn in the given mode
///
/// Returns the richest geometry the points support: a Point for a single
/// click, a LineString while an area ring has fewer than 3 points, and a
/// closed Polygon once it has 3. `None` for an empty sequence.
pub fn points_to_geometry(points: &[GeoPoint], mode: MeasurementMode) -> Option<Geometry> {
    let value = match (points.len(), mode) {
        (0, _) => return None,
        (1, _) => Value::Point(position(&points[0])),
        (n, MeasurementMode::Area) if n >= 3 => Value::Polygon(vec![closed_ring(points)]),
        _ => Value::LineString(points.iter().map(position).collect()),
    };

    Some(Geometry::new(value))
}

/// Convert a finished measurement into a GeoJSON feature
pub fn measurement_to_feature(measurement: &Measurement) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("id".to_string(), JsonValue::from(measurement.id().to_string()));
    properties.insert("mode".to_string(), JsonValue::from(measurement.mode().as_str()));
    properties
        .insert("created_at".to_string(), JsonValue::from(measurement.created_at().to_rfc3339()));

    match measurement.value() {
        MeasuredValue::Distance { total_meters, segments_meters } => {
            properties.insert("distance_meters".to_string(), JsonValue::from(*total_meters));
            properties.insert(
                "segment_distances_meters".to_string(),
                JsonValue::from(segments_meters.clone()),
            );
        }
        MeasuredValue::Area { square_meters, perimeter_meters, self_intersecting } => {
            properties.insert("area_square_meters".to_string(), JsonValue::from(*square_meters));
            properties.insert("perimeter_meters".to_string(), JsonValue::from(*perimeter_meters));
            properties.insert("self_intersecting".to_string(), JsonValue::from(*self_intersecting));
        }
    }

    Feature {
        bbox: None,
        geometry: points_to_geometry(measurement.points(), measurement.mode()),
        id: Some(geojson::feature::Id::String(measurement.id().to_string())),
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Convert a list of measurements into a FeatureCollection, preserving order
pub fn measurements_to_collection(measurements: &[Measurement]) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: measurements.iter().map(measurement_to_feature).collect(),
        foreign_members: None,
    }
}
