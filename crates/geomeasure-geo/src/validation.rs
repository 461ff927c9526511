use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::{Coord, Line};
use geomeasure_core::config::SelfIntersectionPolicy;
use geomeasure_core::models::{GeoPoint, MeasurementMode};

/// Validation result with details
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

/// Validation error with location details
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub location: String,
    pub reason: String,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid() -> Self {
        Self { is_valid: true, errors: Vec::new() }
    }

    /// Add an error to the result
    pub fn add_error(&mut self, location: String, reason: String) {
        self.is_valid = false;
        self.errors.push(ValidationError { location, reason });
    }

    /// Join all error reasons into one line
    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| format!("{}: {}", e.location, e.reason))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Validate a single point a host wants to record
pub fn validate_point(point: &GeoPoint) -> ValidationResult {
    let mut result = ValidationResult::valid();

    if !point.is_finite() {
        result.add_error(
            format!("Point({}, {})", point.lng, point.lat),
            "Coordinates must be finite".to_string(),
        );
        return result;
    }

    if !(-90.0..=90.0).contains(&point.lat) {
        result.add_error(
            format!("Point({}, {})", point.lng, point.lat),
            format!("Latitude {} is outside [-90, 90]", point.lat),
        );
    }

    result
}

/// Validate a finished point sequence for the given mode
///
/// Crossing area rings only count as errors under
/// [`SelfIntersectionPolicy::Reject`].
pub fn validate_points(
    points: &[GeoPoint],
    mode: MeasurementMode,
    policy: SelfIntersectionPolicy,
) -> ValidationResult {
    let mut result = ValidationResult::valid();

    if points.len() < mode.min_points() {
        result.add_error(
            mode.to_string(),
            format!(
                "A {} measurement needs at least {} points, found {}",
                mode,
                mode.min_points(),
                points.len()
            ),
        );
    }

    for (i, point) in points.iter().enumerate() {
        for error in validate_point(point).errors {
            result.add_error(format!("points[{}]", i), error.reason);
        }
    }

    if mode == MeasurementMode::Area
        && policy == SelfIntersectionPolicy::Reject
        && points.len() >= 3
        && is_self_intersecting(points)
    {
        result.add_error("ring".to_string(), "Ring edges cross each other".to_string());
    }

    result
}

/// Whether the closed ring through `points` crosses or overlaps itself
///
/// Edges are treated as straight lines in longitude/latitude space, matching
/// the planar approximation of the area formula. Consecutive duplicate points
/// and an explicit closing point are ignored.
pub fn is_self_intersecting(points: &[GeoPoint]) -> bool {
    let ring = distinct_ring(points);
    let n = ring.len();
    if n < 3 {
        return false;
    }

    let edges: Vec<Line<f64>> = (0..n)
        .map(|i| {
            let (a, b) = (ring[i], ring[(i + 1) % n]);
            Line::new(Coord { x: a.lng, y: a.lat }, Coord { x: b.lng, y: b.lat })
        })
        .collect();

    for i in 0..n {
        for j in (i + 1)..n {
            let adjacent = j == i + 1 || (i == 0 && j == n - 1);
            match line_intersection(edges[i], edges[j]) {
                None => {}
                // Neighbouring edges always share a vertex; only an overlap counts
                Some(LineIntersection::SinglePoint { .. }) if adjacent => {}
                Some(LineIntersection::Collinear { intersection })
                    if adjacent && intersection.start == intersection.end => {}
                Some(_) => return true,
            }
        }
    }

    false
}

fn distinct_ring(points: &[GeoPoint]) -> Vec<GeoPoint> {
    let mut ring: Vec<GeoPoint> = Vec::with_capacity(points.len());
    for point in points {
        if ring.last() != Some(point) {
            ring.push(*point);
        }
    }
    while ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    ring
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(lng: f64, lat: f64) -> GeoPoint {
        GeoPoint::new(lng, lat)
    }

    #[test]
    fn test_valid_point() {
        assert!(validate_point(&p(115.0, -8.5)).is_valid);
    }

    #[test]
    fn test_non_finite_point() {
        let result = validate_point(&p(f64::NAN, 0.0));
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
    }

    #[test]
    fn test_latitude_out_of_range() {
        let result = validate_point(&p(0.0, 91.0));
        assert!(!result.is_valid);
        assert!(result.summary().contains("outside [-90, 90]"));
    }

    #[test]
    fn test_longitude_is_not_constrained() {
        assert!(validate_point(&p(540.0, 10.0)).is_valid);
    }

    #[test]
    fn test_too_few_points() {
        let two = [p(0.0, 0.0), p(1.0, 1.0)];
        let result = validate_points(&two, MeasurementMode::Area, SelfIntersectionPolicy::Allow);
        assert!(!result.is_valid);

        let result = validate_points(&two, MeasurementMode::Distance, SelfIntersectionPolicy::Allow);
        assert!(result.is_valid);
    }

    #[test]
    fn test_simple_square() {
        let square = [p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)];
        assert!(!is_self_intersecting(&square));
        assert!(validate_points(&square, MeasurementMode::Area, SelfIntersectionPolicy::Reject).is_valid);
    }

    #[test]
    fn test_bow_tie() {
        let bow_tie = [p(0.0, 0.0), p(1.0, 1.0), p(1.0, 0.0), p(0.0, 1.0)];
        assert!(is_self_intersecting(&bow_tie));

        let result = validate_points(&bow_tie, MeasurementMode::Area, SelfIntersectionPolicy::Reject);
        assert!(!result.is_valid);
        assert!(result.summary().contains("cross"));

        let result = validate_points(&bow_tie, MeasurementMode::Area, SelfIntersectionPolicy::Allow);
        assert!(result.is_valid);
    }

    #[test]
    fn test_explicitly_closed_ring() {
        let closed = [p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0), p(0.0, 0.0)];
        assert!(!is_self_intersecting(&closed));
    }

    #[test]
    fn test_repeated_points_are_ignored() {
        let ring = [p(0.0, 0.0), p(1.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)];
        assert!(!is_self_intersecting(&ring));
    }

    #[test]
    fn test_backtracking_edge_overlaps() {
        // Goes out along the equator and comes back over itself
        let ring = [p(0.0, 0.0), p(2.0, 0.0), p(1.0, 0.0), p(1.0, 1.0)];
        assert!(is_self_intersecting(&ring));
    }

    #[test]
    fn test_triangle_is_simple() {
        assert!(!is_self_intersecting(&[p(0.0, 0.0), p(0.0, 1.0), p(1.0, 1.0)]));
    }
}
