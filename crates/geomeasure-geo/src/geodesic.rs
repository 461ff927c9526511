//! Great-circle distance and spherical polygon area on a spherical Earth.
//!
//! All functions are pure and never fail: degenerate input yields zero.

use geomeasure_core::models::GeoPoint;
use serde::{Deserialize, Serialize};

/// Mean Earth radius used by every calculation in this module
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Length of a polyline, in meters
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DistanceSummary {
    pub total: f64,
    /// One entry per consecutive point pair
    pub segments: Vec<f64>,
}

/// Great-circle distance between two points in meters (Haversine)
pub fn segment_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);
    // Rounding can push h a hair outside [0, 1] for antipodal points
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Segment lengths and total length of a polyline
pub fn total_distance(points: &[GeoPoint]) -> DistanceSummary {
    let segments: Vec<f64> =
        points.windows(2).map(|pair| segment_distance(pair[0], pair[1])).collect();
    let total = segments.iter().sum();

    DistanceSummary { total, segments }
}

/// Area enclosed by a ring in square meters
///
/// The ring is closed implicitly; the first point must not be repeated at the
/// end (a repeated closing point only adds a zero-length edge). The signed
/// accumulation is made absolute, so winding order does not matter. Accuracy
/// degrades for very large rings and rings around a pole.
pub fn polygon_area(points: &[GeoPoint]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let sum: f64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(p1, p2)| {
            let d_lng = (p2.lng - p1.lng).to_radians();
            d_lng * (2.0 + p1.lat.to_radians().sin() + p2.lat.to_radians().sin())
        })
        .sum();

    (sum * EARTH_RADIUS_METERS * EARTH_RADIUS_METERS / 2.0).abs()
}

/// Length of the closed ring through `points`, in meters
pub fn ring_perimeter(points: &[GeoPoint]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let open = total_distance(points).total;
    let closing = segment_distance(points[points.len() - 1], points[0]);
    open + closing
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Distance, Haversine, Point};
    use proptest::prelude::*;

    fn p(lng: f64, lat: f64) -> GeoPoint {
        GeoPoint::new(lng, lat)
    }

    #[test]
    fn test_one_degree_on_equator() {
        let distance = segment_distance(p(0.0, 0.0), p(1.0, 0.0));
        let expected = 111_320.0;
        assert!(
            (distance - expected).abs() / expected < 0.01,
            "1 degree of longitude on the equator should be ~111.32km, got {}",
            distance
        );
    }

    #[test]
    fn test_paris_london() {
        let distance = segment_distance(p(2.3522, 48.8566), p(-0.1276, 51.5074));
        assert!(
            distance > 339_000.0 && distance < 349_000.0,
            "Paris-London distance {} should be ~344km",
            distance
        );
    }

    #[test]
    fn test_same_point_is_zero() {
        let point = p(115.0, -8.0);
        assert!(segment_distance(point, point) < 1e-9);
    }

    #[test]
    fn test_antipodal_points() {
        let distance = segment_distance(p(0.0, 0.0), p(180.0, 0.0));
        let half_circumference = std::f64::consts::PI * EARTH_RADIUS_METERS;
        assert!((distance - half_circumference).abs() < 1e-3);
    }

    #[test]
    fn test_agrees_with_geo_haversine() {
        // geo uses a slightly different mean radius, so compare relatively
        let (a, b) = (p(115.2625, -8.5069), p(115.3625, -8.4069));
        let ours = segment_distance(a, b);
        let theirs = Haversine.distance(Point::new(a.lng, a.lat), Point::new(b.lng, b.lat));
        assert!((ours - theirs).abs() / theirs < 1e-5);
    }

    #[test]
    fn test_total_distance() {
        let points = [p(0.0, 0.0), p(0.0, 1.0), p(1.0, 1.0)];
        let summary = total_distance(&points);

        assert_eq!(summary.segments.len(), 2);
        for segment in &summary.segments {
            assert!((segment - 111_320.0).abs() / 111_320.0 < 0.01);
        }
        assert!((summary.total - summary.segments.iter().sum::<f64>()).abs() < 1e-9);
    }

    #[test]
    fn test_total_distance_degenerate() {
        assert_eq!(total_distance(&[]), DistanceSummary::default());
        assert_eq!(total_distance(&[p(10.0, 10.0)]), DistanceSummary::default());
    }

    #[test]
    fn test_square_kilometer_area() {
        let side = 1000.0;
        let d = (side / EARTH_RADIUS_METERS).to_degrees();
        let square = [p(0.0, 0.0), p(d, 0.0), p(d, d), p(0.0, d)];

        let area = polygon_area(&square);
        let expected = side * side;
        assert!(
            (area - expected).abs() / expected < 0.001,
            "1km square should be ~1,000,000 m², got {}",
            area
        );
    }

    #[test]
    fn test_area_ignores_winding() {
        let ring = [p(115.26, -8.50), p(115.27, -8.50), p(115.27, -8.51), p(115.26, -8.51)];
        let mut reversed = ring;
        reversed.reverse();

        let forward = polygon_area(&ring);
        assert!(forward > 0.0);
        assert!((forward - polygon_area(&reversed)).abs() < 1e-3);
    }

    #[test]
    fn test_area_degenerate() {
        assert_eq!(polygon_area(&[]), 0.0);
        assert_eq!(polygon_area(&[p(0.0, 0.0), p(1.0, 1.0)]), 0.0);
    }

    #[test]
    fn test_triangle_area_is_positive() {
        let area = polygon_area(&[p(0.0, 0.0), p(0.0, 1.0), p(1.0, 1.0)]);
        // Half of a ~111km x ~111km cell
        assert!(area > 5.0e9 && area < 7.0e9, "unexpected triangle area {}", area);
    }

    #[test]
    fn test_ring_perimeter() {
        let d = (1000.0 / EARTH_RADIUS_METERS).to_degrees();
        let square = [p(0.0, 0.0), p(d, 0.0), p(d, d), p(0.0, d)];
        assert!((ring_perimeter(&square) - 4000.0).abs() < 1.0);
        assert_eq!(ring_perimeter(&square[..2]), 0.0);
    }

    fn arb_point() -> impl Strategy<Value = GeoPoint> {
        (-180.0f64..180.0, -89.0f64..89.0).prop_map(|(lng, lat)| GeoPoint::new(lng, lat))
    }

    proptest! {
        #[test]
        fn prop_distance_symmetric_and_bounded(a in arb_point(), b in arb_point()) {
            let ab = segment_distance(a, b);
            let ba = segment_distance(b, a);
            prop_assert!(ab >= 0.0);
            prop_assert!((ab - ba).abs() < 1e-6);
            prop_assert!(ab <= std::f64::consts::PI * EARTH_RADIUS_METERS + 1e-6);
        }

        #[test]
        fn prop_triangle_inequality(a in arb_point(), b in arb_point(), c in arb_point()) {
            let direct = segment_distance(a, c);
            let via = segment_distance(a, b) + segment_distance(b, c);
            prop_assert!(direct <= via + 1e-3);
        }

        #[test]
        fn prop_segments_match_point_count(points in prop::collection::vec(arb_point(), 0..12)) {
            let summary = total_distance(&points);
            prop_assert_eq!(summary.segments.len(), points.len().saturating_sub(1));
            prop_assert!((summary.total - summary.segments.iter().sum::<f64>()).abs() < 1e-6);
        }

        #[test]
        fn prop_area_invariant_under_rotation(
            points in prop::collection::vec(arb_point(), 3..10),
            shift in 0usize..10,
        ) {
            let mut rotated = points.clone();
            rotated.rotate_left(shift % points.len());
            let original = polygon_area(&points);
            prop_assert!(original >= 0.0);
            // Terms can be ~1e14 m² before cancelling, so allow for summation order
            prop_assert!((original - polygon_area(&rotated)).abs() <= 1e-6 * original.max(1.0e9));
        }
    }
}
