//! The drawing state machine behind an in-progress measurement.
//!
//! A session is either idle or drawing. Finishing and cancelling are
//! transitions back to idle, not states of their own. Every operation that
//! changes something returns the payload of the event the host should see;
//! operations issued in the wrong state return nothing and change nothing.

use geomeasure_core::config::SelfIntersectionPolicy;
use geomeasure_core::models::{GeoPoint, Measurement, MeasurementMode};
use geomeasure_geo::geodesic::{polygon_area, ring_perimeter, total_distance};
use geomeasure_geo::validation::{is_self_intersecting, validate_point};
use serde::{Deserialize, Serialize};

use crate::events::{CancelReason, DrawCancelPayload, DrawEndPayload};
use crate::store::MeasurementStore;

/// Where the session is
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Waiting for `start`; remembers the mode the next draft will use
    Idle { mode: MeasurementMode },
    /// Collecting points
    Drawing { mode: MeasurementMode, points: Vec<GeoPoint> },
}

/// Owned copy of the session state plus its live readings
///
/// Live values are recomputed from the points every time a snapshot is taken
/// and are never stored alongside the draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub mode: MeasurementMode,
    pub is_drawing: bool,
    pub draft_points: Vec<GeoPoint>,
    /// Cursor position included in the live readings but not in the draft
    pub preview_point: Option<GeoPoint>,
    /// Meters in distance mode, square meters in area mode
    pub live_value: f64,
    pub live_segments_meters: Vec<f64>,
}

impl SessionSnapshot {
    fn compute(
        mode: MeasurementMode,
        is_drawing: bool,
        points: &[GeoPoint],
        preview: Option<GeoPoint>,
    ) -> Self {
        let mut measured = points.to_vec();
        measured.extend(preview);

        let summary = total_distance(&measured);
        let live_value = match mode {
            MeasurementMode::Distance => summary.total,
            MeasurementMode::Area => polygon_area(&measured),
        };

        Self {
            mode,
            is_drawing,
            draft_points: points.to_vec(),
            preview_point: preview,
            live_value,
            live_segments_meters: summary.segments,
        }
    }
}

/// Result of [`DrawingSession::finish`]
#[derive(Debug, Clone, PartialEq)]
pub enum FinishOutcome {
    /// The draft became a measurement and was added to the store
    Completed(DrawEndPayload),
    /// The draft did not qualify and was dropped like a cancellation
    Discarded(DrawCancelPayload),
    /// The session was idle
    Ignored,
}

/// Result of [`DrawingSession::set_mode`]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModeSwitch {
    /// Set when a draft was in progress and got dropped
    pub cancelled: Option<DrawCancelPayload>,
    /// Set when the switch is visible to the host (mode changed or draft dropped)
    pub snapshot: Option<SessionSnapshot>,
}

/// In-progress measurement state machine
#[derive(Debug, Clone)]
pub struct DrawingSession {
    state: SessionState,
    self_intersection: SelfIntersectionPolicy,
}

impl Default for DrawingSession {
    fn default() -> Self {
        Self::new(MeasurementMode::default())
    }
}

impl DrawingSession {
    pub fn new(mode: MeasurementMode) -> Self {
        Self { state: SessionState::Idle { mode }, self_intersection: SelfIntersectionPolicy::Allow }
    }

    /// Choose how finished area rings that cross themselves are handled
    pub fn with_self_intersection(mut self, policy: SelfIntersectionPolicy) -> Self {
        self.self_intersection = policy;
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn mode(&self) -> MeasurementMode {
        match &self.state {
            SessionState::Idle { mode } | SessionState::Drawing { mode, .. } => *mode,
        }
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, SessionState::Drawing { .. })
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        match &self.state {
            SessionState::Idle { mode } => SessionSnapshot::compute(*mode, false, &[], None),
            SessionState::Drawing { mode, points } => {
                SessionSnapshot::compute(*mode, true, points, None)
            }
        }
    }

    /// Begin a new draft in `mode`; ignored while already drawing
    pub fn start(&mut self, mode: MeasurementMode) -> Option<SessionSnapshot> {
        if self.is_drawing() {
            tracing::debug!("Ignoring start({}): a {} draft is in progress", mode, self.mode());
            return None;
        }

        self.state = SessionState::Drawing { mode, points: Vec::new() };
        tracing::debug!("Started {} measurement", mode);
        Some(self.snapshot())
    }

    /// Append a point to the draft
    ///
    /// Ignored while idle, and for points that are not finite or whose
    /// latitude lies outside [-90, 90].
    pub fn add_point(&mut self, point: GeoPoint) -> Option<SessionSnapshot> {
        let SessionState::Drawing { points, .. } = &mut self.state else {
            tracing::debug!("Ignoring add_point({}) while idle", point);
            return None;
        };

        let validation = validate_point(&point);
        if !validation.is_valid {
            tracing::warn!("Ignoring invalid point: {}", validation.summary());
            return None;
        }

        points.push(point);
        Some(self.snapshot())
    }

    /// Live readings as if `point` were appended, without touching the draft
    pub fn preview_at(&self, point: GeoPoint) -> Option<SessionSnapshot> {
        let SessionState::Drawing { mode, points } = &self.state else {
            return None;
        };

        if !validate_point(&point).is_valid {
            return None;
        }

        Some(SessionSnapshot::compute(*mode, true, points, Some(point)))
    }

    /// Complete the draft and hand the measurement to `store`
    ///
    /// Drafts below the mode's minimum point count are discarded instead, as
    /// are self-intersecting area rings when the policy is
    /// [`SelfIntersectionPolicy::Reject`].
    pub fn finish(&mut self, store: &mut MeasurementStore) -> FinishOutcome {
        let mode = self.mode();
        let SessionState::Drawing { points, .. } =
            std::mem::replace(&mut self.state, SessionState::Idle { mode })
        else {
            tracing::debug!("Ignoring finish while idle");
            return FinishOutcome::Ignored;
        };

        if points.len() < mode.min_points() {
            tracing::debug!(
                "Discarding {} draft with {} point(s); {} required",
                mode,
                points.len(),
                mode.min_points()
            );
            let reason =
                CancelReason::TooFewPoints { required: mode.min_points(), actual: points.len() };
            return FinishOutcome::Discarded(self.cancelled(points, reason));
        }

        let measurement = match mode {
            MeasurementMode::Distance => {
                let summary = total_distance(&points);
                Measurement::distance(points, summary.total, summary.segments)
            }
            MeasurementMode::Area => {
                let crossing = is_self_intersecting(&points);
                if crossing && self.self_intersection == SelfIntersectionPolicy::Reject {
                    tracing::debug!("Discarding self-intersecting area draft");
                    return FinishOutcome::Discarded(
                        self.cancelled(points, CancelReason::SelfIntersecting),
                    );
                }
                let area = polygon_area(&points);
                let perimeter = ring_perimeter(&points);
                Measurement::area(points, area, perimeter, crossing)
            }
        };

        let measurement = store.add(measurement);
        tracing::debug!("Finished {} measurement {}", mode, measurement.id());

        FinishOutcome::Completed(DrawEndPayload { session: self.snapshot(), measurement })
    }

    /// Drop the draft without storing anything; ignored while idle
    pub fn cancel(&mut self) -> Option<DrawCancelPayload> {
        self.discard(CancelReason::Requested)
    }

    /// Switch the mode for the next draft, dropping any draft in progress
    pub fn set_mode(&mut self, mode: MeasurementMode) -> ModeSwitch {
        let previous = self.mode();
        let cancelled = self.discard(CancelReason::ModeChanged);
        self.state = SessionState::Idle { mode };

        if cancelled.is_none() && previous == mode {
            return ModeSwitch::default();
        }

        tracing::debug!("Measurement mode {} -> {}", previous, mode);
        ModeSwitch { cancelled, snapshot: Some(self.snapshot()) }
    }

    fn discard(&mut self, reason: CancelReason) -> Option<DrawCancelPayload> {
        let mode = self.mode();
        match std::mem::replace(&mut self.state, SessionState::Idle { mode }) {
            SessionState::Drawing { points, .. } => {
                tracing::debug!("Cancelled {} draft ({:?})", mode, reason);
                Some(self.cancelled(points, reason))
            }
            SessionState::Idle { .. } => None,
        }
    }

    fn cancelled(&self, discarded_points: Vec<GeoPoint>, reason: CancelReason) -> DrawCancelPayload {
        DrawCancelPayload { session: self.snapshot(), discarded_points, reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geomeasure_geo::geodesic::segment_distance;

    fn p(lng: f64, lat: f64) -> GeoPoint {
        GeoPoint::new(lng, lat)
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = DrawingSession::new(MeasurementMode::Area);
        assert!(!session.is_drawing());
        assert_eq!(session.state(), &SessionState::Idle { mode: MeasurementMode::Area });

        let snapshot = session.snapshot();
        assert!(snapshot.draft_points.is_empty());
        assert_eq!(snapshot.live_value, 0.0);
    }

    #[test]
    fn test_start_and_add_points() {
        let mut session = DrawingSession::default();
        let started = session.start(MeasurementMode::Distance).unwrap();
        assert!(started.is_drawing);
        assert!(started.draft_points.is_empty());

        session.add_point(p(0.0, 0.0)).unwrap();
        let snapshot = session.add_point(p(1.0, 0.0)).unwrap();

        assert_eq!(snapshot.draft_points.len(), 2);
        assert_eq!(snapshot.live_segments_meters.len(), 1);
        assert!((snapshot.live_value - segment_distance(p(0.0, 0.0), p(1.0, 0.0))).abs() < 1e-9);
    }

    #[test]
    fn test_start_while_drawing_is_ignored() {
        let mut session = DrawingSession::default();
        session.start(MeasurementMode::Distance);
        session.add_point(p(0.0, 0.0));

        assert!(session.start(MeasurementMode::Area).is_none());
        assert_eq!(session.mode(), MeasurementMode::Distance);
        assert_eq!(session.snapshot().draft_points.len(), 1);
    }

    #[test]
    fn test_commands_while_idle_are_ignored() {
        let mut session = DrawingSession::default();
        let mut store = MeasurementStore::new();

        assert!(session.add_point(p(0.0, 0.0)).is_none());
        assert!(session.preview_at(p(0.0, 0.0)).is_none());
        assert!(session.cancel().is_none());
        assert_eq!(session.finish(&mut store), FinishOutcome::Ignored);
        assert!(store.is_empty());
    }

    #[test]
    fn test_invalid_points_are_ignored() {
        let mut session = DrawingSession::default();
        session.start(MeasurementMode::Distance);

        assert!(session.add_point(p(f64::NAN, 0.0)).is_none());
        assert!(session.add_point(p(0.0, 95.0)).is_none());
        assert!(session.preview_at(p(0.0, -95.0)).is_none());
        assert!(session.snapshot().draft_points.is_empty());
    }

    #[test]
    fn test_preview_does_not_mutate_draft() {
        let mut session = DrawingSession::default();
        session.start(MeasurementMode::Distance);
        session.add_point(p(0.0, 0.0));

        let preview = session.preview_at(p(0.0, 1.0)).unwrap();
        assert_eq!(preview.draft_points, vec![p(0.0, 0.0)]);
        assert_eq!(preview.preview_point, Some(p(0.0, 1.0)));
        assert!(preview.live_value > 100_000.0);

        let snapshot = session.snapshot();
        assert_eq!(snapshot.draft_points.len(), 1);
        assert_eq!(snapshot.live_value, 0.0);
    }

    #[test]
    fn test_area_preview_closes_ring() {
        let mut session = DrawingSession::default();
        session.start(MeasurementMode::Area);
        session.add_point(p(0.0, 0.0));
        session.add_point(p(0.01, 0.0));

        assert_eq!(session.snapshot().live_value, 0.0);
        let preview = session.preview_at(p(0.01, 0.01)).unwrap();
        assert!(preview.live_value > 0.0);
    }

    #[test]
    fn test_finish_distance() {
        let mut session = DrawingSession::default();
        let mut store = MeasurementStore::new();
        session.start(MeasurementMode::Distance);
        session.add_point(p(0.0, 0.0));
        session.add_point(p(0.0, 1.0));

        let FinishOutcome::Completed(payload) = session.finish(&mut store) else {
            panic!("Expected a completed measurement");
        };

        assert!(!payload.session.is_drawing);
        assert!(payload.session.draft_points.is_empty());
        assert_eq!(
            payload.measurement.distance_meters(),
            Some(segment_distance(p(0.0, 0.0), p(0.0, 1.0)))
        );
        assert!(!payload.measurement.id().is_unassigned());
        assert_eq!(store.list(), vec![payload.measurement]);
        assert!(!session.is_drawing());
    }

    #[test]
    fn test_finish_with_too_few_points_discards() {
        let mut session = DrawingSession::default();
        let mut store = MeasurementStore::new();
        session.start(MeasurementMode::Area);
        session.add_point(p(0.0, 0.0));
        session.add_point(p(1.0, 0.0));

        let FinishOutcome::Discarded(payload) = session.finish(&mut store) else {
            panic!("Expected the draft to be discarded");
        };

        assert_eq!(payload.reason, CancelReason::TooFewPoints { required: 3, actual: 2 });
        assert_eq!(payload.discarded_points.len(), 2);
        assert!(store.is_empty());
        assert!(!session.is_drawing());
        assert_eq!(session.mode(), MeasurementMode::Area);
    }

    #[test]
    fn test_self_intersecting_ring_is_flagged() {
        let mut session = DrawingSession::default();
        let mut store = MeasurementStore::new();
        session.start(MeasurementMode::Area);
        for point in [p(0.0, 0.0), p(1.0, 1.0), p(1.0, 0.0), p(0.0, 1.0)] {
            session.add_point(point);
        }

        let FinishOutcome::Completed(payload) = session.finish(&mut store) else {
            panic!("Expected a completed measurement");
        };
        assert!(payload.measurement.is_self_intersecting());
    }

    #[test]
    fn test_self_intersecting_ring_is_rejected_by_policy() {
        let mut session = DrawingSession::default()
            .with_self_intersection(SelfIntersectionPolicy::Reject);
        let mut store = MeasurementStore::new();
        session.start(MeasurementMode::Area);
        for point in [p(0.0, 0.0), p(1.0, 1.0), p(1.0, 0.0), p(0.0, 1.0)] {
            session.add_point(point);
        }

        let outcome = session.finish(&mut store);
        assert!(matches!(
            outcome,
            FinishOutcome::Discarded(DrawCancelPayload {
                reason: CancelReason::SelfIntersecting,
                ..
            })
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_cancel_resets_draft() {
        let mut session = DrawingSession::default();
        session.start(MeasurementMode::Distance);
        session.add_point(p(0.0, 0.0));

        let payload = session.cancel().unwrap();
        assert_eq!(payload.reason, CancelReason::Requested);
        assert_eq!(payload.discarded_points, vec![p(0.0, 0.0)]);
        assert!(!payload.session.is_drawing);
        assert!(session.snapshot().draft_points.is_empty());
    }

    #[test]
    fn test_set_mode_while_drawing_cancels() {
        let mut session = DrawingSession::default();
        session.start(MeasurementMode::Distance);
        session.add_point(p(0.0, 0.0));

        let switch = session.set_mode(MeasurementMode::Area);
        assert_eq!(switch.cancelled.unwrap().reason, CancelReason::ModeChanged);
        assert_eq!(switch.snapshot.unwrap().mode, MeasurementMode::Area);
        assert!(!session.is_drawing());
        assert_eq!(session.mode(), MeasurementMode::Area);
    }

    #[test]
    fn test_set_same_mode_while_idle_is_silent() {
        let mut session = DrawingSession::default();
        assert_eq!(session.set_mode(MeasurementMode::Distance), ModeSwitch::default());

        let switch = session.set_mode(MeasurementMode::Area);
        assert!(switch.cancelled.is_none());
        assert!(switch.snapshot.is_some());
    }
}
