//! Command surface the host drives.
//!
//! `MeasureEngine` owns the drawing session, the measurement store and the
//! notification hub. Each command runs to completion, emitting its events
//! before it returns.

use geomeasure_core::config::MeasureConfig;
use geomeasure_core::error::Result;
use geomeasure_core::models::{GeoPoint, Measurement, MeasurementId, MeasurementMode};
use geomeasure_core::units::{AreaUnit, DistanceUnit, Unit};

use crate::events::{
    Clear, DrawCancel, DrawEnd, DrawStart, DrawUpdate, EngineEvent, HandlerId, MeasurementAdd,
    MeasurementRemove, ModeChange, NotificationHub, UnitChange, UnitSelection,
};
use crate::ports::MeasurementRepository;
use crate::session::{DrawingSession, FinishOutcome, SessionSnapshot};
use crate::store::MeasurementStore;

#[derive(Debug)]
pub struct MeasureEngine {
    session: DrawingSession,
    store: MeasurementStore,
    hub: NotificationHub,
    units: UnitSelection,
    precision: usize,
}

impl Default for MeasureEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MeasureEngine {
    /// Engine with default units (meters, square meters)
    pub fn new() -> Self {
        Self::with_config(&MeasureConfig::default())
    }

    pub fn with_config(config: &MeasureConfig) -> Self {
        Self {
            session: DrawingSession::default().with_self_intersection(config.self_intersection),
            store: MeasurementStore::new(),
            hub: NotificationHub::new(),
            units: UnitSelection { distance: config.distance_unit, area: config.area_unit },
            precision: config.precision,
        }
    }

    /// Subscribe to an event
    pub fn on<E: EngineEvent>(&mut self, handler: impl FnMut(&E::Payload) + 'static) -> HandlerId {
        self.hub.on::<E>(handler)
    }

    /// Unsubscribe a handler; returns false if it was not subscribed to `E`
    pub fn off<E: EngineEvent>(&mut self, id: HandlerId) -> bool {
        self.hub.off::<E>(id)
    }

    pub fn start(&mut self, mode: MeasurementMode) {
        if let Some(snapshot) = self.session.start(mode) {
            self.hub.emit::<DrawStart>(&snapshot);
        }
    }

    pub fn add_point(&mut self, point: GeoPoint) {
        if let Some(snapshot) = self.session.add_point(point) {
            self.hub.emit::<DrawUpdate>(&snapshot);
        }
    }

    pub fn preview_at(&mut self, point: GeoPoint) {
        if let Some(snapshot) = self.session.preview_at(point) {
            self.hub.emit::<DrawUpdate>(&snapshot);
        }
    }

    /// Finish the draft; returns the stored measurement if there was one
    pub fn finish(&mut self) -> Option<Measurement> {
        match self.session.finish(&mut self.store) {
            FinishOutcome::Completed(payload) => {
                self.hub.emit::<DrawEnd>(&payload);
                self.hub.emit::<MeasurementAdd>(&payload.measurement);
                Some(payload.measurement)
            }
            FinishOutcome::Discarded(payload) => {
                self.hub.emit::<DrawCancel>(&payload);
                None
            }
            FinishOutcome::Ignored => None,
        }
    }

    pub fn cancel(&mut self) {
        if let Some(payload) = self.session.cancel() {
            self.hub.emit::<DrawCancel>(&payload);
        }
    }

    /// Switch mode, cancelling any draft in progress
    pub fn set_mode(&mut self, mode: MeasurementMode) {
        let switch = self.session.set_mode(mode);
        if let Some(payload) = switch.cancelled {
            self.hub.emit::<DrawCancel>(&payload);
        }
        if let Some(snapshot) = switch.snapshot {
            self.hub.emit::<ModeChange>(&snapshot);
        }
    }

    pub fn set_distance_unit(&mut self, unit: DistanceUnit) {
        if self.units.distance != unit {
            self.units.distance = unit;
            tracing::debug!("Distance unit set to {}", unit);
            self.hub.emit::<UnitChange>(&self.units);
        }
    }

    pub fn set_area_unit(&mut self, unit: AreaUnit) {
        if self.units.area != unit {
            self.units.area = unit;
            tracing::debug!("Area unit set to {}", unit);
            self.hub.emit::<UnitChange>(&self.units);
        }
    }

    /// Remove a measurement; `None` if the id is unknown
    pub fn remove_measurement(&mut self, id: MeasurementId) -> Option<Measurement> {
        let removed = self.store.remove(id);
        match &removed {
            Some(measurement) => self.hub.emit::<MeasurementRemove>(measurement),
            None => tracing::debug!("No measurement with id {} to remove", id),
        }
        removed
    }

    /// Cancel any draft and empty the collection
    pub fn clear_all(&mut self) -> Vec<Measurement> {
        self.cancel();
        let cleared = self.store.clear();
        tracing::debug!("Cleared {} measurement(s)", cleared.len());
        self.hub.emit::<Clear>(&cleared);
        cleared
    }

    /// Load a saved collection without emitting events
    pub fn load_from(&mut self, repository: &impl MeasurementRepository) -> Result<usize> {
        let measurements = repository.load()?;
        let count = measurements.len();
        self.store.restore(measurements);
        tracing::debug!("Restored {} measurement(s)", count);
        Ok(count)
    }

    pub fn save_to(&self, repository: &impl MeasurementRepository) -> Result<()> {
        repository.save(&self.store.list())
    }

    pub fn state(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    pub fn measurements(&self) -> Vec<Measurement> {
        self.store.list()
    }

    pub fn measurement(&self, id: MeasurementId) -> Option<Measurement> {
        self.store.get(id)
    }

    pub fn units(&self) -> UnitSelection {
        self.units
    }

    pub fn precision(&self) -> usize {
        self.precision
    }

    /// Headline value of a measurement in the current units, e.g. `"1.25 km"`
    pub fn display_value(&self, measurement: &Measurement) -> String {
        self.format(measurement.mode(), measurement.value().primary())
    }

    /// Segment lengths in the current distance unit
    pub fn display_segments(&self, segments_meters: &[f64]) -> Vec<String> {
        segments_meters
            .iter()
            .map(|meters| self.units.distance.format_value(*meters, self.precision))
            .collect()
    }

    /// Live reading of the draft in the current units; `None` while idle
    pub fn live_display(&self) -> Option<String> {
        let snapshot = self.session.snapshot();
        snapshot.is_drawing.then(|| self.display_snapshot(&snapshot))
    }

    /// Live reading carried by a snapshot, in the current units
    pub fn display_snapshot(&self, snapshot: &SessionSnapshot) -> String {
        self.format(snapshot.mode, snapshot.live_value)
    }

    fn format(&self, mode: MeasurementMode, value_in_base: f64) -> String {
        match mode {
            MeasurementMode::Distance => {
                self.units.distance.format_value(value_in_base, self.precision)
            }
            MeasurementMode::Area => self.units.area.format_value(value_in_base, self.precision),
        }
    }
}
