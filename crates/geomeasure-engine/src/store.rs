//! Ordered collection of finished measurements.
//!
//! The most recent measurement comes first. Ids are unique for the lifetime
//! of a store: an id that was ever issued is never handed out again, even
//! after the measurement carrying it is removed.

use geomeasure_core::models::{Measurement, MeasurementId};
use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct MeasurementStore {
    measurements: Vec<Measurement>,
    issued: HashSet<MeasurementId>,
}

impl MeasurementStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a measurement at the front and return the stored copy
    ///
    /// A fresh id is assigned when the incoming one is unassigned or was
    /// already issued by this store.
    pub fn add(&mut self, measurement: Measurement) -> Measurement {
        let measurement = self.accept(measurement);
        self.measurements.insert(0, measurement.clone());
        measurement
    }

    /// Append previously persisted measurements, keeping their order
    ///
    /// Used to load a collection that was saved most-recent-first.
    pub fn restore(&mut self, measurements: impl IntoIterator<Item = Measurement>) {
        for measurement in measurements {
            let measurement = self.accept(measurement);
            self.measurements.push(measurement);
        }
    }

    /// Remove and return a measurement; `None` if the id is not present
    pub fn remove(&mut self, id: MeasurementId) -> Option<Measurement> {
        let index = self.measurements.iter().position(|m| m.id() == id)?;
        Some(self.measurements.remove(index))
    }

    /// Remove everything and return what was removed
    pub fn clear(&mut self) -> Vec<Measurement> {
        std::mem::take(&mut self.measurements)
    }

    /// Copy of the current collection, most recent first
    pub fn list(&self) -> Vec<Measurement> {
        self.measurements.clone()
    }

    pub fn get(&self, id: MeasurementId) -> Option<Measurement> {
        self.measurements.iter().find(|m| m.id() == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    fn accept(&mut self, measurement: Measurement) -> Measurement {
        let id = measurement.id();
        let id = if id.is_unassigned() || self.issued.contains(&id) { self.fresh_id() } else { id };
        self.issued.insert(id);
        measurement.with_id(id)
    }

    fn fresh_id(&self) -> MeasurementId {
        loop {
            let id = MeasurementId::new();
            if !self.issued.contains(&id) {
                return id;
            }
        }
    }
}
