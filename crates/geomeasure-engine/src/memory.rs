//! In-memory repository for development and testing.

use geomeasure_core::error::Result;
use geomeasure_core::models::Measurement;
use std::cell::RefCell;

use crate::ports::MeasurementRepository;

/// Keeps the saved collection in memory for the lifetime of the value
#[derive(Debug, Default)]
pub struct MemoryRepository {
    saved: RefCell<Vec<Measurement>>,
}

impl MemoryRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository that already holds `measurements`
    pub fn with_measurements(measurements: Vec<Measurement>) -> Self {
        Self { saved: RefCell::new(measurements) }
    }
}

impl MeasurementRepository for MemoryRepository {
    fn load(&self) -> Result<Vec<Measurement>> {
        Ok(self.saved.borrow().clone())
    }

    fn save(&self, measurements: &[Measurement]) -> Result<()> {
        *self.saved.borrow_mut() = measurements.to_vec();
        Ok(())
    }
}
