use geomeasure_core::error::Result;
use geomeasure_core::models::Measurement;

/// Port for persisting the measurement collection between sessions
///
/// The engine never persists on its own; hosts load before the first command
/// and save whenever they see fit.
pub trait MeasurementRepository {
    /// Load a saved collection, most recent first
    fn load(&self) -> Result<Vec<Measurement>>;

    /// Replace the saved collection
    fn save(&self, measurements: &[Measurement]) -> Result<()>;
}
