pub mod measurement;
pub mod point;

pub use measurement::{MeasuredValue, Measurement, MeasurementId, MeasurementMode};
pub use point::GeoPoint;
