//! GeoMeasure Engine - Interactive measurement state and notifications
//!
//! This crate drives an in-progress measurement from host input, keeps the
//! collection of finished measurements, and broadcasts every transition
//! through a typed notification hub.

pub mod engine;
pub mod events;
pub mod memory;
pub mod ports;
pub mod session;
pub mod store;

pub use engine::MeasureEngine;
pub use events::{EngineEvent, HandlerId, NotificationHub};
pub use session::{DrawingSession, SessionSnapshot, SessionState};
pub use store::MeasurementStore;
