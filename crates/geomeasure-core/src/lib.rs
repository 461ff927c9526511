//! GeoMeasure Core - Domain models, units, and configuration
//!
//! This crate contains the measurement domain types shared by the geodesic
//! calculator, the drawing engine and the command-line host.

pub mod config;
pub mod error;
pub mod models;
pub mod units;

pub use error::{MeasureError, Result};
