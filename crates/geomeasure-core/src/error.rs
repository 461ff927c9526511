//! Error types for GeoMeasure

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MeasureError {
    // Unit errors
    #[error("Unknown {kind} unit: {name}")]
    UnknownUnit { kind: &'static str, name: String },

    // Input errors
    #[error("Invalid point '{input}': {reason}")]
    InvalidPoint { input: String, reason: String },

    #[error("Invalid measurement id '{input}'")]
    InvalidMeasurementId { input: String },

    #[error("Invalid measurement record: {reason}")]
    InvalidMeasurement { reason: String },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // Storage errors
    #[error("Measurement file not found at {path}")]
    StoreNotFound { path: PathBuf },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for MeasureError {
    fn from(err: serde_json::Error) -> Self {
        MeasureError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MeasureError>;
