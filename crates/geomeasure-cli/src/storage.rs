//! JSON file adapter for the measurement repository port

use geomeasure_core::error::{MeasureError, Result};
use geomeasure_core::models::Measurement;
use geomeasure_engine::ports::MeasurementRepository;
use std::fs;
use std::path::{Path, PathBuf};

/// Measurements kept as a pretty-printed JSON array, most recent first
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    /// Repository at `path`; a missing file reads as an empty collection
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Repository at `path`, which must already exist
    pub fn open_existing(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.is_file() {
            return Err(MeasureError::StoreNotFound { path });
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file the next save is written to before replacing `path`
    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl MeasurementRepository for JsonFileRepository {
    fn load(&self) -> Result<Vec<Measurement>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let measurements: Vec<Measurement> = serde_json::from_str(&content)?;
        tracing::debug!("Loaded {} measurement(s) from {}", measurements.len(), self.path.display());
        Ok(measurements)
    }

    fn save(&self, measurements: &[Measurement]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(measurements)?;
        let staging = self.staging_path();
        fs::write(&staging, content)?;
        if let Err(err) = fs::rename(&staging, &self.path) {
            let _ = fs::remove_file(&staging);
            return Err(err.into());
        }
        tracing::debug!("Saved {} measurement(s) to {}", measurements.len(), self.path.display());
        Ok(())
    }
}
