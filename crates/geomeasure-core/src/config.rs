use crate::error::{MeasureError, Result};
use crate::units::{AreaUnit, DistanceUnit};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Largest number of decimals accepted for display formatting
pub const MAX_PRECISION: usize = 12;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConfigSource::Default => "default",
            ConfigSource::File => "file",
            ConfigSource::Environment => "environment",
            ConfigSource::Cli => "cli",
        };
        f.write_str(name)
    }
}

/// What to do with an area ring whose edges cross each other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SelfIntersectionPolicy {
    /// Keep the measurement and flag it as self-intersecting
    #[default]
    Allow,
    /// Discard the draft as if it had been cancelled
    Reject,
}

impl fmt::Display for SelfIntersectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelfIntersectionPolicy::Allow => f.write_str("allow"),
            SelfIntersectionPolicy::Reject => f.write_str("reject"),
        }
    }
}

impl FromStr for SelfIntersectionPolicy {
    type Err = MeasureError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "allow" => Ok(SelfIntersectionPolicy::Allow),
            "reject" => Ok(SelfIntersectionPolicy::Reject),
            _ => Err(MeasureError::ConfigInvalid {
                key: "self_intersection".to_string(),
                reason: format!("Invalid self-intersection policy: {}. Use allow or reject", s),
            }),
        }
    }
}

/// Resolved engine settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasureConfig {
    pub distance_unit: DistanceUnit,
    pub area_unit: AreaUnit,
    pub precision: usize,
    pub self_intersection: SelfIntersectionPolicy,
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            distance_unit: DistanceUnit::Meters,
            area_unit: AreaUnit::SquareMeters,
            precision: 2,
            self_intersection: SelfIntersectionPolicy::Allow,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for GeoMeasure
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub distance_unit: ConfigValue<DistanceUnit>,
    pub area_unit: ConfigValue<AreaUnit>,
    pub precision: ConfigValue<usize>,
    pub self_intersection: ConfigValue<SelfIntersectionPolicy>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        let defaults = MeasureConfig::default();
        Self {
            distance_unit: ConfigValue::new(defaults.distance_unit, ConfigSource::Default),
            area_unit: ConfigValue::new(defaults.area_unit, ConfigSource::Default),
            precision: ConfigValue::new(defaults.precision, ConfigSource::Default),
            self_intersection: ConfigValue::new(defaults.self_intersection, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| MeasureError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| MeasureError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(distance_unit) = file_config.distance_unit {
            self.distance_unit.update(distance_unit, ConfigSource::File);
        }

        if let Some(area_unit) = file_config.area_unit {
            self.area_unit.update(area_unit, ConfigSource::File);
        }

        if let Some(precision) = file_config.precision {
            let precision = check_precision(precision)?;
            self.precision.update(precision, ConfigSource::File);
        }

        if let Some(policy) = file_config.self_intersection {
            self.self_intersection.update(policy, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // GEOMEASURE_DISTANCE_UNIT
        if let Ok(unit_str) = env::var("GEOMEASURE_DISTANCE_UNIT") {
            match unit_str.parse::<DistanceUnit>() {
                Ok(unit) => self.distance_unit.update(unit, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOMEASURE_DISTANCE_UNIT value '{}': expected meters, kilometers, miles, feet, yards, or nautical_miles",
                    unit_str
                ),
            }
        }

        // GEOMEASURE_AREA_UNIT
        if let Ok(unit_str) = env::var("GEOMEASURE_AREA_UNIT") {
            match unit_str.parse::<AreaUnit>() {
                Ok(unit) => self.area_unit.update(unit, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOMEASURE_AREA_UNIT value '{}': expected square_meters, square_kilometers, square_miles, hectares, acres, or square_feet",
                    unit_str
                ),
            }
        }

        // GEOMEASURE_PRECISION
        if let Ok(precision_str) = env::var("GEOMEASURE_PRECISION") {
            match parse_precision(&precision_str) {
                Ok(precision) => self.precision.update(precision, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOMEASURE_PRECISION value '{}': expected an integer from 0 to {}",
                    precision_str,
                    MAX_PRECISION
                ),
            }
        }

        // GEOMEASURE_SELF_INTERSECTION
        if let Ok(policy_str) = env::var("GEOMEASURE_SELF_INTERSECTION") {
            match policy_str.parse::<SelfIntersectionPolicy>() {
                Ok(policy) => self.self_intersection.update(policy, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOMEASURE_SELF_INTERSECTION value '{}': expected allow or reject",
                    policy_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(distance_unit) = overrides.distance_unit {
            self.distance_unit.update(distance_unit, ConfigSource::Cli);
        }

        if let Some(area_unit) = overrides.area_unit {
            self.area_unit.update(area_unit, ConfigSource::Cli);
        }

        if let Some(precision) = overrides.precision {
            self.precision.update(precision, ConfigSource::Cli);
        }

        if let Some(policy) = overrides.self_intersection {
            self.self_intersection.update(policy, ConfigSource::Cli);
        }
    }

    /// Collapse the layers into the values the engine runs with
    pub fn resolve(&self) -> MeasureConfig {
        MeasureConfig {
            distance_unit: self.distance_unit.value,
            area_unit: self.area_unit.value,
            precision: self.precision.value,
            self_intersection: self.self_intersection.value,
        }
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "distance_unit".to_string(),
            (self.distance_unit.value.to_string(), self.distance_unit.source),
        );

        map.insert(
            "area_unit".to_string(),
            (self.area_unit.value.to_string(), self.area_unit.source),
        );

        map.insert(
            "precision".to_string(),
            (self.precision.value.to_string(), self.precision.source),
        );

        map.insert(
            "self_intersection".to_string(),
            (self.self_intersection.value.to_string(), self.self_intersection.source),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    distance_unit: Option<DistanceUnit>,
    area_unit: Option<AreaUnit>,
    precision: Option<usize>,
    self_intersection: Option<SelfIntersectionPolicy>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub distance_unit: Option<DistanceUnit>,
    pub area_unit: Option<AreaUnit>,
    pub precision: Option<usize>,
    pub self_intersection: Option<SelfIntersectionPolicy>,
}

/// Parse display precision from string
pub fn parse_precision(s: &str) -> Result<usize> {
    let precision = s.trim().parse::<usize>().map_err(|_| MeasureError::ConfigInvalid {
        key: "precision".to_string(),
        reason: format!("Invalid precision: {}. Use an integer from 0 to {}", s, MAX_PRECISION),
    })?;
    check_precision(precision)
}

fn check_precision(precision: usize) -> Result<usize> {
    if precision > MAX_PRECISION {
        return Err(MeasureError::ConfigInvalid {
            key: "precision".to_string(),
            reason: format!("Precision {} exceeds the maximum of {}", precision, MAX_PRECISION),
        });
    }
    Ok(precision)
}
