//! Configuration loading utilities for CLI commands

use anyhow::{Context, Result};
use geomeasure_core::config::{CliConfigOverrides, LayeredConfig};

use crate::cli::Cli;

/// Load layered configuration: defaults, optional file, environment, then flags
pub fn load_config(cli: &Cli) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults();

    if let Some(path) = &cli.config {
        config = config
            .load_from_file(path)
            .with_context(|| format!("Failed to load configuration file {}", path.display()))?;
    }

    let mut config = config.load_from_env();
    config.update_from_cli(overrides(cli));
    Ok(config)
}

fn overrides(cli: &Cli) -> CliConfigOverrides {
    CliConfigOverrides {
        distance_unit: cli.distance_unit,
        area_unit: cli.area_unit,
        precision: cli.precision,
        self_intersection: cli.self_intersection,
    }
}
