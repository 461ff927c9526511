//! Integration tests for layered configuration
//!
//! These tests verify that configuration loading follows the correct precedence:
//! CLI arguments > Environment variables > Config file > Defaults

use geomeasure_core::config::{
    CliConfigOverrides, ConfigSource, LayeredConfig, SelfIntersectionPolicy,
};
use geomeasure_core::units::{AreaUnit, DistanceUnit};
use serial_test::serial;
use std::env;
use std::io::Write;
use tempfile::NamedTempFile;

fn clear_env() {
    env::remove_var("GEOMEASURE_DISTANCE_UNIT");
    env::remove_var("GEOMEASURE_AREA_UNIT");
    env::remove_var("GEOMEASURE_PRECISION");
    env::remove_var("GEOMEASURE_SELF_INTERSECTION");
}

fn config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", content).unwrap();
    file
}

#[test]
fn test_file_overrides_defaults() {
    let file = config_file(
        r#"
distance_unit = "miles"
area_unit = "acres"
"#,
    );

    let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

    assert_eq!(config.distance_unit.value, DistanceUnit::Miles);
    assert_eq!(config.distance_unit.source, ConfigSource::File);
    assert_eq!(config.area_unit.value, AreaUnit::Acres);
    assert_eq!(config.area_unit.source, ConfigSource::File);
    assert_eq!(config.precision.source, ConfigSource::Default);
}

#[test]
#[serial]
fn test_env_overrides_file() {
    clear_env();
    let file = config_file(
        r#"
distance_unit = "miles"
precision = 1
"#,
    );

    env::set_var("GEOMEASURE_DISTANCE_UNIT", "km");
    env::set_var("GEOMEASURE_SELF_INTERSECTION", "reject");

    let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap().load_from_env();

    assert_eq!(config.distance_unit.value, DistanceUnit::Kilometers);
    assert_eq!(config.distance_unit.source, ConfigSource::Environment);
    assert_eq!(config.precision.value, 1);
    assert_eq!(config.precision.source, ConfigSource::File);
    assert_eq!(config.self_intersection.value, SelfIntersectionPolicy::Reject);

    clear_env();
}

#[test]
#[serial]
fn test_invalid_env_values_are_ignored() {
    clear_env();
    env::set_var("GEOMEASURE_AREA_UNIT", "football_fields");
    env::set_var("GEOMEASURE_PRECISION", "many");

    let config = LayeredConfig::with_defaults().load_from_env();

    assert_eq!(config.area_unit.value, AreaUnit::SquareMeters);
    assert_eq!(config.area_unit.source, ConfigSource::Default);
    assert_eq!(config.precision.value, 2);
    assert_eq!(config.precision.source, ConfigSource::Default);

    clear_env();
}

#[test]
#[serial]
fn test_cli_overrides_everything() {
    clear_env();
    let file = config_file(r#"area_unit = "acres""#);
    env::set_var("GEOMEASURE_AREA_UNIT", "hectares");

    let mut config =
        LayeredConfig::with_defaults().load_from_file(file.path()).unwrap().load_from_env();
    config.update_from_cli(CliConfigOverrides {
        area_unit: Some(AreaUnit::SquareKilometers),
        ..Default::default()
    });

    assert_eq!(config.area_unit.value, AreaUnit::SquareKilometers);
    assert_eq!(config.area_unit.source, ConfigSource::Cli);

    clear_env();
}

#[test]
fn test_missing_file_is_an_error() {
    let result = LayeredConfig::with_defaults().load_from_file("/nonexistent/geomeasure.toml");
    assert!(result.is_err());
}

#[test]
fn test_malformed_toml_is_an_error() {
    let file = config_file("distance_unit = ");
    assert!(LayeredConfig::with_defaults().load_from_file(file.path()).is_err());

    let file = config_file(r#"distance_unit = "leagues""#);
    assert!(LayeredConfig::with_defaults().load_from_file(file.path()).is_err());
}
