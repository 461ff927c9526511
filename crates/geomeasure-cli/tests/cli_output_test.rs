//! Integration tests for the geomeasure binary
//!
//! These tests verify that JSON output is well formed and that measurements
//! survive a round trip through a store file.

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn geomeasure(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_geomeasure"))
        .args(args)
        .env_remove("GEOMEASURE_DISTANCE_UNIT")
        .env_remove("GEOMEASURE_AREA_UNIT")
        .env_remove("GEOMEASURE_PRECISION")
        .env_remove("GEOMEASURE_SELF_INTERSECTION")
        .output()
        .expect("Failed to execute command")
}

fn json_data(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "Command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value =
        serde_json::from_str(&stdout).expect("Output should be valid JSON");

    assert_eq!(parsed["status"], "success");
    parsed["data"].clone()
}

fn write_script(dir: &Path, script: &str) -> String {
    let path = dir.join("script.json");
    std::fs::write(&path, script).unwrap();
    path.display().to_string()
}

#[test]
fn test_distance_json_output() {
    let output = geomeasure(&["--json", "distance", "--point", "0,0", "--point", "1,0"]);
    let data = json_data(&output);

    let measurement = &data["measurement"];
    assert_eq!(measurement["mode"], "distance");
    let meters = measurement["value"].as_f64().unwrap();
    assert!((meters - 111_320.0).abs() / 111_320.0 < 0.01);
    assert_eq!(measurement["segments"].as_array().unwrap().len(), 1);
    assert_eq!(measurement["display"], "111194.93 m");
}

#[test]
fn test_negative_coordinates_and_unit_override() {
    let output = geomeasure(&[
        "--json",
        "--distance-unit",
        "km",
        "--precision",
        "1",
        "distance",
        "--point",
        "-1,-1",
        "--point",
        "-1,0",
    ]);
    let data = json_data(&output);

    assert_eq!(data["measurement"]["display"], "111.2 km");
}

#[test]
fn test_area_json_output() {
    let output = geomeasure(&[
        "--json", "area", "-p", "0,0", "-p", "0.01,0", "-p", "0.01,0.01", "-p", "0,0.01",
    ]);
    let data = json_data(&output);

    let measurement = &data["measurement"];
    assert_eq!(measurement["mode"], "area");
    assert!(measurement["value"].as_f64().unwrap() > 0.0);
    assert!(measurement["perimeter_meters"].as_f64().unwrap() > 0.0);
    assert_eq!(measurement["self_intersecting"], false);
}

#[test]
fn test_area_with_two_points_fails() {
    let output = geomeasure(&["area", "-p", "0,0", "-p", "1,0"]);
    assert!(!output.status.success());
}

#[test]
fn test_self_intersection_policy() {
    let bow_tie = ["-p", "0,0", "-p", "1,1", "-p", "1,0", "-p", "0,1"];

    let mut args = vec!["--json", "area"];
    args.extend(bow_tie);
    let data = json_data(&geomeasure(&args));
    assert_eq!(data["measurement"]["self_intersecting"], true);

    let mut args = vec!["--self-intersection", "reject", "area"];
    args.extend(bow_tie);
    assert!(!geomeasure(&args).status.success());
}

#[test]
fn test_invalid_point_is_rejected() {
    let output = geomeasure(&["distance", "-p", "0,0", "-p", "not-a-point"]);
    assert!(!output.status.success());

    let output = geomeasure(&["distance", "-p", "0,0", "-p", "0,95"]);
    assert!(!output.status.success());
}

#[test]
fn test_units_json_output() {
    let data = json_data(&geomeasure(&["--json", "units"]));

    assert_eq!(data["distance"].as_array().unwrap().len(), 6);
    assert_eq!(data["area"].as_array().unwrap().len(), 6);
    assert_eq!(data["distance"][0]["name"], "meters");
}

#[test]
fn test_config_sources() {
    let data = json_data(&geomeasure(&["--json", "--precision", "4", "config"]));

    assert_eq!(data["values"]["precision"]["value"], "4");
    assert_eq!(data["values"]["precision"]["source"], "Cli");
    assert_eq!(data["values"]["distance_unit"]["source"], "Default");
}

#[test]
fn test_config_file_is_applied() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("geomeasure.toml");
    std::fs::write(&config_path, "area_unit = \"hectares\"\n").unwrap();

    let data = json_data(&geomeasure(&[
        "--json",
        "--config",
        config_path.to_str().unwrap(),
        "config",
    ]));

    assert_eq!(data["values"]["area_unit"]["value"], "hectares");
    assert_eq!(data["values"]["area_unit"]["source"], "File");
}

#[test]
fn test_replay_events_and_store_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let store = temp_dir.path().join("measurements.json");
    let store = store.to_str().unwrap();
    let script = write_script(
        temp_dir.path(),
        r#"[
            {"command": "start", "mode": "distance"},
            {"command": "add_point", "lng": 0, "lat": 0},
            {"command": "add_point", "lng": 0, "lat": 1},
            {"command": "add_point", "lng": 1, "lat": 1},
            {"command": "finish"},
            {"command": "start", "mode": "area"},
            {"command": "add_point", "lng": 0, "lat": 0},
            {"command": "finish"}
        ]"#,
    );

    let data = json_data(&geomeasure(&["--json", "replay", &script, "--store", store]));
    let events: Vec<&str> =
        data["events"].as_array().unwrap().iter().map(|e| e["event"].as_str().unwrap()).collect();

    assert_eq!(
        events,
        vec![
            "drawstart",
            "drawupdate",
            "drawupdate",
            "drawupdate",
            "drawend",
            "measurementadd",
            "drawstart",
            "drawupdate",
            "drawcancel"
        ]
    );
    assert_eq!(data["measurements"].as_array().unwrap().len(), 1);

    let listed = json_data(&geomeasure(&["--json", "list", "--store", store]));
    let measurements = listed["measurements"].as_array().unwrap();
    assert_eq!(measurements.len(), 1);
    let id = measurements[0]["id"].as_str().unwrap().to_string();

    let exported = json_data(&geomeasure(&["--json", "export", "--store", store]));
    assert_eq!(exported["type"], "FeatureCollection");
    assert_eq!(exported["features"][0]["geometry"]["type"], "LineString");

    let removed = json_data(&geomeasure(&["--json", "remove", &id, "--store", store]));
    assert_eq!(removed["removed"]["id"], id.as_str());
    assert_eq!(removed["remaining"], 0);

    // Second removal of the same id fails
    assert!(!geomeasure(&["remove", &id, "--store", store]).status.success());
}

#[test]
fn test_clear_store() {
    let temp_dir = TempDir::new().unwrap();
    let store = temp_dir.path().join("measurements.json");
    let store = store.to_str().unwrap();

    for lng in ["1,0", "2,0"] {
        let output = geomeasure(&["distance", "-p", "0,0", "-p", lng, "--store", store]);
        assert!(output.status.success());
    }

    let data = json_data(&geomeasure(&["--json", "clear", "--store", store]));
    assert_eq!(data["cleared"], 2);

    let listed = json_data(&geomeasure(&["--json", "list", "--store", store]));
    assert!(listed["measurements"].as_array().unwrap().is_empty());
}

#[test]
fn test_list_missing_store_fails() {
    let temp_dir = TempDir::new().unwrap();
    let store = temp_dir.path().join("missing.json");

    let output = geomeasure(&["list", "--store", store.to_str().unwrap()]);
    assert!(!output.status.success());
}
