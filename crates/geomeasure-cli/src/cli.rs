use clap::{Parser, Subcommand};
use geomeasure_core::config::{parse_precision, SelfIntersectionPolicy};
use geomeasure_core::models::{GeoPoint, MeasurementId};
use geomeasure_core::units::{AreaUnit, DistanceUnit};
use std::path::PathBuf;

/// GeoMeasure - Geodesic distance and area measurement
#[derive(Parser, Debug)]
#[command(name = "geomeasure")]
#[command(about = "Geodesic distance and area measurement", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to a TOML configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Distance display unit (e.g. meters, km, miles)
    #[arg(long, global = true, value_name = "UNIT")]
    pub distance_unit: Option<DistanceUnit>,

    /// Area display unit (e.g. square_meters, hectares, acres)
    #[arg(long, global = true, value_name = "UNIT")]
    pub area_unit: Option<AreaUnit>,

    /// Number of decimals in displayed values
    #[arg(long, global = true, value_parser = parse_precision)]
    pub precision: Option<usize>,

    /// How to treat area rings that cross themselves (allow or reject)
    #[arg(long, global = true, value_name = "POLICY")]
    pub self_intersection: Option<SelfIntersectionPolicy>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Measure the length of a path
    Distance(MeasureArgs),

    /// Measure the area enclosed by a ring
    Area(MeasureArgs),

    /// List the supported units
    Units,

    /// Run a JSON script of engine commands and print every event
    Replay(ReplayArgs),

    /// List stored measurements
    List(StoreArgs),

    /// Remove a stored measurement
    Remove(RemoveArgs),

    /// Remove every stored measurement
    Clear(StoreArgs),

    /// Export stored measurements as a GeoJSON FeatureCollection
    Export(ExportArgs),

    /// Show the effective configuration and where each value came from
    Config,
}

#[derive(Parser, Debug)]
pub struct MeasureArgs {
    /// Vertex as "lng,lat"; repeat for every vertex in drawing order
    #[arg(long = "point", short = 'p', value_name = "LNG,LAT", required = true, allow_hyphen_values = true)]
    pub points: Vec<GeoPoint>,

    /// Append the result to this measurement file
    #[arg(long, value_name = "FILE")]
    pub store: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ReplayArgs {
    /// Script file: a JSON array of commands
    pub script: PathBuf,

    /// Load measurements from and save them back to this file
    #[arg(long, value_name = "FILE")]
    pub store: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct StoreArgs {
    /// Measurement file
    #[arg(long, value_name = "FILE")]
    pub store: PathBuf,
}

#[derive(Parser, Debug)]
pub struct RemoveArgs {
    /// Id of the measurement to remove
    pub id: MeasurementId,

    /// Measurement file
    #[arg(long, value_name = "FILE")]
    pub store: PathBuf,
}

#[derive(Parser, Debug)]
pub struct ExportArgs {
    /// Measurement file
    #[arg(long, value_name = "FILE")]
    pub store: PathBuf,

    /// Write the FeatureCollection here instead of stdout
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,
}
