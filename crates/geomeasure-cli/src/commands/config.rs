//! Config command implementation

use crate::output::Printer;
use crate::output_types::{ConfigEntry, ConfigOutput};
use anyhow::Result;
use geomeasure_core::config::LayeredConfig;
use tabled::Tabled;

pub fn execute(config: &LayeredConfig, printer: &Printer) -> Result<()> {
    let inspection_map = config.to_inspection_map();

    if printer.is_json() {
        let values = inspection_map
            .into_iter()
            .map(|(key, (value, source))| (key, ConfigEntry { value, source }))
            .collect();
        return printer.envelope(ConfigOutput { values });
    }

    printer.heading("Configuration Values");

    #[derive(Tabled)]
    struct ConfigRow {
        #[tabled(rename = "Key")]
        key: String,
        #[tabled(rename = "Value")]
        value: String,
        #[tabled(rename = "Source")]
        source: String,
    }

    let mut rows: Vec<ConfigRow> = inspection_map
        .into_iter()
        .map(|(key, (value, source))| ConfigRow { key, value, source: source.to_string() })
        .collect();

    // Sort by key for consistent output
    rows.sort_by(|a, b| a.key.cmp(&b.key));

    printer.rows(rows);

    printer.heading("Configuration Precedence");
    printer.note("CLI arguments > Environment variables > Config file > Defaults");

    Ok(())
}
