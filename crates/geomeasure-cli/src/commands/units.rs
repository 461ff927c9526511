//! Units command implementation

use crate::output::Printer;
use crate::output_types::{UnitRow, UnitsOutput};
use anyhow::Result;
use geomeasure_core::units::{AreaUnit, DistanceUnit};

pub fn execute(printer: &Printer) -> Result<()> {
    let result = UnitsOutput {
        distance: UnitRow::all::<DistanceUnit>(),
        area: UnitRow::all::<AreaUnit>(),
    };

    if printer.is_json() {
        return printer.envelope(result);
    }

    printer.heading("Distance units (base: meters)");
    printer.rows(result.distance);

    printer.heading("Area units (base: square meters)");
    printer.rows(result.area);

    Ok(())
}
