//! Distance and area unit tables.
//!
//! Every unit is a multiplicative factor against a base unit: meters for
//! distance, square meters for area. The tables are static and never change
//! at runtime.

use crate::error::{MeasureError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Static description of a registered unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitInfo {
    /// Canonical name, as used in configuration files
    pub name: &'static str,
    /// Short display label
    pub label: &'static str,
    /// Multiply a base value by this to get the display value
    pub factor_from_base: f64,
}

/// Common behaviour of the distance and area unit tables
pub trait Unit: Copy + Sized + 'static {
    /// "distance" or "area", used in error messages
    const KIND: &'static str;

    /// Every registered unit of this kind, in table order
    fn all() -> &'static [Self];

    fn info(&self) -> &'static UnitInfo;

    fn name(&self) -> &'static str {
        self.info().name
    }

    fn label(&self) -> &'static str {
        self.info().label
    }

    fn factor_from_base(&self) -> f64 {
        self.info().factor_from_base
    }

    /// Convert a value in the base unit to this unit
    fn to_display(&self, value_in_base: f64) -> f64 {
        value_in_base * self.factor_from_base()
    }

    /// Convert a value in this unit back to the base unit
    fn from_display(&self, value: f64) -> f64 {
        value / self.factor_from_base()
    }

    /// Render a base value as e.g. `"1.50 km"`
    fn format_value(&self, value_in_base: f64, precision: usize) -> String {
        format!("{:.*} {}", precision, self.to_display(value_in_base), self.label())
    }
}

/// Distance units, base = meters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DistanceUnit {
    #[default]
    Meters,
    Kilometers,
    Miles,
    Feet,
    Yards,
    NauticalMiles,
}

static DISTANCE_UNITS: [UnitInfo; 6] = [
    UnitInfo { name: "meters", label: "m", factor_from_base: 1.0 },
    UnitInfo { name: "kilometers", label: "km", factor_from_base: 1.0 / 1000.0 },
    UnitInfo { name: "miles", label: "mi", factor_from_base: 1.0 / 1609.344 },
    UnitInfo { name: "feet", label: "ft", factor_from_base: 1.0 / 0.3048 },
    UnitInfo { name: "yards", label: "yd", factor_from_base: 1.0 / 0.9144 },
    UnitInfo { name: "nautical_miles", label: "nmi", factor_from_base: 1.0 / 1852.0 },
];

impl Unit for DistanceUnit {
    const KIND: &'static str = "distance";

    fn all() -> &'static [Self] {
        &[
            DistanceUnit::Meters,
            DistanceUnit::Kilometers,
            DistanceUnit::Miles,
            DistanceUnit::Feet,
            DistanceUnit::Yards,
            DistanceUnit::NauticalMiles,
        ]
    }

    fn info(&self) -> &'static UnitInfo {
        &DISTANCE_UNITS[*self as usize]
    }
}

impl FromStr for DistanceUnit {
    type Err = MeasureError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "meters" | "meter" | "metres" | "m" => Ok(DistanceUnit::Meters),
            "kilometers" | "kilometer" | "kilometres" | "km" => Ok(DistanceUnit::Kilometers),
            "miles" | "mile" | "mi" => Ok(DistanceUnit::Miles),
            "feet" | "foot" | "ft" => Ok(DistanceUnit::Feet),
            "yards" | "yard" | "yd" => Ok(DistanceUnit::Yards),
            "nautical_miles" | "nautical_mile" | "nmi" => Ok(DistanceUnit::NauticalMiles),
            _ => Err(MeasureError::UnknownUnit { kind: Self::KIND, name: s.to_string() }),
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Area units, base = square meters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AreaUnit {
    #[default]
    SquareMeters,
    SquareKilometers,
    SquareMiles,
    Hectares,
    Acres,
    SquareFeet,
}

static AREA_UNITS: [UnitInfo; 6] = [
    UnitInfo { name: "square_meters", label: "m²", factor_from_base: 1.0 },
    UnitInfo { name: "square_kilometers", label: "km²", factor_from_base: 1.0 / 1_000_000.0 },
    UnitInfo { name: "square_miles", label: "mi²", factor_from_base: 1.0 / 2_589_988.110336 },
    UnitInfo { name: "hectares", label: "ha", factor_from_base: 1.0 / 10_000.0 },
    UnitInfo { name: "acres", label: "ac", factor_from_base: 1.0 / 4_046.856_422_4 },
    UnitInfo { name: "square_feet", label: "ft²", factor_from_base: 1.0 / 0.092_903_04 },
];

impl Unit for AreaUnit {
    const KIND: &'static str = "area";

    fn all() -> &'static [Self] {
        &[
            AreaUnit::SquareMeters,
            AreaUnit::SquareKilometers,
            AreaUnit::SquareMiles,
            AreaUnit::Hectares,
            AreaUnit::Acres,
            AreaUnit::SquareFeet,
        ]
    }

    fn info(&self) -> &'static UnitInfo {
        &AREA_UNITS[*self as usize]
    }
}

impl FromStr for AreaUnit {
    type Err = MeasureError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "square_meters" | "square_metres" | "sqm" | "m2" | "m²" => Ok(AreaUnit::SquareMeters),
            "square_kilometers" | "square_kilometres" | "sqkm" | "km2" | "km²" => {
                Ok(AreaUnit::SquareKilometers)
            }
            "square_miles" | "sqmi" | "mi2" | "mi²" => Ok(AreaUnit::SquareMiles),
            "hectares" | "hectare" | "ha" => Ok(AreaUnit::Hectares),
            "acres" | "acre" | "ac" => Ok(AreaUnit::Acres),
            "square_feet" | "sqft" | "ft2" | "ft²" => Ok(AreaUnit::SquareFeet),
            _ => Err(MeasureError::UnknownUnit { kind: Self::KIND, name: s.to_string() }),
        }
    }
}

impl fmt::Display for AreaUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Look up the display label of a unit given its name
///
/// Unknown names are a configuration defect and surface as
/// [`MeasureError::UnknownUnit`].
pub fn label_for<U>(name: &str) -> Result<&'static str>
where
    U: Unit + FromStr<Err = MeasureError>,
{
    name.parse::<U>().map(|unit| unit.label())
}
