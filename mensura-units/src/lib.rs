//! Mensura Units - Unit parsing, conversion and unit algebra
//!
//! Unit names follow the CLDR identifier syntax: lowercase tokens joined by
//! `_`, with `_per_` for division, `square_`/`cubic_` powers, SI and binary
//! prefixes, integer multipliers (`300_gram`) and `curr_` currencies.
//!
//! Pipeline:
//! - `parse_unit`: name -> canonically ordered `ParsedUnit`
//! - `canonical_base_unit`: `ParsedUnit` -> base-unit identity
//! - `convert`: exact rational conversion between compatible units
//! - `math`: add/sub, unit-synthesising mul/div, round, compare
//! - `preferred_units`: territory and usage driven display units
//! - `decompose`: greedy breakdown such as feet and inches
//!
//! Categories:
//! - Length, Mass, Duration, Temperature
//! - Area, Volume, Speed, Acceleration
//! - Force, Energy, Power, Pressure, Frequency
//! - Electric current, Voltage, Resistance
//! - Digital, Angle, Concentration, Consumption
//! - Light, Graphics, Typography

pub mod prefix;
pub mod dimension;
mod units;
pub mod parse;
pub mod base_unit;
pub mod convert;
mod unit;
pub mod math;
pub mod preference;
pub mod decompose;
mod range;

pub use units::{UnitDef, UnitRegistry, UNITS};
pub use parse::{parse_unit, Conversion, ParsedUnit, Token};
pub use base_unit::{canonical_base_unit, is_compatible, Compatibility};
pub use convert::convert;
pub use unit::{Unit, DEFAULT_USAGE};
pub use preference::{known_usages, preferred_units, Preference, PreferenceTable, PREFERENCES};
pub use decompose::decompose;
pub use range::UnitRange;

/// Canonical names of every dictionary unit
pub fn known_units() -> Vec<&'static str> {
    UNITS.names()
}

/// Every category name, in base-unit rank order
pub fn known_categories() -> Vec<&'static str> {
    dimension::categories()
}

/// Category of a unit name, e.g. "length" for "foot"
pub fn unit_category(name: &str) -> mensura_core::Result<&'static str> {
    base_unit::category(&parse_unit(name)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_units() {
        let units = known_units();
        assert!(units.contains(&"meter"));
        assert!(units.contains(&"light_year"));
        assert!(!units.contains(&"metre"));
    }

    #[test]
    fn test_unit_category() {
        assert_eq!(unit_category("mph").unwrap(), "speed");
        assert_eq!(unit_category("liter_per_100_kilometer").unwrap(), "consumption");
        assert!(known_categories().contains(&"luminance"));
    }
}
