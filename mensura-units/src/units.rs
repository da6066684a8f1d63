//! Unit Token Dictionary - ~160 CLDR units organized by category
//!
//! Each entry maps an atomic unit name onto a base-unit identity with an
//! exact factor and offset: `base = value * factor + offset`.

use std::collections::HashMap;
use std::sync::LazyLock;

use mensura_core::{rational, RBig};
use tracing::error;

use crate::dimension;

/// Global unit registry
pub static UNITS: LazyLock<UnitRegistry> = LazyLock::new(UnitRegistry::new);

/// A dictionary entry
#[derive(Debug, Clone, PartialEq)]
pub struct UnitDef {
    pub name: String,
    /// Base-unit identity, e.g. "meter" or "kilogram_meter_per_square_second"
    pub base_unit: String,
    pub factor: RBig,
    pub offset: RBig,
    /// False for units with no numeric conversion (beaufort)
    pub convertible: bool,
}

/// Registry of all known units
#[derive(Debug)]
pub struct UnitRegistry {
    units: HashMap<String, UnitDef>,
    aliases: HashMap<String, String>,
    whole_aliases: HashMap<String, String>,
    /// Unit names and aliases, longest first, for greedy matching
    by_length: Vec<String>,
}

impl UnitRegistry {
    pub fn new() -> Self {
        let mut registry = UnitRegistry {
            units: HashMap::new(),
            aliases: HashMap::new(),
            whole_aliases: HashMap::new(),
            by_length: Vec::new(),
        };
        registry.register_all_units();
        registry.register_aliases();

        let mut names: Vec<String> = registry.units.keys().chain(registry.aliases.keys()).cloned().collect();
        names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        registry.by_length = names;
        registry
    }

    /// Get a unit by name or alias
    pub fn get(&self, name: &str) -> Option<&UnitDef> {
        if let Some(unit) = self.units.get(name) {
            return Some(unit);
        }
        self.aliases.get(name).and_then(|canonical| self.units.get(canonical))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Canonical spelling for a whole unit name ("mph" -> "mile_per_hour")
    pub fn resolve_whole(&self, name: &str) -> Option<&str> {
        self.whole_aliases.get(name).map(|s| s.as_str())
    }

    /// Names and aliases, longest first
    pub fn names_by_length(&self) -> &[String] {
        &self.by_length
    }

    /// Canonical unit names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.units.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Units whose base identity belongs to a category
    pub fn by_category(&self, category: &str) -> Vec<&UnitDef> {
        let mut units: Vec<&UnitDef> = self
            .units
            .values()
            .filter(|u| dimension::category(&u.base_unit) == Some(category))
            .collect();
        units.sort_by(|a, b| a.name.cmp(&b.name));
        units
    }

    fn register(&mut self, name: &str, base_unit: &str, factor: &str) {
        self.register_with_offset(name, base_unit, factor, "0");
    }

    fn register_with_offset(&mut self, name: &str, base_unit: &str, factor: &str, offset: &str) {
        let (Some(factor), Some(offset)) = (rational::parse_decimal(factor), rational::parse_decimal(offset)) else {
            error!(unit = name, "invalid conversion data, unit skipped");
            return;
        };
        self.units.insert(
            name.to_string(),
            UnitDef {
                name: name.to_string(),
                base_unit: base_unit.to_string(),
                factor,
                offset,
                convertible: true,
            },
        );
    }

    fn register_unconvertible(&mut self, name: &str, base_unit: &str) {
        self.units.insert(
            name.to_string(),
            UnitDef {
                name: name.to_string(),
                base_unit: base_unit.to_string(),
                factor: RBig::ONE,
                offset: RBig::ZERO,
                convertible: false,
            },
        );
    }

    fn alias(&mut self, alias: &str, name: &str) {
        self.aliases.insert(alias.to_string(), name.to_string());
    }

    fn whole_alias(&mut self, alias: &str, name: &str) {
        self.whole_aliases.insert(alias.to_string(), name.to_string());
    }

    fn register_all_units(&mut self) {
        self.register_length_units();
        self.register_mass_units();
        self.register_duration_units();
        self.register_temperature_units();
        self.register_electric_units();
        self.register_light_and_amount_units();
        self.register_angle_units();
        self.register_digital_units();
        self.register_concentration_units();
        self.register_area_units();
        self.register_volume_units();
        self.register_speed_units();
        self.register_force_units();
        self.register_energy_units();
        self.register_power_units();
        self.register_pressure_units();
        self.register_frequency_units();
        self.register_graphics_units();
    }

    fn register_length_units(&mut self) {
        const M: &str = "meter";
        self.register("meter", M, "1");
        self.register("kilometer", M, "1000");
        self.register("decimeter", M, "0.1");
        self.register("centimeter", M, "0.01");
        self.register("millimeter", M, "0.001");
        self.register("micrometer", M, "1e-6");
        self.register("nanometer", M, "1e-9");
        self.register("picometer", M, "1e-12");

        // Imperial/US
        self.register("inch", M, "0.0254");
        self.register("foot", M, "0.3048");
        self.register("yard", M, "0.9144");
        self.register("mile", M, "1609.344");
        self.register("furlong", M, "201.168");
        self.register("fathom", M, "1.8288");
        self.register("chain", M, "20.1168");
        self.register("rod", M, "5.0292");
        self.register("nautical_mile", M, "1852");
        self.register("mile_scandinavian", M, "10000");
        self.register("point", M, "0.0254/72");

        // Astronomical
        self.register("astronomical_unit", M, "149597870700");
        self.register("light_year", M, "9460730472580800");
        self.register("parsec", M, "30856775814913673");
        self.register("solar_radius", M, "695700000");
        self.register("earth_radius", M, "6378100");
    }

    fn register_mass_units(&mut self) {
        const KG: &str = "kilogram";
        self.register("kilogram", KG, "1");
        self.register("gram", KG, "0.001");
        self.register("milligram", KG, "1e-6");
        self.register("microgram", KG, "1e-9");
        self.register("tonne", KG, "1000");

        self.register("pound", KG, "0.45359237");
        self.register("ounce", KG, "0.028349523125");
        self.register("ounce_troy", KG, "0.0311034768");
        self.register("stone", KG, "6.35029318");
        self.register("ton", KG, "907.18474");
        self.register("grain", KG, "0.00006479891");
        self.register("carat", KG, "0.0002");

        self.register("dalton", KG, "1.66053906660e-27");
        self.register("earth_mass", KG, "5.9722e24");
        self.register("solar_mass", KG, "1.98847e30");
    }

    fn register_duration_units(&mut self) {
        const S: &str = "second";
        self.register("second", S, "1");
        self.register("millisecond", S, "0.001");
        self.register("microsecond", S, "1e-6");
        self.register("nanosecond", S, "1e-9");
        self.register("minute", S, "60");
        self.register("hour", S, "3600");
        self.register("day", S, "86400");
        self.register("week", S, "604800");
        // Gregorian averages
        self.register("year", S, "31556952");
        self.register("quarter", S, "7889238");
        self.register("month", S, "2629746");
        self.register("decade", S, "315569520");
        self.register("century", S, "3155695200");
    }

    fn register_temperature_units(&mut self) {
        const K: &str = "kelvin";
        self.register("kelvin", K, "1");
        self.register_with_offset("celsius", K, "1", "273.15");
        self.register_with_offset("fahrenheit", K, "5/9", "2298.35/9");
        self.register("rankine", K, "5/9");
    }

    fn register_electric_units(&mut self) {
        self.register("ampere", "ampere", "1");
        self.register("milliampere", "ampere", "0.001");
        self.register("volt", "kilogram_square_meter_per_cubic_second_ampere", "1");
        self.register("ohm", "kilogram_square_meter_per_cubic_second_square_ampere", "1");
    }

    fn register_light_and_amount_units(&mut self) {
        self.register("mole", "mole", "1");
        self.register("candela", "candela", "1");
        self.register("lumen", "candela", "1");
        self.register("lux", "lux", "1");
    }

    fn register_angle_units(&mut self) {
        const REV: &str = "revolution";
        self.register("revolution", REV, "1");
        self.register("degree", REV, "1/360");
        self.register("arc_minute", REV, "1/21600");
        self.register("arc_second", REV, "1/1296000");
        self.register("radian", REV, "1/6.283185307179586476925286766559");
    }

    fn register_digital_units(&mut self) {
        const BIT: &str = "bit";
        self.register("bit", BIT, "1");
        self.register("byte", BIT, "8");
        self.register("kilobit", BIT, "1000");
        self.register("kilobyte", BIT, "8000");
        self.register("megabit", BIT, "1e6");
        self.register("megabyte", BIT, "8e6");
        self.register("gigabit", BIT, "1e9");
        self.register("gigabyte", BIT, "8e9");
        self.register("terabit", BIT, "1e12");
        self.register("terabyte", BIT, "8e12");
        self.register("petabyte", BIT, "8e15");
    }

    fn register_concentration_units(&mut self) {
        const PART: &str = "part";
        self.register("part", PART, "1");
        self.register("percent", PART, "0.01");
        self.register("permille", PART, "0.001");
        self.register("permyriad", PART, "0.0001");
        self.register("permillion", PART, "1e-6");
        self.register("karat", PART, "1/24");
    }

    fn register_area_units(&mut self) {
        const M2: &str = "square_meter";
        self.register("hectare", M2, "10000");
        self.register("acre", M2, "4046.8564224");
        self.register("dunam", M2, "1000");
    }

    fn register_volume_units(&mut self) {
        const M3: &str = "cubic_meter";
        self.register("liter", M3, "0.001");
        self.register("milliliter", M3, "1e-6");
        self.register("centiliter", M3, "1e-5");
        self.register("deciliter", M3, "1e-4");
        self.register("hectoliter", M3, "0.1");
        self.register("megaliter", M3, "1000");

        self.register("gallon", M3, "0.003785411784");
        self.register("gallon_imperial", M3, "0.00454609");
        self.register("quart", M3, "0.000946352946");
        self.register("pint", M3, "0.000473176473");
        self.register("cup", M3, "0.0002365882365");
        self.register("fluid_ounce", M3, "0.0000295735295625");
        self.register("fluid_ounce_imperial", M3, "0.0000284130625");
        self.register("tablespoon", M3, "0.00001478676478125");
        self.register("teaspoon", M3, "0.00000492892159375");
        self.register("barrel", M3, "0.158987294928");
        self.register("bushel", M3, "0.03523907016688");
        self.register("cup_metric", M3, "0.00025");
        self.register("pint_metric", M3, "0.0005");
        self.register("acre_foot", M3, "1233.48183754752");
    }

    fn register_speed_units(&mut self) {
        self.register("knot", "meter_per_second", "1852/3600");
        self.register_unconvertible("beaufort", "meter_per_second");
        self.register("g_force", "meter_per_square_second", "9.80665");
    }

    fn register_force_units(&mut self) {
        const N: &str = "kilogram_meter_per_square_second";
        self.register("newton", N, "1");
        self.register("pound_force", N, "4.4482216152605");
        self.register("kilogram_force", N, "9.80665");
    }

    fn register_energy_units(&mut self) {
        const J: &str = "kilogram_square_meter_per_square_second";
        self.register("joule", J, "1");
        self.register("kilojoule", J, "1000");
        self.register("calorie", J, "4.184");
        self.register("kilocalorie", J, "4184");
        self.register("foodcalorie", J, "4184");
        self.register("kilowatt_hour", J, "3600000");
        self.register("electronvolt", J, "1.602176634e-19");
        self.register("british_thermal_unit", J, "1055.05585262");
        self.register("therm_us", J, "105480400");
        // torque shares the energy dimension
        self.register("newton_meter", J, "1");
        self.register("pound_force_foot", J, "1.3558179483314004");
    }

    fn register_power_units(&mut self) {
        const W: &str = "kilogram_square_meter_per_cubic_second";
        self.register("watt", W, "1");
        self.register("milliwatt", W, "0.001");
        self.register("kilowatt", W, "1000");
        self.register("megawatt", W, "1e6");
        self.register("gigawatt", W, "1e9");
        self.register("horsepower", W, "745.69987158227022");
    }

    fn register_pressure_units(&mut self) {
        const PA: &str = "kilogram_per_meter_square_second";
        self.register("pascal", PA, "1");
        self.register("hectopascal", PA, "100");
        self.register("kilopascal", PA, "1000");
        self.register("megapascal", PA, "1e6");
        self.register("bar", PA, "100000");
        self.register("millibar", PA, "100");
        self.register("atmosphere", PA, "101325");
        self.register("inch_ofhg", PA, "3386.389");
        self.register("millimeter_ofhg", PA, "133.322387415");
    }

    fn register_frequency_units(&mut self) {
        const HZ: &str = "revolution_per_second";
        self.register("hertz", HZ, "1");
        self.register("kilohertz", HZ, "1000");
        self.register("megahertz", HZ, "1e6");
        self.register("gigahertz", HZ, "1e9");
    }

    fn register_graphics_units(&mut self) {
        self.register("pixel", "pixel", "1");
        self.register("megapixel", "pixel", "1e6");
        self.register("dot", "pixel", "1");
        self.register("em", "em", "1");
    }

    fn register_aliases(&mut self) {
        // Per-token spellings
        self.alias("metre", "meter");
        self.alias("meters", "meter");
        self.alias("metres", "meter");
        self.alias("litre", "liter");
        self.alias("liters", "liter");
        self.alias("litres", "liter");
        self.alias("feet", "foot");
        self.alias("inches", "inch");
        self.alias("miles", "mile");
        self.alias("grams", "gram");
        self.alias("pounds", "pound");
        self.alias("seconds", "second");
        self.alias("minutes", "minute");
        self.alias("hours", "hour");
        self.alias("days", "day");
        self.alias("metric_ton", "tonne");
        self.alias("celcius", "celsius");
        self.alias("degree_celsius", "celsius");
        self.alias("degree_fahrenheit", "fahrenheit");

        // Whole-name abbreviations
        self.whole_alias("mph", "mile_per_hour");
        self.whole_alias("kph", "kilometer_per_hour");
        self.whole_alias("mpg", "mile_per_gallon");
        self.whole_alias("psi", "pound_force_per_square_inch");
        self.whole_alias("rpm", "revolution_per_minute");
    }
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashu_int::IBig;

    #[test]
    fn test_lookup_and_alias() {
        let mile = UNITS.get("mile").unwrap();
        assert_eq!(mile.base_unit, "meter");
        assert_eq!(mile.factor, rational::parse_decimal("1609.344").unwrap());
        assert_eq!(UNITS.get("metre").unwrap().name, "meter");
        assert!(UNITS.get("parsnip").is_none());
    }

    #[test]
    fn test_fahrenheit_exact() {
        let f = UNITS.get("fahrenheit").unwrap();
        assert_eq!(f.factor, rational::ratio(IBig::from(5), IBig::from(9)));
        // 32 F is exactly 273.15 K
        let base = rational::from_i64(32) * f.factor.clone() + f.offset.clone();
        assert_eq!(base, rational::parse_decimal("273.15").unwrap());
    }

    #[test]
    fn test_every_base_unit_is_known() {
        for name in UNITS.names() {
            let unit = UNITS.get(name).unwrap();
            assert!(
                dimension::is_base_identity(&unit.base_unit),
                "{} has unknown base {}",
                name,
                unit.base_unit
            );
        }
    }

    #[test]
    fn test_longest_first() {
        let names = UNITS.names_by_length();
        assert!(names.first().unwrap().len() >= names.last().unwrap().len());
    }

    #[test]
    fn test_by_category() {
        let speed: Vec<&str> = UNITS.by_category("speed").iter().map(|u| u.name.as_str()).collect();
        assert_eq!(speed, vec!["beaufort", "knot"]);
        assert!(!UNITS.get("beaufort").unwrap().convertible);
    }

    #[test]
    fn test_whole_alias() {
        assert_eq!(UNITS.resolve_whole("mph"), Some("mile_per_hour"));
    }
}
