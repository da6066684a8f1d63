//! Mensura - CLDR units of measure
//!
//! One entry point over the unit engine:
//! - Parse and validate unit names, including compound units
//! - Exact conversion between compatible units
//! - Unit arithmetic that synthesises compound units
//! - Territory and usage based unit preferences
//! - Decomposition ("5 feet, 10 inches")
//! - Localized, grammar-aware formatting
//!
//! Every operation has a `try_*` form returning `Result` and a plain form
//! that panics with the error message.
//!
//! ```
//! use mensura::{Mensura, Number};
//!
//! let mensura = Mensura::new();
//! let mile = mensura.new_unit("mile", Number::from_i64(1));
//! assert_eq!(mensura.convert(&mile, "foot").value, Number::from_i64(5280));
//! ```

mod config;

pub use config::{Config, ENV_LOCALE, ENV_MAX_FRACTION_DIGITS, ENV_STYLE};
pub use mensura_core::{codes, Number, NumberKind, RoundingMode, Result, UnitError};
pub use mensura_format::{FormatOptions, FormattedPart, PartKind, UnitFormatter};
pub use mensura_locale::{Backend, GrammaticalCase, NumberOptions, Style};
pub use mensura_units::{ParsedUnit, Preference, Unit, UnitRange};

use std::cmp::Ordering;
use std::sync::Arc;

use mensura_units::{base_unit, math, preference, DEFAULT_USAGE};
use tracing::debug;

/// Unit service: configuration plus a locale backend
#[derive(Debug, Clone)]
pub struct Mensura {
    config: Config,
    backend: Arc<Backend>,
}

impl Mensura {
    /// Built-in locale data and default configuration
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            backend: Arc::new(Backend::builtin()),
        }
    }

    /// Built-in locale data, configuration from the environment
    pub fn from_env() -> Self {
        Self::new().with_config(Config::from_env())
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = Arc::new(backend);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    /// Formatting options from the configured defaults
    pub fn format_options(&self) -> FormatOptions {
        FormatOptions::default()
            .with_style(self.config.default_style)
            .with_max_fraction_digits(self.config.max_fraction_digits)
    }

    pub fn formatter(&self) -> UnitFormatter<'_> {
        UnitFormatter::new(&self.backend)
    }

    // ========== Units ==========

    pub fn try_new_unit(&self, name: &str, value: impl Into<Number>) -> Result<Unit> {
        Ok(Unit::new(name, value.into())?.with_usage(self.config.default_usage.clone()))
    }

    pub fn new_unit(&self, name: &str, value: impl Into<Number>) -> Unit {
        bang(self.try_new_unit(name, value))
    }

    pub fn try_parse(&self, name: &str) -> Result<ParsedUnit> {
        mensura_units::parse_unit(name)
    }

    pub fn parse(&self, name: &str) -> ParsedUnit {
        bang(self.try_parse(name))
    }

    /// Range from `first` to `last`; `last` must convert into `first`'s
    /// unit and not be smaller
    pub fn try_range(&self, first: Unit, last: Unit) -> Result<UnitRange> {
        UnitRange::new(first, last)
    }

    pub fn range(&self, first: Unit, last: Unit) -> UnitRange {
        bang(self.try_range(first, last))
    }

    // ========== Inspection ==========

    /// Canonical base-unit identity of a unit name
    pub fn try_base_unit(&self, name: &str) -> Result<String> {
        base_unit::canonical_base_unit(&self.try_parse(name)?)
    }

    pub fn base_unit(&self, name: &str) -> String {
        bang(self.try_base_unit(name))
    }

    /// The same quantity expressed in its canonical base unit
    pub fn try_base_unit_of(&self, unit: &Unit) -> Result<Unit> {
        unit.to_base_unit()
    }

    pub fn base_unit_of(&self, unit: &Unit) -> Unit {
        bang(self.try_base_unit_of(unit))
    }

    pub fn try_compatible(&self, from: &str, to: &str) -> Result<bool> {
        Ok(base_unit::is_compatible(&self.try_parse(from)?, &self.try_parse(to)?))
    }

    /// False when either name fails to parse
    pub fn compatible(&self, from: &str, to: &str) -> bool {
        self.try_compatible(from, to).unwrap_or(false)
    }

    pub fn try_unit_category(&self, name: &str) -> Result<&'static str> {
        mensura_units::unit_category(name)
    }

    pub fn unit_category(&self, name: &str) -> &'static str {
        bang(self.try_unit_category(name))
    }

    pub fn known_units(&self) -> Vec<&'static str> {
        mensura_units::known_units()
    }

    pub fn known_categories(&self) -> Vec<&'static str> {
        mensura_units::known_categories()
    }

    pub fn try_known_usages(&self, category: &str) -> Result<Vec<String>> {
        mensura_units::known_usages(category)
    }

    pub fn known_usages(&self, category: &str) -> Vec<String> {
        bang(self.try_known_usages(category))
    }

    /// True when the default locale has a pattern for the whole name
    pub fn try_is_translatable(&self, name: &str) -> Result<bool> {
        let name = self.try_parse(name)?.unit_name();
        self.formatter()
            .is_translatable(&name, &self.config.default_locale, self.config.default_style)
    }

    pub fn is_translatable(&self, name: &str) -> bool {
        bang(self.try_is_translatable(name))
    }

    // ========== Conversion ==========

    pub fn try_convert(&self, unit: &Unit, to: &str) -> Result<Unit> {
        unit.convert(to)
    }

    pub fn convert(&self, unit: &Unit, to: &str) -> Unit {
        bang(self.try_convert(unit, to))
    }

    // ========== Arithmetic ==========

    pub fn try_add(&self, unit_1: &Unit, unit_2: &Unit) -> Result<Unit> {
        math::add(unit_1, unit_2)
    }

    pub fn add(&self, unit_1: &Unit, unit_2: &Unit) -> Unit {
        bang(self.try_add(unit_1, unit_2))
    }

    pub fn try_sub(&self, unit_1: &Unit, unit_2: &Unit) -> Result<Unit> {
        math::sub(unit_1, unit_2)
    }

    pub fn sub(&self, unit_1: &Unit, unit_2: &Unit) -> Unit {
        bang(self.try_sub(unit_1, unit_2))
    }

    pub fn try_mul(&self, unit_1: &Unit, unit_2: &Unit) -> Result<Unit> {
        math::mul(unit_1, unit_2)
    }

    pub fn mul(&self, unit_1: &Unit, unit_2: &Unit) -> Unit {
        bang(self.try_mul(unit_1, unit_2))
    }

    pub fn try_div(&self, unit_1: &Unit, unit_2: &Unit) -> Result<Unit> {
        math::div(unit_1, unit_2)
    }

    pub fn div(&self, unit_1: &Unit, unit_2: &Unit) -> Unit {
        bang(self.try_div(unit_1, unit_2))
    }

    /// Sum in the first unit; `None` for an empty list
    pub fn try_sum(&self, units: &[Unit]) -> Result<Option<Unit>> {
        math::sum(units)
    }

    pub fn sum(&self, units: &[Unit]) -> Option<Unit> {
        bang(self.try_sum(units))
    }

    pub fn try_pow(&self, unit: &Unit, power: u32) -> Result<Unit> {
        math::pow(unit, power)
    }

    pub fn pow(&self, unit: &Unit, power: u32) -> Unit {
        bang(self.try_pow(unit, power))
    }

    pub fn try_round(&self, unit: &Unit, places: u32, mode: RoundingMode) -> Result<Unit> {
        math::round(unit, places, mode)
    }

    pub fn round(&self, unit: &Unit, places: u32, mode: RoundingMode) -> Unit {
        bang(self.try_round(unit, places, mode))
    }

    /// Compare at the configured precision
    pub fn try_compare(&self, unit_1: &Unit, unit_2: &Unit) -> Result<Ordering> {
        math::compare_with_precision(unit_1, unit_2, self.config.compare_precision)
    }

    pub fn compare(&self, unit_1: &Unit, unit_2: &Unit) -> Ordering {
        bang(self.try_compare(unit_1, unit_2))
    }

    // ========== Preferences ==========

    /// Display units for a territory. `usage` defaults to the unit's own
    /// usage, then the configured default usage.
    pub fn try_preferred_units(&self, unit: &Unit, territory: &str, usage: Option<&str>) -> Result<Preference> {
        let usage = self.usage_for(unit, usage);
        preference::preferred_units_in(
            &preference::PREFERENCES,
            unit,
            territory,
            Some(&usage),
            self.backend.territories(),
            self.config.preference_precision,
        )
    }

    pub fn preferred_units(&self, unit: &Unit, territory: &str, usage: Option<&str>) -> Preference {
        bang(self.try_preferred_units(unit, territory, usage))
    }

    pub fn try_decompose(&self, unit: &Unit, targets: &[&str]) -> Result<Vec<Unit>> {
        mensura_units::decompose(unit, targets)
    }

    pub fn decompose(&self, unit: &Unit, targets: &[&str]) -> Vec<Unit> {
        bang(self.try_decompose(unit, targets))
    }

    /// Preferred units for the territory, then decomposed over them. The
    /// preference's number skeleton is attached to every part.
    pub fn try_localize(&self, unit: &Unit, territory: &str, usage: Option<&str>) -> Result<Vec<Unit>> {
        let preference = self.try_preferred_units(unit, territory, usage)?;
        let targets: Vec<&str> = preference.units.iter().map(String::as_str).collect();
        debug!(unit = %unit, territory, targets = ?targets, "localizing");
        let parts = mensura_units::decompose(unit, &targets)?;
        Ok(parts
            .into_iter()
            .map(|part| {
                if preference.skeleton.is_empty() {
                    part
                } else {
                    part.with_format_options(preference.skeleton.clone())
                }
            })
            .collect())
    }

    pub fn localize(&self, unit: &Unit, territory: &str, usage: Option<&str>) -> Vec<Unit> {
        bang(self.try_localize(unit, territory, usage))
    }

    fn usage_for(&self, unit: &Unit, usage: Option<&str>) -> String {
        match usage {
            Some(usage) => usage.to_string(),
            None if unit.usage != DEFAULT_USAGE => unit.usage.clone(),
            None => self.config.default_usage.clone(),
        }
    }

    // ========== Formatting ==========

    /// Format in the default locale and style
    pub fn try_format(&self, unit: &Unit) -> Result<String> {
        self.try_format_with(unit, &self.config.default_locale, &self.format_options())
    }

    pub fn format(&self, unit: &Unit) -> String {
        bang(self.try_format(unit))
    }

    pub fn try_format_with(&self, unit: &Unit, locale: &str, options: &FormatOptions) -> Result<String> {
        self.formatter().format(unit, locale, options)
    }

    pub fn format_with(&self, unit: &Unit, locale: &str, options: &FormatOptions) -> String {
        bang(self.try_format_with(unit, locale, options))
    }

    pub fn try_format_to_parts(&self, unit: &Unit, locale: &str, options: &FormatOptions) -> Result<Vec<FormattedPart>> {
        self.formatter().format_to_parts(unit, locale, options)
    }

    pub fn format_to_parts(&self, unit: &Unit, locale: &str, options: &FormatOptions) -> Vec<FormattedPart> {
        bang(self.try_format_to_parts(unit, locale, options))
    }

    pub fn try_format_list(&self, units: &[Unit], locale: &str, options: &FormatOptions) -> Result<String> {
        self.formatter().format_list(units, locale, options)
    }

    pub fn format_list(&self, units: &[Unit], locale: &str, options: &FormatOptions) -> String {
        bang(self.try_format_list(units, locale, options))
    }

    pub fn try_format_range(&self, range: &UnitRange, locale: &str, options: &FormatOptions) -> Result<String> {
        self.formatter().format_range(range, locale, options)
    }

    pub fn format_range(&self, range: &UnitRange, locale: &str, options: &FormatOptions) -> String {
        bang(self.try_format_range(range, locale, options))
    }

    /// Localize for a territory and format the parts as a list
    pub fn try_format_localized(
        &self,
        unit: &Unit,
        territory: &str,
        usage: Option<&str>,
        locale: &str,
        options: &FormatOptions,
    ) -> Result<String> {
        let parts = self.try_localize(unit, territory, usage)?;
        self.try_format_list(&parts, locale, options)
    }

    pub fn format_localized(
        &self,
        unit: &Unit,
        territory: &str,
        usage: Option<&str>,
        locale: &str,
        options: &FormatOptions,
    ) -> String {
        bang(self.try_format_localized(unit, territory, usage, locale, options))
    }
}

impl Default for Mensura {
    fn default() -> Self {
        Self::new()
    }
}

fn bang<T>(result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => panic!("{}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mensura() -> Mensura {
        Mensura::new()
    }

    #[test]
    fn test_new_unit_uses_default_usage() {
        let m = mensura().with_config(Config::default().with_usage("person"));
        assert_eq!(m.new_unit("meter", 2).usage, "person");
    }

    #[test]
    #[should_panic(expected = "unknown unit")]
    fn test_bang_panics_with_message() {
        mensura().new_unit("frobnitz", 1);
    }

    #[test]
    fn test_try_returns_error() {
        let m = mensura();
        let meter = m.new_unit("meter", 1);
        match m.try_convert(&meter, "second") {
            Err(e) => assert_eq!(e.code(), codes::INCOMPATIBLE_UNITS),
            Ok(u) => panic!("expected an error, got {}", u),
        }
    }

    #[test]
    fn test_range_validates_ends() {
        let m = mensura();
        let range = m.range(m.new_unit("foot", 3), m.new_unit("yard", 2));
        assert_eq!(range.first.name, "foot");
        assert_eq!(range.last.name, "yard");

        let backwards = m.try_range(m.new_unit("kilometer", 5), m.new_unit("meter", 3));
        assert_eq!(backwards.unwrap_err().code(), codes::INVALID_RANGE);
        assert!(m.try_range(m.new_unit("meter", 1), m.new_unit("second", 2)).is_err());
    }

    #[test]
    #[should_panic]
    fn test_range_panics_on_reversed_ends() {
        mensura().range(mensura().new_unit("mile", 2), mensura().new_unit("foot", 1));
    }

    #[test]
    fn test_compare_uses_configured_precision() {
        let m = mensura();
        let a = m.new_unit("meter", Number::decimal("1.00004").unwrap());
        let b = m.new_unit("centimeter", 100);
        assert_eq!(m.compare(&a, &b), Ordering::Equal);

        let strict = m.clone().with_config(Config::default().with_compare_precision(5));
        assert_eq!(strict.compare(&a, &b), Ordering::Greater);
    }

    #[test]
    fn test_format_uses_config() {
        let m = mensura().with_config(Config::default().with_locale("de").with_style(Style::Short));
        assert_eq!(m.format(&m.new_unit("kilometer", 5)), "5 km");
    }

    #[test]
    fn test_usage_precedence() {
        let m = mensura();
        let plain = m.new_unit("meter", 1);
        assert_eq!(m.usage_for(&plain, None), "default");
        assert_eq!(m.usage_for(&plain.clone().with_usage("person"), None), "person");
        assert_eq!(m.usage_for(&plain, Some("road")), "road");
    }

    #[test]
    fn test_translatable() {
        let m = mensura();
        assert!(m.is_translatable("kilometer_per_hour"));
        assert!(m.is_translatable("metre"));
        assert!(!m.is_translatable("square_furlong"));
    }
}
