//! Unit value - a quantity with a parsed unit

use std::fmt;

use mensura_core::{Number, Result, UnitError};
use serde::{Deserialize, Serialize};

use crate::base_unit;
use crate::convert;
use crate::parse::{self, ParsedUnit};

/// Usage tag applied when none is given
pub const DEFAULT_USAGE: &str = "default";

/// A numeric value in a unit.
///
/// `base_conversion` is always the parse of `name`; every operation returns
/// a new value rather than mutating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    /// Canonical unit name, e.g. "kilometer_per_hour"
    pub name: String,
    pub value: Number,
    pub base_conversion: ParsedUnit,
    /// Preference usage such as "person_height"
    pub usage: String,
    /// Number skeleton options, e.g. "precision-increment/50"
    pub format_options: Vec<String>,
}

impl Unit {
    /// Parse and validate `name`. Non-finite floats are rejected.
    pub fn new(name: &str, value: Number) -> Result<Self> {
        if let Number::Float(f) = value {
            if !f.is_finite() {
                return Err(UnitError::InvalidNumber(f.to_string()));
            }
        }
        let parsed = parse::parse_unit(name)?;
        Ok(Self::from_parsed(parsed, value))
    }

    /// Build from an already parsed unit
    pub fn from_parsed(parsed: ParsedUnit, value: Number) -> Self {
        Unit {
            name: parsed.unit_name(),
            value,
            base_conversion: parsed,
            usage: DEFAULT_USAGE.to_string(),
            format_options: Vec::new(),
        }
    }

    pub fn zero(name: &str) -> Result<Self> {
        Self::new(name, Number::from_i64(0))
    }

    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    pub fn with_format_options(mut self, options: Vec<String>) -> Self {
        self.format_options = options;
        self
    }

    /// Same unit and metadata with a different value
    pub fn with_value(&self, value: Number) -> Self {
        Unit { value, ..self.clone() }
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    // ========== Inspection ==========

    /// Canonical base-unit identity of this unit
    pub fn base_unit(&self) -> Result<String> {
        base_unit::canonical_base_unit(&self.base_conversion)
    }

    /// Category name, e.g. "length"
    pub fn category(&self) -> Result<&'static str> {
        base_unit::category(&self.base_conversion)
    }

    pub fn is_compatible(&self, other: &Unit) -> bool {
        base_unit::is_compatible(&self.base_conversion, &other.base_conversion)
    }

    // ========== Conversion ==========

    /// Convert into another unit, keeping usage and format options
    pub fn convert(&self, target: &str) -> Result<Unit> {
        let target = parse::parse_unit(target)?;
        self.convert_parsed(&target)
    }

    pub fn convert_parsed(&self, target: &ParsedUnit) -> Result<Unit> {
        let value = convert::convert(&self.value, &self.base_conversion, target)?;
        Ok(Unit {
            name: target.unit_name(),
            value,
            base_conversion: target.clone(),
            usage: self.usage.clone(),
            format_options: self.format_options.clone(),
        })
    }

    /// The same quantity in its canonical base unit
    pub fn to_base_unit(&self) -> Result<Unit> {
        let base = parse::parse_unit(&self.base_unit()?)?;
        self.convert_parsed(&base)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.name)
    }
}
