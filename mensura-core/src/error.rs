//! Structured unit errors
//!
//! Every fallible operation returns one of these. Each variant carries the
//! names and values needed to diagnose it, and a stable machine-readable
//! code for callers that log or serialise errors.

use serde::Serialize;
use thiserror::Error;

use crate::NumberError;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const UNKNOWN_UNIT: &str = "UNKNOWN_UNIT";
    pub const UNKNOWN_BASE_UNIT: &str = "UNKNOWN_BASE_UNIT";
    pub const INCOMPATIBLE_UNITS: &str = "INCOMPATIBLE_UNITS";
    pub const UNIT_NOT_CONVERTIBLE: &str = "UNIT_NOT_CONVERTIBLE";
    pub const UNKNOWN_USAGE: &str = "UNKNOWN_USAGE";
    pub const UNKNOWN_UNIT_PREFERENCE: &str = "UNKNOWN_UNIT_PREFERENCE";
    pub const UNKNOWN_CATEGORY: &str = "UNKNOWN_CATEGORY";
    pub const NO_PATTERN: &str = "NO_PATTERN";
    pub const INVALID_RANGE: &str = "INVALID_RANGE";
    pub const PARSE_ERROR: &str = "PARSE_ERROR";
    pub const POWER_TOO_HIGH: &str = "POWER_TOO_HIGH";
    pub const DIV_ZERO: &str = "DIV_ZERO";
    pub const INVALID_NUMBER: &str = "INVALID_NUMBER";
    pub const UNKNOWN_LOCALE: &str = "UNKNOWN_LOCALE";
}

/// Errors raised while parsing, converting, combining or formatting units
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "error", content = "details", rename_all = "snake_case")]
pub enum UnitError {
    #[error("unknown unit {unit:?}: nothing matches {unmatched:?}")]
    UnknownUnit { unit: String, unmatched: String },

    #[error("base unit {base_unit:?} of {unit:?} is not a known base unit")]
    UnknownBaseUnit { unit: String, base_unit: String },

    #[error("{from:?} is not convertible to {to:?}")]
    IncompatibleUnits { from: String, to: String },

    #[error("unit {unit:?} has no numeric conversion")]
    UnitNotConvertible { unit: String },

    #[error("usage {usage:?} is not defined for category {category:?}")]
    UnknownUsage { category: String, usage: String },

    #[error("no preference for category {category:?}, usage {usage:?} and territory {territory:?}")]
    UnknownUnitPreference { category: String, usage: String, territory: String },

    #[error("no category is known for base unit {0:?}")]
    UnknownCategory(String),

    #[error("no pattern for unit {unit:?} (case {case}, gender {gender}, plural {plural})")]
    NoPattern { unit: String, case: String, gender: String, plural: String },

    #[error("invalid range {first} .. {last}: {reason}")]
    InvalidRange { first: String, last: String, reason: String },

    #[error("cannot parse {0:?}")]
    ParseError(String),

    #[error("cannot parse power greater than cubic in {unit:?} (power {power})")]
    PowerTooHigh { unit: String, power: u32 },

    #[error("division by zero")]
    DivisionByZero,

    #[error("invalid number: {0}")]
    InvalidNumber(String),

    #[error("unknown locale {0:?}")]
    UnknownLocale(String),
}

impl UnitError {
    pub fn code(&self) -> &'static str {
        match self {
            UnitError::UnknownUnit { .. } => codes::UNKNOWN_UNIT,
            UnitError::UnknownBaseUnit { .. } => codes::UNKNOWN_BASE_UNIT,
            UnitError::IncompatibleUnits { .. } => codes::INCOMPATIBLE_UNITS,
            UnitError::UnitNotConvertible { .. } => codes::UNIT_NOT_CONVERTIBLE,
            UnitError::UnknownUsage { .. } => codes::UNKNOWN_USAGE,
            UnitError::UnknownUnitPreference { .. } => codes::UNKNOWN_UNIT_PREFERENCE,
            UnitError::UnknownCategory(_) => codes::UNKNOWN_CATEGORY,
            UnitError::NoPattern { .. } => codes::NO_PATTERN,
            UnitError::InvalidRange { .. } => codes::INVALID_RANGE,
            UnitError::ParseError(_) => codes::PARSE_ERROR,
            UnitError::PowerTooHigh { .. } => codes::POWER_TOO_HIGH,
            UnitError::DivisionByZero => codes::DIV_ZERO,
            UnitError::InvalidNumber(_) => codes::INVALID_NUMBER,
            UnitError::UnknownLocale(_) => codes::UNKNOWN_LOCALE,
        }
    }

    // ========== Common Error Constructors ==========

    pub fn unknown_unit(unit: impl Into<String>, unmatched: impl Into<String>) -> Self {
        UnitError::UnknownUnit { unit: unit.into(), unmatched: unmatched.into() }
    }

    pub fn incompatible(from: impl Into<String>, to: impl Into<String>) -> Self {
        UnitError::IncompatibleUnits { from: from.into(), to: to.into() }
    }

    pub fn not_convertible(unit: impl Into<String>) -> Self {
        UnitError::UnitNotConvertible { unit: unit.into() }
    }
}

impl From<NumberError> for UnitError {
    fn from(err: NumberError) -> Self {
        match err {
            NumberError::ParseError(s) => UnitError::InvalidNumber(s),
            NumberError::DivisionByZero => UnitError::DivisionByZero,
            NumberError::NotFinite(f) => UnitError::InvalidNumber(f.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, UnitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(UnitError::unknown_unit("foo", "foo").code(), codes::UNKNOWN_UNIT);
        assert_eq!(UnitError::DivisionByZero.code(), codes::DIV_ZERO);
    }

    #[test]
    fn test_display_reports_both_units() {
        let err = UnitError::incompatible("meter", "second");
        let text = err.to_string();
        assert!(text.contains("meter"));
        assert!(text.contains("second"));
    }

    #[test]
    fn test_from_number_error() {
        let err: UnitError = NumberError::DivisionByZero.into();
        assert_eq!(err, UnitError::DivisionByZero);
    }
}
