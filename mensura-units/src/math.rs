//! Unit arithmetic
//!
//! Addition and subtraction convert the second operand into the first
//! operand's unit. Multiplying or dividing units of different dimensions
//! synthesises a compound unit from the merged token lists.

use std::cmp::Ordering;

use mensura_core::{Number, Result, RoundingMode, UnitError};
use tracing::debug;

use crate::base_unit;
use crate::convert;
use crate::parse::{self, ParsedUnit, Token};
use crate::unit::Unit;

/// Decimal places both sides are rounded to when comparing across units
pub const COMPARE_PRECISION: u32 = 1;

/// `unit_2` expressed in `unit_1`'s unit
fn converted_value(unit_1: &Unit, unit_2: &Unit) -> Result<Number> {
    convert::convert(&unit_2.value, &unit_2.base_conversion, &unit_1.base_conversion)
}

// ========== Addition ==========

pub fn add(unit_1: &Unit, unit_2: &Unit) -> Result<Unit> {
    let other = converted_value(unit_1, unit_2)?;
    Ok(unit_1.with_value(unit_1.value.add(&other)?))
}

pub fn sub(unit_1: &Unit, unit_2: &Unit) -> Result<Unit> {
    let other = converted_value(unit_1, unit_2)?;
    Ok(unit_1.with_value(unit_1.value.sub(&other)?))
}

/// Sum of a list in the first element's unit. `None` for an empty list.
pub fn sum(units: &[Unit]) -> Result<Option<Unit>> {
    let Some((first, rest)) = units.split_first() else {
        return Ok(None);
    };
    rest.iter().try_fold(first.clone(), |acc, u| add(&acc, u)).map(Some)
}

// ========== Multiplication ==========

/// Multiply two units. Compatible units multiply their values in the first
/// unit; anything else produces a compound unit ("meter" * "second" is
/// "meter_second").
pub fn mul(unit_1: &Unit, unit_2: &Unit) -> Result<Unit> {
    if unit_1.is_compatible(unit_2) {
        let other = converted_value(unit_1, unit_2)?;
        return Ok(unit_1.with_value(unit_1.value.mul(&other)?));
    }
    let parsed = product_unit(&unit_1.base_conversion, &unit_2.base_conversion, false)?;
    let value = unit_1.value.mul(&unit_2.value)?;
    Ok(Unit::from_parsed(parsed, value).with_usage(unit_1.usage.clone()))
}

/// Divide two units. Compatible units divide their values in the first
/// unit; anything else produces a quotient unit ("meter" / "second" is
/// "meter_per_second").
pub fn div(unit_1: &Unit, unit_2: &Unit) -> Result<Unit> {
    if unit_1.is_compatible(unit_2) {
        let other = converted_value(unit_1, unit_2)?;
        return Ok(unit_1.with_value(unit_1.value.checked_div(&other)?));
    }
    let parsed = product_unit(&unit_1.base_conversion, &unit_2.base_conversion, true)?;
    let value = unit_1.value.checked_div(&unit_2.value)?;
    Ok(Unit::from_parsed(parsed, value).with_usage(unit_1.usage.clone()))
}

pub fn mul_scalar(unit: &Unit, factor: &Number) -> Result<Unit> {
    Ok(unit.with_value(unit.value.mul(factor)?))
}

pub fn div_scalar(unit: &Unit, divisor: &Number) -> Result<Unit> {
    Ok(unit.with_value(unit.value.checked_div(divisor)?))
}

/// Raise to the second or third power, synthesising `square_`/`cubic_` units
pub fn pow(unit: &Unit, power: u32) -> Result<Unit> {
    match power {
        1 => Ok(unit.clone()),
        2 | 3 => {
            let mut parsed = unit.base_conversion.clone();
            let mut value = unit.value.clone();
            for _ in 1..power {
                parsed = product_unit(&parsed, &unit.base_conversion, false)?;
                value = value.mul(&unit.value)?;
            }
            Ok(Unit::from_parsed(parsed, value).with_usage(unit.usage.clone()))
        }
        _ => Err(UnitError::PowerTooHigh { unit: unit.name.clone(), power }),
    }
}

/// Merge two parsed units into one, inverting the second when dividing.
/// Repeated tokens fold into powers; tokens on opposite sides do not cancel.
pub fn product_unit(left: &ParsedUnit, right: &ParsedUnit, divide: bool) -> Result<ParsedUnit> {
    let names = |tokens: &[Token]| tokens.iter().map(|t| t.name.clone()).collect::<Vec<_>>();

    let (right_num, right_den) = if divide {
        (right.denominator(), right.numerator())
    } else {
        (right.numerator(), right.denominator())
    };

    let mut numerator = names(left.numerator());
    numerator.extend(names(right_num));
    let mut denominator = names(left.denominator());
    denominator.extend(names(right_den));

    let numerator = parse::build_tokens(numerator)?;
    let denominator = parse::build_tokens(denominator)?;
    let parsed = if denominator.is_empty() {
        ParsedUnit::Product(numerator)
    } else {
        ParsedUnit::Per { numerator, denominator }
    };
    debug!(left = %left, right = %right, divide, result = %parsed, "synthesised unit");
    Ok(parsed)
}

// ========== Sign and rounding ==========

pub fn negate(unit: &Unit) -> Unit {
    unit.with_value(unit.value.neg())
}

pub fn abs(unit: &Unit) -> Unit {
    unit.with_value(unit.value.abs())
}

/// Round the value; unit, usage and format options pass through
pub fn round(unit: &Unit, places: u32, mode: RoundingMode) -> Result<Unit> {
    Ok(unit.with_value(unit.value.round(places, mode)?))
}

// ========== Comparison ==========

/// Compare two units. Units of the same structure compare values directly;
/// otherwise both are rounded to `COMPARE_PRECISION` places after converting.
pub fn compare(unit_1: &Unit, unit_2: &Unit) -> Result<Ordering> {
    compare_with_precision(unit_1, unit_2, COMPARE_PRECISION)
}

pub fn compare_with_precision(unit_1: &Unit, unit_2: &Unit, places: u32) -> Result<Ordering> {
    if unit_1.base_conversion == unit_2.base_conversion {
        return Ok(unit_1.value.compare(&unit_2.value)?);
    }
    if !base_unit::is_compatible(&unit_1.base_conversion, &unit_2.base_conversion) {
        return Err(UnitError::incompatible(&unit_1.name, &unit_2.name));
    }
    let other = converted_value(unit_1, unit_2)?;
    let left = unit_1.value.round(places, RoundingMode::HalfEven)?;
    let right = other.round(places, RoundingMode::HalfEven)?;
    Ok(left.compare(&right)?)
}
