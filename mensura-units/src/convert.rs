//! Conversion engine
//!
//! Values move through the base unit: `base = value * factor + offset` per
//! token, composed across products and divided across quotients, then back
//! out through the target. All intermediate arithmetic is exact.

use mensura_core::{rational, Number, NumberKind, RBig, Result, UnitError};
use tracing::trace;

use crate::base_unit::{self, Compatibility};
use crate::parse::{ParsedUnit, Token};

/// Apply a token list's forward transform in order
fn tokens_to_base(tokens: &[Token], value: RBig) -> RBig {
    tokens.iter().fold(value, |v, t| v * t.conversion.factor.clone() + t.conversion.offset.clone())
}

/// Undo a token list's forward transform, last token first
fn tokens_from_base(tokens: &[Token], value: RBig) -> Result<RBig> {
    tokens.iter().rev().try_fold(value, |v, t| {
        if t.conversion.factor == RBig::ZERO {
            return Err(UnitError::DivisionByZero);
        }
        Ok((v - t.conversion.offset.clone()) / t.conversion.factor.clone())
    })
}

/// Value expressed in the unit's base unit
pub fn to_base(value: RBig, unit: &ParsedUnit) -> Result<RBig> {
    let numerator = tokens_to_base(unit.numerator(), value);
    if !unit.is_per() {
        return Ok(numerator);
    }
    let denominator = tokens_to_base(unit.denominator(), RBig::ONE);
    if denominator == RBig::ZERO {
        return Err(UnitError::DivisionByZero);
    }
    Ok(numerator / denominator)
}

/// Base-unit value expressed in `unit`
pub fn from_base(value: RBig, unit: &ParsedUnit) -> Result<RBig> {
    if !unit.is_per() {
        return tokens_from_base(unit.numerator(), value);
    }
    let denominator = tokens_to_base(unit.denominator(), RBig::ONE);
    tokens_from_base(unit.numerator(), value * denominator)
}

/// Exact conversion of a rational between two parsed units
pub fn convert_rational(value: RBig, from: &ParsedUnit, to: &ParsedUnit) -> Result<RBig> {
    if from == to {
        return Ok(value);
    }
    if !from.is_convertible() {
        return Err(UnitError::not_convertible(from.unit_name()));
    }
    if !to.is_convertible() {
        return Err(UnitError::not_convertible(to.unit_name()));
    }

    match base_unit::compatibility(from, to)? {
        Some(Compatibility::Direct) => from_base(to_base(value, from)?, to),
        Some(Compatibility::Inverse) => {
            let base = to_base(value, from)?;
            if base == RBig::ZERO {
                return Err(UnitError::DivisionByZero);
            }
            trace!(from = %from, to = %to, "converting through inverse");
            from_base(RBig::ONE / base, to)
        }
        None => Err(UnitError::incompatible(from.unit_name(), to.unit_name())),
    }
}

/// Convert a value between two parsed units.
///
/// Converting a unit to itself returns the value untouched. Otherwise an
/// integral result is an integer whatever the input kind. A fractional
/// result takes the input's kind: integers and rationals give rationals,
/// floats stay floats and decimals stay decimals.
pub fn convert(value: &Number, from: &ParsedUnit, to: &ParsedUnit) -> Result<Number> {
    if from == to {
        return Ok(value.clone());
    }
    let exact = value.to_rational()?;
    let converted = convert_rational(exact, from, to)?;
    Ok(coerce(converted, value.kind()))
}

/// Result typing shared by conversion and unit arithmetic
pub(crate) fn coerce(value: RBig, kind: NumberKind) -> Number {
    if rational::is_integral(&value) {
        return Number::Int(value.numerator().clone());
    }
    match kind {
        NumberKind::Int | NumberKind::Rational => Number::Rational(value),
        other => Number::from_rational_as(value, other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_unit;

    fn conv(value: Number, from: &str, to: &str) -> Result<Number> {
        convert(&value, &parse_unit(from).unwrap(), &parse_unit(to).unwrap())
    }

    #[test]
    fn test_celsius_to_fahrenheit() {
        assert_eq!(conv(Number::from_i64(0), "celsius", "fahrenheit").unwrap(), Number::from_i64(32));
        assert_eq!(conv(Number::from_i64(100), "celsius", "fahrenheit").unwrap(), Number::from_i64(212));
        assert_eq!(conv(Number::from_i64(-40), "fahrenheit", "celsius").unwrap(), Number::from_i64(-40));
    }

    #[test]
    fn test_mile_to_foot() {
        assert_eq!(conv(Number::from_i64(1), "mile", "foot").unwrap(), Number::from_i64(5280));
    }

    #[test]
    fn test_non_integral_int_becomes_rational() {
        let result = conv(Number::from_i64(1), "foot", "meter").unwrap();
        assert_eq!(result, Number::Rational(rational::parse_decimal("0.3048").unwrap()));
    }

    #[test]
    fn test_float_stays_float() {
        let result = conv(Number::from_f64(1.5), "meter", "kilometer").unwrap();
        assert_eq!(result.kind(), NumberKind::Float);
        assert_eq!(result, Number::from_f64(0.0015));
    }

    #[test]
    fn test_decimal_stays_decimal() {
        let result = conv(Number::decimal("2.5").unwrap(), "gram", "kilogram").unwrap();
        assert_eq!(result.kind(), NumberKind::Decimal);
        assert_eq!(result, Number::decimal("0.0025").unwrap());
    }

    #[test]
    fn test_integral_result_is_int_for_every_kind() {
        let result = conv(Number::from_f64(1.5), "kilometer", "meter").unwrap();
        assert_eq!(result.kind(), NumberKind::Int);
        assert_eq!(result, Number::from_i64(1500));

        let result = conv(Number::decimal("2.5").unwrap(), "kilogram", "gram").unwrap();
        assert_eq!(result.kind(), NumberKind::Int);
        assert_eq!(result, Number::from_i64(2500));

        let result = conv(Number::from_ratio(1, 2).unwrap(), "foot", "inch").unwrap();
        assert_eq!(result, Number::from_i64(6));
    }

    #[test]
    fn test_self_conversion_is_identity() {
        let values = [
            Number::from_i64(7),
            Number::from_f64(0.1),
            Number::decimal("3.25").unwrap(),
            Number::from_ratio(1, 3).unwrap(),
        ];
        for v in values {
            let result = conv(v.clone(), "fahrenheit", "fahrenheit").unwrap();
            assert_eq!(result.kind(), v.kind());
            assert_eq!(result, v);
        }
    }

    #[test]
    fn test_round_trip_exact() {
        let pairs = [("mile", "kilometer"), ("fahrenheit", "kelvin"), ("acre", "hectare"), ("mile_per_hour", "knot")];
        for (a, b) in pairs {
            let (a, b) = (parse_unit(a).unwrap(), parse_unit(b).unwrap());
            let start = rational::parse_decimal("123.456").unwrap();
            let there = convert_rational(start.clone(), &a, &b).unwrap();
            assert_eq!(convert_rational(there, &b, &a).unwrap(), start);
        }
    }

    #[test]
    fn test_compound_conversion() {
        let result = conv(Number::from_i64(36), "kilometer_per_hour", "meter_per_second").unwrap();
        assert_eq!(result, Number::from_i64(10));
        let result = conv(Number::from_i64(1), "square_foot", "square_inch").unwrap();
        assert_eq!(result, Number::from_i64(144));
    }

    #[test]
    fn test_inverse_conversion() {
        // 100 km at 10 L/100km is 1 liter per 10 km
        let result = conv(Number::from_i64(10), "liter_per_100_kilometer", "kilometer_per_liter").unwrap();
        assert_eq!(result, Number::from_i64(10));
        assert!(matches!(
            conv(Number::from_i64(0), "liter_per_100_kilometer", "mile_per_gallon"),
            Err(UnitError::DivisionByZero)
        ));
    }

    #[test]
    fn test_incompatible() {
        match conv(Number::from_i64(1), "meter", "kilogram") {
            Err(UnitError::IncompatibleUnits { from, to }) => {
                assert_eq!(from, "meter");
                assert_eq!(to, "kilogram");
            }
            other => panic!("expected IncompatibleUnits, got {:?}", other),
        }
    }

    #[test]
    fn test_not_convertible() {
        assert!(matches!(
            conv(Number::from_i64(3), "beaufort", "knot"),
            Err(UnitError::UnitNotConvertible { .. })
        ));
        // a unit is always convertible to itself
        assert!(conv(Number::from_i64(3), "beaufort", "beaufort").is_ok());
    }
}
