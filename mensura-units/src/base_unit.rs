//! Base-unit resolution and compatibility
//!
//! A parsed unit reduces to a canonical base-unit identity such as
//! "kilogram_meter_per_square_second". Two units convert into each other
//! when their identities are equal, or equal once one side is inverted.

use mensura_core::{Result, UnitError};
use tracing::trace;

use crate::dimension::{self, Dimension};
use crate::parse::{ParsedUnit, Token};

/// How two compatible units relate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compatibility {
    /// Same base-unit identity
    Direct,
    /// Identities match after swapping numerator and denominator of the source
    Inverse,
}

/// Dimension of one token, including any power marker
pub fn token_dimension(token: &Token) -> Result<Dimension> {
    if token.is_currency() {
        return Err(UnitError::not_convertible(&token.name));
    }
    match token.conversion.base_identity() {
        None => Ok(Dimension::NONE),
        Some(identity) => {
            let dim = dimension::dimension_of(identity).map_err(|_| UnitError::UnknownBaseUnit {
                unit: token.name.clone(),
                base_unit: identity.to_string(),
            })?;
            Ok(dim.power(token.conversion.power() as i32))
        }
    }
}

/// Product of token dimensions
pub fn tokens_dimension(tokens: &[Token]) -> Result<Dimension> {
    tokens
        .iter()
        .try_fold(Dimension::NONE, |acc, t| -> Result<Dimension> { Ok(acc.multiply(&token_dimension(t)?)) })
}

/// Net dimension of a parsed unit
pub fn dimension(parsed: &ParsedUnit) -> Result<Dimension> {
    let numerator = tokens_dimension(parsed.numerator())?;
    let denominator = tokens_dimension(parsed.denominator())?;
    Ok(numerator.divide(&denominator))
}

/// Canonical base-unit identity.
///
/// A quotient whose numerator and denominator identities already spell a
/// known base unit ("cubic_meter_per_meter" for fuel consumption) is kept as
/// written. Otherwise common factors cancel, so "square_meter_per_meter"
/// resolves to "meter".
pub fn canonical_base_unit(parsed: &ParsedUnit) -> Result<String> {
    let identity = match parsed {
        ParsedUnit::Product(tokens) => tokens_dimension(tokens)?.identity()?,
        ParsedUnit::Per { numerator, denominator } => {
            let num = tokens_dimension(numerator)?;
            let den = tokens_dimension(denominator)?;
            match unreduced(&num, &den)? {
                Some(identity) => identity,
                None => num.divide(&den).identity()?,
            }
        }
    };
    trace!(unit = %parsed, base_unit = %identity, "resolved base unit");
    Ok(identity)
}

/// "numerator_per_denominator" when it names a known base unit as written
fn unreduced(num: &Dimension, den: &Dimension) -> Result<Option<String>> {
    if num.is_dimensionless() || den.is_dimensionless() {
        return Ok(None);
    }
    // only plain products on each side can be glued with "_per_"
    if num.denominator() != Dimension::NONE || den.denominator() != Dimension::NONE {
        return Ok(None);
    }
    let candidate = format!("{}_per_{}", num.identity()?, den.identity()?);
    Ok(dimension::is_base_identity(&candidate).then_some(candidate))
}

/// Compatibility of `from` with `to`, trying a single inversion of `from`
pub fn compatibility(from: &ParsedUnit, to: &ParsedUnit) -> Result<Option<Compatibility>> {
    let target = canonical_base_unit(to)?;
    if canonical_base_unit(from)? == target {
        return Ok(Some(Compatibility::Direct));
    }
    if canonical_base_unit(&from.invert())? == target {
        return Ok(Some(Compatibility::Inverse));
    }
    Ok(None)
}

/// True when the two units convert into each other, directly or inverted
pub fn is_compatible(a: &ParsedUnit, b: &ParsedUnit) -> bool {
    matches!(compatibility(a, b), Ok(Some(_)))
}

/// Category name of a unit, e.g. "length"
pub fn category(parsed: &ParsedUnit) -> Result<&'static str> {
    let identity = canonical_base_unit(parsed)?;
    dimension::category(&identity).ok_or(UnitError::UnknownCategory(identity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_unit;

    fn base(name: &str) -> String {
        canonical_base_unit(&parse_unit(name).unwrap()).unwrap()
    }

    #[test]
    fn test_simple_base_units() {
        assert_eq!(base("foot"), "meter");
        assert_eq!(base("kilogram_meter"), "kilogram_meter");
        assert_eq!(base("meter_kilogram"), "kilogram_meter");
        assert_eq!(base("newton"), "kilogram_meter_per_square_second");
        assert_eq!(base("acre"), "square_meter");
    }

    #[test]
    fn test_per_reduction() {
        assert_eq!(base("square_meter_per_meter"), base("meter"));
        assert_eq!(base("kilometer_per_hour"), "meter_per_second");
        assert_eq!(base("meter_per_second_per_second"), "meter_per_square_second");
    }

    #[test]
    fn test_known_compound_not_reduced() {
        assert_eq!(base("liter_per_kilometer"), "cubic_meter_per_meter");
        assert_eq!(base("liter_per_100_kilometer"), "cubic_meter_per_meter");
        assert_eq!(base("mile_per_gallon"), "meter_per_cubic_meter");
    }

    #[test]
    fn test_compatibility() {
        let mph = parse_unit("mile_per_hour").unwrap();
        let mps = parse_unit("meter_per_second").unwrap();
        assert_eq!(compatibility(&mph, &mps).unwrap(), Some(Compatibility::Direct));

        let l100 = parse_unit("liter_per_100_kilometer").unwrap();
        let mpg = parse_unit("mile_per_gallon").unwrap();
        assert_eq!(compatibility(&l100, &mpg).unwrap(), Some(Compatibility::Inverse));

        let kg = parse_unit("kilogram").unwrap();
        assert_eq!(compatibility(&kg, &mps).unwrap(), None);
    }

    #[test]
    fn test_compatibility_symmetric() {
        let pairs = [
            ("foot", "meter"),
            ("liter_per_100_kilometer", "mile_per_gallon"),
            ("kilogram", "second"),
            ("hertz", "per_second"),
        ];
        for (a, b) in pairs {
            let (a, b) = (parse_unit(a).unwrap(), parse_unit(b).unwrap());
            assert_eq!(is_compatible(&a, &b), is_compatible(&b, &a));
        }
    }

    #[test]
    fn test_category() {
        assert_eq!(category(&parse_unit("foot").unwrap()).unwrap(), "length");
        assert_eq!(category(&parse_unit("kilowatt_hour").unwrap()).unwrap(), "energy");
        assert!(matches!(
            category(&parse_unit("kilogram_meter").unwrap()),
            Err(UnitError::UnknownCategory(_))
        ));
    }

    #[test]
    fn test_currency_has_no_base_unit() {
        assert!(matches!(
            canonical_base_unit(&parse_unit("curr_eur").unwrap()),
            Err(UnitError::UnitNotConvertible { .. })
        ));
    }
}
