//! Decomposer
//!
//! Greedy largest-first breakdown of a quantity over a list of units, such
//! as meters into feet and inches. Every step is exact: integer parts are
//! truncated and the remainder is kept as a rational in the original unit.

use dashu_int::IBig;
use mensura_core::{rational, Number, RBig, Result};

use crate::convert;
use crate::parse::{self, ParsedUnit};
use crate::unit::Unit;

/// Break `unit` down over `targets`, largest unit first.
///
/// Each target but the last receives the truncated integer part of what
/// remains and is dropped when that part is zero. The integer part is
/// converted back into the original unit and subtracted there, so offset
/// and inverse units decompose without drift. The last target receives the
/// exact remainder, also dropped when zero. An empty target list returns
/// the unit unchanged.
pub fn decompose(unit: &Unit, targets: &[&str]) -> Result<Vec<Unit>> {
    if targets.is_empty() {
        return Ok(vec![unit.clone()]);
    }
    let parsed = targets
        .iter()
        .map(|t| parse::parse_unit(t))
        .collect::<Result<Vec<ParsedUnit>>>()?;

    let source = &unit.base_conversion;
    let mut remainder = unit.value.to_rational()?;
    let mut parts = Vec::with_capacity(parsed.len());

    for (i, target) in parsed.iter().enumerate() {
        if remainder == RBig::ZERO {
            break;
        }
        let converted = convert::convert_rational(remainder.clone(), source, target)?;

        if i + 1 == parsed.len() {
            if converted != RBig::ZERO {
                parts.push(part(unit, target, Number::Rational(converted).maybe_integer()));
            }
            break;
        }

        let whole = rational::trunc(&converted);
        if whole == IBig::ZERO {
            continue;
        }
        let spent = convert::convert_rational(RBig::from(whole.clone()), target, source)?;
        parts.push(part(unit, target, Number::Int(whole)));
        remainder = remainder - spent;
    }

    Ok(parts)
}

fn part(original: &Unit, target: &ParsedUnit, value: Number) -> Unit {
    Unit::from_parsed(target.clone(), value)
        .with_usage(original.usage.clone())
        .with_format_options(original.format_options.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mensura_core::RoundingMode;

    fn values(units: &[Unit]) -> Vec<(String, Number)> {
        units.iter().map(|u| (u.name.clone(), u.value.clone())).collect()
    }

    #[test]
    fn test_feet_and_inches() {
        let unit = Unit::new("foot", Number::from_f64(10.3)).unwrap();
        let parts = decompose(&unit, &["foot", "inch"]).unwrap();
        assert_eq!(
            values(&parts),
            vec![
                ("foot".to_string(), Number::from_i64(10)),
                ("inch".to_string(), Number::from_ratio(18, 5).unwrap()),
            ]
        );
    }

    #[test]
    fn test_empty_targets() {
        let unit = Unit::new("meter", Number::from_i64(3)).unwrap();
        assert_eq!(decompose(&unit, &[]).unwrap(), vec![unit]);
    }

    #[test]
    fn test_zero_parts_dropped() {
        let unit = Unit::new("foot", Number::from_i64(12)).unwrap();
        let parts = decompose(&unit, &["foot", "inch"]).unwrap();
        assert_eq!(values(&parts), vec![("foot".to_string(), Number::from_i64(12))]);

        let unit = Unit::new("inch", Number::from_i64(5)).unwrap();
        let parts = decompose(&unit, &["foot", "inch"]).unwrap();
        assert_eq!(values(&parts), vec![("inch".to_string(), Number::from_i64(5))]);
    }

    #[test]
    fn test_three_units() {
        let unit = Unit::new("second", Number::from_i64(3725)).unwrap();
        let parts = decompose(&unit, &["hour", "minute", "second"]).unwrap();
        assert_eq!(
            values(&parts),
            vec![
                ("hour".to_string(), Number::from_i64(1)),
                ("minute".to_string(), Number::from_i64(2)),
                ("second".to_string(), Number::from_i64(5)),
            ]
        );
    }

    #[test]
    fn test_conservation() {
        let unit = Unit::new("meter", Number::decimal("1.8").unwrap()).unwrap();
        let parts = decompose(&unit, &["foot", "inch"]).unwrap();
        let total = parts
            .iter()
            .map(|p| convert::convert_rational(p.value.to_rational().unwrap(), &p.base_conversion, &unit.base_conversion).unwrap())
            .fold(RBig::ZERO, |acc, v| acc + v);
        assert_eq!(total, unit.value.to_rational().unwrap());
        // the rounded display value is 10.9 inches
        let inches = parts[1].value.round(1, RoundingMode::HalfEven).unwrap();
        assert_eq!(inches.to_f64(), 10.9);
    }

    #[test]
    fn test_offset_unit_remainder_stays_in_original_unit() {
        // 37.5 °C is 99.5 °F; 99 °F is 335/9 °C, leaving 5/18 °C
        let unit = Unit::new("celsius", Number::decimal("37.5").unwrap()).unwrap();
        let parts = decompose(&unit, &["fahrenheit", "celsius"]).unwrap();
        assert_eq!(
            values(&parts),
            vec![
                ("fahrenheit".to_string(), Number::from_i64(99)),
                ("celsius".to_string(), Number::from_ratio(5, 18).unwrap()),
            ]
        );
    }

    #[test]
    fn test_inverse_unit_conserves_value() {
        let unit = Unit::new("liter_per_100_kilometer", Number::from_i64(5)).unwrap();
        let parts = decompose(&unit, &["mile_per_gallon", "liter_per_100_kilometer"]).unwrap();
        assert_eq!(parts[0].name, "mile_per_gallon");
        assert_eq!(parts[0].value, Number::from_i64(47));
        let spent = convert::convert_rational(
            parts[0].value.to_rational().unwrap(),
            &parts[0].base_conversion,
            &unit.base_conversion,
        )
        .unwrap();
        assert_eq!(spent + parts[1].value.to_rational().unwrap(), rational::from_i64(5));
    }

    #[test]
    fn test_carries_format_options() {
        let unit = Unit::new("meter", Number::from_i64(2))
            .unwrap()
            .with_usage("person_height")
            .with_format_options(vec!["precision-increment/1".into()]);
        let parts = decompose(&unit, &["foot", "inch"]).unwrap();
        assert!(parts.iter().all(|p| p.usage == "person_height"));
        assert_eq!(parts[0].format_options, vec!["precision-increment/1"]);
    }

    #[test]
    fn test_incompatible_target() {
        let unit = Unit::new("meter", Number::from_i64(2)).unwrap();
        assert!(decompose(&unit, &["foot", "second"]).is_err());
    }
}
