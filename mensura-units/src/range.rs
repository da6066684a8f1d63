//! Unit ranges such as "3–5 kilometers"

use std::cmp::Ordering;

use mensura_core::{Result, UnitError};
use serde::{Deserialize, Serialize};

use crate::math;
use crate::unit::Unit;

/// An inclusive range of two quantities of the same dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitRange {
    pub first: Unit,
    pub last: Unit,
}

impl UnitRange {
    /// Validate that `last` converts into `first`'s unit and is not smaller
    pub fn new(first: Unit, last: Unit) -> Result<Self> {
        let invalid = |reason: String| UnitError::InvalidRange {
            first: first.to_string(),
            last: last.to_string(),
            reason,
        };

        if !first.is_compatible(&last) {
            return Err(invalid(format!("{} is not convertible to {}", last.name, first.name)));
        }
        let last_converted = last.convert_parsed(&first.base_conversion).map_err(|e| invalid(e.to_string()))?;
        if first.value.compare(&last_converted.value)? == Ordering::Greater {
            return Err(invalid("last is less than first".to_string()));
        }
        Ok(UnitRange { first, last })
    }

    /// Both ends expressed in `first`'s unit
    pub fn normalized(&self) -> Result<(Unit, Unit)> {
        let last = self.last.convert_parsed(&self.first.base_conversion)?;
        Ok((self.first.clone(), last))
    }

    /// `last - first`, in `first`'s unit
    pub fn span(&self) -> Result<Unit> {
        math::sub(&self.last.convert_parsed(&self.first.base_conversion)?, &self.first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mensura_core::Number;

    fn unit(name: &str, value: i64) -> Unit {
        Unit::new(name, Number::from_i64(value)).unwrap()
    }

    #[test]
    fn test_valid_range() {
        let range = UnitRange::new(unit("kilometer", 3), unit("kilometer", 5)).unwrap();
        assert_eq!(range.span().unwrap(), unit("kilometer", 2));
        assert!(UnitRange::new(unit("foot", 3), unit("yard", 1)).is_ok());
    }

    #[test]
    fn test_mixed_units_normalize() {
        let range = UnitRange::new(unit("foot", 1), unit("yard", 2)).unwrap();
        let (_, last) = range.normalized().unwrap();
        assert_eq!(last, unit("foot", 6));
    }

    #[test]
    fn test_reversed_range() {
        match UnitRange::new(unit("meter", 5), unit("meter", 3)) {
            Err(UnitError::InvalidRange { first, last, reason }) => {
                assert_eq!(first, "5 meter");
                assert_eq!(last, "3 meter");
                assert!(reason.contains("less"));
            }
            other => panic!("expected InvalidRange, got {:?}", other),
        }
    }

    #[test]
    fn test_incompatible_range() {
        assert!(matches!(
            UnitRange::new(unit("meter", 1), unit("second", 3)),
            Err(UnitError::InvalidRange { .. })
        ));
    }
}
