//! Base units and dimensional analysis
//!
//! Every convertible unit maps onto a base-unit identity: either one of the
//! atomic base units below or a compound of them such as
//! "kilogram_meter_per_square_second". Identities are reduced through
//! exponent vectors over the atomic base units, indexed by rank.

use std::collections::HashMap;
use std::sync::LazyLock;

use mensura_core::{Result, UnitError};

use crate::prefix;

/// Atomic base units in canonical order. The position is the rank used to
/// order factors in identities and tokens in parsed units.
pub const ATOMIC_BASE_UNITS: &[&str] = &[
    "kilogram", "meter", "second", "ampere", "kelvin", "mole", "candela", "revolution", "bit", "part", "pixel",
    "em", "lux",
];

/// Number of atomic base dimensions
pub const DIMENSIONS: usize = ATOMIC_BASE_UNITS.len();

/// Category base-unit identities and their category names, in rank order
/// after the atomic units
pub const CATEGORIES: &[(&str, &str)] = &[
    ("kilogram", "mass"),
    ("meter", "length"),
    ("second", "duration"),
    ("ampere", "electric-current"),
    ("kelvin", "temperature"),
    ("mole", "substance-amount"),
    ("candela", "luminous-intensity"),
    ("revolution", "angle"),
    ("bit", "digital"),
    ("part", "concentration"),
    ("pixel", "graphics"),
    ("em", "typography"),
    ("lux", "illuminance"),
    ("square_meter", "area"),
    ("cubic_meter", "volume"),
    ("meter_per_second", "speed"),
    ("meter_per_square_second", "acceleration"),
    ("kilogram_meter_per_square_second", "force"),
    ("kilogram_square_meter_per_square_second", "energy"),
    ("kilogram_square_meter_per_cubic_second", "power"),
    ("kilogram_per_meter_square_second", "pressure"),
    ("revolution_per_second", "frequency"),
    ("kilogram_square_meter_per_cubic_second_ampere", "voltage"),
    ("kilogram_square_meter_per_cubic_second_square_ampere", "resistance"),
    ("cubic_meter_per_meter", "consumption"),
    ("meter_per_cubic_meter", "consumption-inverse"),
    ("kilogram_per_cubic_meter", "mass-density"),
    ("mole_per_cubic_meter", "concentration-molar"),
    ("candela_per_square_meter", "luminance"),
    ("pixel_per_meter", "resolution"),
];

/// Exponents of each atomic base unit, indexed by rank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Dimension {
    pub exponents: [i32; DIMENSIONS],
}

impl Dimension {
    pub const NONE: Dimension = Dimension { exponents: [0; DIMENSIONS] };

    /// A single atomic base unit
    pub fn atomic(rank: usize) -> Self {
        let mut d = Dimension::NONE;
        if rank < DIMENSIONS {
            d.exponents[rank] = 1;
        }
        d
    }

    pub fn is_dimensionless(&self) -> bool {
        self.exponents.iter().all(|&e| e == 0)
    }

    /// Multiply dimensions (add exponents)
    pub fn multiply(&self, other: &Dimension) -> Dimension {
        let mut result = [0i32; DIMENSIONS];
        for (i, slot) in result.iter_mut().enumerate() {
            *slot = self.exponents[i] + other.exponents[i];
        }
        Dimension { exponents: result }
    }

    /// Divide dimensions (subtract exponents)
    pub fn divide(&self, other: &Dimension) -> Dimension {
        let mut result = [0i32; DIMENSIONS];
        for (i, slot) in result.iter_mut().enumerate() {
            *slot = self.exponents[i] - other.exponents[i];
        }
        Dimension { exponents: result }
    }

    /// Raise to integer power (multiply exponents)
    pub fn power(&self, exp: i32) -> Dimension {
        let mut result = [0i32; DIMENSIONS];
        for (i, slot) in result.iter_mut().enumerate() {
            *slot = self.exponents[i] * exp;
        }
        Dimension { exponents: result }
    }

    /// Numerator-only view (positive exponents)
    pub fn numerator(&self) -> Dimension {
        let mut d = *self;
        d.exponents.iter_mut().for_each(|e| *e = (*e).max(0));
        d
    }

    /// Denominator view, as positive exponents
    pub fn denominator(&self) -> Dimension {
        let mut d = *self;
        d.exponents.iter_mut().for_each(|e| *e = (-*e).max(0));
        d
    }

    /// Render as an identity string. Exponents above cubic have no textual
    /// form and fail with `PowerTooHigh`.
    pub fn identity(&self) -> Result<String> {
        let numerator = render_factors(&self.numerator())?;
        let denominator = render_factors(&self.denominator())?;
        Ok(match (numerator.is_empty(), denominator.is_empty()) {
            (_, true) => numerator,
            (true, false) => format!("per_{}", denominator),
            (false, false) => format!("{}_per_{}", numerator, denominator),
        })
    }
}

/// Positive exponents as "square_meter_second"
fn render_factors(d: &Dimension) -> Result<String> {
    let mut parts = Vec::new();
    for (rank, &exp) in d.exponents.iter().enumerate() {
        let name = ATOMIC_BASE_UNITS[rank];
        match exp {
            0 => {}
            1 => parts.push(name.to_string()),
            2 | 3 => {
                let marker = prefix::power_name(exp as u32).unwrap_or("square");
                parts.push(format!("{}_{}", marker, name));
            }
            _ => {
                return Err(UnitError::PowerTooHigh {
                    unit: name.to_string(),
                    power: exp.unsigned_abs(),
                })
            }
        }
    }
    Ok(parts.join("_"))
}

/// Identity string -> dimension, for every table entry
static IDENTITY_DIMENSIONS: LazyLock<HashMap<&'static str, Dimension>> = LazyLock::new(|| {
    CATEGORIES
        .iter()
        .filter_map(|(identity, _)| parse_identity(identity).map(|d| (*identity, d)))
        .collect()
});

static CATEGORY_BY_IDENTITY: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| CATEGORIES.iter().copied().collect());

/// Parse an identity string built from atomic base units
pub fn parse_identity(identity: &str) -> Option<Dimension> {
    let (numerator, denominator) = match identity.split_once("_per_") {
        Some((n, d)) => (n, Some(d)),
        None => match identity.strip_prefix("per_") {
            Some(d) => ("", Some(d)),
            None => (identity, None),
        },
    };
    let num = parse_factors(numerator)?;
    match denominator {
        Some(d) => Some(num.divide(&parse_factors(d)?)),
        None => Some(num),
    }
}

fn parse_factors(part: &str) -> Option<Dimension> {
    let mut dim = Dimension::NONE;
    let mut power = 1;
    for word in part.split('_').filter(|w| !w.is_empty()) {
        if let Some(exp) = prefix::power_exponent(word) {
            power = exp as i32;
            continue;
        }
        let rank = atomic_rank(word)?;
        dim.exponents[rank] += power;
        power = 1;
    }
    Some(dim)
}

pub fn atomic_rank(name: &str) -> Option<usize> {
    ATOMIC_BASE_UNITS.iter().position(|u| *u == name)
}

/// Rank of a base-unit identity in the ordered table
pub fn base_rank(identity: &str) -> Option<usize> {
    CATEGORIES.iter().position(|(i, _)| *i == identity)
}

/// Dimension of a known base-unit identity
pub fn dimension_of(identity: &str) -> Result<Dimension> {
    IDENTITY_DIMENSIONS
        .get(identity)
        .copied()
        .ok_or_else(|| UnitError::UnknownBaseUnit {
            unit: identity.to_string(),
            base_unit: identity.to_string(),
        })
}

pub fn is_base_identity(identity: &str) -> bool {
    CATEGORY_BY_IDENTITY.contains_key(identity)
}

/// Category for a base-unit identity, e.g. "length" for "meter"
pub fn category(identity: &str) -> Option<&'static str> {
    CATEGORY_BY_IDENTITY.get(identity).copied()
}

/// Primary base-unit identity for a category name
pub fn category_base(category: &str) -> Option<&'static str> {
    CATEGORIES.iter().find(|(_, c)| *c == category).map(|(i, _)| *i)
}

/// All category names
pub fn categories() -> Vec<&'static str> {
    CATEGORIES.iter().map(|(_, c)| *c).collect()
}
