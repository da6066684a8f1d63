//! SI, binary and power prefixes
//!
//! Pure data. SI scales run from 10^-30 to 10^30, binary scales from 1024^1
//! to 1024^8. The rank orders prefixes from largest to smallest scale and
//! is the secondary key when sorting parsed tokens.

use mensura_core::{rational, RBig};
use dashu_int::IBig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixKind {
    Si,
    Binary,
}

/// A scaling prefix such as "kilo" or "kibi"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prefix {
    pub name: &'static str,
    pub kind: PrefixKind,
    /// Power of 10 (SI) or of 1024 (binary)
    pub exponent: i32,
}

impl Prefix {
    /// Exact multiplier
    pub fn scale(&self) -> RBig {
        match self.kind {
            PrefixKind::Si => {
                let magnitude = rational::pow10(self.exponent.unsigned_abs() as usize);
                if self.exponent >= 0 {
                    RBig::from(magnitude)
                } else {
                    rational::ratio(IBig::ONE, magnitude)
                }
            }
            PrefixKind::Binary => {
                let mut value = IBig::ONE;
                for _ in 0..self.exponent {
                    value = value * IBig::from(1024u16);
                }
                RBig::from(value)
            }
        }
    }

    /// Larger scales sort first, so the rank is larger for larger scales.
    /// Binary prefixes rank by their decimal magnitude.
    pub fn rank(&self) -> i32 {
        match self.kind {
            PrefixKind::Si => self.exponent,
            PrefixKind::Binary => self.exponent * 3,
        }
    }
}

pub const SI_PREFIXES: &[Prefix] = &[
    Prefix { name: "quetta", kind: PrefixKind::Si, exponent: 30 },
    Prefix { name: "ronna", kind: PrefixKind::Si, exponent: 27 },
    Prefix { name: "yotta", kind: PrefixKind::Si, exponent: 24 },
    Prefix { name: "zetta", kind: PrefixKind::Si, exponent: 21 },
    Prefix { name: "exa", kind: PrefixKind::Si, exponent: 18 },
    Prefix { name: "peta", kind: PrefixKind::Si, exponent: 15 },
    Prefix { name: "tera", kind: PrefixKind::Si, exponent: 12 },
    Prefix { name: "giga", kind: PrefixKind::Si, exponent: 9 },
    Prefix { name: "mega", kind: PrefixKind::Si, exponent: 6 },
    Prefix { name: "kilo", kind: PrefixKind::Si, exponent: 3 },
    Prefix { name: "hecto", kind: PrefixKind::Si, exponent: 2 },
    Prefix { name: "deka", kind: PrefixKind::Si, exponent: 1 },
    Prefix { name: "deci", kind: PrefixKind::Si, exponent: -1 },
    Prefix { name: "centi", kind: PrefixKind::Si, exponent: -2 },
    Prefix { name: "milli", kind: PrefixKind::Si, exponent: -3 },
    Prefix { name: "micro", kind: PrefixKind::Si, exponent: -6 },
    Prefix { name: "nano", kind: PrefixKind::Si, exponent: -9 },
    Prefix { name: "pico", kind: PrefixKind::Si, exponent: -12 },
    Prefix { name: "femto", kind: PrefixKind::Si, exponent: -15 },
    Prefix { name: "atto", kind: PrefixKind::Si, exponent: -18 },
    Prefix { name: "zepto", kind: PrefixKind::Si, exponent: -21 },
    Prefix { name: "yocto", kind: PrefixKind::Si, exponent: -24 },
    Prefix { name: "ronto", kind: PrefixKind::Si, exponent: -27 },
    Prefix { name: "quecto", kind: PrefixKind::Si, exponent: -30 },
];

pub const BINARY_PREFIXES: &[Prefix] = &[
    Prefix { name: "kibi", kind: PrefixKind::Binary, exponent: 1 },
    Prefix { name: "mebi", kind: PrefixKind::Binary, exponent: 2 },
    Prefix { name: "gibi", kind: PrefixKind::Binary, exponent: 3 },
    Prefix { name: "tebi", kind: PrefixKind::Binary, exponent: 4 },
    Prefix { name: "pebi", kind: PrefixKind::Binary, exponent: 5 },
    Prefix { name: "exbi", kind: PrefixKind::Binary, exponent: 6 },
    Prefix { name: "zebi", kind: PrefixKind::Binary, exponent: 7 },
    Prefix { name: "yobi", kind: PrefixKind::Binary, exponent: 8 },
];

/// All scaling prefixes
pub fn prefixes() -> impl Iterator<Item = &'static Prefix> {
    SI_PREFIXES.iter().chain(BINARY_PREFIXES.iter())
}

pub fn prefix(name: &str) -> Option<&'static Prefix> {
    prefixes().find(|p| p.name == name)
}

/// Power prefixes: marker word and exponent
pub const POWER_PREFIXES: &[(&str, u32)] = &[("square", 2), ("cubic", 3)];

/// Alternative spellings of power markers accepted on input
pub const POWER_ALIASES: &[(&str, &str)] = &[("pow2", "square"), ("pow3", "cubic")];

pub fn power_name(exponent: u32) -> Option<&'static str> {
    POWER_PREFIXES.iter().find(|(_, e)| *e == exponent).map(|(name, _)| *name)
}

pub fn power_exponent(marker: &str) -> Option<u32> {
    let marker = POWER_ALIASES
        .iter()
        .find(|(alias, _)| *alias == marker)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(marker);
    POWER_PREFIXES.iter().find(|(name, _)| *name == marker).map(|(_, e)| *e)
}

/// Split a leading scaling prefix off a unit name when what remains is
/// accepted by `is_unit`. Returns the prefix and the remainder.
pub fn split_prefix<'a>(name: &'a str, is_unit: impl Fn(&str) -> bool) -> Option<(&'static Prefix, &'a str)> {
    prefixes()
        .filter_map(|p| name.strip_prefix(p.name).map(|rest| (p, rest)))
        .find(|(_, rest)| !rest.is_empty() && is_unit(rest))
}
