//! Pluralization Rules
//!
//! Cardinal plural rules for the built-in locales. Operands follow CLDR:
//! `i` is the integer part and `v` the count of visible fraction digits.

use mensura_core::rational;
use mensura_core::{Number, RBig};
use serde::{Deserialize, Serialize};

use crate::PluralCategory;

/// Named cardinal rule sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PluralRules {
    /// one: i = 1 and v = 0 (English, German, Dutch, ...)
    #[default]
    Germanic,
    /// one: i = 0,1 (French, Portuguese)
    French,
    /// everything is other (Japanese, Chinese, ...)
    Invariant,
}

impl PluralRules {
    pub fn category(&self, value: &Number) -> PluralCategory {
        let exact = match value.to_rational() {
            Ok(r) => r,
            Err(_) => return PluralCategory::Other,
        };
        let magnitude = if exact < RBig::ZERO { -exact } else { exact };
        let integral = rational::is_integral(&magnitude);
        let i = RBig::from(rational::trunc(&magnitude));
        let (zero, one) = (rational::from_i64(0), rational::from_i64(1));

        match self {
            PluralRules::Germanic => {
                if integral && i == one {
                    PluralCategory::One
                } else {
                    PluralCategory::Other
                }
            }
            PluralRules::French => {
                if i == zero || i == one {
                    PluralCategory::One
                } else {
                    PluralCategory::Other
                }
            }
            PluralRules::Invariant => PluralCategory::Other,
        }
    }
}
