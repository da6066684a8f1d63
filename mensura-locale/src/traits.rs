//! Collaborator traits
//!
//! Locale data, number formatting, list joining, territory containment and
//! currency metadata are supplied from outside the unit engine. Each one is
//! a narrow trait so callers can plug in a full CLDR backend; the built-in
//! implementations live in `builtin`.

use mensura_core::{rational, Number, RBig, RoundingMode, UnitError};
use serde::{Deserialize, Serialize};

use crate::{Gender, GrammaticalFeatures, LocaleBundle, PatternTable, PluralCategory, Style, Template};

/// Locale pattern tables and grammatical features
pub trait LocaleData: Send + Sync {
    /// The full bundle for a locale
    fn bundle(&self, locale: &str) -> Result<&LocaleBundle, UnitError>;

    /// Pattern tables for a style and its fallbacks, most specific first.
    /// Each maps unit name (or compound key) -> case -> plural -> template.
    fn pattern_tables(&self, locale: &str, style: Style) -> Result<Vec<&PatternTable>, UnitError> {
        let bundle = self.bundle(locale)?;
        let tables: Vec<&PatternTable> = style
            .fallback_chain()
            .iter()
            .filter_map(|s| bundle.styles.get(s))
            .collect();
        if tables.is_empty() {
            return Err(UnitError::UnknownLocale(format!("{} ({:?})", locale, style)));
        }
        Ok(tables)
    }

    fn grammatical_features(&self, locale: &str) -> Result<&GrammaticalFeatures, UnitError> {
        Ok(&self.bundle(locale)?.grammatical_features)
    }

    fn default_gender(&self, locale: &str) -> Result<Gender, UnitError> {
        Ok(self.bundle(locale)?.default_gender)
    }

    fn plural_category(&self, locale: &str, value: &Number) -> Result<PluralCategory, UnitError> {
        Ok(self.bundle(locale)?.plural_rules.category(value))
    }

    fn range_pattern(&self, locale: &str) -> Result<&Template, UnitError> {
        Ok(&self.bundle(locale)?.range_pattern)
    }

    /// Locales this provider knows
    fn locales(&self) -> Vec<String>;
}

/// Options for rendering a plain numeral
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberOptions {
    pub min_fraction_digits: u32,
    pub max_fraction_digits: u32,
    pub grouping: bool,
    pub rounding_mode: RoundingMode,
    /// Round to a multiple of this many units, e.g. 50
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rounding_increment: Option<u32>,
}

impl Default for NumberOptions {
    fn default() -> Self {
        Self {
            min_fraction_digits: 0,
            max_fraction_digits: 3,
            grouping: true,
            rounding_mode: RoundingMode::HalfEven,
            rounding_increment: None,
        }
    }
}

impl NumberOptions {
    /// Exact value after the rounding these options apply: to a multiple of
    /// `rounding_increment` when set, otherwise to `max_fraction_digits`
    pub fn round(&self, value: &Number) -> Result<RBig, UnitError> {
        let exact = value.to_rational()?;
        Ok(match self.rounding_increment {
            Some(increment) if increment > 0 => {
                let step = rational::from_i64(i64::from(increment));
                let steps = rational::round_integer(&(exact / step.clone()), self.rounding_mode);
                RBig::from(steps) * step
            }
            _ => rational::round_to(&exact, self.max_fraction_digits, self.rounding_mode),
        })
    }

    /// The value as it will be displayed, integral results as integers
    pub fn displayed(&self, value: &Number) -> Result<Number, UnitError> {
        Ok(Number::Rational(self.round(value)?).maybe_integer())
    }
}

/// Locale-aware decimal formatting of a plain numeral
pub trait NumberFormatter: Send + Sync {
    fn format_number(&self, value: &Number, locale: &str, options: &NumberOptions) -> Result<String, UnitError>;
}

/// Locale-aware joining of already formatted unit strings
pub trait ListFormatter: Send + Sync {
    fn format_list(&self, items: &[String], locale: &str, style: Style) -> Result<String, UnitError>;
}

/// Territory containment, most specific first, ending at "001" (world)
pub trait TerritoryContainment: Send + Sync {
    fn containment_chain(&self, territory: &str) -> Vec<String>;
}

/// Display data for a currency used as a unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyMetadata {
    pub code: String,
    pub symbol: String,
    /// plural category -> display name, e.g. one -> "US dollar"
    pub count_names: std::collections::BTreeMap<PluralCategory, String>,
}

impl CurrencyMetadata {
    pub fn display_name(&self, plural: PluralCategory) -> Option<&str> {
        self.count_names
            .get(&plural)
            .or_else(|| self.count_names.get(&PluralCategory::Other))
            .map(|s| s.as_str())
    }
}

pub trait CurrencyData: Send + Sync {
    fn currency(&self, code: &str, locale: &str) -> Option<CurrencyMetadata>;
    fn is_currency(&self, code: &str) -> bool;
}
