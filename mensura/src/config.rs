//! Service configuration
//!
//! Defaults, JSON loading and environment overrides for `Mensura`.

use std::env;

use mensura_core::{Result, UnitError};
use mensura_locale::Style;
use mensura_units::math::COMPARE_PRECISION;
use mensura_units::preference::PREFERENCE_PRECISION;
use mensura_units::DEFAULT_USAGE;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const ENV_LOCALE: &str = "MENSURA_LOCALE";
pub const ENV_STYLE: &str = "MENSURA_STYLE";
pub const ENV_MAX_FRACTION_DIGITS: &str = "MENSURA_MAX_FRACTION_DIGITS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub default_locale: String,
    pub default_style: Style,
    pub default_usage: String,
    /// Decimal places both sides are rounded to before comparing
    pub compare_precision: u32,
    /// Decimal places a value is rounded to before preference thresholds
    pub preference_precision: u32,
    pub max_fraction_digits: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_locale: "en".to_string(),
            default_style: Style::Long,
            default_usage: DEFAULT_USAGE.to_string(),
            compare_precision: COMPARE_PRECISION,
            preference_precision: PREFERENCE_PRECISION,
            max_fraction_digits: 3,
        }
    }
}

impl Config {
    /// Defaults overlaid with `MENSURA_*` environment variables
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| env::var(key).ok())
    }

    /// Parse a JSON config body; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| UnitError::ParseError(format!("invalid config: {}", e)))
    }

    /// Apply overrides from a key lookup. Unparsable values are logged and
    /// ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(locale) = lookup(ENV_LOCALE).filter(|l| !l.trim().is_empty()) {
            self.default_locale = locale.trim().to_string();
        }
        if let Some(style) = lookup(ENV_STYLE) {
            match Style::from_name(&style) {
                Some(style) => self.default_style = style,
                None => warn!(key = ENV_STYLE, value = %style, "ignoring unknown style"),
            }
        }
        if let Some(digits) = lookup(ENV_MAX_FRACTION_DIGITS) {
            match digits.trim().parse() {
                Ok(digits) => self.max_fraction_digits = digits,
                Err(_) => warn!(key = ENV_MAX_FRACTION_DIGITS, value = %digits, "ignoring invalid digit count"),
            }
        }
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.default_locale = locale.into();
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.default_style = style;
        self
    }

    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.default_usage = usage.into();
        self
    }

    pub fn with_compare_precision(mut self, places: u32) -> Self {
        self.compare_precision = places;
        self
    }

    pub fn with_preference_precision(mut self, places: u32) -> Self {
        self.preference_precision = places;
        self
    }

    pub fn with_max_fraction_digits(mut self, digits: u32) -> Self {
        self.max_fraction_digits = digits;
        self
    }
}
