//! Built-in locale provider
//!
//! Ships compiled-in pattern tables for `en`, `de` and `fr` plus simple
//! number and list formatting driven by the same bundles. Each bundle is
//! parsed once on first access and is read-only afterwards.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use mensura_core::{rational, Number, UnitError};
use tracing::{debug, error};

use crate::traits::{ListFormatter, LocaleData, NumberFormatter, NumberOptions};
use crate::{LocaleBundle, Style};

const EN: &str = include_str!("../data/en.json");
const DE: &str = include_str!("../data/de.json");
const FR: &str = include_str!("../data/fr.json");

/// Global built-in locale set
pub static BUILTIN_LOCALES: LazyLock<Arc<BuiltinLocales>> = LazyLock::new(|| Arc::new(BuiltinLocales::load()));

/// Locale bundles keyed by language tag
#[derive(Debug, Clone, Default)]
pub struct BuiltinLocales {
    bundles: HashMap<String, LocaleBundle>,
}

impl BuiltinLocales {
    /// Parse the compiled-in bundles. Prefer the shared `BUILTIN_LOCALES`.
    pub fn load() -> Self {
        let mut locales = BuiltinLocales::default();
        for source in [EN, DE, FR] {
            match serde_json::from_str::<LocaleBundle>(source) {
                Ok(bundle) => locales.insert(bundle),
                Err(e) => error!("failed to load built-in locale data: {}", e),
            }
        }
        debug!(count = locales.bundles.len(), "built-in locales loaded");
        locales
    }

    /// Parse an additional bundle from JSON
    pub fn from_json(json: &str) -> Result<LocaleBundle, UnitError> {
        serde_json::from_str(json).map_err(|e| UnitError::ParseError(format!("locale data: {}", e)))
    }

    /// Add or replace a bundle
    pub fn insert(&mut self, bundle: LocaleBundle) {
        self.bundles.insert(bundle.locale.to_lowercase(), bundle);
    }

    pub fn with_bundle(mut self, bundle: LocaleBundle) -> Self {
        self.insert(bundle);
        self
    }

    /// Resolve a requested tag such as "en-US" or "de_CH" to a loaded bundle,
    /// trying the full tag first and then the bare language.
    pub fn resolve(&self, locale: &str) -> Option<&LocaleBundle> {
        let tag = locale.trim().replace('_', "-").to_lowercase();
        if let Some(bundle) = self.bundles.get(&tag) {
            return Some(bundle);
        }
        let language = tag.split('-').next().unwrap_or_default();
        self.bundles.get(language)
    }
}

impl LocaleData for BuiltinLocales {
    fn bundle(&self, locale: &str) -> Result<&LocaleBundle, UnitError> {
        self.resolve(locale).ok_or_else(|| UnitError::UnknownLocale(locale.to_string()))
    }

    fn locales(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.bundles.keys().cloned().collect();
        tags.sort();
        tags
    }
}

// ========== Number formatting ==========

impl NumberFormatter for BuiltinLocales {
    fn format_number(&self, value: &Number, locale: &str, options: &NumberOptions) -> Result<String, UnitError> {
        let symbols = &self.bundle(locale)?.number_symbols;
        let rounded = options.round(value)?;
        let places = match options.rounding_increment {
            Some(increment) if increment > 0 => 0,
            _ => options.max_fraction_digits,
        };

        let fixed = rational::format_fixed(&rounded, places, options.rounding_mode);
        let (negative, digits) = match fixed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, fixed.as_str()),
        };
        let (integer, fraction) = match digits.split_once('.') {
            Some((i, f)) => (i, f),
            None => (digits, ""),
        };

        let min = options.min_fraction_digits.min(options.max_fraction_digits) as usize;
        let mut fraction = fraction.trim_end_matches('0').to_string();
        while fraction.len() < min {
            fraction.push('0');
        }

        let mut out = String::new();
        if negative {
            out.push_str(&symbols.minus);
        }
        if options.grouping {
            out.push_str(&group_digits(integer, &symbols.group));
        } else {
            out.push_str(integer);
        }
        if !fraction.is_empty() {
            out.push_str(&symbols.decimal);
            out.push_str(&fraction);
        }
        Ok(out)
    }
}

/// Insert a group separator every three digits from the right
fn group_digits(integer: &str, separator: &str) -> String {
    let len = integer.len();
    if len <= 3 {
        return integer.to_string();
    }
    let mut out = String::with_capacity(len + len / 3 * separator.len());
    for (i, c) in integer.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(c);
    }
    out
}

// ========== List formatting ==========

impl ListFormatter for BuiltinLocales {
    fn format_list(&self, items: &[String], locale: &str, style: Style) -> Result<String, UnitError> {
        let bundle = self.bundle(locale)?;
        let patterns = style
            .fallback_chain()
            .iter()
            .find_map(|s| bundle.list_patterns.get(s))
            .ok_or_else(|| UnitError::UnknownLocale(format!("{} (list patterns)", locale)))?;

        let joined = match items {
            [] => String::new(),
            [only] => only.clone(),
            [first, second] => patterns.two.substitute(&[first.as_str(), second.as_str()]),
            [first, middle @ .., last] => {
                let mut tail = match middle.split_last() {
                    Some((penultimate, _)) => patterns.end.substitute(&[penultimate.as_str(), last.as_str()]),
                    None => last.clone(),
                };
                if let Some((_, inner)) = middle.split_last() {
                    for item in inner.iter().rev() {
                        tail = patterns.middle.substitute(&[item.as_str(), tail.as_str()]);
                    }
                }
                patterns.start.substitute(&[first.as_str(), tail.as_str()])
            }
        };
        Ok(joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GrammaticalCase, PluralCategory};

    #[test]
    fn test_builtin_locales_load() {
        let locales = BUILTIN_LOCALES.locales();
        assert_eq!(locales, vec!["de", "en", "fr"]);
    }

    #[test]
    fn test_resolve_region_tag() {
        assert_eq!(BUILTIN_LOCALES.bundle("en-US").unwrap().locale, "en");
        assert_eq!(BUILTIN_LOCALES.bundle("de_CH").unwrap().locale, "de");
        assert!(matches!(BUILTIN_LOCALES.bundle("xx"), Err(UnitError::UnknownLocale(_))));
    }

    #[test]
    fn test_pattern_tables_fall_back_by_style() {
        let tables = BUILTIN_LOCALES.pattern_tables("de", Style::Narrow).unwrap();
        // German ships no narrow table, so short then long
        assert_eq!(tables.len(), 2);
        let hour = tables[1].get("hour").unwrap();
        assert_eq!(
            hour.get(GrammaticalCase::Nominative, PluralCategory::Other).unwrap().to_string(),
            "{0} Stunden"
        );
    }

    #[test]
    fn test_format_number_grouping() {
        let options = NumberOptions::default();
        let n = Number::from_i64(1234567);
        assert_eq!(BUILTIN_LOCALES.format_number(&n, "en", &options).unwrap(), "1,234,567");
        assert_eq!(BUILTIN_LOCALES.format_number(&n, "de", &options).unwrap(), "1.234.567");
    }

    #[test]
    fn test_format_number_fraction_digits() {
        let options = NumberOptions::default();
        let n = Number::from_f64(3.14159);
        assert_eq!(BUILTIN_LOCALES.format_number(&n, "en", &options).unwrap(), "3.142");
        assert_eq!(BUILTIN_LOCALES.format_number(&n, "fr", &options).unwrap(), "3,142");

        let n = Number::from_f64(2.5);
        let options = NumberOptions { min_fraction_digits: 2, ..NumberOptions::default() };
        assert_eq!(BUILTIN_LOCALES.format_number(&n, "en", &options).unwrap(), "2.50");
    }

    #[test]
    fn test_format_number_negative_and_rational() {
        let options = NumberOptions::default();
        let n = Number::from_ratio(-10, 3).unwrap();
        assert_eq!(BUILTIN_LOCALES.format_number(&n, "en", &options).unwrap(), "-3.333");
    }

    #[test]
    fn test_format_number_rounding_increment() {
        let options = NumberOptions { rounding_increment: Some(50), ..NumberOptions::default() };
        let n = Number::from_i64(1234);
        assert_eq!(BUILTIN_LOCALES.format_number(&n, "en", &options).unwrap(), "1,250");
    }

    #[test]
    fn test_displayed_value() {
        let whole = NumberOptions { max_fraction_digits: 0, ..NumberOptions::default() };
        assert_eq!(whole.displayed(&Number::from_f64(0.99)).unwrap(), Number::from_i64(1));

        let stepped = NumberOptions { rounding_increment: Some(50), ..NumberOptions::default() };
        assert_eq!(stepped.displayed(&Number::from_i64(1234)).unwrap(), Number::from_i64(1250));

        let kept = NumberOptions::default().displayed(&Number::from_f64(1.5)).unwrap();
        assert_eq!(kept, Number::from_ratio(3, 2).unwrap());
    }

    #[test]
    fn test_format_list() {
        let items: Vec<String> = ["1 foot", "2 inches"].iter().map(|s| s.to_string()).collect();
        assert_eq!(BUILTIN_LOCALES.format_list(&items, "en", Style::Long).unwrap(), "1 foot, 2 inches");
        assert_eq!(BUILTIN_LOCALES.format_list(&items, "de", Style::Long).unwrap(), "1 foot und 2 inches");

        let three: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        assert_eq!(BUILTIN_LOCALES.format_list(&three, "fr", Style::Long).unwrap(), "a, b et c");
        assert_eq!(BUILTIN_LOCALES.format_list(&[], "en", Style::Long).unwrap(), "");
    }
}
