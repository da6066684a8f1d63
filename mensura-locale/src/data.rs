//! Locale data shapes: pattern tables, list and range patterns, number
//! symbols. These are what the locale data pipeline hands to the formatter.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::{Gender, GrammaticalCase, GrammaticalFeatures, PluralCategory, PluralRules, Style, Template};

/// Patterns for one unit name or compound key ("times", "per", "kilo", "square")
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UnitPatterns {
    /// Grammatical gender of the unit, when the locale marks it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,

    /// Pattern used when this unit is the denominator of a "per" compound,
    /// e.g. "{0}/h"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_unit: Option<Template>,

    /// case -> plural category -> template
    #[serde(default)]
    pub patterns: BTreeMap<GrammaticalCase, BTreeMap<PluralCategory, Template>>,

    /// Integer-specific patterns, by case
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub integer: BTreeMap<GrammaticalCase, Template>,
}

impl UnitPatterns {
    pub fn get(&self, case: GrammaticalCase, plural: PluralCategory) -> Option<&Template> {
        self.patterns.get(&case).and_then(|forms| forms.get(&plural))
    }

    pub fn integer(&self, case: GrammaticalCase) -> Option<&Template> {
        self.integer.get(&case)
    }
}

/// Unit name (or compound key) -> patterns
pub type PatternTable = HashMap<String, UnitPatterns>;

/// Decimal and grouping symbols
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberSymbols {
    pub decimal: String,
    pub group: String,
    #[serde(default = "default_minus")]
    pub minus: String,
}

fn default_minus() -> String {
    "-".to_string()
}

impl Default for NumberSymbols {
    fn default() -> Self {
        Self {
            decimal: ".".to_string(),
            group: ",".to_string(),
            minus: default_minus(),
        }
    }
}

/// CLDR list patterns for joining unit strings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListPatterns {
    pub two: Template,
    pub start: Template,
    pub middle: Template,
    pub end: Template,
}

/// Everything known about one locale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocaleBundle {
    pub locale: String,
    #[serde(default)]
    pub default_gender: Gender,
    #[serde(default)]
    pub plural_rules: PluralRules,
    #[serde(default)]
    pub grammatical_features: GrammaticalFeatures,
    #[serde(default)]
    pub number_symbols: NumberSymbols,
    pub range_pattern: Template,
    pub list_patterns: BTreeMap<Style, ListPatterns>,
    pub styles: BTreeMap<Style, PatternTable>,
}
