//! Pattern selection
//!
//! Finds the template for a unit name, case and plural category across a
//! locale's style tables, applying the fallback order: integer pattern,
//! requested case and plural, nominative, `other`, then both defaults.

use mensura_core::{Number, Result, UnitError};
use mensura_locale::{Gender, GrammaticalCase, PatternTable, PluralCategory, Template, UnitPatterns};
use tracing::warn;

/// The pattern tables of one locale and style, most specific style first
pub struct Patterns<'a> {
    pub tables: Vec<&'a PatternTable>,
    pub default_gender: Gender,
}

/// What the value being formatted contributes to selection
#[derive(Debug, Clone, Copy)]
pub struct ValueContext<'a> {
    pub value: &'a Number,
    /// True for the node that receives the number; compound operands and
    /// compound keys only contribute their text
    pub head: bool,
}

impl<'a> Patterns<'a> {
    pub fn new(tables: Vec<&'a PatternTable>, default_gender: Gender) -> Self {
        Patterns { tables, default_gender }
    }

    /// True when any style table has patterns for `name`
    pub fn contains(&self, name: &str) -> bool {
        self.tables.iter().any(|t| t.contains_key(name))
    }

    pub fn entry(&self, name: &str) -> Option<&'a UnitPatterns> {
        self.tables.iter().find_map(|t| t.get(name))
    }

    /// Template for `name` (a unit or a compound key such as "per")
    pub fn select(
        &self,
        name: &str,
        case: GrammaticalCase,
        plural: PluralCategory,
        context: ValueContext<'_>,
    ) -> Result<Template> {
        for table in &self.tables {
            let Some(patterns) = table.get(name) else {
                continue;
            };
            if let Some(template) = select_in(patterns, case, plural, context) {
                return Ok(template.clone());
            }
        }

        let gender = self.entry(name).and_then(|p| p.gender).unwrap_or(self.default_gender);
        warn!(unit = name, case = %case, plural = %plural, "no pattern");
        Err(UnitError::NoPattern {
            unit: name.to_string(),
            case: case.to_string(),
            gender: gender.to_string(),
            plural: plural.to_string(),
        })
    }

    /// Pattern for `name` as the denominator of a "per" compound
    pub fn per_unit(&self, name: &str) -> Option<&'a Template> {
        self.tables.iter().find_map(|t| t.get(name).and_then(|p| p.per_unit.as_ref()))
    }
}

fn select_in<'p>(
    patterns: &'p UnitPatterns,
    case: GrammaticalCase,
    plural: PluralCategory,
    context: ValueContext<'_>,
) -> Option<&'p Template> {
    if context.head && is_whole(context.value) {
        if let Some(template) = patterns.integer(case).or_else(|| patterns.integer(GrammaticalCase::Nominative)) {
            return Some(template);
        }
    }

    let nominative = GrammaticalCase::Nominative;
    let other = PluralCategory::Other;
    let candidates = [(case, plural), (nominative, plural), (case, other), (nominative, other)];

    candidates.iter().find_map(|&(c, p)| {
        let template = patterns.get(c, p)?;
        usable(template, p, context).then_some(template)
    })
}

/// A pattern without a number placeholder ("one day" as "a day") stands for
/// an exact count and only fits a value equal to that count
fn usable(template: &Template, plural: PluralCategory, context: ValueContext<'_>) -> bool {
    if template.has_placeholder() || !context.head {
        return true;
    }
    match plural.exact_count() {
        Some(count) => context.value.to_i64() == Some(count) && context.value.is_integer(),
        None => false,
    }
}

fn is_whole(value: &Number) -> bool {
    value.is_integer() && !value.is_negative()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn table(json: &str) -> PatternTable {
        serde_json::from_str(json).unwrap()
    }

    fn head(value: &Number) -> ValueContext<'_> {
        ValueContext { value, head: true }
    }

    const DAY: &str = r#"{
        "day": {
            "patterns": {
                "nominative": {"one": "a day", "other": "{0} days"},
                "dative": {"other": "{0} Tagen"}
            },
            "integer": {"accusative": "{0} whole days"}
        }
    }"#;

    #[test]
    fn test_requested_form() {
        let t = table(DAY);
        let patterns = Patterns::new(vec![&t], Gender::Neuter);
        let five = Number::from_i64(5);
        let template = patterns
            .select("day", GrammaticalCase::Dative, PluralCategory::Other, head(&five))
            .unwrap();
        assert_eq!(template.to_string(), "{0} Tagen");
    }

    #[test]
    fn test_case_falls_back_to_nominative() {
        let t = table(DAY);
        let patterns = Patterns::new(vec![&t], Gender::Neuter);
        let five = Number::from_f64(5.5);
        let template = patterns
            .select("day", GrammaticalCase::Genitive, PluralCategory::Other, head(&five))
            .unwrap();
        assert_eq!(template.to_string(), "{0} days");
    }

    #[test]
    fn test_integer_pattern_preferred() {
        let t = table(DAY);
        let patterns = Patterns::new(vec![&t], Gender::Neuter);
        let three = Number::from_i64(3);
        let template = patterns
            .select("day", GrammaticalCase::Accusative, PluralCategory::Other, head(&three))
            .unwrap();
        assert_eq!(template.to_string(), "{0} whole days");
        // not for fractions
        let half = Number::from_ratio(1, 2).unwrap();
        let template = patterns
            .select("day", GrammaticalCase::Accusative, PluralCategory::Other, head(&half))
            .unwrap();
        assert_eq!(template.to_string(), "{0} days");
    }

    #[test]
    fn test_placeholder_free_pattern_needs_exact_count() {
        let t = table(DAY);
        let patterns = Patterns::new(vec![&t], Gender::Neuter);
        let one = Number::from_i64(1);
        let template = patterns
            .select("day", GrammaticalCase::Nominative, PluralCategory::One, head(&one))
            .unwrap();
        assert_eq!(template.to_string(), "a day");

        // a value that is not the count 1 never takes "a day"
        let decimal = Number::decimal("1.5").unwrap();
        let template = patterns
            .select("day", GrammaticalCase::Nominative, PluralCategory::One, head(&decimal))
            .unwrap();
        assert_eq!(template.to_string(), "{0} days");
    }

    #[test]
    fn test_style_fallback_table() {
        let narrow = table(r#"{"meter": {"patterns": {"nominative": {"other": "{0}m"}}}}"#);
        let long = table(r#"{"hour": {"patterns": {"nominative": {"other": "{0} hours"}}}}"#);
        let patterns = Patterns::new(vec![&narrow, &long], Gender::Neuter);
        let n = Number::from_i64(2);
        assert!(patterns.contains("hour"));
        assert_eq!(
            patterns
                .select("hour", GrammaticalCase::Nominative, PluralCategory::Other, head(&n))
                .unwrap()
                .to_string(),
            "{0} hours"
        );
    }

    #[test]
    fn test_no_pattern_reports_context() {
        let mut t = PatternTable::new();
        t.insert(
            "furlong".to_string(),
            UnitPatterns { gender: Some(Gender::Masculine), patterns: BTreeMap::new(), ..Default::default() },
        );
        let patterns = Patterns::new(vec![&t], Gender::Neuter);
        let n = Number::from_i64(2);
        match patterns.select("furlong", GrammaticalCase::Dative, PluralCategory::Few, head(&n)) {
            Err(UnitError::NoPattern { unit, case, gender, plural }) => {
                assert_eq!(unit, "furlong");
                assert_eq!(case, "dative");
                assert_eq!(gender, "masculine");
                assert_eq!(plural, "few");
            }
            other => panic!("expected NoPattern, got {:?}", other),
        }
    }
}
