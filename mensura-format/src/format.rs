//! Localized unit formatting
//!
//! `UnitFormatter` renders a `Unit` as text for a locale: the number goes
//! through the backend's number formatter, the plural category selects the
//! pattern, and compound units are assembled node by node from the grammar
//! tree when the locale has no pattern for the whole name.

use mensura_core::{Number, Result, UnitError};
use mensura_locale::{
    Backend, CompoundKind, GrammaticalCase, GrammaticalFeatures, NumberOptions, PluralCategory, Segment, Style,
    Template,
};
use mensura_units::{Unit, UnitRange};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::grammar::{operand_features, Features, GrammarNode};
use crate::pattern::{Patterns, ValueContext};

const PRECISION_INCREMENT: &str = "precision-increment/";
const FRACTION_DIGITS: &str = "max-fraction/";

// ========== Options ==========

/// Formatting options for one call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatOptions {
    pub style: Style,
    pub case: GrammaticalCase,
    pub number: NumberOptions,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            style: Style::Long,
            case: GrammaticalCase::Nominative,
            number: NumberOptions::default(),
        }
    }
}

impl FormatOptions {
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_case(mut self, case: GrammaticalCase) -> Self {
        self.case = case;
        self
    }

    pub fn with_number(mut self, number: NumberOptions) -> Self {
        self.number = number;
        self
    }

    pub fn with_max_fraction_digits(mut self, digits: u32) -> Self {
        self.number.max_fraction_digits = digits;
        self
    }

    /// Apply number skeleton options carried by a unit, such as
    /// "precision-increment/50" or "max-fraction/1". Unknown options are
    /// ignored.
    pub fn with_skeleton(mut self, options: &[String]) -> Self {
        for option in options {
            if let Some(step) = option.strip_prefix(PRECISION_INCREMENT).and_then(|s| s.parse().ok()) {
                self.number.rounding_increment = Some(step);
            } else if let Some(digits) = option.strip_prefix(FRACTION_DIGITS).and_then(|s| s.parse().ok()) {
                self.number.max_fraction_digits = digits;
            } else {
                debug!(option = %option, "ignoring skeleton option");
            }
        }
        self
    }
}

// ========== Parts ==========

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartKind {
    Number,
    Literal,
}

/// One piece of a formatted unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedPart {
    pub kind: PartKind,
    pub text: String,
}

impl FormattedPart {
    fn literal(text: impl Into<String>) -> Self {
        FormattedPart { kind: PartKind::Literal, text: text.into() }
    }

    fn number(text: impl Into<String>) -> Self {
        FormattedPart { kind: PartKind::Number, text: text.into() }
    }
}

// ========== Formatter ==========

/// Formats units against one backend
#[derive(Debug, Clone, Copy)]
pub struct UnitFormatter<'b> {
    backend: &'b Backend,
}

impl<'b> UnitFormatter<'b> {
    pub fn new(backend: &'b Backend) -> Self {
        UnitFormatter { backend }
    }

    /// "5 kilometers", "1 kilometer per hour"
    pub fn format(&self, unit: &Unit, locale: &str, options: &FormatOptions) -> Result<String> {
        let (number, template) = self.prepare(unit, locale, options)?;
        Ok(template.substitute(&[&number]))
    }

    /// The formatted unit split into number and literal parts
    pub fn format_to_parts(&self, unit: &Unit, locale: &str, options: &FormatOptions) -> Result<Vec<FormattedPart>> {
        let (number, template) = self.prepare(unit, locale, options)?;
        let parts = template
            .segments()
            .iter()
            .filter_map(|segment| match segment {
                Segment::Literal(text) => Some(FormattedPart::literal(text.as_str())),
                Segment::Placeholder(0) => Some(FormattedPart::number(number.as_str())),
                Segment::Placeholder(_) => None,
            })
            .collect();
        Ok(parts)
    }

    /// Format each unit, then join them with the locale's list patterns:
    /// "5 feet, 10 inches"
    pub fn format_list(&self, units: &[Unit], locale: &str, options: &FormatOptions) -> Result<String> {
        let items = units
            .iter()
            .map(|u| self.format(u, locale, options))
            .collect::<Result<Vec<String>>>()?;
        self.backend.list_formatter().format_list(&items, locale, options.style)
    }

    /// "3–5 kilometers" when both ends share a unit, otherwise both ends
    /// formatted in full and joined by the range pattern
    pub fn format_range(&self, range: &UnitRange, locale: &str, options: &FormatOptions) -> Result<String> {
        let range_pattern = self.backend.locale_data().range_pattern(locale)?;
        let (first, last) = (&range.first, &range.last);

        if first.base_conversion == last.base_conversion {
            let first_number = self.format_number(first, locale, options)?;
            let (last_number, template) = self.prepare(last, locale, options)?;
            let numbers = range_pattern.substitute(&[&first_number, &last_number]);
            return Ok(template.substitute(&[&numbers]));
        }

        let first_text = self.format(first, locale, options)?;
        let last_text = self.format(last, locale, options)?;
        Ok(range_pattern.substitute(&[&first_text, &last_text]))
    }

    /// Unit template for a case and plural category, with the number left as
    /// `{0}`: "{0} kilometers per hour"
    pub fn unit_template(
        &self,
        unit: &Unit,
        locale: &str,
        style: Style,
        case: GrammaticalCase,
        plural: PluralCategory,
    ) -> Result<Template> {
        self.template_for(unit, &unit.value, locale, Features { case, plural }, style)
    }

    fn template_for(&self, unit: &Unit, value: &Number, locale: &str, at: Features, style: Style) -> Result<Template> {
        let data = self.backend.locale_data();
        let patterns = Patterns::new(data.pattern_tables(locale, style)?, data.default_gender(locale)?);
        let render = Render {
            backend: self.backend,
            patterns: &patterns,
            rules: data.grammatical_features(locale)?,
            locale,
            value,
        };

        let tree = if patterns.contains(&unit.name) {
            GrammarNode::unit(unit.name.as_str())
        } else {
            GrammarNode::from_parsed(&unit.base_conversion, &|name: &str| patterns.contains(name))
        };
        debug!(unit = %unit.name, locale, ?tree, "rendering unit");
        render.node(&tree, at, true)
    }

    /// True when the locale has a pattern for the whole unit name
    pub fn is_translatable(&self, name: &str, locale: &str, style: Style) -> Result<bool> {
        let tables = self.backend.locale_data().pattern_tables(locale, style)?;
        Ok(tables.iter().any(|t| t.contains_key(name)))
    }

    fn format_number(&self, unit: &Unit, locale: &str, options: &FormatOptions) -> Result<String> {
        let options = options.clone().with_skeleton(&unit.format_options);
        self.backend.number_formatter().format_number(&unit.value, locale, &options.number)
    }

    /// Formatted number plus the template it goes into. The pattern is
    /// chosen for the value as displayed, after rounding.
    fn prepare(&self, unit: &Unit, locale: &str, options: &FormatOptions) -> Result<(String, Template)> {
        let number = self.format_number(unit, locale, options)?;
        let displayed = options.clone().with_skeleton(&unit.format_options).number.displayed(&unit.value)?;
        let plural = self.backend.locale_data().plural_category(locale, &displayed)?;
        let at = Features { case: options.case, plural };
        let template = self.template_for(unit, &displayed, locale, at, options.style)?;
        Ok((number, template))
    }
}

// ========== Rendering ==========

struct Render<'r> {
    backend: &'r Backend,
    patterns: &'r Patterns<'r>,
    rules: &'r GrammaticalFeatures,
    locale: &'r str,
    value: &'r Number,
}

impl Render<'_> {
    fn node(&self, node: &GrammarNode, at: Features, head: bool) -> Result<Template> {
        match node {
            GrammarNode::Unit { name } => self.unit(name, at, head),
            GrammarNode::Power { power, inner } => self.keyed(CompoundKind::Power, power, inner, at, head),
            GrammarNode::Prefix { prefix, inner } => self.keyed(CompoundKind::Prefix, prefix, inner, at, head),
            GrammarNode::Times { left, right } => {
                let [lf, rf] = operand_features(self.rules, CompoundKind::Times, at);
                let left_t = self.node(left, lf, head)?;
                let right_t = self.node(right, rf, false)?;
                let (left_text, right_text) = (left_t.literal_text(), right_t.literal_text());

                let text = if is_scalar(left) {
                    format!("{} {}", left_text, right_text)
                } else {
                    self.key("times", at)?.substitute(&[&left_text, &right_text])
                };
                Ok(left_t.with_unit_text(&text))
            }
            GrammarNode::Per { numerator, denominator } => {
                let [nf, df] = operand_features(self.rules, CompoundKind::Per, at);
                let per_unit = match denominator.as_ref() {
                    GrammarNode::Unit { name } => self.patterns.per_unit(name),
                    _ => None,
                };

                let numerator_text = match numerator {
                    Some(n) => self.node(n, nf, head)?.to_string(),
                    None => "{0}".to_string(),
                };
                let text = match per_unit {
                    Some(per_unit) => per_unit.substitute(&[&numerator_text]),
                    None => {
                        let denominator_t = self.node(denominator, df, false)?;
                        self.key("per", at)?
                            .substitute(&[&numerator_text, &denominator_t.literal_text()])
                    }
                };
                Ok(Template::parse(&text))
            }
        }
    }

    fn unit(&self, name: &str, at: Features, head: bool) -> Result<Template> {
        if name.chars().all(|c| c.is_ascii_digit()) && !name.is_empty() {
            return Ok(Template::parse(&format!("{{0}} {}", name)));
        }
        if let Some(code) = name.strip_prefix("curr_") {
            let currency = self.backend.currencies().currency(code, self.locale);
            return match currency.as_ref().and_then(|c| c.display_name(at.plural)) {
                Some(display) => Ok(Template::parse(&format!("{{0}} {}", display))),
                None => Err(UnitError::NoPattern {
                    unit: name.to_string(),
                    case: at.case.to_string(),
                    gender: self.patterns.default_gender.to_string(),
                    plural: at.plural.to_string(),
                }),
            };
        }
        self.patterns.select(name, at.case, at.plural, ValueContext { value: self.value, head })
    }

    /// Power and prefix nodes: the key's template wraps the inner unit text
    fn keyed(&self, kind: CompoundKind, key: &str, inner: &GrammarNode, at: Features, head: bool) -> Result<Template> {
        let [kf, inf] = operand_features(self.rules, kind, at);
        let inner_t = self.node(inner, inf, head)?;
        let key_t = self.key(key, kf)?;
        Ok(inner_t.with_unit_text(&key_t.adjoin(&inner_t.literal_text())))
    }

    fn key(&self, key: &str, at: Features) -> Result<Template> {
        self.patterns
            .select(key, at.case, at.plural, ValueContext { value: self.value, head: false })
    }
}

fn is_scalar(node: &GrammarNode) -> bool {
    matches!(node, GrammarNode::Unit { name } if !name.is_empty() && name.chars().all(|c| c.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mensura_locale::{BuiltinLocales, LocaleBundle};

    fn unit(name: &str, value: i64) -> Unit {
        Unit::new(name, Number::from_i64(value)).unwrap()
    }

    fn long() -> FormatOptions {
        FormatOptions::default()
    }

    fn short() -> FormatOptions {
        FormatOptions::default().with_style(Style::Short)
    }

    fn fmt(u: &Unit, locale: &str, options: &FormatOptions) -> String {
        let backend = Backend::builtin();
        UnitFormatter::new(&backend).format(u, locale, options).unwrap()
    }

    #[test]
    fn test_simple_units() {
        assert_eq!(fmt(&unit("kilometer", 5), "en", &long()), "5 kilometers");
        assert_eq!(fmt(&unit("kilometer", 1), "en", &long()), "1 kilometer");
        assert_eq!(fmt(&unit("kilometer", 5), "en", &short()), "5 km");
    }

    #[test]
    fn test_whole_compound_name() {
        assert_eq!(fmt(&unit("kilometer_per_hour", 1), "en", &long()), "1 kilometer per hour");
        assert_eq!(fmt(&unit("kilometer_per_hour", 5), "de", &long()), "5 Kilometer pro Stunde");
    }

    #[test]
    fn test_power_compound() {
        assert_eq!(fmt(&unit("square_furlong", 3), "en", &long()), "3 square furlongs");
    }

    #[test]
    fn test_prefix_compound() {
        assert_eq!(fmt(&unit("megasecond", 7), "en", &long()), "7 megaseconds");
        assert_eq!(fmt(&unit("megasecond", 7), "en", &short()), "7 Msec");
    }

    #[test]
    fn test_times_and_per_compound() {
        assert_eq!(
            fmt(&unit("kilogram_meter_per_second", 2), "en", &long()),
            "2 kilogram-meters per second"
        );
        assert_eq!(fmt(&unit("per_second", 5), "en", &long()), "5 per second");
    }

    #[test]
    fn test_currency_compound() {
        assert_eq!(fmt(&unit("curr_usd_per_gallon", 3), "en", &long()), "3 US dollars per gallon");
    }

    #[test]
    fn test_grammatical_case() {
        let dative = long().with_case(GrammaticalCase::Dative);
        assert_eq!(fmt(&unit("square_meter", 5), "de", &dative), "5 Quadratmetern");
        assert_eq!(fmt(&unit("square_meter", 5), "de", &long()), "5 Quadratmeter");
    }

    #[test]
    fn test_french_plural_rules() {
        let u = Unit::new("kilometer", Number::decimal("1.5").unwrap()).unwrap();
        assert_eq!(fmt(&u, "fr", &long()), "1,5 kilomètre");
    }

    #[test]
    fn test_precision_increment() {
        let u = unit("meter", 1234).with_format_options(vec!["precision-increment/50".into()]);
        assert_eq!(fmt(&u, "en", &long()), "1,250 meters");
    }

    #[test]
    fn test_plural_follows_rounded_number() {
        let almost_one = Unit::new("kilometer", Number::from_f64(0.99)).unwrap();
        let whole = long().with_max_fraction_digits(0);
        assert_eq!(fmt(&almost_one, "en", &whole), "1 kilometer");
        assert_eq!(fmt(&almost_one, "en", &long()), "0.99 kilometers");

        let u = unit("meter", 1).with_format_options(vec!["precision-increment/50".into()]);
        assert_eq!(fmt(&u, "en", &long()), "0 meters");
    }

    #[test]
    fn test_format_to_parts() {
        let backend = Backend::builtin();
        let parts = UnitFormatter::new(&backend)
            .format_to_parts(&unit("kilometer", 5), "en", &long())
            .unwrap();
        assert_eq!(
            parts,
            vec![FormattedPart::number("5"), FormattedPart::literal(" kilometers")]
        );
    }

    #[test]
    fn test_format_list() {
        let backend = Backend::builtin();
        let text = UnitFormatter::new(&backend)
            .format_list(&[unit("foot", 5), unit("inch", 10)], "en", &long())
            .unwrap();
        assert_eq!(text, "5 feet, 10 inches");
    }

    #[test]
    fn test_format_range() {
        let backend = Backend::builtin();
        let formatter = UnitFormatter::new(&backend);
        let range = UnitRange::new(unit("kilometer", 3), unit("kilometer", 5)).unwrap();
        assert_eq!(formatter.format_range(&range, "en", &long()).unwrap(), "3–5 kilometers");

        let mixed = UnitRange::new(unit("foot", 3), unit("yard", 2)).unwrap();
        assert_eq!(formatter.format_range(&mixed, "en", &long()).unwrap(), "3 feet–2 yards");
    }

    #[test]
    fn test_missing_pattern() {
        let bundle: LocaleBundle = BuiltinLocales::from_json(
            r#"{
                "locale": "xx",
                "plural_rules": "invariant",
                "range_pattern": "{0}-{1}",
                "list_patterns": {},
                "styles": {"long": {"meter": {"patterns": {"nominative": {"other": "{0} m"}}}}}
            }"#,
        )
        .unwrap();
        let backend = Backend::builtin().with_locale_data(BuiltinLocales::load().with_bundle(bundle));
        let formatter = UnitFormatter::new(&backend);
        let meter = formatter
            .unit_template(&unit("meter", 2), "xx", Style::Long, GrammaticalCase::Nominative, PluralCategory::Other)
            .unwrap();
        assert_eq!(meter.to_string(), "{0} m");
        let result = formatter.unit_template(
            &unit("second", 2),
            "xx",
            Style::Long,
            GrammaticalCase::Nominative,
            PluralCategory::Other,
        );
        assert!(matches!(result, Err(UnitError::NoPattern { .. })));
    }

    #[test]
    fn test_translatable() {
        let backend = Backend::builtin();
        let formatter = UnitFormatter::new(&backend);
        assert!(formatter.is_translatable("kilometer_per_hour", "en", Style::Long).unwrap());
        assert!(!formatter.is_translatable("square_furlong", "en", Style::Long).unwrap());
    }
}
