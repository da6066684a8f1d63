//! Linguistic selector types shared by locale data and the formatter

use std::fmt;

use serde::de::{self, Error as _, IntoDeserializer};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Pattern style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    #[default]
    Long,
    Short,
    Narrow,
}

impl Style {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "long" => Some(Style::Long),
            "short" => Some(Style::Short),
            "narrow" => Some(Style::Narrow),
            _ => None,
        }
    }

    /// Styles to try, most specific first
    pub fn fallback_chain(self) -> &'static [Style] {
        match self {
            Style::Long => &[Style::Long, Style::Short],
            Style::Short => &[Style::Short, Style::Long],
            Style::Narrow => &[Style::Narrow, Style::Short, Style::Long],
        }
    }
}

/// Grammatical case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GrammaticalCase {
    #[default]
    Nominative,
    Accusative,
    Dative,
    Genitive,
    Instrumental,
    Locative,
    Prepositional,
    Vocative,
    Oblique,
}

impl GrammaticalCase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrammaticalCase::Nominative => "nominative",
            GrammaticalCase::Accusative => "accusative",
            GrammaticalCase::Dative => "dative",
            GrammaticalCase::Genitive => "genitive",
            GrammaticalCase::Instrumental => "instrumental",
            GrammaticalCase::Locative => "locative",
            GrammaticalCase::Prepositional => "prepositional",
            GrammaticalCase::Vocative => "vocative",
            GrammaticalCase::Oblique => "oblique",
        }
    }
}

impl fmt::Display for GrammaticalCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// CLDR plural categories. Not all languages use all categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    #[default]
    Other,
}

impl PluralCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PluralCategory::Zero => "zero",
            PluralCategory::One => "one",
            PluralCategory::Two => "two",
            PluralCategory::Few => "few",
            PluralCategory::Many => "many",
            PluralCategory::Other => "other",
        }
    }

    /// The exact count a placeholder-free pattern of this category stands for
    pub fn exact_count(&self) -> Option<i64> {
        match self {
            PluralCategory::Zero => Some(0),
            PluralCategory::One => Some(1),
            PluralCategory::Two => Some(2),
            _ => None,
        }
    }
}

impl fmt::Display for PluralCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Grammatical gender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Masculine,
    Feminine,
    #[default]
    Neuter,
    Common,
    Animate,
    Inanimate,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Gender::Masculine => "masculine",
            Gender::Feminine => "feminine",
            Gender::Neuter => "neuter",
            Gender::Common => "common",
            Gender::Animate => "animate",
            Gender::Inanimate => "inanimate",
        };
        write!(f, "{}", s)
    }
}

/// How a compound unit is built from its operands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompoundKind {
    Per,
    Times,
    Power,
    Prefix,
}

/// A feature value for one operand of a compound: either inherited from the
/// compound ("compound") or fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector<T> {
    Compound,
    Fixed(T),
}

impl<T: Copy> Selector<T> {
    /// Resolve against the value the enclosing compound carries
    pub fn resolve(&self, inherited: T) -> T {
        match self {
            Selector::Compound => inherited,
            Selector::Fixed(value) => *value,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Selector<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        if s == "compound" {
            return Ok(Selector::Compound);
        }
        T::deserialize(s.into_deserializer())
            .map(Selector::Fixed)
            .map_err(|e: de::value::Error| D::Error::custom(e))
    }
}

impl<T: Serialize> Serialize for Selector<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Selector::Compound => serializer.serialize_str("compound"),
            Selector::Fixed(value) => value.serialize(serializer),
        }
    }
}

/// Left/right selectors for each kind of compound
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundRules<T> {
    pub per: [Selector<T>; 2],
    pub times: [Selector<T>; 2],
    pub power: [Selector<T>; 2],
    pub prefix: [Selector<T>; 2],
}

impl<T> CompoundRules<T> {
    pub fn get(&self, kind: CompoundKind) -> &[Selector<T>; 2] {
        match kind {
            CompoundKind::Per => &self.per,
            CompoundKind::Times => &self.times,
            CompoundKind::Power => &self.power,
            CompoundKind::Prefix => &self.prefix,
        }
    }
}

/// Per-locale grammatical derivation rules for compound units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrammaticalFeatures {
    #[serde(default = "default_case_rules")]
    pub case: CompoundRules<GrammaticalCase>,
    #[serde(default = "default_plural_rules")]
    pub plural: CompoundRules<PluralCategory>,
}

fn default_case_rules() -> CompoundRules<GrammaticalCase> {
    CompoundRules {
        per: [Selector::Compound, Selector::Fixed(GrammaticalCase::Nominative)],
        times: [Selector::Fixed(GrammaticalCase::Nominative), Selector::Compound],
        power: [Selector::Compound, Selector::Compound],
        prefix: [Selector::Compound, Selector::Compound],
    }
}

fn default_plural_rules() -> CompoundRules<PluralCategory> {
    CompoundRules {
        per: [Selector::Compound, Selector::Fixed(PluralCategory::One)],
        times: [Selector::Fixed(PluralCategory::One), Selector::Compound],
        power: [Selector::Compound, Selector::Compound],
        prefix: [Selector::Compound, Selector::Compound],
    }
}

impl Default for GrammaticalFeatures {
    fn default() -> Self {
        Self {
            case: default_case_rules(),
            plural: default_plural_rules(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_deserialize() {
        let s: Selector<PluralCategory> = serde_json::from_str("\"compound\"").unwrap();
        assert_eq!(s, Selector::Compound);
        let s: Selector<PluralCategory> = serde_json::from_str("\"one\"").unwrap();
        assert_eq!(s, Selector::Fixed(PluralCategory::One));
        assert!(serde_json::from_str::<Selector<PluralCategory>>("\"lots\"").is_err());
    }

    #[test]
    fn test_selector_resolve() {
        let s: Selector<GrammaticalCase> = Selector::Compound;
        assert_eq!(s.resolve(GrammaticalCase::Dative), GrammaticalCase::Dative);
        let s = Selector::Fixed(GrammaticalCase::Accusative);
        assert_eq!(s.resolve(GrammaticalCase::Dative), GrammaticalCase::Accusative);
    }

    #[test]
    fn test_default_features_follow_english() {
        let features = GrammaticalFeatures::default();
        let [_, right] = features.plural.get(CompoundKind::Per);
        assert_eq!(right.resolve(PluralCategory::Other), PluralCategory::One);
    }

    #[test]
    fn test_style_fallback() {
        assert_eq!(Style::Narrow.fallback_chain()[0], Style::Narrow);
        assert_eq!(Style::from_name("SHORT"), Some(Style::Short));
    }
}
