//! Preference resolver
//!
//! Chooses the units a quantity should be displayed in for a territory and
//! usage ("person_height" in the US is feet and inches). Preference entries
//! are grouped by category and usage; each has a set of regions and an
//! optional `geq` threshold expressed in the category's base unit.
//!
//! Lookup walks the usage fallback chain ("person_height", "person",
//! "default") and, for each usage, the territory containment chain ("US",
//! "021", "019", "001"). The first entry whose region matches and whose
//! threshold is met wins.

use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use mensura_core::{rational, RBig, Result, RoundingMode, UnitError};
use mensura_locale::TerritoryContainment;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::base_unit;
use crate::convert;
use crate::dimension;
use crate::parse::{self, ParsedUnit};
use crate::unit::{Unit, DEFAULT_USAGE};

/// Decimal places the base-unit value is rounded to before threshold checks
pub const PREFERENCE_PRECISION: u32 = 10;

/// Built-in preference table
pub static PREFERENCES: LazyLock<PreferenceTable> =
    LazyLock::new(|| PreferenceTable::from_json(include_str!("../data/preferences.json")));

/// Selected display units and number skeleton
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preference {
    pub units: Vec<String>,
    pub skeleton: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreferenceEntry {
    pub regions: Vec<String>,
    pub units: Vec<String>,
    /// Threshold in the category base unit; `None` always matches
    pub geq: Option<RBig>,
    pub skeleton: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    regions: Vec<String>,
    units: Vec<String>,
    #[serde(default)]
    geq: Option<String>,
    #[serde(default)]
    skeleton: Vec<String>,
}

/// category -> usage -> entries, in table order
#[derive(Debug, Default)]
pub struct PreferenceTable {
    categories: HashMap<String, HashMap<String, Vec<PreferenceEntry>>>,
}

impl PreferenceTable {
    /// Load from JSON, normalising thresholds to base units. Malformed
    /// entries are logged and skipped.
    pub fn from_json(json: &str) -> Self {
        let raw: BTreeMap<String, BTreeMap<String, Vec<RawEntry>>> = match serde_json::from_str(json) {
            Ok(raw) => raw,
            Err(e) => {
                error!(error = %e, "invalid preference data");
                return PreferenceTable::default();
            }
        };

        let mut table = PreferenceTable::default();
        for (category, usages) in raw {
            for (usage, entries) in usages {
                for entry in entries {
                    match normalize_entry(&category, entry) {
                        Ok(entry) => table.insert(&category, &usage, entry),
                        Err(e) => error!(category = %category, usage = %usage, error = %e, "preference entry skipped"),
                    }
                }
            }
        }
        table
    }

    pub fn insert(&mut self, category: &str, usage: &str, entry: PreferenceEntry) {
        self.categories
            .entry(category.to_string())
            .or_default()
            .entry(usage.to_string())
            .or_default()
            .push(entry);
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }

    /// Usages defined for a category, sorted
    pub fn usages(&self, category: &str) -> Result<Vec<String>> {
        let usages = self
            .categories
            .get(category)
            .ok_or_else(|| UnitError::UnknownCategory(category.to_string()))?;
        let mut names: Vec<String> = usages.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    pub fn entries(&self, category: &str, usage: &str) -> Option<&[PreferenceEntry]> {
        self.categories.get(category)?.get(usage).map(|e| e.as_slice())
    }
}

fn normalize_entry(category: &str, raw: RawEntry) -> Result<PreferenceEntry> {
    let base = category_base(category)?;
    let geq = match (&raw.geq, raw.units.first()) {
        (Some(geq), Some(first)) => {
            let value = rational::parse_decimal(geq).ok_or_else(|| UnitError::InvalidNumber(geq.clone()))?;
            let unit = parse::parse_unit(first)?;
            Some(convert::convert_rational(value, &unit, &base)?)
        }
        (Some(_), None) => return Err(UnitError::ParseError(format!("threshold without units in {}", category))),
        (None, _) => None,
    };
    for unit in &raw.units {
        parse::parse_unit(unit)?;
    }
    Ok(PreferenceEntry {
        regions: raw.regions,
        units: raw.units,
        geq,
        skeleton: raw.skeleton,
    })
}

/// Parsed base unit of a category
fn category_base(category: &str) -> Result<ParsedUnit> {
    let identity = dimension::category_base(category).ok_or_else(|| UnitError::UnknownCategory(category.to_string()))?;
    parse::parse_unit(identity)
}

/// "person_height" -> ["person_height", "person", "default"]
pub fn usage_chain(usage: &str) -> Vec<String> {
    let mut chain = Vec::new();
    let mut current = usage.replace('-', "_");
    while !current.is_empty() && current != DEFAULT_USAGE {
        chain.push(current.clone());
        match current.rfind('_') {
            Some(i) => current.truncate(i),
            None => break,
        }
    }
    chain.push(DEFAULT_USAGE.to_string());
    chain
}

/// The category the preference table knows this unit under. Inverse units
/// such as "mile_per_gallon" share their reciprocal's category.
fn preference_category(table: &PreferenceTable, unit: &ParsedUnit) -> Result<&'static str> {
    let direct = base_unit::category(unit);
    if let Ok(category) = direct {
        if table.has_category(category) {
            return Ok(category);
        }
    }
    if let Ok(category) = base_unit::category(&unit.invert()) {
        if table.has_category(category) {
            return Ok(category);
        }
    }
    direct
}

/// Preferred display units for a unit value. `usage` overrides the unit's
/// own usage tag.
pub fn preferred_units(
    unit: &Unit,
    territory: &str,
    usage: Option<&str>,
    territories: &dyn TerritoryContainment,
) -> Result<Preference> {
    preferred_units_in(&PREFERENCES, unit, territory, usage, territories, PREFERENCE_PRECISION)
}

/// `preferred_units` against an explicit table and rounding precision
pub fn preferred_units_in(
    table: &PreferenceTable,
    unit: &Unit,
    territory: &str,
    usage: Option<&str>,
    territories: &dyn TerritoryContainment,
    precision: u32,
) -> Result<Preference> {
    let usage = usage.unwrap_or(&unit.usage);
    let category = preference_category(table, &unit.base_conversion)?;

    let base = category_base(category)?;
    let exact = convert::convert_rational(unit.value.to_rational()?, &unit.base_conversion, &base)?;
    let value = rational::round_to(&exact, precision, RoundingMode::HalfEven);

    let usages: Vec<String> = usage_chain(usage)
        .into_iter()
        .filter(|u| table.entries(category, u).is_some())
        .collect();
    if usage != DEFAULT_USAGE && usages.iter().all(|u| u == DEFAULT_USAGE) {
        return Err(UnitError::UnknownUsage {
            category: category.to_string(),
            usage: usage.to_string(),
        });
    }

    let chain = territories.containment_chain(territory);
    for candidate in &usages {
        let Some(entries) = table.entries(category, candidate) else {
            continue;
        };
        for region in &chain {
            let matched = entries
                .iter()
                .filter(|e| e.regions.iter().any(|r| r == region))
                .find(|e| e.geq.as_ref().map_or(true, |geq| value >= *geq));
            if let Some(entry) = matched {
                debug!(category, usage = %candidate, region = %region, units = ?entry.units, "preference matched");
                return Ok(Preference {
                    units: entry.units.clone(),
                    skeleton: entry.skeleton.clone(),
                });
            }
        }
    }

    Err(UnitError::UnknownUnitPreference {
        category: category.to_string(),
        usage: usage.to_string(),
        territory: territory.to_string(),
    })
}

/// Usages the built-in table defines for a category
pub fn known_usages(category: &str) -> Result<Vec<String>> {
    PREFERENCES.usages(category)
}
