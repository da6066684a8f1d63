//! Unit name parsing
//!
//! Turns identifiers such as "kilogram_meter_per_square_second" into a
//! `ParsedUnit`: canonically ordered tokens, each carrying the conversion
//! onto its base unit.
//!
//! Grammar, per `_`-separated token:
//! - `square_` / `cubic_` (or `pow2_` / `pow3_`) raise the next token
//! - a run of digits is a scalar multiplier ("300_gram")
//! - `curr_` plus an ISO 4217 code is a currency
//! - otherwise the longest dictionary name, optionally behind an SI or
//!   binary prefix ("kilo", "kibi")
//!
//! The name splits once at `_per_`; any further `_per_` in the denominator
//! multiplies (`a_per_b_per_c` is `a_per_b_c`).

use std::collections::HashMap;
use std::fmt;
use std::sync::{LazyLock, RwLock};

use dashu_int::IBig;
use mensura_core::{rational, RBig, Result, UnitError};
use mensura_locale::currency;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::dimension;
use crate::prefix::{self, Prefix};
use crate::units::UNITS;

const CURRENCY_PREFIX: &str = "curr_";

// ========== Types ==========

/// How one token maps onto its base unit: `base = value * factor + offset`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversion {
    #[serde(with = "rational::serde_str")]
    pub factor: RBig,
    #[serde(with = "rational::serde_str")]
    pub offset: RBig,
    /// `["meter"]`, `["square", "meter"]` for powers, empty for scalars
    pub base_unit: Vec<String>,
    pub convertible: bool,
}

impl Conversion {
    fn scalar(value: IBig) -> Self {
        Conversion {
            factor: RBig::from(value),
            offset: RBig::ZERO,
            base_unit: Vec::new(),
            convertible: true,
        }
    }

    /// The base-unit identity this token is measured against, ignoring any
    /// power marker
    pub fn base_identity(&self) -> Option<&str> {
        self.base_unit.last().map(|s| s.as_str())
    }

    /// Power applied by a power marker, 1 when there is none
    pub fn power(&self) -> u32 {
        match self.base_unit.as_slice() {
            [marker, _] => prefix::power_exponent(marker).unwrap_or(1),
            _ => 1,
        }
    }
}

/// One parsed factor of a unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub name: String,
    pub conversion: Conversion,
}

impl Token {
    /// Split a power marker off the name: "square_kilometer" -> (2, "kilometer")
    pub fn split_power(&self) -> (u32, &str) {
        split_power(&self.name)
    }

    pub fn is_scalar(&self) -> bool {
        is_numeric(&self.name)
    }

    pub fn is_currency(&self) -> bool {
        self.name.starts_with(CURRENCY_PREFIX)
    }
}

/// A parsed unit: a product of tokens or a quotient of two products
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParsedUnit {
    Product(Vec<Token>),
    Per { numerator: Vec<Token>, denominator: Vec<Token> },
}

impl ParsedUnit {
    pub fn numerator(&self) -> &[Token] {
        match self {
            ParsedUnit::Product(tokens) => tokens,
            ParsedUnit::Per { numerator, .. } => numerator,
        }
    }

    pub fn denominator(&self) -> &[Token] {
        match self {
            ParsedUnit::Product(_) => &[],
            ParsedUnit::Per { denominator, .. } => denominator,
        }
    }

    pub fn is_per(&self) -> bool {
        matches!(self, ParsedUnit::Per { .. })
    }

    /// All tokens, numerator first
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.numerator().iter().chain(self.denominator().iter())
    }

    /// False when any token has no numeric conversion
    pub fn is_convertible(&self) -> bool {
        self.tokens().all(|t| t.conversion.convertible)
    }

    /// Swap numerator and denominator
    pub fn invert(&self) -> ParsedUnit {
        match self {
            ParsedUnit::Product(tokens) => ParsedUnit::Per {
                numerator: Vec::new(),
                denominator: tokens.clone(),
            },
            ParsedUnit::Per { numerator, denominator } if numerator.is_empty() => {
                ParsedUnit::Product(denominator.clone())
            }
            ParsedUnit::Per { numerator, denominator } => ParsedUnit::Per {
                numerator: denominator.clone(),
                denominator: numerator.clone(),
            },
        }
    }

    /// The unit name this structure spells, e.g. "kilogram_meter_per_second"
    pub fn unit_name(&self) -> String {
        let join = |tokens: &[Token]| tokens.iter().map(|t| t.name.as_str()).collect::<Vec<_>>().join("_");
        match self {
            ParsedUnit::Product(tokens) => join(tokens),
            ParsedUnit::Per { numerator, denominator } if numerator.is_empty() => {
                format!("per_{}", join(denominator))
            }
            ParsedUnit::Per { numerator, denominator } => {
                format!("{}_per_{}", join(numerator), join(denominator))
            }
        }
    }
}

impl fmt::Display for ParsedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.unit_name())
    }
}

// ========== Parsing ==========

/// Most parsed units kept in the cache. Names past the limit are parsed
/// every time.
pub const PARSE_CACHE_CAPACITY: usize = 4096;

/// Longest normalized name the cache stores
const MAX_CACHED_NAME_LEN: usize = 96;

/// Parsed units keyed by normalized name
static PARSE_CACHE: LazyLock<RwLock<HashMap<String, ParsedUnit>>> = LazyLock::new(|| RwLock::new(HashMap::new()));

/// Lower-case, map spaces and hyphens to `_`, collapse repeats and resolve
/// whole-name abbreviations such as "mph".
pub fn normalize(name: &str) -> Result<String> {
    let mut normalized = String::with_capacity(name.len());
    for c in name.trim().chars() {
        let c = if c == ' ' || c == '-' { '_' } else { c.to_ascii_lowercase() };
        if c == '_' && (normalized.is_empty() || normalized.ends_with('_')) {
            continue;
        }
        normalized.push(c);
    }
    while normalized.ends_with('_') {
        normalized.pop();
    }
    if normalized.is_empty() {
        return Err(UnitError::ParseError(format!("empty unit name: {:?}", name)));
    }
    Ok(match UNITS.resolve_whole(&normalized) {
        Some(canonical) => canonical.to_string(),
        None => normalized,
    })
}

/// Parse a unit name. Successful parses of names up to
/// `MAX_CACHED_NAME_LEN` are cached until the cache holds
/// `PARSE_CACHE_CAPACITY` entries. Parsing is deterministic so a racing
/// duplicate insert stores the same value.
pub fn parse_unit(name: &str) -> Result<ParsedUnit> {
    let normalized = normalize(name)?;

    if let Ok(cache) = PARSE_CACHE.read() {
        if let Some(parsed) = cache.get(&normalized) {
            trace!(unit = %normalized, "parse cache hit");
            return Ok(parsed.clone());
        }
    }

    let parsed = parse_normalized(&normalized)?;
    debug!(unit = %normalized, parsed = %parsed, "parsed unit");
    if normalized.len() <= MAX_CACHED_NAME_LEN {
        if let Ok(mut cache) = PARSE_CACHE.write() {
            if cache.len() < PARSE_CACHE_CAPACITY {
                cache.insert(normalized, parsed.clone());
            }
        }
    }
    Ok(parsed)
}

#[cfg(test)]
fn cached_units() -> usize {
    PARSE_CACHE.read().map(|cache| cache.len()).unwrap_or(0)
}

fn parse_normalized(name: &str) -> Result<ParsedUnit> {
    let (numerator, denominator) = if let Some(rest) = name.strip_prefix("per_") {
        ("", Some(rest))
    } else {
        match name.split_once("_per_") {
            Some((n, d)) => (n, Some(d)),
            None => (name, None),
        }
    };

    let numerator = parse_part(name, numerator)?;
    match denominator {
        None => Ok(ParsedUnit::Product(numerator)),
        Some(d) => {
            // a second "per" multiplies into the denominator
            let d = d.replace("_per_", "_");
            let denominator = parse_part(name, &d)?;
            if denominator.is_empty() {
                return Err(UnitError::ParseError(format!("missing denominator in {}", name)));
            }
            Ok(ParsedUnit::Per { numerator, denominator })
        }
    }
}

fn parse_part(full: &str, part: &str) -> Result<Vec<Token>> {
    if part.is_empty() {
        return Ok(Vec::new());
    }
    let names = tokenize(full, part)?;
    build_tokens(names)
}

/// Split a part into base token names, repeating each powered token so that
/// "square_meter" yields ["meter", "meter"].
fn tokenize(full: &str, part: &str) -> Result<Vec<String>> {
    let mut names = Vec::new();
    let mut rest = part;
    let mut power = 1u32;

    while !rest.is_empty() {
        if let Some((exp, after)) = strip_power_marker(rest) {
            power *= exp;
            rest = after;
            continue;
        }

        let (token, len) = match_token(rest).ok_or_else(|| {
            debug!(unit = full, unmatched = rest, "unknown unit token");
            UnitError::unknown_unit(full, rest)
        })?;

        if is_numeric(&token) && power > 1 {
            return Err(UnitError::ParseError(format!("power applied to a number in {}", full)));
        }
        for _ in 0..power {
            names.push(token.clone());
        }
        power = 1;

        rest = &rest[len..];
        rest = rest.strip_prefix('_').unwrap_or(rest);
    }

    if power > 1 {
        return Err(UnitError::ParseError(format!("dangling power marker in {}", full)));
    }
    Ok(names)
}

fn strip_power_marker(s: &str) -> Option<(u32, &str)> {
    let (word, rest) = s.split_once('_')?;
    prefix::power_exponent(word).map(|exp| (exp, rest))
}

/// True when `len` bytes of `s` end at a token boundary
fn at_boundary(s: &str, len: usize) -> bool {
    s.len() == len || s.as_bytes().get(len) == Some(&b'_')
}

/// Longest dictionary name (or alias) at the start of `s`
fn longest_dictionary_match(s: &str) -> Option<&'static str> {
    UNITS
        .names_by_length()
        .iter()
        .find(|n| s.starts_with(n.as_str()) && at_boundary(s, n.len()))
        .map(|n| n.as_str())
}

/// Match one token at the start of `s`. Returns the canonical token name and
/// the number of bytes consumed.
fn match_token(s: &str) -> Option<(String, usize)> {
    let word_len = s.find('_').unwrap_or(s.len());
    let word = &s[..word_len];

    if !word.is_empty() && word.bytes().all(|b| b.is_ascii_digit()) {
        return Some((word.to_string(), word_len));
    }

    if let Some(code) = s.strip_prefix(CURRENCY_PREFIX) {
        let code_len = code.find('_').unwrap_or(code.len());
        let code = &code[..code_len];
        let upper = code.to_uppercase();
        if code.len() == 3 && currency::currency_codes().any(|c| c == upper) {
            return Some((format!("{}{}", CURRENCY_PREFIX, code), CURRENCY_PREFIX.len() + code_len));
        }
    }

    let dictionary = longest_dictionary_match(s).map(|n| (canonical(n), n.len()));

    let prefixed = prefix::prefixes()
        .filter_map(|p: &Prefix| {
            let rest = s.strip_prefix(p.name)?;
            let unit = longest_dictionary_match(rest)?;
            Some((format!("{}{}", p.name, canonical(unit)), p.name.len() + unit.len()))
        })
        .max_by_key(|(_, len)| *len);

    match (dictionary, prefixed) {
        (Some(d), Some(p)) if p.1 > d.1 => Some(p),
        (Some(d), _) => Some(d),
        (None, p) => p,
    }
}

fn canonical(name: &str) -> String {
    UNITS.get(name).map(|u| u.name.clone()).unwrap_or_else(|| name.to_string())
}

fn is_numeric(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit())
}

pub(crate) fn split_power(name: &str) -> (u32, &str) {
    match strip_power_marker(name) {
        Some((exp, rest)) => (exp, rest),
        None => (1, name),
    }
}

/// Group repeated names into powers, resolve conversions and sort into
/// canonical order. Names may carry power markers; they are expanded first.
pub(crate) fn build_tokens(names: Vec<String>) -> Result<Vec<Token>> {
    let mut grouped: Vec<(String, u32)> = Vec::new();
    for name in names {
        let (power, base) = split_power(&name);
        match grouped.iter_mut().find(|(n, _)| *n == base && !is_numeric(base)) {
            Some((_, count)) => *count += power,
            None => grouped.push((base.to_string(), power)),
        }
    }

    let mut tokens = grouped
        .into_iter()
        .map(|(name, count)| powered_token(&name, count))
        .collect::<Result<Vec<Token>>>()?;

    let mut keyed = tokens
        .drain(..)
        .map(|t| sort_key(&t).map(|k| (k, t)))
        .collect::<Result<Vec<_>>>()?;
    keyed.sort_by(|(a, _), (b, _)| a.cmp(b));
    Ok(keyed.into_iter().map(|(_, t)| t).collect())
}

fn powered_token(name: &str, power: u32) -> Result<Token> {
    let conversion = resolve(name)?;
    match power {
        1 => Ok(Token { name: name.to_string(), conversion }),
        2 | 3 => {
            let marker = prefix::power_name(power).unwrap_or("square");
            let mut factor = RBig::ONE;
            for _ in 0..power {
                factor = factor * conversion.factor.clone();
            }
            let mut base_unit = vec![marker.to_string()];
            base_unit.extend(conversion.base_unit);
            Ok(Token {
                name: format!("{}_{}", marker, name),
                conversion: Conversion {
                    factor,
                    offset: RBig::ZERO,
                    base_unit,
                    convertible: conversion.convertible,
                },
            })
        }
        _ => Err(UnitError::PowerTooHigh { unit: name.to_string(), power }),
    }
}

/// Conversion for a single (unpowered) canonical token name
fn resolve(name: &str) -> Result<Conversion> {
    if is_numeric(name) {
        let value: IBig = name.parse().map_err(|_| UnitError::ParseError(name.to_string()))?;
        return Ok(Conversion::scalar(value));
    }
    if name.starts_with(CURRENCY_PREFIX) {
        return Ok(Conversion {
            factor: RBig::ONE,
            offset: RBig::ZERO,
            base_unit: vec![name.to_string()],
            convertible: false,
        });
    }
    if let Some(unit) = UNITS.get(name) {
        return Ok(Conversion {
            factor: unit.factor.clone(),
            offset: unit.offset.clone(),
            base_unit: vec![unit.base_unit.clone()],
            convertible: unit.convertible,
        });
    }
    if let Some((p, rest)) = prefix::split_prefix(name, |r| UNITS.contains(r)) {
        if let Some(unit) = UNITS.get(rest) {
            return Ok(Conversion {
                factor: unit.factor.clone() * p.scale(),
                offset: unit.offset.clone(),
                base_unit: vec![unit.base_unit.clone()],
                convertible: unit.convertible,
            });
        }
    }
    Err(UnitError::unknown_unit(name, name))
}

/// (class, base rank, descending prefix rank, name). Scalars sort first and
/// currencies last.
type SortKey = (u8, usize, i32, String);

fn sort_key(token: &Token) -> Result<SortKey> {
    if token.is_scalar() {
        return Ok((0, 0, 0, token.name.clone()));
    }
    if token.is_currency() {
        return Ok((2, 0, 0, token.name.clone()));
    }
    let identity = token.conversion.base_identity().unwrap_or_default();
    let rank = dimension::base_rank(identity).ok_or_else(|| UnitError::UnknownBaseUnit {
        unit: token.name.clone(),
        base_unit: identity.to_string(),
    })?;
    Ok((1, rank, -prefix_rank(token.split_power().1), token.name.clone()))
}

/// SI/binary rank of the prefix a unit name carries, 0 for none
pub(crate) fn prefix_rank(name: &str) -> i32 {
    prefix::split_prefix(name, |r| UNITS.contains(r))
        .map(|(p, _)| p.rank())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn test_simple() {
        let parsed = parse_unit("meter").unwrap();
        assert_eq!(parsed, ParsedUnit::Product(parsed.numerator().to_vec()));
        assert_eq!(names(parsed.numerator()), vec!["meter"]);
        assert_eq!(parsed.numerator()[0].conversion.base_unit, vec!["meter"]);
    }

    #[test]
    fn test_per() {
        let parsed = parse_unit("kilogram_per_light_year").unwrap();
        assert_eq!(names(parsed.numerator()), vec!["kilogram"]);
        assert_eq!(names(parsed.denominator()), vec!["light_year"]);
        let ly = &parsed.denominator()[0].conversion;
        assert_eq!(ly.base_unit, vec!["meter"]);
        assert_eq!(ly.factor, rational::parse_decimal("9460730472580800").unwrap());
    }

    #[test]
    fn test_order_independent() {
        assert_eq!(parse_unit("meter_kilogram").unwrap(), parse_unit("kilogram_meter").unwrap());
        assert_eq!(names(parse_unit("second_kilogram_meter").unwrap().numerator()), vec!["kilogram", "meter", "second"]);
    }

    #[test]
    fn test_power_folding() {
        assert_eq!(parse_unit("meter_meter").unwrap(), parse_unit("square_meter").unwrap());
        assert_eq!(parse_unit("meter_meter_meter").unwrap(), parse_unit("cubic_meter").unwrap());
        assert_eq!(parse_unit("square_meter_meter").unwrap(), parse_unit("cubic_meter").unwrap());
        let m2 = parse_unit("pow2_meter").unwrap();
        assert_eq!(m2.numerator()[0].conversion.base_unit, vec!["square", "meter"]);
    }

    #[test]
    fn test_power_too_high() {
        assert!(matches!(
            parse_unit("square_meter_square_meter"),
            Err(UnitError::PowerTooHigh { power: 4, .. })
        ));
    }

    #[test]
    fn test_prefixes() {
        let parsed = parse_unit("megawatt").unwrap();
        assert_eq!(parsed.numerator()[0].conversion.factor, rational::from_i64(1_000_000));

        let parsed = parse_unit("kibibyte").unwrap();
        assert_eq!(names(parsed.numerator()), vec!["kibibyte"]);
        assert_eq!(parsed.numerator()[0].conversion.factor, rational::from_i64(8 * 1024));

        // prefix applied to an alias resolves to the canonical spelling
        assert_eq!(names(parse_unit("kilometre").unwrap().numerator()), vec!["kilometer"]);
    }

    #[test]
    fn test_square_prefixed() {
        let parsed = parse_unit("square_kilometer").unwrap();
        let token = &parsed.numerator()[0];
        assert_eq!(token.name, "square_kilometer");
        assert_eq!(token.conversion.factor, rational::from_i64(1_000_000));
        assert_eq!(token.split_power(), (2, "kilometer"));
    }

    #[test]
    fn test_prefix_rank_orders_same_base() {
        let parsed = parse_unit("meter_kilometer").unwrap();
        assert_eq!(names(parsed.numerator()), vec!["kilometer", "meter"]);
    }

    #[test]
    fn test_second_per_multiplies() {
        let a = parse_unit("meter_per_second_per_second").unwrap();
        let b = parse_unit("meter_per_square_second").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_numeric_literal() {
        let parsed = parse_unit("liter_per_100_kilometer").unwrap();
        assert_eq!(names(parsed.denominator()), vec!["100", "kilometer"]);
        assert!(parsed.denominator()[0].conversion.base_unit.is_empty());
        assert_eq!(names(parse_unit("300_gram").unwrap().numerator()), vec!["300", "gram"]);
    }

    #[test]
    fn test_cache_is_bounded() {
        for n in 1..=(PARSE_CACHE_CAPACITY + 200) {
            parse_unit(&format!("{}_gram", n)).unwrap();
        }
        assert!(cached_units() <= PARSE_CACHE_CAPACITY);
        let parsed = parse_unit("999999_kilogram").unwrap();
        assert_eq!(names(parsed.numerator()), vec!["999999", "kilogram"]);
    }

    #[test]
    fn test_currency() {
        let parsed = parse_unit("curr_usd_per_gallon").unwrap();
        assert_eq!(names(parsed.numerator()), vec!["curr_usd"]);
        assert!(!parsed.is_convertible());
        assert!(parse_unit("curr_xyz").is_err());
    }

    #[test]
    fn test_leading_per() {
        let parsed = parse_unit("per_second").unwrap();
        assert!(parsed.numerator().is_empty());
        assert_eq!(names(parsed.denominator()), vec!["second"]);
        assert_eq!(parsed.unit_name(), "per_second");
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(" Kilometer per-hour ").unwrap(), "kilometer_per_hour");
        assert_eq!(normalize("mph").unwrap(), "mile_per_hour");
        assert!(matches!(normalize("  "), Err(UnitError::ParseError(_))));
    }

    #[test]
    fn test_unknown_reports_remainder() {
        match parse_unit("meter_parsnip") {
            Err(UnitError::UnknownUnit { unit, unmatched }) => {
                assert_eq!(unit, "meter_parsnip");
                assert_eq!(unmatched, "parsnip");
            }
            other => panic!("expected UnknownUnit, got {:?}", other),
        }
    }

    #[test]
    fn test_dictionary_beats_prefix() {
        // "pint" is not "pico" + "nt", and "decade" is not "deca" + "de"
        assert_eq!(names(parse_unit("pint").unwrap().numerator()), vec!["pint"]);
        assert_eq!(names(parse_unit("decade").unwrap().numerator()), vec!["decade"]);
    }

    #[test]
    fn test_invert() {
        let parsed = parse_unit("meter_per_second").unwrap();
        assert_eq!(parsed.invert().unit_name(), "second_per_meter");
        assert_eq!(parse_unit("meter").unwrap().invert().unit_name(), "per_meter");
        assert_eq!(parse_unit("per_meter").unwrap().invert().unit_name(), "meter");
    }
}
