//! Mensura Locale - Locale data contracts and built-in data
//!
//! The unit engine treats locale data as a read-only lookup. This crate
//! defines that lookup and the other external collaborators as traits:
//! - `LocaleData`: pattern tables, grammatical features, default gender
//! - `NumberFormatter`: plain numeral formatting
//! - `ListFormatter`: joining formatted units
//! - `TerritoryContainment`: region fallback chains
//! - `CurrencyData`: currency display names
//!
//! A `Backend` bundles one implementation of each. `Backend::builtin()`
//! serves `en`, `de` and `fr` from compiled-in JSON.

mod types;
mod template;
mod plural;
mod data;
mod traits;
mod backend;
pub mod builtin;
pub mod territory;
pub mod currency;

pub use types::{CompoundKind, CompoundRules, Gender, GrammaticalCase, GrammaticalFeatures, PluralCategory, Selector, Style};
pub use template::{Segment, Template};
pub use plural::PluralRules;
pub use data::{ListPatterns, LocaleBundle, NumberSymbols, PatternTable, UnitPatterns};
pub use traits::{
    CurrencyData, CurrencyMetadata, ListFormatter, LocaleData, NumberFormatter, NumberOptions, TerritoryContainment,
};
pub use backend::Backend;
pub use builtin::{BuiltinLocales, BUILTIN_LOCALES};
