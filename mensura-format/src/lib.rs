//! Mensura Format - Localized unit formatting
//!
//! Renders units as text for a locale and style:
//! - Whole-name patterns when the locale has them ("kilometer per hour")
//! - Compound assembly otherwise, driven by a grammar tree of
//!   times/power/prefix/per nodes and the locale's compound rules
//! - Grammatical case, gender and plural aware pattern selection
//! - Number skeletons carried on the unit ("precision-increment/50")
//! - Parts, lists and ranges

pub mod grammar;
pub mod pattern;
mod format;

pub use format::{FormatOptions, FormattedPart, PartKind, UnitFormatter};
pub use grammar::{Features, GrammarNode};
