//! Mensura Core - Fundamental types
//!
//! This crate provides the core types used throughout Mensura:
//! - `Number`: integer, float, decimal or exact rational unit values
//! - `RoundingMode` and exact rational helpers used by conversion math
//! - `UnitError`: the error taxonomy shared by every crate

mod number;
mod error;
pub mod rational;

pub use number::{Number, NumberError, NumberKind};
pub use rational::RoundingMode;
pub use error::{UnitError, Result, codes};

/// Re-exported so downstream crates name the same rational type
pub use dashu_ratio::RBig;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Number, NumberKind, RoundingMode, UnitError, RBig};
    pub use crate::error::codes;
}
