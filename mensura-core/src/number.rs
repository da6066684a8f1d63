//! Polymorphic numeric values
//!
//! A unit's value may be an integer, a float, an arbitrary precision decimal
//! or an exact rational. Arithmetic promotes to the more precise operand
//! kind (Decimal > Rational > Float > Int) and is carried out exactly on
//! rationals before the result is coerced back.

use std::cmp::Ordering;
use std::fmt;

use dashu_float::DBig;
use dashu_int::IBig;
use dashu_ratio::RBig;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::rational::{self, RoundingMode};

/// Error type for number operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NumberError {
    #[error("Invalid number format: {0}")]
    ParseError(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Not a finite number: {0}")]
    NotFinite(f64),
}

/// Kind of a `Number`, ordered by precision for promotion
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberKind {
    Int,
    Float,
    Rational,
    Decimal,
}

/// A unit's numeric value
#[derive(Debug, Clone)]
pub enum Number {
    Int(IBig),
    Float(f64),
    Decimal(DBig),
    Rational(RBig),
}

impl Number {
    // ========== Construction ==========

    pub fn from_i64(n: i64) -> Self {
        Number::Int(IBig::from(n))
    }

    pub fn from_f64(f: f64) -> Self {
        Number::Float(f)
    }

    /// Exact rational `num / den`
    pub fn from_ratio(num: i64, den: i64) -> Result<Self, NumberError> {
        if den == 0 {
            return Err(NumberError::DivisionByZero);
        }
        Ok(Number::Rational(rational::ratio(IBig::from(num), IBig::from(den))))
    }

    /// Decimal from its string form, e.g. "1.25"
    pub fn decimal(s: &str) -> Result<Self, NumberError> {
        let d: DBig = s.trim().parse().map_err(|_| NumberError::ParseError(s.to_string()))?;
        if d.repr().exponent().unsigned_abs() as u64 > rational::MAX_EXPONENT {
            return Err(NumberError::ParseError(s.to_string()));
        }
        Ok(Number::Decimal(d))
    }

    /// Parse a string. "12" is an integer, "3/4" a rational and anything
    /// with a decimal point or exponent a decimal.
    pub fn from_str(s: &str) -> Result<Self, NumberError> {
        let s = s.trim();
        if s.contains('/') {
            return rational::parse_decimal(s)
                .map(Number::Rational)
                .ok_or_else(|| NumberError::ParseError(s.to_string()));
        }
        if let Ok(i) = s.parse::<IBig>() {
            return Ok(Number::Int(i));
        }
        let exact = rational::parse_decimal(s).ok_or_else(|| NumberError::ParseError(s.to_string()))?;
        Ok(Number::Decimal(rational::to_dbig(&exact)))
    }

    /// Build a value of the given kind from an exact rational
    pub fn from_rational_as(r: RBig, kind: NumberKind) -> Self {
        match kind {
            NumberKind::Int => {
                if rational::is_integral(&r) {
                    Number::Int(r.numerator().clone())
                } else {
                    Number::Rational(r)
                }
            }
            NumberKind::Float => Number::Float(rational::to_f64(&r)),
            NumberKind::Decimal => Number::Decimal(rational::to_dbig(&r)),
            NumberKind::Rational => Number::Rational(r),
        }
    }

    // ========== Inspection ==========

    pub fn kind(&self) -> NumberKind {
        match self {
            Number::Int(_) => NumberKind::Int,
            Number::Float(_) => NumberKind::Float,
            Number::Decimal(_) => NumberKind::Decimal,
            Number::Rational(_) => NumberKind::Rational,
        }
    }

    /// Exact rational value. Fails for NaN and infinities.
    pub fn to_rational(&self) -> Result<RBig, NumberError> {
        match self {
            Number::Int(i) => Ok(RBig::from(i.clone())),
            Number::Float(f) => rational::from_f64(*f).ok_or(NumberError::NotFinite(*f)),
            Number::Decimal(d) => Ok(rational::from_dbig(d)),
            Number::Rational(r) => Ok(r.clone()),
        }
    }

    pub fn to_f64(&self) -> f64 {
        match self {
            Number::Float(f) => *f,
            other => other.to_rational().map(|r| rational::to_f64(&r)).unwrap_or(f64::NAN),
        }
    }

    pub fn to_i64(&self) -> Option<i64> {
        let r = self.to_rational().ok()?;
        if !rational::is_integral(&r) {
            return None;
        }
        i64::try_from(r.numerator().clone()).ok()
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Number::Float(f) => *f == 0.0,
            other => other.to_rational().map(|r| r == RBig::ZERO).unwrap_or(false),
        }
    }

    pub fn is_negative(&self) -> bool {
        match self {
            Number::Float(f) => *f < 0.0,
            other => other.to_rational().map(|r| r < RBig::ZERO).unwrap_or(false),
        }
    }

    /// True when the value has no fractional part
    pub fn is_integer(&self) -> bool {
        self.to_rational().map(|r| rational::is_integral(&r)).unwrap_or(false)
    }

    /// Collapse an integral Float or Rational into an Int. Decimals keep
    /// their kind.
    pub fn maybe_integer(self) -> Self {
        if matches!(self, Number::Float(_) | Number::Rational(_)) {
            if let Ok(r) = self.to_rational() {
                if rational::is_integral(&r) {
                    return Number::Int(r.numerator().clone());
                }
            }
        }
        self
    }

    // ========== Arithmetic ==========

    fn promoted(&self, other: &Self) -> NumberKind {
        self.kind().max(other.kind())
    }

    pub fn add(&self, other: &Self) -> Result<Self, NumberError> {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => Ok(Number::Int(a + b)),
            (Number::Float(a), Number::Float(b)) => Ok(Number::Float(a + b)),
            _ => {
                let kind = self.promoted(other);
                Ok(Self::from_rational_as(self.to_rational()? + other.to_rational()?, kind))
            }
        }
    }

    pub fn sub(&self, other: &Self) -> Result<Self, NumberError> {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => Ok(Number::Int(a - b)),
            (Number::Float(a), Number::Float(b)) => Ok(Number::Float(a - b)),
            _ => {
                let kind = self.promoted(other);
                Ok(Self::from_rational_as(self.to_rational()? - other.to_rational()?, kind))
            }
        }
    }

    pub fn mul(&self, other: &Self) -> Result<Self, NumberError> {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => Ok(Number::Int(a * b)),
            (Number::Float(a), Number::Float(b)) => Ok(Number::Float(a * b)),
            _ => {
                let kind = self.promoted(other);
                Ok(Self::from_rational_as(self.to_rational()? * other.to_rational()?, kind))
            }
        }
    }

    /// Safe division (returns Result, never panics). Integer division that
    /// does not divide evenly yields a Rational.
    pub fn checked_div(&self, other: &Self) -> Result<Self, NumberError> {
        if other.is_zero() {
            return Err(NumberError::DivisionByZero);
        }
        match (self, other) {
            (Number::Float(a), Number::Float(b)) => Ok(Number::Float(a / b)),
            _ => {
                let kind = self.promoted(other);
                Ok(Self::from_rational_as(self.to_rational()? / other.to_rational()?, kind))
            }
        }
    }

    pub fn neg(&self) -> Self {
        match self {
            Number::Int(i) => Number::Int(-i.clone()),
            Number::Float(f) => Number::Float(-f),
            Number::Decimal(d) => Number::Decimal(-d.clone()),
            Number::Rational(r) => Number::Rational(-r.clone()),
        }
    }

    pub fn abs(&self) -> Self {
        if self.is_negative() {
            self.neg()
        } else {
            self.clone()
        }
    }

    /// Round to `places` decimal places, keeping the value's kind
    pub fn round(&self, places: u32, mode: RoundingMode) -> Result<Self, NumberError> {
        match self {
            Number::Int(_) => Ok(self.clone()),
            other => {
                let rounded = rational::round_to(&other.to_rational()?, places, mode);
                Ok(Self::from_rational_as(rounded, other.kind()))
            }
        }
    }

    /// Integer part, rounding toward zero
    pub fn trunc(&self) -> Result<Self, NumberError> {
        Ok(Number::Int(rational::trunc(&self.to_rational()?)))
    }

    /// Value-aware comparison
    pub fn compare(&self, other: &Self) -> Result<Ordering, NumberError> {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => Ok(a.cmp(b)),
            (Number::Float(a), Number::Float(b)) => a
                .partial_cmp(b)
                .ok_or(NumberError::NotFinite(if a.is_nan() { *a } else { *b })),
            _ => Ok(self.to_rational()?.cmp(&other.to_rational()?)),
        }
    }

    /// Fixed-point rendering with `places` fraction digits
    pub fn as_decimal(&self, places: u32) -> String {
        match self.to_rational() {
            Ok(r) => rational::format_fixed(&r, places, RoundingMode::HalfEven),
            Err(_) => format!("{}", self.to_f64()),
        }
    }
}

// ========== Trait Implementations ==========

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            Number::Float(x) => write!(f, "{}", x),
            Number::Decimal(d) => write!(f, "{}", d),
            Number::Rational(r) => {
                let (num, den) = rational::parts(r);
                write!(f, "{}/{}", num, den)
            }
        }
    }
}

impl PartialEq for Number {
    /// Equal kinds with equal values. `Int(1)` and `Float(1.0)` differ.
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind() && matches!(self.compare(other), Ok(Ordering::Equal))
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number::from_i64(n)
    }
}

impl From<i32> for Number {
    fn from(n: i32) -> Self {
        Number::from_i64(n as i64)
    }
}

impl From<f64> for Number {
    fn from(f: f64) -> Self {
        Number::Float(f)
    }
}

impl From<RBig> for Number {
    fn from(r: RBig) -> Self {
        Number::Rational(r)
    }
}

impl From<DBig> for Number {
    fn from(d: DBig) -> Self {
        Number::Decimal(d)
    }
}

impl From<IBig> for Number {
    fn from(i: IBig) -> Self {
        Number::Int(i)
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Number::Float(f) => serializer.serialize_f64(*f),
            Number::Int(i) => match i64::try_from(i.clone()) {
                Ok(small) => serializer.serialize_i64(small),
                Err(_) => serializer.serialize_str(&i.to_string()),
            },
            other => serializer.serialize_str(&other.to_string()),
        }
    }
}

struct NumberVisitor;

impl<'de> Visitor<'de> for NumberVisitor {
    type Value = Number;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a number or a numeric string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Number, E> {
        Ok(Number::from_i64(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Number, E> {
        Ok(Number::Int(IBig::from(v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Number, E> {
        Ok(Number::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Number, E> {
        Number::from_str(v).map_err(de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for Number {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NumberVisitor)
    }
}
