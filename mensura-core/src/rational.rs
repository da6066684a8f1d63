//! Exact rational helpers built on dashu's `RBig`
//!
//! Conversion factors, offsets and every intermediate conversion result are
//! kept as `RBig`. These helpers move values in and out of that form and
//! implement the rounding modes used by arithmetic, comparison and number
//! formatting.

use dashu_float::DBig;
use dashu_int::{IBig, UBig};
use dashu_ratio::RBig;
use serde::{Deserialize, Serialize};

/// Working precision (decimal digits) for inexact decimal division
pub const DECIMAL_PRECISION: usize = 50;

/// Largest decimal exponent accepted from parsed input
pub const MAX_EXPONENT: u64 = 4096;

/// Rounding modes supported by `round`, `compare` and number formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Toward zero
    Down,
    /// Away from zero
    Up,
    /// Toward positive infinity
    Ceiling,
    /// Toward negative infinity
    Floor,
    /// Nearest, ties to the even neighbour
    #[default]
    HalfEven,
    /// Nearest, ties away from zero
    HalfUp,
    /// Nearest, ties toward zero
    HalfDown,
}

impl RoundingMode {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().replace('-', "_").as_str() {
            "down" | "trunc" | "truncate" => Some(Self::Down),
            "up" => Some(Self::Up),
            "ceiling" | "ceil" => Some(Self::Ceiling),
            "floor" => Some(Self::Floor),
            "half_even" => Some(Self::HalfEven),
            "half_up" => Some(Self::HalfUp),
            "half_down" => Some(Self::HalfDown),
            _ => None,
        }
    }
}

/// 10^exp as an integer
pub fn pow10(exp: usize) -> IBig {
    IBig::from(10u8).pow(exp)
}

/// Build `numerator / denominator`. Caller guarantees a non-zero denominator.
pub fn ratio(numerator: IBig, denominator: IBig) -> RBig {
    RBig::from(numerator) / RBig::from(denominator)
}

pub fn from_i64(n: i64) -> RBig {
    RBig::from(IBig::from(n))
}

/// True when the denominator is one
pub fn is_integral(r: &RBig) -> bool {
    *r.denominator() == UBig::ONE
}

/// Numerator and denominator as signed integers
pub fn parts(r: &RBig) -> (IBig, IBig) {
    (r.numerator().clone(), IBig::from(r.denominator().clone()))
}

/// Parse "12", "-3.25", "1.5e-3", "2298.35/9" into an exact rational.
/// Exponents beyond `MAX_EXPONENT` are rejected.
pub fn parse_decimal(s: &str) -> Option<RBig> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Some((num, den)) = s.split_once('/') {
        let num = parse_decimal(num)?;
        let den = parse_decimal(den)?;
        if den == RBig::ZERO {
            return None;
        }
        return Some(num / den);
    }

    let lower = s.to_lowercase();
    let (mantissa, exponent) = match lower.split_once('e') {
        Some((m, e)) => (m.to_string(), e.parse::<i64>().ok()?),
        None => (lower.clone(), 0),
    };
    if exponent.unsigned_abs() > MAX_EXPONENT {
        return None;
    }

    let (negative, digits) = match mantissa.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, mantissa.strip_prefix('+').unwrap_or(&mantissa)),
    };

    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, f),
        None => (digits, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part.chars().chain(frac_part.chars()).all(|c| c.is_ascii_digit()) {
        return None;
    }

    let all_digits = format!("{}{}", int_part, frac_part);
    let mut significand: IBig = all_digits.parse().ok()?;
    if negative {
        significand = -significand;
    }

    let scale = exponent - frac_part.len() as i64;
    Some(scaled(significand, scale))
}

/// significand * 10^scale
fn scaled(significand: IBig, scale: i64) -> RBig {
    if scale >= 0 {
        RBig::from(significand * pow10(scale as usize))
    } else {
        ratio(significand, pow10(scale.unsigned_abs() as usize))
    }
}

/// Exact rational for a finite float, taken from its shortest round-trip
/// decimal representation (so `10.3` becomes `103/10`).
pub fn from_f64(f: f64) -> Option<RBig> {
    if !f.is_finite() {
        return None;
    }
    parse_decimal(&f.to_string())
}

/// Exact rational for a decimal
pub fn from_dbig(d: &DBig) -> RBig {
    let (significand, exponent) = d.clone().into_repr().into_parts();
    scaled(significand, exponent as i64)
}

/// Decimal for a rational. Exact when the denominator only has factors of
/// 2 and 5, otherwise rounded to `DECIMAL_PRECISION` digits.
pub fn to_dbig(r: &RBig) -> DBig {
    let (num, den) = parts(r);
    if den == IBig::ONE {
        return DBig::from_parts(num, 0);
    }

    let two = IBig::from(2u8);
    let five = IBig::from(5u8);
    let mut rest = den.clone();
    let (mut twos, mut fives) = (0usize, 0usize);
    while &rest % &two == IBig::ZERO {
        rest = rest / &two;
        twos += 1;
    }
    while &rest % &five == IBig::ZERO {
        rest = rest / &five;
        fives += 1;
    }

    if rest == IBig::ONE {
        let k = twos.max(fives);
        let multiplier = pow10(k) / &den;
        return DBig::from_parts(num * multiplier, -(k as isize));
    }

    let n = DBig::from_parts(num, 0).with_precision(DECIMAL_PRECISION).value();
    let d = DBig::from_parts(den, 0).with_precision(DECIMAL_PRECISION).value();
    n / d
}

/// Float approximation of a rational
pub fn to_f64(r: &RBig) -> f64 {
    let (num, den) = parts(r);
    if den == IBig::ONE {
        return num.to_string().parse().unwrap_or(f64::NAN);
    }
    let places = den.to_string().len() + 17;
    format_fixed(r, places as u32, RoundingMode::HalfEven)
        .parse()
        .unwrap_or(f64::NAN)
}

/// Round to an integer using the given mode
pub fn round_integer(r: &RBig, mode: RoundingMode) -> IBig {
    let (num, den) = parts(r);
    let truncated = &num / &den;
    let remainder = &num - &truncated * &den;
    if remainder == IBig::ZERO {
        return truncated;
    }

    let negative = num < IBig::ZERO;
    let away = if negative { &truncated - IBig::ONE } else { &truncated + IBig::ONE };
    let twice_rem = if remainder < IBig::ZERO { -remainder * IBig::from(2u8) } else { remainder * IBig::from(2u8) };

    match mode {
        RoundingMode::Down => truncated,
        RoundingMode::Up => away,
        RoundingMode::Floor => if negative { away } else { truncated },
        RoundingMode::Ceiling => if negative { truncated } else { away },
        RoundingMode::HalfUp | RoundingMode::HalfDown | RoundingMode::HalfEven => {
            if twice_rem > den {
                away
            } else if twice_rem < den {
                truncated
            } else {
                match mode {
                    RoundingMode::HalfUp => away,
                    RoundingMode::HalfDown => truncated,
                    _ => {
                        if &truncated % IBig::from(2u8) == IBig::ZERO {
                            truncated
                        } else {
                            away
                        }
                    }
                }
            }
        }
    }
}

/// Round to `places` decimal places
pub fn round_to(r: &RBig, places: u32, mode: RoundingMode) -> RBig {
    let scale = pow10(places as usize);
    let scaled = r * RBig::from(scale.clone());
    ratio(round_integer(&scaled, mode), scale)
}

/// Integer part, rounding toward zero
pub fn trunc(r: &RBig) -> IBig {
    round_integer(r, RoundingMode::Down)
}

/// Render with exactly `places` fraction digits
pub fn format_fixed(r: &RBig, places: u32, mode: RoundingMode) -> String {
    let scaled = r * RBig::from(pow10(places as usize));
    let rounded = round_integer(&scaled, mode);
    let negative = rounded < IBig::ZERO;
    let digits = if negative { (-rounded).to_string() } else { rounded.to_string() };

    let places = places as usize;
    let padded = if digits.len() <= places {
        format!("{}{}", "0".repeat(places + 1 - digits.len()), digits)
    } else {
        digits
    };

    let split = padded.len() - places;
    let mut out = String::with_capacity(padded.len() + 2);
    if negative {
        out.push('-');
    }
    out.push_str(&padded[..split]);
    if places > 0 {
        out.push('.');
        out.push_str(&padded[split..]);
    }
    out
}

/// Render as "n" or "n/d"
pub fn to_string(r: &RBig) -> String {
    let (num, den) = parts(r);
    if den == IBig::ONE {
        num.to_string()
    } else {
        format!("{}/{}", num, den)
    }
}

/// Serde adapter storing an `RBig` as its string form, for use with
/// `#[serde(with = "mensura_core::rational::serde_str")]`
pub mod serde_str {
    use dashu_ratio::RBig;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &RBig, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::to_string(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<RBig, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_decimal(&s).ok_or_else(|| de::Error::custom(format!("invalid rational: {}", s)))
    }
}
