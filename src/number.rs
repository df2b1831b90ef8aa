//! The [`Number`] type carried by [`Event::PrimitiveNumber`](crate::event::Event::PrimitiveNumber)
//! and the classification rules used to pick a representation.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

/// A numeric primitive, already classified into the smallest exact
/// representation the reader could find.
///
/// The reader prefers the smallest exact integer representation
/// (`I32` -> `I64` -> `BigInt`) and, for values with a fractional or
/// exponent part, prefers an `F64` that round-trips back to the original
/// literal over a `BigDecimal`. `F32` is never produced by the JSON reader
/// (JSON has no single/double precision distinction) but is part of the
/// event model's numeric union, since a producer other than this crate's
/// reader may hand the writer an `Event::PrimitiveNumber(Number::F32(_))`
/// directly.
#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    I32(i32),
    I64(i64),
    BigInt(BigInt),
    F32(f32),
    F64(f64),
    BigDecimal(BigDecimal),
}

impl Number {
    /// Classify an already-parsed integer literal, preferring the smallest
    /// exact representation.
    pub fn from_i64(v: i64) -> Self {
        if let Ok(v32) = i32::try_from(v) {
            Number::I32(v32)
        } else {
            Number::I64(v)
        }
    }

    pub fn from_big_int(v: BigInt) -> Self {
        if let Some(v64) = num_traits::ToPrimitive::to_i64(&v) {
            Number::from_i64(v64)
        } else {
            Number::BigInt(v)
        }
    }

    /// Classify a real literal. `text` is the original source literal (used
    /// to check whether an `f64` round-trips); `prefer_big_decimal` mirrors
    /// the `bigDecimal` reader option.
    pub fn from_real_literal(text: &str, prefer_big_decimal: bool) -> Result<Self, crate::error::InvalidFloatValueError> {
        let as_f64: f64 = text.parse()?;
        if round_trips(text, as_f64) {
            return Ok(Number::F64(as_f64));
        }
        if prefer_big_decimal {
            let bd: BigDecimal = text.parse()?;
            Ok(Number::BigDecimal(bd))
        } else {
            Ok(Number::F64(as_f64))
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Number::I32(_) | Number::I64(_) | Number::BigInt(_))
    }

    /// The value as `f64`, lossily if necessary. Used by the MessagePack
    /// writer, which has no arbitrary-precision decimal wire type.
    pub fn to_f64_lossy(&self) -> f64 {
        match self {
            Number::I32(v) => *v as f64,
            Number::I64(v) => *v as f64,
            Number::BigInt(v) => num_traits::ToPrimitive::to_f64(v).unwrap_or(f64::NAN),
            Number::F32(v) => *v as f64,
            Number::F64(v) => *v,
            Number::BigDecimal(v) => num_traits::ToPrimitive::to_f64(v).unwrap_or(f64::NAN),
        }
    }

    /// The value as `u64`, if it is a non-negative integer that fits.
    pub fn to_u64(&self) -> Option<u64> {
        match self {
            Number::I32(v) => u64::try_from(*v).ok(),
            Number::I64(v) => u64::try_from(*v).ok(),
            Number::BigInt(v) => num_traits::ToPrimitive::to_u64(v),
            _ => None,
        }
    }

    /// The value as `i64`, if it is an integer that fits.
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Number::I32(v) => Some(*v as i64),
            Number::I64(v) => Some(*v),
            Number::BigInt(v) => num_traits::ToPrimitive::to_i64(v),
            _ => None,
        }
    }
}

/// Checks whether `f64::to_string()`-equivalent formatting of `value` equals
/// `text` up to case of the exponent marker — the round-trip criterion used
/// to decide whether a real literal can stay an `f64` without losing
/// precision.
fn round_trips(text: &str, value: f64) -> bool {
    let mut buf = [0u8; 32];
    let mut cursor = &mut buf[..];
    let written = dtoa::write(&mut cursor, value).unwrap_or(0);
    if written == 0 {
        return false;
    }
    let formatted = std::str::from_utf8(&buf[..written]).unwrap_or("");
    formatted.eq_ignore_ascii_case(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_i32() {
        assert_eq!(Number::from_i64(42), Number::I32(42));
        assert_eq!(Number::from_i64(i64::MAX), Number::I64(i64::MAX));
    }

    #[test]
    fn real_literal_round_trips_when_possible() {
        let n = Number::from_real_literal("1.5", false).unwrap();
        assert_eq!(n, Number::F64(1.5));
    }

    #[test]
    fn to_u64_rejects_negative() {
        assert_eq!(Number::I32(-1).to_u64(), None);
        assert_eq!(Number::I32(5).to_u64(), Some(5));
    }
}
