//! Finalizes a scanned number literal into a [`Number`], preferring the
//! smallest exact representation (see `[Number]` doc comments for the
//! classification rules).

use std::str::FromStr;

use num_bigint::BigInt;

use crate::error::{InvalidFloatValueError, InvalidIntValueError};
use crate::number::Number;

pub fn is_leading_char(c: char) -> bool {
    c == '-' || c.is_ascii_digit()
}

pub fn is_body_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-')
}

pub fn is_real(buf: &str) -> bool {
    buf.contains(['.', 'e', 'E'])
}

/// Checks that `buf` matches the number grammar
/// `-? (0 | [1-9][0-9]*) (\.[0-9]+)? ([eE][+-]?[0-9]+)?` exactly.
///
/// `continue_number`'s scanner only classifies which chars can *start* or
/// *continue* a number token (any digit, `.`, `e`/`E`, `+`/`-` in any
/// order); it accumulates `012`, `01.5`, and `3.` just as happily as
/// `12`, `1.5`, and `30`. Those malformed literals still have to be
/// rejected here, before `btoi`/`f64`/`BigInt` get a chance to parse them,
/// since all three are more permissive than this grammar (`"012"` parses
/// as `12`, `"3."` parses as `3.0`).
pub fn is_grammar_valid(buf: &str) -> bool {
    let bytes = buf.as_bytes();
    let mut i = 0;

    if bytes.first() == Some(&b'-') {
        i += 1;
    }

    let int_start = i;
    match bytes.get(i) {
        Some(b'0') => i += 1,
        Some(c) if c.is_ascii_digit() => {
            while matches!(bytes.get(i), Some(c) if c.is_ascii_digit()) {
                i += 1;
            }
        }
        _ => return false,
    }
    if i == int_start {
        return false;
    }

    if bytes.get(i) == Some(&b'.') {
        i += 1;
        let frac_start = i;
        while matches!(bytes.get(i), Some(c) if c.is_ascii_digit()) {
            i += 1;
        }
        if i == frac_start {
            return false;
        }
    }

    if matches!(bytes.get(i), Some(b'e') | Some(b'E')) {
        i += 1;
        if matches!(bytes.get(i), Some(b'+') | Some(b'-')) {
            i += 1;
        }
        let exp_start = i;
        while matches!(bytes.get(i), Some(c) if c.is_ascii_digit()) {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }

    i == bytes.len()
}

pub fn finalize(buf: &str, big_decimal: bool) -> Result<Number, NumberError> {
    if is_real(buf) {
        Ok(Number::from_real_literal(buf, big_decimal)?)
    } else if let Ok(v) = btoi::btoi::<i64>(buf.as_bytes()) {
        Ok(Number::from_i64(v))
    } else {
        let big = BigInt::from_str(buf).map_err(InvalidIntValueError::from)?;
        Ok(Number::from_big_int(big))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NumberError {
    #[error(transparent)]
    Int(#[from] InvalidIntValueError),
    #[error(transparent)]
    Float(#[from] InvalidFloatValueError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finalizes_small_int() {
        assert_eq!(finalize("42", false).unwrap(), Number::I32(42));
        assert_eq!(finalize("-42", false).unwrap(), Number::I32(-42));
    }

    #[test]
    fn finalizes_big_int() {
        let n = finalize("123456789012345678901234567890", false).unwrap();
        assert!(matches!(n, Number::BigInt(_)));
    }

    #[test]
    fn finalizes_float() {
        assert_eq!(finalize("1.5e2", false).unwrap(), Number::F64(150.0));
    }

    #[test]
    fn grammar_accepts_well_formed_literals() {
        for buf in ["0", "-0", "42", "-42", "0.5", "1.5e2", "1.5E-2", "1e+10", "9"] {
            assert!(is_grammar_valid(buf), "expected {buf:?} to be valid");
        }
    }

    #[test]
    fn grammar_rejects_leading_zero() {
        assert!(!is_grammar_valid("012"));
        assert!(!is_grammar_valid("-012"));
    }

    #[test]
    fn grammar_rejects_missing_fraction_digits() {
        assert!(!is_grammar_valid("3."));
    }

    #[test]
    fn grammar_rejects_missing_exponent_digits() {
        assert!(!is_grammar_valid("1e"));
        assert!(!is_grammar_valid("1e+"));
    }

    #[test]
    fn grammar_rejects_bare_sign() {
        assert!(!is_grammar_valid("-"));
    }
}
