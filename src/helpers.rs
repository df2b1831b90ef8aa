//! Small helpers shared between the reader's buffer sub-machines and the
//! MessagePack writer's string/integer encoders.

use base64::Engine;

use crate::error::ReaderError;
use crate::position::Position;

/// Decodes a `h'...'` literal's hex digits (already stripped of the quotes)
/// into raw bytes. An odd number of nibbles is a protocol error.
pub fn decode_hex_buffer(digits: &str, position: Position) -> Result<Vec<u8>, ReaderError> {
    hex::decode(digits).map_err(|e| {
        ReaderError::InvalidLiteral(format!("h'{digits}'"), position, e.to_string())
    })
}

/// Decodes a `b'...'` literal's payload (already stripped of the quotes)
/// into raw bytes. Accepts both the standard and URL-safe alphabets, with
/// or without `=` padding.
pub fn decode_base64_buffer(payload: &str, position: Position) -> Result<Vec<u8>, ReaderError> {
    let engine = base64::engine::general_purpose::STANDARD_NO_PAD;
    let url_engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
    let trimmed = payload.trim_end_matches('=');
    engine
        .decode(trimmed)
        .or_else(|_| url_engine.decode(trimmed))
        .map_err(|e| ReaderError::InvalidLiteral(format!("b'{payload}'"), position, e.to_string()))
}

/// Escapes control characters the way protocol error messages embed the
/// offending literal: printable ASCII as-is, everything else as `\uXXXX`.
pub fn escape_for_message(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if (c as u32) < 0x20 || (c as u32) == 0x7f {
            out.push_str(&format!("\\u{:04x}", c as u32));
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_hex() {
        assert_eq!(
            decode_hex_buffer("48656c6c6f", Position::start()).unwrap(),
            b"Hello"
        );
    }

    #[test]
    fn rejects_odd_hex() {
        assert!(decode_hex_buffer("abc", Position::start()).is_err());
    }

    #[test]
    fn decodes_base64_standard_and_url() {
        assert_eq!(
            decode_base64_buffer("aGVsbG8=", Position::start()).unwrap(),
            b"hello"
        );
        assert_eq!(
            decode_base64_buffer("aGVsbG8", Position::start()).unwrap(),
            b"hello"
        );
    }

    #[test]
    fn escapes_control_chars() {
        assert_eq!(escape_for_message("a\tb"), "a\\u0009b");
    }
}
