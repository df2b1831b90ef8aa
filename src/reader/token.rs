//! Recognizes the fixed keyword tokens: `true`, `false`, `null`, and, when
//! CBOR-diagnostic extensions are enabled, `undefined`, `NaN`, `Infinity`
//! and `-Infinity`.

use crate::event::Event;
use crate::number::Number;

pub enum TokenKind {
    True,
    False,
    Null,
    Undefined,
    NaN,
    Infinity,
    NegInfinity,
}

pub fn classify(buf: &str, cbor_diag: bool) -> Option<TokenKind> {
    match buf {
        "true" => Some(TokenKind::True),
        "false" => Some(TokenKind::False),
        "null" => Some(TokenKind::Null),
        "undefined" if cbor_diag => Some(TokenKind::Undefined),
        "NaN" if cbor_diag => Some(TokenKind::NaN),
        "Infinity" if cbor_diag => Some(TokenKind::Infinity),
        "-Infinity" if cbor_diag => Some(TokenKind::NegInfinity),
        _ => None,
    }
}

impl TokenKind {
    pub fn into_event(self) -> Event {
        match self {
            TokenKind::True => Event::PrimitiveBoolean(true),
            TokenKind::False => Event::PrimitiveBoolean(false),
            TokenKind::Null => Event::PrimitiveNull,
            TokenKind::Undefined => Event::PrimitiveUndefined,
            TokenKind::NaN => Event::PrimitiveNumber(Number::F64(f64::NAN)),
            TokenKind::Infinity => Event::PrimitiveNumber(Number::F64(f64::INFINITY)),
            TokenKind::NegInfinity => Event::PrimitiveNumber(Number::F64(f64::NEG_INFINITY)),
        }
    }
}
