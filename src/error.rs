//! Error types shared by the source abstraction, the JSON reader and the
//! MessagePack writer.

use std::io;
use std::num::ParseFloatError;
use std::str::Utf8Error;

use bigdecimal::ParseBigDecimalError;
use btoi::ParseIntegerError;
use num_bigint::ParseBigIntError;
use thiserror::Error;

/// An error that can happen when reading the current value as a string.
#[derive(Error, Debug)]
#[error("invalid string: {0}")]
pub struct InvalidStringValueError(#[from] pub Utf8Error);

/// An error that can happen when trying to parse the current value to an
/// integer.
#[derive(Error, Debug)]
pub enum InvalidIntValueError {
    #[error("unable to convert current value to string: {0}")]
    String(#[from] InvalidStringValueError),

    #[error("unable to parse current value to integer: {0}")]
    Int(#[from] ParseIntegerError),

    #[error("unable to parse current value to big integer: {0}")]
    BigInt(#[from] ParseBigIntError),
}

/// An error that can happen when trying to parse the current value to a
/// float or big decimal.
#[derive(Error, Debug)]
pub enum InvalidFloatValueError {
    #[error("unable to convert current value to string: {0}")]
    String(#[from] InvalidStringValueError),

    #[error("unable to parse current value to float: {0}")]
    Float(#[from] ParseFloatError),

    #[error("unable to parse current value to big decimal: {0}")]
    BigDecimal(#[from] ParseBigDecimalError),
}

/// An error reported by a [`ByteSource`](crate::source::ByteSource) or
/// [`CharSource`](crate::source::CharSource).
#[derive(Error, Debug)]
pub enum SourceError {
    /// `reset()` was called after the mark had already expired, or without a
    /// prior call to `mark()`.
    #[error("mark has expired or was never set")]
    ExpiredMark,

    /// The underlying stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// An error that can happen while reading a JSON (or CBOR-diagnostic JSON)
/// text.
#[derive(Error, Debug)]
pub enum ReaderError {
    /// The input contains an illegal byte (e.g. a non-whitespace control
    /// character inside a string).
    #[error("JSON text contains an illegal byte at {position}: `{byte}' (0x{byte:02x})", byte = .0, position = .1)]
    IllegalInput(u8, crate::position::Position),

    /// The parsed text is not valid JSON. Carries the offending token or
    /// character (control chars escaped `\uXXXX`, end of input rendered as
    /// `end of input`).
    #[error("syntax error at {position}: unexpected token `{token}'", token = .0, position = .1)]
    SyntaxError(String, crate::position::Position),

    /// A `\uXXXX` escape, a number literal, or a CBOR-diagnostic token could
    /// not be decoded.
    #[error("invalid literal {literal:?} at {position}: {reason}", literal = .0, position = .1, reason = .2)]
    InvalidLiteral(String, crate::position::Position, String),

    /// The nesting depth exceeded the configured maximum.
    #[error("maximum nesting depth exceeded at {0}")]
    DepthExceeded(crate::position::Position),

    /// Non-whitespace content followed the root value while the reader is
    /// configured to drain its source.
    #[error("trailing content at {0}")]
    TrailingContent(crate::position::Position),

    /// There is nothing more to parse: the source is final and was already
    /// exhausted, or `next()` was called again after a prior EOF.
    #[error("nothing more to parse")]
    NoMoreInput,

    #[error(transparent)]
    Source(#[from] SourceError),
}

/// An error that can happen while writing MessagePack-encoded events.
#[derive(Error, Debug)]
pub enum WriterError {
    /// A composite's declared size does not match the number of events it
    /// was asked to emit, or a negative `remaining` count was produced.
    #[error("event sequence overflowed its enclosing composite")]
    Overflow,

    /// MessagePack has no representation for an indeterminate-length map or
    /// list.
    #[error("MessagePack does not support composites of indeterminate size")]
    IndeterminateComposite,

    /// MessagePack has no representation for a CBOR `Simple` value.
    #[error("MessagePack does not support CBOR simple values")]
    UnsupportedSimple,

    /// A big integer did not fit into an unsigned 64-bit MessagePack
    /// integer.
    #[error("big integer does not fit into a MessagePack integer")]
    IntegerTooLarge,

    /// An event arrived outside of any open composite, or an `End*` arrived
    /// without a matching `Start*`.
    #[error("unexpected event: {0}")]
    UnexpectedEvent(&'static str),

    #[error(transparent)]
    Io(#[from] io::Error),
}
