//! The structural event model shared by the JSON reader and the MessagePack
//! writer (and, in principle, by any other codec built against this core).

use crate::number::Number;

/// Sentinel size used by `StartMap`/`StartList`/`StartString`/`StartBuffer`
/// to mean "indeterminate length, terminated by a matching `End*`".
pub const INDETERMINATE: i64 = -1;

/// A CBOR-style semantic tag. Applies to the single event that follows it.
pub type Tag = u64;

/// A CBOR simple value other than `true`/`false`/`null`/`undefined`
/// (those have their own [`Event`] variants).
pub type Simple = u8;

/// One item of the structural event stream exchanged between a reader and a
/// writer.
///
/// Composite sizes are either a non-negative count of child events or
/// [`INDETERMINATE`], meaning the composite is terminated by a matching
/// `End*` instead.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    StartMap(i64),
    EndMap,

    StartList(i64),
    EndList,

    StartString(i64),
    StringData(String),
    EndString,

    StartBuffer(i64),
    BufferData(Vec<u8>),
    EndBuffer,

    PrimitiveNumber(Number),
    PrimitiveBoolean(bool),
    PrimitiveNull,
    PrimitiveUndefined,

    /// Applies to the event that immediately follows it.
    Tag(Tag),

    /// A CBOR simple value. Rejected by the MessagePack writer.
    Simple(Simple),
}

impl Event {
    pub fn is_start(&self) -> bool {
        matches!(
            self,
            Event::StartMap(_) | Event::StartList(_) | Event::StartString(_) | Event::StartBuffer(_)
        )
    }

    pub fn is_end(&self) -> bool {
        matches!(
            self,
            Event::EndMap | Event::EndList | Event::EndString | Event::EndBuffer
        )
    }
}
