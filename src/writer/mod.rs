//! A resumable, event-consuming MessagePack writer: the counterpart to
//! [`JsonReader`](crate::reader::JsonReader). Feed it the same [`Event`]
//! stream a reader produces (from any source, not only this crate's JSON
//! reader) and it emits MessagePack bytes.
//!
//! Structural state is a stack of `(kind, remaining)` frames, the same
//! shape the reader's frame stack uses on the decode side: opening a map or
//! list writes its header immediately (MessagePack has no indefinite-length
//! composites) and pushes a frame counting down the entries still owed;
//! closing one pops it and counts as a completed value against the parent.

use std::io::Write;

use crate::error::WriterError;
use crate::event::{Event, Tag, INDETERMINATE};
use crate::number::Number;
use crate::options::WriterOptions;

const MSGPACK_NIL: u8 = 0xc0;
const MSGPACK_FALSE: u8 = 0xc2;
const MSGPACK_TRUE: u8 = 0xc3;
const MSGPACK_BIN8: u8 = 0xc4;
const MSGPACK_BIN16: u8 = 0xc5;
const MSGPACK_BIN32: u8 = 0xc6;
const MSGPACK_EXT8: u8 = 0xc7;
const MSGPACK_EXT16: u8 = 0xc8;
const MSGPACK_EXT32: u8 = 0xc9;
const MSGPACK_FLOAT32: u8 = 0xca;
const MSGPACK_FLOAT64: u8 = 0xcb;
const MSGPACK_UINT8: u8 = 0xcc;
const MSGPACK_UINT16: u8 = 0xcd;
const MSGPACK_UINT32: u8 = 0xce;
const MSGPACK_UINT64: u8 = 0xcf;
const MSGPACK_INT8: u8 = 0xd0;
const MSGPACK_INT16: u8 = 0xd1;
const MSGPACK_INT32: u8 = 0xd2;
const MSGPACK_INT64: u8 = 0xd3;
const MSGPACK_FIXEXT1: u8 = 0xd4;
const MSGPACK_FIXEXT2: u8 = 0xd5;
const MSGPACK_FIXEXT4: u8 = 0xd6;
const MSGPACK_FIXEXT8: u8 = 0xd7;
const MSGPACK_FIXEXT16: u8 = 0xd8;
const MSGPACK_STR8: u8 = 0xd9;
const MSGPACK_STR16: u8 = 0xda;
const MSGPACK_STR32: u8 = 0xdb;
const MSGPACK_ARRAY16: u8 = 0xdc;
const MSGPACK_ARRAY32: u8 = 0xdd;
const MSGPACK_MAP16: u8 = 0xde;
const MSGPACK_MAP32: u8 = 0xdf;
const MSGPACK_FIXMAP_MIN: u8 = 0x80;
const MSGPACK_FIXARRAY_MIN: u8 = 0x90;
const MSGPACK_FIXSTR_MIN: u8 = 0xa0;

enum FrameKind {
    List,
    Map,
}

struct Frame {
    kind: FrameKind,
    remaining: i64,
}

/// What the writer is in the middle of streaming, if anything.
enum Pending {
    None,
    /// Header already written; each `StringData`/`BufferData` chunk goes
    /// straight to the output.
    KnownString,
    KnownBuffer,
    /// Size was indeterminate; chunks are spooled until the matching `End*`
    /// reveals the total length the header needs.
    SpoolString(Vec<u8>),
    SpoolBuffer(Vec<u8>),
}

/// A MessagePack writer driven by [`Event`]s.
pub struct MsgpackWriter<W> {
    out: W,
    #[allow(dead_code)]
    options: WriterOptions,
    stack: Vec<Frame>,
    pending_tag: Option<Tag>,
    pending: Pending,
}

impl<W> MsgpackWriter<W>
where
    W: Write,
{
    pub fn new(out: W) -> Self {
        Self::with_options(out, WriterOptions::default())
    }

    pub fn with_options(out: W, options: WriterOptions) -> Self {
        MsgpackWriter {
            out,
            options,
            stack: Vec::new(),
            pending_tag: None,
            pending: Pending::None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Consume one event. Returns `Ok(true)` exactly when the event just
    /// completed the outermost (root) value.
    pub fn write_event(&mut self, event: &Event) -> Result<bool, WriterError> {
        match event {
            Event::StartMap(n) => {
                self.start_composite(FrameKind::Map, *n)?;
                Ok(false)
            }
            Event::EndMap => self.end_composite(),
            Event::StartList(n) => {
                self.start_composite(FrameKind::List, *n)?;
                Ok(false)
            }
            Event::EndList => self.end_composite(),
            Event::StartString(n) => {
                self.start_string(*n)?;
                Ok(false)
            }
            Event::StringData(s) => {
                self.string_data(s)?;
                Ok(false)
            }
            Event::EndString => self.end_string(),
            Event::StartBuffer(n) => {
                self.start_buffer(*n)?;
                Ok(false)
            }
            Event::BufferData(b) => {
                self.buffer_data(b)?;
                Ok(false)
            }
            Event::EndBuffer => self.end_buffer(),
            Event::PrimitiveNumber(n) => {
                self.write_number(n)?;
                self.after_value()
            }
            Event::PrimitiveBoolean(b) => {
                self.write_u8(if *b { MSGPACK_TRUE } else { MSGPACK_FALSE })?;
                self.after_value()
            }
            Event::PrimitiveNull | Event::PrimitiveUndefined => {
                self.write_u8(MSGPACK_NIL)?;
                self.after_value()
            }
            Event::Tag(t) => {
                // Last one wins if several arrive before a value.
                self.pending_tag = Some(*t);
                Ok(false)
            }
            Event::Simple(_) => Err(WriterError::UnsupportedSimple),
        }
    }

    fn start_composite(&mut self, kind: FrameKind, n: i64) -> Result<(), WriterError> {
        if n == INDETERMINATE {
            return Err(WriterError::IndeterminateComposite);
        }
        let n = n as u64;
        match kind {
            FrameKind::Map => self.write_map_header(n)?,
            FrameKind::List => self.write_array_header(n)?,
        }
        let remaining = match kind {
            FrameKind::Map => (n as i64).checked_mul(2).ok_or(WriterError::IntegerTooLarge)?,
            FrameKind::List => n as i64,
        };
        self.stack.push(Frame { kind, remaining });
        Ok(())
    }

    fn end_composite(&mut self) -> Result<bool, WriterError> {
        let frame = self
            .stack
            .pop()
            .ok_or(WriterError::UnexpectedEvent("End* without a matching Start*"))?;
        if frame.remaining != 0 {
            return Err(WriterError::UnexpectedEvent(
                "End* arrived before the composite's declared size was reached",
            ));
        }
        self.after_value()
    }

    /// Record that a value (scalar, or just-closed composite) completed,
    /// decrementing the enclosing frame's remaining count. `Ok(true)` means
    /// the root value is now fully written.
    fn after_value(&mut self) -> Result<bool, WriterError> {
        self.pending_tag = None;
        match self.stack.last_mut() {
            None => Ok(true),
            Some(frame) => {
                frame.remaining -= 1;
                if frame.remaining < 0 {
                    return Err(WriterError::Overflow);
                }
                Ok(false)
            }
        }
    }

    fn start_string(&mut self, n: i64) -> Result<(), WriterError> {
        self.pending = if n == INDETERMINATE {
            Pending::SpoolString(Vec::new())
        } else {
            self.write_str_header(n as u64)?;
            Pending::KnownString
        };
        Ok(())
    }

    fn string_data(&mut self, s: &str) -> Result<(), WriterError> {
        match &mut self.pending {
            Pending::KnownString => Ok(self.out.write_all(s.as_bytes())?),
            Pending::SpoolString(buf) => {
                buf.extend_from_slice(s.as_bytes());
                Ok(())
            }
            _ => Err(WriterError::UnexpectedEvent("StringData outside of a string")),
        }
    }

    fn end_string(&mut self) -> Result<bool, WriterError> {
        match std::mem::replace(&mut self.pending, Pending::None) {
            Pending::KnownString => self.after_value(),
            Pending::SpoolString(buf) => {
                self.write_str_header(buf.len() as u64)?;
                self.out.write_all(&buf)?;
                self.after_value()
            }
            _ => Err(WriterError::UnexpectedEvent("EndString without a matching StartString")),
        }
    }

    fn start_buffer(&mut self, n: i64) -> Result<(), WriterError> {
        self.pending = if n == INDETERMINATE {
            Pending::SpoolBuffer(Vec::new())
        } else {
            let tag = self.pending_tag.take();
            self.write_buffer_header(n as u64, tag)?;
            Pending::KnownBuffer
        };
        Ok(())
    }

    fn buffer_data(&mut self, b: &[u8]) -> Result<(), WriterError> {
        match &mut self.pending {
            Pending::KnownBuffer => Ok(self.out.write_all(b)?),
            Pending::SpoolBuffer(buf) => {
                buf.extend_from_slice(b);
                Ok(())
            }
            _ => Err(WriterError::UnexpectedEvent("BufferData outside of a buffer")),
        }
    }

    fn end_buffer(&mut self) -> Result<bool, WriterError> {
        match std::mem::replace(&mut self.pending, Pending::None) {
            Pending::KnownBuffer => self.after_value(),
            Pending::SpoolBuffer(buf) => {
                let tag = self.pending_tag.take();
                self.write_buffer_header(buf.len() as u64, tag)?;
                self.out.write_all(&buf)?;
                self.after_value()
            }
            _ => Err(WriterError::UnexpectedEvent("EndBuffer without a matching StartBuffer")),
        }
    }

    fn write_map_header(&mut self, n: u64) -> Result<(), WriterError> {
        if n <= 0xf {
            self.write_u8(MSGPACK_FIXMAP_MIN | n as u8)
        } else if n <= 0xffff {
            self.write_u8(MSGPACK_MAP16)?;
            self.write_u16(n as u16)
        } else if n <= 0xffff_ffff {
            self.write_u8(MSGPACK_MAP32)?;
            self.write_u32(n as u32)
        } else {
            Err(WriterError::IntegerTooLarge)
        }
    }

    fn write_array_header(&mut self, n: u64) -> Result<(), WriterError> {
        if n <= 0xf {
            self.write_u8(MSGPACK_FIXARRAY_MIN | n as u8)
        } else if n <= 0xffff {
            self.write_u8(MSGPACK_ARRAY16)?;
            self.write_u16(n as u16)
        } else if n <= 0xffff_ffff {
            self.write_u8(MSGPACK_ARRAY32)?;
            self.write_u32(n as u32)
        } else {
            Err(WriterError::IntegerTooLarge)
        }
    }

    fn write_str_header(&mut self, n: u64) -> Result<(), WriterError> {
        if n <= 31 {
            self.write_u8(MSGPACK_FIXSTR_MIN | n as u8)
        } else if n <= 0xff {
            self.write_u8(MSGPACK_STR8)?;
            self.write_u8(n as u8)
        } else if n <= 0xffff {
            self.write_u8(MSGPACK_STR16)?;
            self.write_u16(n as u16)
        } else if n <= 0xffff_ffff {
            self.write_u8(MSGPACK_STR32)?;
            self.write_u32(n as u32)
        } else {
            Err(WriterError::IntegerTooLarge)
        }
    }

    fn write_buffer_header(&mut self, n: u64, tag: Option<Tag>) -> Result<(), WriterError> {
        match tag {
            Some(t) => {
                let type_byte = u8::try_from(t).map_err(|_| WriterError::IntegerTooLarge)?;
                match n {
                    1 => self.write_u8(MSGPACK_FIXEXT1),
                    2 => self.write_u8(MSGPACK_FIXEXT2),
                    4 => self.write_u8(MSGPACK_FIXEXT4),
                    8 => self.write_u8(MSGPACK_FIXEXT8),
                    16 => self.write_u8(MSGPACK_FIXEXT16),
                    _ if n <= 0xff => {
                        self.write_u8(MSGPACK_EXT8)?;
                        self.write_u8(n as u8)
                    }
                    _ if n <= 0xffff => {
                        self.write_u8(MSGPACK_EXT16)?;
                        self.write_u16(n as u16)
                    }
                    _ if n <= 0xffff_ffff => {
                        self.write_u8(MSGPACK_EXT32)?;
                        self.write_u32(n as u32)
                    }
                    _ => return Err(WriterError::IntegerTooLarge),
                }?;
                self.write_u8(type_byte)
            }
            None => {
                if n <= 0xff {
                    self.write_u8(MSGPACK_BIN8)?;
                    self.write_u8(n as u8)
                } else if n <= 0xffff {
                    self.write_u8(MSGPACK_BIN16)?;
                    self.write_u16(n as u16)
                } else if n <= 0xffff_ffff {
                    self.write_u8(MSGPACK_BIN32)?;
                    self.write_u32(n as u32)
                } else {
                    Err(WriterError::IntegerTooLarge)
                }
            }
        }
    }

    fn write_number(&mut self, n: &Number) -> Result<(), WriterError> {
        match n {
            Number::I32(v) => self.write_int(*v as i64),
            Number::I64(v) => self.write_int(*v),
            Number::BigInt(v) => {
                if let Some(u) = num_traits::ToPrimitive::to_u64(v) {
                    self.write_u8(MSGPACK_UINT64)?;
                    self.write_u64(u)
                } else if let Some(i) = num_traits::ToPrimitive::to_i64(v) {
                    self.write_int(i)
                } else {
                    Err(WriterError::IntegerTooLarge)
                }
            }
            Number::F32(v) => {
                self.write_u8(MSGPACK_FLOAT32)?;
                self.write_u32(v.to_bits())
            }
            Number::F64(v) => {
                self.write_u8(MSGPACK_FLOAT64)?;
                self.write_f64(*v)
            }
            Number::BigDecimal(v) => {
                let f = num_traits::ToPrimitive::to_f64(v).unwrap_or(f64::NAN);
                self.write_u8(MSGPACK_FLOAT64)?;
                self.write_f64(f)
            }
        }
    }

    fn write_int(&mut self, v: i64) -> Result<(), WriterError> {
        if (-32..=127).contains(&v) {
            self.write_u8(v as i8 as u8)
        } else if (0..=0xff).contains(&v) {
            self.write_u8(MSGPACK_UINT8)?;
            self.write_u8(v as u8)
        } else if (0..=0xffff).contains(&v) {
            self.write_u8(MSGPACK_UINT16)?;
            self.write_u16(v as u16)
        } else if (0..=0xffff_ffff).contains(&v) {
            self.write_u8(MSGPACK_UINT32)?;
            self.write_u32(v as u32)
        } else if v >= 0 {
            self.write_u8(MSGPACK_UINT64)?;
            self.write_u64(v as u64)
        } else if (-0x80..0).contains(&v) {
            self.write_u8(MSGPACK_INT8)?;
            self.write_u8(v as i8 as u8)
        } else if (-0x8000..0).contains(&v) {
            self.write_u8(MSGPACK_INT16)?;
            self.write_u16(v as i16 as u16)
        } else if (-0x8000_0000i64..0).contains(&v) {
            self.write_u8(MSGPACK_INT32)?;
            self.write_u32(v as i32 as u32)
        } else {
            self.write_u8(MSGPACK_INT64)?;
            self.write_i64(v)
        }
    }

    fn write_u8(&mut self, b: u8) -> Result<(), WriterError> {
        self.out.write_all(&[b]).map_err(WriterError::from)
    }

    fn write_u16(&mut self, v: u16) -> Result<(), WriterError> {
        self.out.write_all(&v.to_be_bytes()).map_err(WriterError::from)
    }

    fn write_u32(&mut self, v: u32) -> Result<(), WriterError> {
        self.out.write_all(&v.to_be_bytes()).map_err(WriterError::from)
    }

    fn write_u64(&mut self, v: u64) -> Result<(), WriterError> {
        self.out.write_all(&v.to_be_bytes()).map_err(WriterError::from)
    }

    fn write_i64(&mut self, v: i64) -> Result<(), WriterError> {
        self.out.write_all(&v.to_be_bytes()).map_err(WriterError::from)
    }

    fn write_f64(&mut self, v: f64) -> Result<(), WriterError> {
        self.out.write_all(&v.to_be_bytes()).map_err(WriterError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;

    fn write_all(events: &[Event]) -> Vec<u8> {
        let mut out = Vec::new();
        let mut writer = MsgpackWriter::new(&mut out);
        for e in events {
            writer.write_event(e).unwrap();
        }
        out
    }

    #[test]
    fn encodes_small_positive_fixint() {
        let out = write_all(&[Event::PrimitiveNumber(Number::I32(1))]);
        assert_eq!(out, vec![0x01]);
    }

    #[test]
    fn encodes_negative_fixint() {
        let out = write_all(&[Event::PrimitiveNumber(Number::I32(-3))]);
        assert_eq!(out, vec![0xfd]);
    }

    #[test]
    fn encodes_u16_integer() {
        let out = write_all(&[Event::PrimitiveNumber(Number::I32(1000))]);
        assert_eq!(out, vec![MSGPACK_UINT16, 0x03, 0xe8]);
    }

    #[test]
    fn encodes_f32_as_float32() {
        let out = write_all(&[Event::PrimitiveNumber(Number::F32(1.5))]);
        assert_eq!(out, vec![MSGPACK_FLOAT32, 0x3f, 0xc0, 0x00, 0x00]);
    }

    #[test]
    fn encodes_known_length_string() {
        let out = write_all(&[
            Event::StartString(2),
            Event::StringData("hi".into()),
            Event::EndString,
        ]);
        assert_eq!(out, vec![MSGPACK_FIXSTR_MIN | 2, b'h', b'i']);
    }

    #[test]
    fn encodes_indeterminate_string_by_spooling() {
        let out = write_all(&[
            Event::StartString(INDETERMINATE),
            Event::StringData("he".into()),
            Event::StringData("llo".into()),
            Event::EndString,
        ]);
        assert_eq!(out, vec![MSGPACK_FIXSTR_MIN | 5, b'h', b'e', b'l', b'l', b'o']);
    }

    #[test]
    fn encodes_flat_map() {
        let out = write_all(&[
            Event::StartMap(1),
            Event::StartString(1),
            Event::StringData("a".into()),
            Event::EndString,
            Event::PrimitiveNumber(Number::I32(1)),
            Event::EndMap,
        ]);
        assert_eq!(
            out,
            vec![MSGPACK_FIXMAP_MIN | 1, MSGPACK_FIXSTR_MIN | 1, b'a', 0x01]
        );
    }

    #[test]
    fn rejects_indeterminate_composite() {
        let mut out = Vec::new();
        let mut writer = MsgpackWriter::new(&mut out);
        let err = writer.write_event(&Event::StartList(INDETERMINATE)).unwrap_err();
        assert!(matches!(err, WriterError::IndeterminateComposite));
    }

    #[test]
    fn encodes_tagged_buffer_as_fixext() {
        let out = write_all(&[
            Event::Tag(2),
            Event::StartBuffer(4),
            Event::BufferData(vec![1, 2, 3, 4]),
            Event::EndBuffer,
        ]);
        assert_eq!(out, vec![MSGPACK_FIXEXT4, 2, 1, 2, 3, 4]);
    }

    #[test]
    fn encodes_untagged_buffer_as_bin8() {
        let out = write_all(&[
            Event::StartBuffer(3),
            Event::BufferData(vec![9, 9, 9]),
            Event::EndBuffer,
        ]);
        assert_eq!(out, vec![MSGPACK_BIN8, 3, 9, 9, 9]);
    }

    #[test]
    fn root_value_completion_is_reported() {
        let mut out = Vec::new();
        let mut writer = MsgpackWriter::new(&mut out);
        assert!(!writer.write_event(&Event::StartList(1)).unwrap());
        assert!(!writer
            .write_event(&Event::PrimitiveNumber(Number::I32(1)))
            .unwrap());
        assert!(writer.write_event(&Event::EndList).unwrap());
    }

    #[test]
    fn simple_values_are_unsupported() {
        let mut out = Vec::new();
        let mut writer = MsgpackWriter::new(&mut out);
        assert!(matches!(
            writer.write_event(&Event::Simple(0)),
            Err(WriterError::UnsupportedSimple)
        ));
    }
}
