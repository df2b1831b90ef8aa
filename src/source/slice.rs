use std::borrow::Cow;

use super::{ByteSource, CharSource};
use crate::error::SourceError;
use crate::position::Position;

/// A [`ByteSource`] over a borrowed, already-complete byte slice.
///
/// Since the whole buffer stays resident for the lifetime of the source,
/// `mark`/`reset` never expire.
pub struct SliceByteSource<'a> {
    slice: &'a [u8],
    pos: usize,
    mark: Option<usize>,
    position: Position,
    mark_position: Position,
}

impl<'a> SliceByteSource<'a> {
    pub fn new(slice: &'a [u8]) -> Self {
        SliceByteSource {
            slice,
            pos: 0,
            mark: None,
            position: Position::start(),
            mark_position: Position::start(),
        }
    }
}

impl<'a> ByteSource for SliceByteSource<'a> {
    fn available(&self) -> usize {
        self.slice.len() - self.pos
    }

    fn get(&mut self) -> Option<u8> {
        if self.pos >= self.slice.len() {
            return None;
        }
        let b = self.slice[self.pos];
        self.pos += 1;
        if b == b'\n' {
            self.position.advance_newline(1);
        } else {
            self.position.advance(1);
        }
        Some(b)
    }

    fn get_n(&mut self, n: usize) -> Result<Cow<'_, [u8]>, SourceError> {
        if self.available() < n {
            return Err(SourceError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "not enough bytes remaining",
            )));
        }
        let out = &self.slice[self.pos..self.pos + n];
        for &b in out {
            if b == b'\n' {
                self.position.advance_newline(1);
            } else {
                self.position.advance(1);
            }
        }
        self.pos += n;
        Ok(Cow::Borrowed(out))
    }

    fn mark(&mut self, _n: usize) {
        self.mark = Some(self.pos);
        self.mark_position = self.position;
    }

    fn reset(&mut self) -> Result<(), SourceError> {
        match self.mark.take() {
            Some(p) => {
                self.pos = p;
                self.position = self.mark_position;
                Ok(())
            }
            None => Err(SourceError::ExpiredMark),
        }
    }

    fn position(&self) -> Position {
        self.position
    }

    fn is_final(&self) -> bool {
        true
    }
}

/// A [`CharSource`] over a borrowed, already-complete `str`.
pub struct SliceCharSource<'a> {
    slice: &'a str,
    byte_pos: usize,
    mark: Option<usize>,
    position: Position,
    mark_position: Position,
    /// `false` if more input may still be appended (the string is not yet
    /// known to be complete), mirroring the streaming sources.
    is_final: bool,
}

impl<'a> SliceCharSource<'a> {
    pub fn new(slice: &'a str, is_final: bool) -> Self {
        SliceCharSource {
            slice,
            byte_pos: 0,
            mark: None,
            position: Position::start(),
            mark_position: Position::start(),
            is_final,
        }
    }
}

impl<'a> CharSource for SliceCharSource<'a> {
    fn available(&self) -> usize {
        self.slice[self.byte_pos..].chars().count()
    }

    fn get(&mut self) -> Result<Option<char>, SourceError> {
        let rest = &self.slice[self.byte_pos..];
        let Some(ch) = rest.chars().next() else {
            return Ok(None);
        };
        self.byte_pos += ch.len_utf8();
        if ch == '\n' {
            self.position.advance_newline(ch.len_utf8() as u64);
        } else {
            self.position.advance(ch.len_utf8() as u64);
        }
        Ok(Some(ch))
    }

    fn mark(&mut self, _n: usize) {
        self.mark = Some(self.byte_pos);
        self.mark_position = self.position;
    }

    fn reset(&mut self) -> Result<(), SourceError> {
        match self.mark.take() {
            Some(p) => {
                self.byte_pos = p;
                self.position = self.mark_position;
                Ok(())
            }
            None => Err(SourceError::ExpiredMark),
        }
    }

    fn position(&self) -> Position {
        self.position
    }

    fn is_final(&self) -> bool {
        self.is_final
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_source_mark_reset() {
        let mut s = SliceByteSource::new(b"abcdef");
        assert_eq!(s.get(), Some(b'a'));
        s.mark(8);
        assert_eq!(s.get(), Some(b'b'));
        assert_eq!(s.get(), Some(b'c'));
        s.reset().unwrap();
        assert_eq!(s.get(), Some(b'b'));
    }

    #[test]
    fn byte_source_reset_without_mark_fails() {
        let mut s = SliceByteSource::new(b"abc");
        assert!(matches!(s.reset(), Err(SourceError::ExpiredMark)));
    }

    #[test]
    fn char_source_counts_unicode_scalars() {
        let mut s = SliceCharSource::new("a\u{00e9}b", true);
        assert_eq!(s.available(), 3);
        assert_eq!(s.get().unwrap(), Some('a'));
        assert_eq!(s.get().unwrap(), Some('\u{00e9}'));
        assert_eq!(s.get().unwrap(), Some('b'));
        assert_eq!(s.get().unwrap(), None);
    }

    #[test]
    fn char_source_tracks_line_and_column() {
        let mut s = SliceCharSource::new("ab\ncd", true);
        s.get().unwrap();
        s.get().unwrap();
        s.get().unwrap(); // consumes '\n'
        let pos = s.position();
        assert_eq!(pos.line, 2);
        assert_eq!(pos.column, 1);
    }
}
