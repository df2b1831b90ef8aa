use std::borrow::Cow;
use std::cmp::min;
use std::collections::VecDeque;

use super::utf8::Utf8CharSource;
use super::{ByteSource, CharSource};
use crate::error::SourceError;
use crate::position::Position;

/// A [`ByteSource`] fed by pushing bytes in, generalizing
/// `PushJsonFeeder` with bounded
/// backtracking: bytes consumed since the most recent [`mark`](Self::mark)
/// are retained (up to the promised bound) so [`reset`](Self::reset) can
/// replay them.
///
/// The caller has to take care to only push as much data as the reader can
/// process at a time. Use [`is_full`](Self::is_full) to determine whether
/// more input is accepted; call [`done`](Self::done) once the input is
/// complete.
pub struct PushByteSource {
    input: VecDeque<u8>,
    done: bool,
    position: Position,
    mark: Option<MarkState>,
}

struct MarkState {
    limit: usize,
    retained: VecDeque<u8>,
    position: Position,
}

impl PushByteSource {
    pub fn new() -> Self {
        PushByteSource {
            input: VecDeque::with_capacity(1024),
            done: false,
            position: Position::start(),
            mark: None,
        }
    }

    /// Provide more data. Returns the number of bytes actually consumed,
    /// which can be less than `buf.len()` (or zero) if the source's
    /// internal buffer is full.
    pub fn push_bytes(&mut self, buf: &[u8]) -> usize {
        let n = min(buf.len(), self.input.capacity() - self.input.len());
        self.input.extend(buf.iter().take(n));
        n
    }

    pub fn is_full(&self) -> bool {
        self.input.len() == self.input.capacity()
    }

    /// Indicate that the end of input has been reached and no more bytes
    /// will be pushed.
    pub fn done(&mut self) {
        self.done = true;
    }
}

impl Default for PushByteSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteSource for PushByteSource {
    fn available(&self) -> usize {
        self.input.len()
    }

    fn get(&mut self) -> Option<u8> {
        let b = self.input.pop_front()?;
        if let Some(m) = &mut self.mark {
            m.retained.push_back(b);
            if m.retained.len() > m.limit {
                // The caller broke its promise to reset within `limit`
                // bytes; the mark is no longer honoured.
                self.mark = None;
            }
        }
        if b == b'\n' {
            self.position.advance_newline(1);
        } else {
            self.position.advance(1);
        }
        Some(b)
    }

    fn get_n(&mut self, n: usize) -> Result<Cow<'_, [u8]>, SourceError> {
        if self.input.len() < n {
            return Err(SourceError::Io(std::io::Error::new(
                std::io::ErrorKind::WouldBlock,
                "not enough bytes buffered yet",
            )));
        }
        let mut out = Vec::with_capacity(n);
        for _ in 0..n {
            out.push(self.get().expect("checked length above"));
        }
        Ok(Cow::Owned(out))
    }

    fn mark(&mut self, n: usize) {
        self.mark = Some(MarkState {
            limit: n,
            retained: VecDeque::new(),
            position: self.position,
        });
    }

    fn reset(&mut self) -> Result<(), SourceError> {
        let Some(mut m) = self.mark.take() else {
            return Err(SourceError::ExpiredMark);
        };
        while let Some(b) = m.retained.pop_back() {
            self.input.push_front(b);
        }
        self.position = m.position;
        Ok(())
    }

    fn position(&self) -> Position {
        self.position
    }

    fn is_final(&self) -> bool {
        self.done && self.input.is_empty()
    }
}

/// A [`CharSource`] fed by pushing UTF-8 bytes in. Thin wrapper around
/// [`PushByteSource`] plus UTF-8 decoding (see [`Utf8CharSource`]).
pub struct PushCharSource(Utf8CharSource<PushByteSource>);

impl PushCharSource {
    pub fn new() -> Self {
        PushCharSource(Utf8CharSource::new(PushByteSource::new()))
    }

    pub fn push_bytes(&mut self, buf: &[u8]) -> usize {
        self.byte_source_mut().push_bytes(buf)
    }

    pub fn is_full(&self) -> bool {
        self.byte_source().is_full()
    }

    pub fn done(&mut self) {
        self.byte_source_mut().done();
    }

    fn byte_source(&self) -> &PushByteSource {
        // Utf8CharSource keeps the byte source private; expose it here via
        // a small accessor so callers can drive the push protocol.
        self.inner_ref()
    }

    fn byte_source_mut(&mut self) -> &mut PushByteSource {
        self.inner_mut()
    }

    fn inner_ref(&self) -> &PushByteSource {
        &self.0.inner
    }

    fn inner_mut(&mut self) -> &mut PushByteSource {
        &mut self.0.inner
    }
}

impl Default for PushCharSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CharSource for PushCharSource {
    fn available(&self) -> usize {
        self.0.available()
    }

    fn get(&mut self) -> Result<Option<char>, SourceError> {
        self.0.get()
    }

    fn mark(&mut self, n: usize) {
        self.0.mark(n)
    }

    fn reset(&mut self) -> Result<(), SourceError> {
        self.0.reset()
    }

    fn position(&self) -> Position {
        self.0.position()
    }

    fn is_final(&self) -> bool {
        self.0.is_final()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_input_after_push() {
        let mut s = PushByteSource::new();
        assert_eq!(s.available(), 0);
        s.push_bytes(b"a");
        assert_eq!(s.available(), 1);
    }

    #[test]
    fn is_full_and_push_bytes_returns_consumed_count() {
        let mut s = PushByteSource {
            input: VecDeque::with_capacity(4),
            done: false,
            position: Position::start(),
            mark: None,
        };
        assert_eq!(s.push_bytes(b"abcdef"), 4);
        assert!(s.is_full());
    }

    #[test]
    fn mark_reset_replays_bytes() {
        let mut s = PushByteSource::new();
        s.push_bytes(b"abcdef");
        assert_eq!(s.get(), Some(b'a'));
        s.mark(8);
        assert_eq!(s.get(), Some(b'b'));
        assert_eq!(s.get(), Some(b'c'));
        s.reset().unwrap();
        assert_eq!(s.get(), Some(b'b'));
        assert_eq!(s.get(), Some(b'c'));
        assert_eq!(s.get(), Some(b'd'));
    }

    #[test]
    fn mark_expires_beyond_limit() {
        let mut s = PushByteSource::new();
        s.push_bytes(b"abcdef");
        s.mark(1);
        s.get();
        s.get();
        assert!(matches!(s.reset(), Err(SourceError::ExpiredMark)));
    }

    #[test]
    fn is_done_once_input_drained() {
        let mut s = PushByteSource::new();
        s.push_bytes(b"a");
        s.done();
        assert!(!s.is_final());
        s.get();
        assert!(s.is_final());
    }
}
