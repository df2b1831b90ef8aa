use super::{ByteSource, CharSource};
use crate::error::SourceError;
use crate::position::Position;

/// Decodes UTF-8 scalar values on top of any [`ByteSource`], generalizing the
/// approach `encoding_rs_io`/`BufReader`-backed char iterators use to turn a
/// byte stream into a char stream: pull bytes, buffer a partial multi-byte
/// sequence until it is complete, decode, and track line/column on the
/// decoded char rather than on individual bytes.
///
/// A multi-byte sequence split across two pushes of a non-final source is
/// not an error: the leading bytes are held in `partial` and `get()` returns
/// `Ok(None)` (the same "come back later" signal every source uses) until
/// the rest arrives.
///
/// `mark`/`reset` on the char source are expressed in terms of the
/// underlying byte source's own mark/reset, using a worst-case 4-bytes-per-char
/// bound so a caller's char-count promise is always honoured.
pub struct Utf8CharSource<B> {
    pub(crate) inner: B,
    position: Position,
    partial: Vec<u8>,
}

impl<B: ByteSource> Utf8CharSource<B> {
    pub fn new(inner: B) -> Self {
        Utf8CharSource {
            inner,
            position: Position::start(),
            partial: Vec::with_capacity(4),
        }
    }

    pub fn into_inner(self) -> B {
        self.inner
    }

    fn decode_one(&mut self) -> Result<Option<char>, SourceError> {
        if self.partial.is_empty() {
            let Some(first) = self.inner.get() else {
                return Ok(None);
            };
            self.partial.push(first);
        }
        let len = utf8_len(self.partial[0]);
        while self.partial.len() < len {
            match self.inner.get() {
                Some(b) => self.partial.push(b),
                None => {
                    if self.inner.is_final() {
                        self.partial.clear();
                        return Err(SourceError::Io(std::io::Error::new(
                            std::io::ErrorKind::UnexpectedEof,
                            "truncated UTF-8 sequence",
                        )));
                    }
                    // The rest of the sequence hasn't arrived yet; keep what
                    // we have and ask the caller to come back later.
                    return Ok(None);
                }
            }
        }
        let s = std::str::from_utf8(&self.partial)
            .map_err(|e| SourceError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
        let ch = s.chars().next();
        self.partial.clear();
        Ok(ch)
    }
}

fn utf8_len(first: u8) -> usize {
    if first & 0x80 == 0 {
        1
    } else if first & 0xE0 == 0xC0 {
        2
    } else if first & 0xF0 == 0xE0 {
        3
    } else {
        4
    }
}

impl<B: ByteSource> CharSource for Utf8CharSource<B> {
    fn available(&self) -> usize {
        // A lower bound: every available byte is at least one ASCII char's
        // worth. Exact char counts would require decoding ahead of time.
        self.inner.available()
    }

    fn get(&mut self) -> Result<Option<char>, SourceError> {
        let ch = self.decode_one()?;
        if let Some(c) = ch {
            let len = c.len_utf8() as u64;
            if c == '\n' {
                self.position.advance_newline(len);
            } else {
                self.position.advance(len);
            }
        }
        Ok(ch)
    }

    fn mark(&mut self, n: usize) {
        self.inner.mark(n.saturating_mul(4));
    }

    fn reset(&mut self) -> Result<(), SourceError> {
        self.inner.reset()?;
        self.partial.clear();
        Ok(())
    }

    fn position(&self) -> Position {
        self.position
    }

    fn is_final(&self) -> bool {
        self.inner.is_final() && self.partial.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SliceByteSource;

    #[test]
    fn decodes_multibyte_sequences() {
        let mut s = Utf8CharSource::new(SliceByteSource::new("a\u{00e9}\u{1f600}".as_bytes()));
        assert_eq!(s.get().unwrap(), Some('a'));
        assert_eq!(s.get().unwrap(), Some('\u{00e9}'));
        assert_eq!(s.get().unwrap(), Some('\u{1f600}'));
        assert_eq!(s.get().unwrap(), None);
    }

    #[test]
    fn pauses_on_a_sequence_split_across_pushes() {
        use super::super::PushByteSource;

        let mut inner = PushByteSource::new();
        let bytes = "\u{00e9}".as_bytes(); // 2-byte sequence: 0xC3 0xA9
        inner.push_bytes(&bytes[..1]);
        let mut s = Utf8CharSource::new(inner);
        assert_eq!(s.get().unwrap(), None);
        assert!(!s.is_final());
        s.inner.push_bytes(&bytes[1..]);
        assert_eq!(s.get().unwrap(), Some('\u{00e9}'));
    }
}
