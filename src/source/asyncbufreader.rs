use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

use super::utf8::Utf8CharSource;
use super::{ByteSource, CharSource};
use crate::error::SourceError;
use crate::position::Position;

/// A [`ByteSource`] that reads from an asynchronous [`BufReader`], mirroring
/// `AsyncBufReaderJsonFeeder`.
pub struct AsyncBufReaderByteSource<T> {
    reader: BufReader<T>,
    filled: bool,
    pos: usize,
    position: Position,
    mark: Option<(usize, Position)>,
}

impl<T> AsyncBufReaderByteSource<T>
where
    T: AsyncRead + Unpin,
{
    pub fn new(reader: BufReader<T>) -> Self {
        AsyncBufReaderByteSource {
            reader,
            filled: false,
            pos: 0,
            position: Position::start(),
            mark: None,
        }
    }

    pub async fn fill_buf(&mut self) -> Result<(), SourceError> {
        self.reader.consume(self.pos);
        self.reader.fill_buf().await?;
        self.filled = true;
        self.pos = 0;
        Ok(())
    }
}

impl<T> ByteSource for AsyncBufReaderByteSource<T>
where
    T: AsyncRead + Unpin,
{
    fn available(&self) -> usize {
        self.reader.buffer().len() - self.pos
    }

    fn get(&mut self) -> Option<u8> {
        let buf = self.reader.buffer();
        if self.pos >= buf.len() {
            return None;
        }
        let b = buf[self.pos];
        self.pos += 1;
        if b == b'\n' {
            self.position.advance_newline(1);
        } else {
            self.position.advance(1);
        }
        Some(b)
    }

    fn get_n(&mut self, n: usize) -> Result<std::borrow::Cow<'_, [u8]>, SourceError> {
        if self.available() < n {
            return Err(SourceError::Io(std::io::Error::new(
                std::io::ErrorKind::WouldBlock,
                "not enough bytes buffered yet",
            )));
        }
        let out = self.reader.buffer()[self.pos..self.pos + n].to_vec();
        for &b in &out {
            if b == b'\n' {
                self.position.advance_newline(1);
            } else {
                self.position.advance(1);
            }
        }
        self.pos += n;
        Ok(std::borrow::Cow::Owned(out))
    }

    fn mark(&mut self, _n: usize) {
        self.mark = Some((self.pos, self.position));
    }

    fn reset(&mut self) -> Result<(), SourceError> {
        match self.mark.take() {
            Some((pos, position)) if pos <= self.reader.buffer().len() => {
                self.pos = pos;
                self.position = position;
                Ok(())
            }
            _ => Err(SourceError::ExpiredMark),
        }
    }

    fn position(&self) -> Position {
        self.position
    }

    fn is_final(&self) -> bool {
        self.filled && self.reader.buffer().is_empty()
    }
}

/// A [`CharSource`] that reads from an asynchronous [`BufReader`], decoding
/// UTF-8 on top of [`AsyncBufReaderByteSource`].
pub struct AsyncBufReaderCharSource<T>(Utf8CharSource<AsyncBufReaderByteSource<T>>);

impl<T> AsyncBufReaderCharSource<T>
where
    T: AsyncRead + Unpin,
{
    pub fn new(reader: BufReader<T>) -> Self {
        AsyncBufReaderCharSource(Utf8CharSource::new(AsyncBufReaderByteSource::new(reader)))
    }

    pub async fn fill_buf(&mut self) -> Result<(), SourceError> {
        self.0.inner.fill_buf().await
    }
}

impl<T> CharSource for AsyncBufReaderCharSource<T>
where
    T: AsyncRead + Unpin,
{
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
