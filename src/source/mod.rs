//! Mark-capable, position-tracking byte and character sources.
//!
//! This mirrors the push/slice/`BufReader` feeder trio the reader's ancestor
//! used to pull raw bytes, generalized in two ways: a [`CharSource`] layer
//! decodes UTF-8 on top of any [`ByteSource`] so the reader can work in
//! Unicode scalar values directly, and every source supports bounded
//! backtracking via [`mark`](ByteSource::mark)/[`reset`](ByteSource::reset).

mod bufreader;
mod chained;
mod push;
mod slice;
mod utf8;

pub use bufreader::{BufReaderByteSource, BufReaderCharSource};
pub use chained::{ChainedByteSource, ChainedCharSource};
pub use push::{PushByteSource, PushCharSource};
pub use slice::{SliceByteSource, SliceCharSource};
pub use utf8::Utf8CharSource;

#[cfg(feature = "tokio")]
mod asyncbufreader;
#[cfg(feature = "tokio")]
pub use asyncbufreader::{AsyncBufReaderByteSource, AsyncBufReaderCharSource};

use crate::error::SourceError;
use crate::position::Position;

/// A resumable, mark-capable source of raw bytes.
pub trait ByteSource {
    /// Number of bytes immediately available without further I/O.
    fn available(&self) -> usize;

    /// The next byte, or `None` at EOF.
    fn get(&mut self) -> Option<u8>;

    /// Exactly `n` bytes, or `Err` if fewer than `n` are (and will be)
    /// available. May return a borrowed or an owned slice.
    fn get_n(&mut self, n: usize) -> Result<std::borrow::Cow<'_, [u8]>, SourceError>;

    /// Record the current position. The caller promises to call
    /// [`reset`](Self::reset) within `n` consumed bytes, or not at all.
    fn mark(&mut self, n: usize);

    /// Return to the most recent mark.
    fn reset(&mut self) -> Result<(), SourceError>;

    /// Running position counters.
    fn position(&self) -> Position;

    /// `true` if no more bytes will ever become available beyond what
    /// `available()` already reports (the source will not block for more
    /// input).
    fn is_final(&self) -> bool;
}

/// A resumable, mark-capable source of Unicode scalar values.
pub trait CharSource {
    /// Number of chars immediately available without further I/O.
    fn available(&self) -> usize;

    /// The next char, or `None` at EOF.
    fn get(&mut self) -> Result<Option<char>, SourceError>;

    /// Record the current position. The caller promises to call
    /// [`reset`](Self::reset) within `n` consumed chars, or not at all.
    fn mark(&mut self, n: usize);

    /// Return to the most recent mark.
    fn reset(&mut self) -> Result<(), SourceError>;

    /// Running position counters.
    fn position(&self) -> Position;

    /// `true` if no more chars will ever become available beyond what
    /// `available()` already reports.
    fn is_final(&self) -> bool;
}
