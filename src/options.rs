//! Options for [`JsonReader`](crate::reader::JsonReader) and
//! [`MsgpackWriter`](crate::writer::MsgpackWriter). Use
//! [`ReaderOptionsBuilder`]/[`WriterOptionsBuilder`] to create instances of
//! these structs.

/// Options for [`JsonReader`](crate::reader::JsonReader).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReaderOptions {
    pub(crate) max_depth: usize,
    pub(crate) streaming: bool,
    pub(crate) draining: bool,
    pub(crate) trailing_comma: bool,
    pub(crate) big_decimal: bool,
    pub(crate) cbor_diag: bool,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            max_depth: 2048,
            streaming: false,
            draining: true,
            trailing_comma: false,
            big_decimal: false,
            cbor_diag: false,
        }
    }
}

impl ReaderOptions {
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// `true` if the reader can handle a stream of multiple root-level
    /// values rather than exactly one.
    pub fn streaming(&self) -> bool {
        self.streaming
    }

    /// `true` if non-whitespace content after the root value is an error.
    pub fn draining(&self) -> bool {
        self.draining
    }

    pub fn trailing_comma(&self) -> bool {
        self.trailing_comma
    }

    pub fn big_decimal(&self) -> bool {
        self.big_decimal
    }

    /// `true` if CBOR-diagnostic extensions (`Tag(n)` via `n(value)`,
    /// `h'...'`/`b'...'` byte-string literals, `undefined`/`NaN`/`Infinity`)
    /// are accepted.
    pub fn cbor_diag(&self) -> bool {
        self.cbor_diag
    }
}

/// A builder for [`ReaderOptions`].
///
/// ```rust
/// use evstream::options::ReaderOptionsBuilder;
///
/// let options = ReaderOptionsBuilder::default()
///     .with_max_depth(16)
///     .with_cbor_diag(true)
///     .build();
/// ```
#[derive(Default, Clone, Copy, Debug, PartialEq)]
pub struct ReaderOptionsBuilder {
    options: ReaderOptions,
}

impl ReaderOptionsBuilder {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.options.max_depth = max_depth;
        self
    }

    /// Enable streaming mode, which means the reader will be able to handle
    /// a stream of multiple root-level values. Values must be clearly
    /// separable: self-delineating values (objects, arrays, strings), or
    /// keywords, or values separated by whitespace.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use evstream::event::Event;
    /// use evstream::options::ReaderOptionsBuilder;
    /// use evstream::reader::{JsonReader, ReadOutcome};
    /// use evstream::source::SliceCharSource;
    ///
    /// let json = "1 2 3";
    /// let source = SliceCharSource::new(json, true);
    /// let mut reader = JsonReader::with_options(
    ///     source,
    ///     ReaderOptionsBuilder::default().with_streaming(true).build(),
    /// );
    ///
    /// let mut values = Vec::new();
    /// loop {
    ///     match reader.next().unwrap() {
    ///         ReadOutcome::Event(Event::PrimitiveNumber(n)) => values.push(n.to_i64().unwrap()),
    ///         ReadOutcome::Event(_) => {}
    ///         ReadOutcome::Eof => break,
    ///         ReadOutcome::NeedMoreInput => unreachable!(),
    ///     }
    /// }
    /// assert_eq!(values, vec![1, 2, 3]);
    /// ```
    pub fn with_streaming(mut self, streaming: bool) -> Self {
        self.options.streaming = streaming;
        self
    }

    pub fn with_draining(mut self, draining: bool) -> Self {
        self.options.draining = draining;
        self
    }

    pub fn with_trailing_comma(mut self, trailing_comma: bool) -> Self {
        self.options.trailing_comma = trailing_comma;
        self
    }

    pub fn with_big_decimal(mut self, big_decimal: bool) -> Self {
        self.options.big_decimal = big_decimal;
        self
    }

    pub fn with_cbor_diag(mut self, cbor_diag: bool) -> Self {
        self.options.cbor_diag = cbor_diag;
        self
    }

    pub fn build(self) -> ReaderOptions {
        self.options
    }
}

/// Options for [`MsgpackWriter`](crate::writer::MsgpackWriter).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct WriterOptions {
    pub(crate) sorted: bool,
}

impl WriterOptions {
    /// Reserved for callers that want the writer to assert sorted-key order
    /// on emitted maps; MessagePack itself has no canonical key order
    /// requirement, so this does not change wire output. Callers are
    /// expected to pre-sort map keys themselves, since a map's size is
    /// declared before its first key is written.
    pub fn sorted(&self) -> bool {
        self.sorted
    }
}

/// A builder for [`WriterOptions`].
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct WriterOptionsBuilder {
    options: WriterOptions,
}

impl WriterOptionsBuilder {
    pub fn with_sorted(mut self, sorted: bool) -> Self {
        self.options.sorted = sorted;
        self
    }

    pub fn build(self) -> WriterOptions {
        self.options
    }
}
