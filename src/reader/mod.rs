//! A resumable, non-blocking JSON (with optional CBOR-diagnostic
//! extensions) reader: a [`CharSource`] goes in, a sequence of
//! [`Event`]s comes out.
//!
//! The object-level sub-machine (what token is legal next inside a list, a
//! map, or a tag's parenthesized value) is a stack of [`Frame`]s; the
//! leaf-level sub-machine (what we're in the middle of scanning right now —
//! a string, a number, a keyword, a buffer literal) is [`Leaf`]. Both are
//! expressed as plain enums dispatched with `match` rather than as a single
//! flat numeric transition table, so that the CBOR-diagnostic grammar can be
//! added as ordinary new match arms instead of new table columns.

mod number;
mod string;
mod token;

use std::collections::VecDeque;

use crate::error::ReaderError;
use crate::event::{Event, INDETERMINATE};
use crate::helpers;
use crate::options::ReaderOptions;
use crate::position::Position;
use crate::source::CharSource;

/// What [`JsonReader::next`] produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome {
    /// The next structural event.
    Event(Event),
    /// The source ran dry but is not final; push more input and call
    /// [`JsonReader::next`] again.
    NeedMoreInput,
    /// The source is exhausted and the reader has nothing more to produce.
    Eof,
}

#[derive(Debug)]
enum FrameKind {
    List,
    Map,
    TagParen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    ListValueOrClose,
    ListCommaOrClose,
    ListValueAfterComma,
    MapKeyOrClose,
    MapKeyAfterComma,
    MapColon,
    MapValue,
    MapCommaOrClose,
    TagValue,
    TagClose,
}

#[derive(Debug)]
struct Frame {
    kind: FrameKind,
    expect: Expect,
}

enum EscapeMode {
    Normal,
    Backslash,
    Unicode {
        digits: String,
        high_surrogate: Option<u16>,
    },
    /// A high surrogate was just decoded; a literal `\` must introduce the
    /// low surrogate's escape before any more hex digits are legal.
    ExpectLowBackslash { high: u16 },
    /// The `\` after a high surrogate was seen; a literal `u` must follow.
    ExpectLowU { high: u16 },
}

enum Leaf {
    None,
    InString { buf: String, escape: EscapeMode },
    InNumber { buf: String },
    InToken { buf: String },
    InHexBuffer { buf: String },
    InB64Buffer { buf: String },
}

enum Step {
    Produced,
    NeedMoreInput,
    Eof,
}

enum Peek {
    Char(char),
    Eof,
    Pending,
}

/// Renders a [`Peek`] as the token text a [`ReaderError::SyntaxError`]
/// embeds. `Pending` never reaches an error site: callers handle it before
/// falling through to the unexpected-token arm.
fn describe_peek(peek: &Peek) -> String {
    match peek {
        Peek::Char(c) => helpers::escape_for_message(&c.to_string()),
        Peek::Eof => "end of input".to_string(),
        Peek::Pending => unreachable!("Pending is handled before any SyntaxError site"),
    }
}

/// A resumable, event-based JSON reader.
pub struct JsonReader<S> {
    pub source: S,
    options: ReaderOptions,
    stack: Vec<Frame>,
    leaf: Leaf,
    queue: VecDeque<Event>,
    putback: Option<char>,
    root_done: bool,
    finished: bool,
}

impl<S> JsonReader<S>
where
    S: CharSource,
{
    pub fn new(source: S) -> Self {
        Self::with_options(source, ReaderOptions::default())
    }

    pub fn with_options(source: S, options: ReaderOptions) -> Self {
        JsonReader {
            source,
            options,
            stack: Vec::new(),
            leaf: Leaf::None,
            queue: VecDeque::new(),
            putback: None,
            root_done: false,
            finished: false,
        }
    }

    /// The source's current position, for diagnostics.
    pub fn position(&self) -> Position {
        self.source.position()
    }

    /// Produce the next event, or report that more input is needed, or
    /// that the source is exhausted.
    pub fn next(&mut self) -> Result<ReadOutcome, ReaderError> {
        if self.finished {
            return Err(ReaderError::NoMoreInput);
        }
        if let Some(e) = self.queue.pop_front() {
            return Ok(ReadOutcome::Event(e));
        }
        loop {
            match self.step()? {
                Step::Produced => {
                    if let Some(e) = self.queue.pop_front() {
                        return Ok(ReadOutcome::Event(e));
                    }
                }
                Step::NeedMoreInput => return Ok(ReadOutcome::NeedMoreInput),
                Step::Eof => {
                    self.finished = true;
                    return Ok(ReadOutcome::Eof);
                }
            }
        }
    }

    fn read_char(&mut self) -> Result<Option<char>, ReaderError> {
        if let Some(c) = self.putback.take() {
            return Ok(Some(c));
        }
        Ok(self.source.get()?)
    }

    fn put_back(&mut self, c: char) {
        debug_assert!(self.putback.is_none(), "only one char can be put back");
        self.putback = Some(c);
    }

    fn peek_significant(&mut self) -> Result<Peek, ReaderError> {
        loop {
            match self.read_char()? {
                Some(c) if c.is_whitespace() => continue,
                Some(c) => return Ok(Peek::Char(c)),
                None => {
                    return if self.source.is_final() {
                        Ok(Peek::Eof)
                    } else {
                        Ok(Peek::Pending)
                    }
                }
            }
        }
    }

    fn push_frame(&mut self, kind: FrameKind, expect: Expect) -> Result<(), ReaderError> {
        if self.stack.len() >= self.options.max_depth {
            return Err(ReaderError::DepthExceeded(self.position()));
        }
        self.stack.push(Frame { kind, expect });
        Ok(())
    }

    /// Transition the frame (or, at the root, record that the root value is
    /// done) after a value — scalar or just-closed composite — completes.
    fn on_value_complete(&mut self) {
        match self.stack.last_mut() {
            None => self.root_done = true,
            Some(frame) => {
                frame.expect = match (&frame.kind, frame.expect) {
                    (FrameKind::List, Expect::ListValueOrClose)
                    | (FrameKind::List, Expect::ListValueAfterComma) => Expect::ListCommaOrClose,
                    (FrameKind::Map, Expect::MapKeyOrClose)
                    | (FrameKind::Map, Expect::MapKeyAfterComma) => Expect::MapColon,
                    (FrameKind::Map, Expect::MapValue) => Expect::MapCommaOrClose,
                    (FrameKind::TagParen, Expect::TagValue) => Expect::TagClose,
                    _ => unreachable!("value completed in a frame that wasn't expecting one"),
                };
            }
        }
    }

    fn close_composite(&mut self, end_event: Event) -> Result<Step, ReaderError> {
        self.stack.pop();
        self.queue.push_back(end_event);
        self.on_value_complete();
        Ok(Step::Produced)
    }

    fn step(&mut self) -> Result<Step, ReaderError> {
        match std::mem::replace(&mut self.leaf, Leaf::None) {
            Leaf::None => self.step_dispatch(),
            Leaf::InString { buf, escape } => self.continue_string(buf, escape),
            Leaf::InNumber { buf } => self.continue_number(buf),
            Leaf::InToken { buf } => self.continue_token(buf),
            Leaf::InHexBuffer { buf } => self.continue_hex_buffer(buf),
            Leaf::InB64Buffer { buf } => self.continue_b64_buffer(buf),
        }
    }

    fn step_dispatch(&mut self) -> Result<Step, ReaderError> {
        let Some(frame) = self.stack.last() else {
            return if self.root_done {
                self.step_after_root()
            } else {
                self.step_expect_value_at_root()
            };
        };
        match frame.expect {
            Expect::ListValueOrClose => self.step_list_value_or_close(),
            Expect::ListCommaOrClose => self.step_list_comma_or_close(),
            Expect::ListValueAfterComma => self.step_list_value_after_comma(),
            Expect::MapKeyOrClose => self.step_map_key_or_close(),
            Expect::MapKeyAfterComma => self.step_map_key_after_comma(),
            Expect::MapColon => self.step_map_colon(),
            Expect::MapValue => self.step_map_value(),
            Expect::MapCommaOrClose => self.step_map_comma_or_close(),
            Expect::TagValue => self.step_tag_value(),
            Expect::TagClose => self.step_tag_close(),
        }
    }

    fn step_expect_value_at_root(&mut self) -> Result<Step, ReaderError> {
        match self.peek_significant()? {
            Peek::Pending => Ok(Step::NeedMoreInput),
            Peek::Eof => Ok(Step::Eof),
            Peek::Char(c) => self.start_value(c),
        }
    }

    fn step_after_root(&mut self) -> Result<Step, ReaderError> {
        if self.options.streaming {
            self.root_done = false;
            return self.step_expect_value_at_root();
        }
        if !self.options.draining {
            return Ok(Step::Eof);
        }
        match self.peek_significant()? {
            Peek::Pending => Ok(Step::NeedMoreInput),
            Peek::Eof => Ok(Step::Eof),
            Peek::Char(_) => Err(ReaderError::TrailingContent(self.position())),
        }
    }

    fn step_list_value_or_close(&mut self) -> Result<Step, ReaderError> {
        match self.peek_significant()? {
            Peek::Pending => Ok(Step::NeedMoreInput),
            Peek::Char(']') => self.close_composite(Event::EndList),
            Peek::Char(c) => self.start_value(c),
            eof @ Peek::Eof => Err(ReaderError::SyntaxError(describe_peek(&eof), self.position())),
        }
    }

    fn step_list_value_after_comma(&mut self) -> Result<Step, ReaderError> {
        match self.peek_significant()? {
            Peek::Pending => Ok(Step::NeedMoreInput),
            Peek::Char(']') if self.options.trailing_comma => self.close_composite(Event::EndList),
            Peek::Char(c) => self.start_value(c),
            other => Err(ReaderError::SyntaxError(describe_peek(&other), self.position())),
        }
    }

    fn step_list_comma_or_close(&mut self) -> Result<Step, ReaderError> {
        match self.peek_significant()? {
            Peek::Pending => Ok(Step::NeedMoreInput),
            Peek::Char(']') => self.close_composite(Event::EndList),
            Peek::Char(',') => {
                self.stack.last_mut().unwrap().expect = Expect::ListValueAfterComma;
                Ok(Step::Produced)
            }
            other => Err(ReaderError::SyntaxError(describe_peek(&other), self.position())),
        }
    }

    fn step_map_key_or_close(&mut self) -> Result<Step, ReaderError> {
        match self.peek_significant()? {
            Peek::Pending => Ok(Step::NeedMoreInput),
            Peek::Char('}') => self.close_composite(Event::EndMap),
            Peek::Char(c) => self.start_key(c),
            eof @ Peek::Eof => Err(ReaderError::SyntaxError(describe_peek(&eof), self.position())),
        }
    }

    fn step_map_key_after_comma(&mut self) -> Result<Step, ReaderError> {
        match self.peek_significant()? {
            Peek::Pending => Ok(Step::NeedMoreInput),
            Peek::Char('}') if self.options.trailing_comma => self.close_composite(Event::EndMap),
            Peek::Char(c) => self.start_key(c),
            other => Err(ReaderError::SyntaxError(describe_peek(&other), self.position())),
        }
    }

    fn step_map_colon(&mut self) -> Result<Step, ReaderError> {
        match self.peek_significant()? {
            Peek::Pending => Ok(Step::NeedMoreInput),
            Peek::Char(':') => {
                self.stack.last_mut().unwrap().expect = Expect::MapValue;
                Ok(Step::Produced)
            }
            other => Err(ReaderError::SyntaxError(describe_peek(&other), self.position())),
        }
    }

    fn step_map_value(&mut self) -> Result<Step, ReaderError> {
        match self.peek_significant()? {
            Peek::Pending => Ok(Step::NeedMoreInput),
            Peek::Char(c) => self.start_value(c),
            eof @ Peek::Eof => Err(ReaderError::SyntaxError(describe_peek(&eof), self.position())),
        }
    }

    fn step_map_comma_or_close(&mut self) -> Result<Step, ReaderError> {
        match self.peek_significant()? {
            Peek::Pending => Ok(Step::NeedMoreInput),
            Peek::Char('}') => self.close_composite(Event::EndMap),
            Peek::Char(',') => {
                self.stack.last_mut().unwrap().expect = Expect::MapKeyAfterComma;
                Ok(Step::Produced)
            }
            other => Err(ReaderError::SyntaxError(describe_peek(&other), self.position())),
        }
    }

    fn step_tag_value(&mut self) -> Result<Step, ReaderError> {
        match self.peek_significant()? {
            Peek::Pending => Ok(Step::NeedMoreInput),
            Peek::Char(c) => self.start_value(c),
            eof @ Peek::Eof => Err(ReaderError::SyntaxError(describe_peek(&eof), self.position())),
        }
    }

    fn step_tag_close(&mut self) -> Result<Step, ReaderError> {
        match self.peek_significant()? {
            Peek::Pending => Ok(Step::NeedMoreInput),
            Peek::Char(')') => {
                self.stack.pop();
                self.on_value_complete();
                Ok(Step::Produced)
            }
            other => Err(ReaderError::SyntaxError(describe_peek(&other), self.position())),
        }
    }

    /// Start scanning a value (list item, map value, tag's inner value, or
    /// the root value itself) whose first significant char is `c`.
    fn start_value(&mut self, c: char) -> Result<Step, ReaderError> {
        match c {
            '{' => {
                self.push_frame(FrameKind::Map, Expect::MapKeyOrClose)?;
                self.queue.push_back(Event::StartMap(INDETERMINATE));
                Ok(Step::Produced)
            }
            '[' => {
                self.push_frame(FrameKind::List, Expect::ListValueOrClose)?;
                self.queue.push_back(Event::StartList(INDETERMINATE));
                Ok(Step::Produced)
            }
            '"' => {
                self.leaf = Leaf::InString {
                    buf: String::new(),
                    escape: EscapeMode::Normal,
                };
                self.queue.push_back(Event::StartString(INDETERMINATE));
                Ok(Step::Produced)
            }
            'h' | 'b' if self.options.cbor_diag => self.start_buffer_literal(c),
            c if number::is_leading_char(c) => {
                let mut buf = String::new();
                buf.push(c);
                self.leaf = Leaf::InNumber { buf };
                Ok(Step::Produced)
            }
            c if c.is_ascii_alphabetic() => {
                let mut buf = String::new();
                buf.push(c);
                self.leaf = Leaf::InToken { buf };
                Ok(Step::Produced)
            }
            c if c.is_ascii() => Err(ReaderError::IllegalInput(c as u8, self.position())),
            c => Err(ReaderError::SyntaxError(helpers::escape_for_message(&c.to_string()), self.position())),
        }
    }

    /// A map key's first significant char is `c`: only a string, or (with
    /// `cborDiag`) a number, is a legal key.
    fn start_key(&mut self, c: char) -> Result<Step, ReaderError> {
        match c {
            '"' => {
                self.leaf = Leaf::InString {
                    buf: String::new(),
                    escape: EscapeMode::Normal,
                };
                self.queue.push_back(Event::StartString(INDETERMINATE));
                Ok(Step::Produced)
            }
            c if self.options.cbor_diag && number::is_leading_char(c) => {
                let mut buf = String::new();
                buf.push(c);
                self.leaf = Leaf::InNumber { buf };
                Ok(Step::Produced)
            }
            c => Err(ReaderError::SyntaxError(helpers::escape_for_message(&c.to_string()), self.position())),
        }
    }

    fn start_buffer_literal(&mut self, c: char) -> Result<Step, ReaderError> {
        match self.read_char()? {
            Some('\'') => {
                self.leaf = if c == 'h' {
                    Leaf::InHexBuffer { buf: String::new() }
                } else {
                    Leaf::InB64Buffer { buf: String::new() }
                };
                self.queue.push_back(Event::StartBuffer(INDETERMINATE));
                Ok(Step::Produced)
            }
            Some(other) => {
                let mut buf = String::new();
                buf.push(c);
                buf.push(other);
                self.leaf = Leaf::InToken { buf };
                Ok(Step::Produced)
            }
            None => {
                let mut buf = String::new();
                buf.push(c);
                self.leaf = Leaf::InToken { buf };
                Ok(Step::Produced)
            }
        }
    }

    fn continue_string(&mut self, mut buf: String, mut escape: EscapeMode) -> Result<Step, ReaderError> {
        loop {
            match escape {
                EscapeMode::Normal => match self.read_char()? {
                    None => {
                        if self.source.is_final() {
                            return Err(ReaderError::SyntaxError("end of input".to_string(), self.position()));
                        }
                        if !buf.is_empty() {
                            self.queue.push_back(Event::StringData(std::mem::take(&mut buf)));
                        }
                        self.leaf = Leaf::InString { buf, escape: EscapeMode::Normal };
                        return Ok(Step::NeedMoreInput);
                    }
                    Some('"') => {
                        if !buf.is_empty() {
                            self.queue.push_back(Event::StringData(buf));
                        }
                        self.queue.push_back(Event::EndString);
                        self.on_value_complete();
                        return Ok(Step::Produced);
                    }
                    Some('\\') => escape = EscapeMode::Backslash,
                    Some(c) if (c as u32) < 0x20 => {
                        return Err(ReaderError::IllegalInput(c as u8, self.position()));
                    }
                    Some(c) => buf.push(c),
                },
                EscapeMode::Backslash => match self.read_char()? {
                    None => {
                        if self.source.is_final() {
                            return Err(ReaderError::SyntaxError("end of input".to_string(), self.position()));
                        }
                        self.leaf = Leaf::InString { buf, escape: EscapeMode::Backslash };
                        return Ok(Step::NeedMoreInput);
                    }
                    Some('u') => {
                        escape = EscapeMode::Unicode {
                            digits: String::new(),
                            high_surrogate: None,
                        };
                    }
                    Some(c) => match string::simple_escape(c) {
                        Some(decoded) => {
                            buf.push(decoded);
                            escape = EscapeMode::Normal;
                        }
                        None => {
                            return Err(ReaderError::InvalidLiteral(
                                format!("\\{c}"),
                                self.position(),
                                "unknown escape sequence".into(),
                            ))
                        }
                    },
                },
                EscapeMode::Unicode { mut digits, mut high_surrogate } => match self.read_char()? {
                    None => {
                        if self.source.is_final() {
                            return Err(ReaderError::SyntaxError("end of input".to_string(), self.position()));
                        }
                        self.leaf = Leaf::InString {
                            buf,
                            escape: EscapeMode::Unicode { digits, high_surrogate },
                        };
                        return Ok(Step::NeedMoreInput);
                    }
                    Some(c) if c.is_ascii_hexdigit() => {
                        digits.push(c);
                        if digits.len() < 4 {
                            escape = EscapeMode::Unicode { digits, high_surrogate };
                        } else {
                            let code = u16::from_str_radix(&digits, 16).expect("4 hex digits");
                            match high_surrogate.take() {
                                None if (0xD800..=0xDBFF).contains(&code) => {
                                    escape = EscapeMode::ExpectLowBackslash { high: code };
                                }
                                None => {
                                    let ch = char::from_u32(code as u32).ok_or_else(|| {
                                        ReaderError::InvalidLiteral(
                                            format!("\\u{digits}"),
                                            self.position(),
                                            "lone low surrogate".into(),
                                        )
                                    })?;
                                    buf.push(ch);
                                    escape = EscapeMode::Normal;
                                }
                                Some(high) => {
                                    let ch = string::combine_surrogates(high, code).ok_or_else(|| {
                                        ReaderError::InvalidLiteral(
                                            format!("\\u{digits}"),
                                            self.position(),
                                            "invalid low surrogate".into(),
                                        )
                                    })?;
                                    buf.push(ch);
                                    escape = EscapeMode::Normal;
                                }
                            }
                        }
                    }
                    Some(c) => {
                        return Err(ReaderError::InvalidLiteral(
                            digits.clone(),
                            self.position(),
                            format!("invalid hex digit '{c}' in \\u escape"),
                        ))
                    }
                },
                EscapeMode::ExpectLowBackslash { high } => match self.read_char()? {
                    None => {
                        if self.source.is_final() {
                            return Err(ReaderError::SyntaxError("end of input".to_string(), self.position()));
                        }
                        self.leaf = Leaf::InString {
                            buf,
                            escape: EscapeMode::ExpectLowBackslash { high },
                        };
                        return Ok(Step::NeedMoreInput);
                    }
                    Some('\\') => escape = EscapeMode::ExpectLowU { high },
                    Some(c) => {
                        return Err(ReaderError::InvalidLiteral(
                            format!("\\u{high:04x}{c}"),
                            self.position(),
                            "lone high surrogate: expected a \\u escape for its low surrogate".into(),
                        ))
                    }
                },
                EscapeMode::ExpectLowU { high } => match self.read_char()? {
                    None => {
                        if self.source.is_final() {
                            return Err(ReaderError::SyntaxError("end of input".to_string(), self.position()));
                        }
                        self.leaf = Leaf::InString {
                            buf,
                            escape: EscapeMode::ExpectLowU { high },
                        };
                        return Ok(Step::NeedMoreInput);
                    }
                    Some('u') => {
                        escape = EscapeMode::Unicode {
                            digits: String::new(),
                            high_surrogate: Some(high),
                        };
                    }
                    Some(c) => {
                        return Err(ReaderError::InvalidLiteral(
                            format!("\\u{high:04x}\\{c}"),
                            self.position(),
                            "lone high surrogate: expected a \\u escape for its low surrogate".into(),
                        ))
                    }
                },
            }
        }
    }

    fn continue_number(&mut self, mut buf: String) -> Result<Step, ReaderError> {
        loop {
            match self.read_char()? {
                None => {
                    if self.source.is_final() {
                        return self.finalize_number(buf);
                    }
                    self.leaf = Leaf::InNumber { buf };
                    return Ok(Step::NeedMoreInput);
                }
                Some('I') if self.options.cbor_diag && buf == "-" => {
                    buf.push('I');
                    self.leaf = Leaf::InToken { buf };
                    return Ok(Step::Produced);
                }
                Some(c) if number::is_body_char(c) => buf.push(c),
                Some(c) => {
                    self.put_back(c);
                    return self.finalize_number(buf);
                }
            }
        }
    }

    fn finalize_number(&mut self, buf: String) -> Result<Step, ReaderError> {
        if self.options.cbor_diag && !number::is_real(&buf) {
            match self.read_char()? {
                Some('(') => {
                    let n: u64 = buf.parse().map_err(|_| {
                        ReaderError::InvalidLiteral(
                            buf.clone(),
                            self.position(),
                            "a CBOR tag must be a non-negative integer".into(),
                        )
                    })?;
                    self.queue.push_back(Event::Tag(n));
                    self.push_frame(FrameKind::TagParen, Expect::TagValue)?;
                    return Ok(Step::Produced);
                }
                Some(c) => self.put_back(c),
                None => {}
            }
        }
        if !number::is_grammar_valid(&buf) {
            return Err(ReaderError::SyntaxError(
                helpers::escape_for_message(&buf),
                self.position(),
            ));
        }
        let n = number::finalize(&buf, self.options.big_decimal).map_err(|e| {
            ReaderError::InvalidLiteral(buf.clone(), self.position(), e.to_string())
        })?;
        self.queue.push_back(Event::PrimitiveNumber(n));
        self.on_value_complete();
        Ok(Step::Produced)
    }

    fn continue_token(&mut self, mut buf: String) -> Result<Step, ReaderError> {
        loop {
            match self.read_char()? {
                None => {
                    if self.source.is_final() {
                        return self.finalize_token(buf);
                    }
                    self.leaf = Leaf::InToken { buf };
                    return Ok(Step::NeedMoreInput);
                }
                Some(c) if c.is_ascii_alphabetic() => buf.push(c),
                Some(c) => {
                    self.put_back(c);
                    return self.finalize_token(buf);
                }
            }
        }
    }

    fn finalize_token(&mut self, buf: String) -> Result<Step, ReaderError> {
        match token::classify(&buf, self.options.cbor_diag) {
            Some(kind) => {
                self.queue.push_back(kind.into_event());
                self.on_value_complete();
                Ok(Step::Produced)
            }
            None => Err(ReaderError::InvalidLiteral(
                helpers::escape_for_message(&buf),
                self.position(),
                "unrecognized token".into(),
            )),
        }
    }

    fn continue_hex_buffer(&mut self, mut buf: String) -> Result<Step, ReaderError> {
        loop {
            match self.read_char()? {
                None => {
                    if self.source.is_final() {
                        return Err(ReaderError::SyntaxError("end of input".to_string(), self.position()));
                    }
                    self.leaf = Leaf::InHexBuffer { buf };
                    return Ok(Step::NeedMoreInput);
                }
                Some('\'') => {
                    let bytes = helpers::decode_hex_buffer(&buf, self.position())?;
                    if !bytes.is_empty() {
                        self.queue.push_back(Event::BufferData(bytes));
                    }
                    self.queue.push_back(Event::EndBuffer);
                    self.on_value_complete();
                    return Ok(Step::Produced);
                }
                Some(c) if c.is_ascii_hexdigit() => buf.push(c),
                Some(c) if c.is_ascii() => return Err(ReaderError::IllegalInput(c as u8, self.position())),
                Some(c) => {
                    return Err(ReaderError::SyntaxError(helpers::escape_for_message(&c.to_string()), self.position()))
                }
            }
        }
    }

    fn continue_b64_buffer(&mut self, mut buf: String) -> Result<Step, ReaderError> {
        loop {
            match self.read_char()? {
                None => {
                    if self.source.is_final() {
                        return Err(ReaderError::SyntaxError("end of input".to_string(), self.position()));
                    }
                    self.leaf = Leaf::InB64Buffer { buf };
                    return Ok(Step::NeedMoreInput);
                }
                Some('\'') => {
                    let bytes = helpers::decode_base64_buffer(&buf, self.position())?;
                    if !bytes.is_empty() {
                        self.queue.push_back(Event::BufferData(bytes));
                    }
                    self.queue.push_back(Event::EndBuffer);
                    self.on_value_complete();
                    return Ok(Step::Produced);
                }
                Some(c) if c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '-' | '_' | '=') => {
                    buf.push(c)
                }
                Some(c) if c.is_ascii() => return Err(ReaderError::IllegalInput(c as u8, self.position())),
                Some(c) => {
                    return Err(ReaderError::SyntaxError(helpers::escape_for_message(&c.to_string()), self.position()))
                }
            }
        }
    }
}
