//! # evstream
//!
//! A streaming codec core: a non-blocking reader for JSON (with optional
//! CBOR-diagnostic-notation extensions) and a writer that re-encodes the
//! same event stream as MessagePack. Both sides share one [`Event`](event::Event)
//! model, so a reader and a writer can be wired back to back to transcode
//! JSON to MessagePack without ever building an in-memory tree.
//!
//! ## Examples
//!
//! ### Parsing a slice of chars
//!
//! For convenience, [`SliceCharSource`](crate::source::SliceCharSource) lets
//! you feed the reader from a complete, in-memory `str`.
//!
//! ```
//! use evstream::event::Event;
//! use evstream::reader::{JsonReader, ReadOutcome};
//! use evstream::source::SliceCharSource;
//!
//! let json = r#"{"name": "Elvis"}"#;
//!
//! let source = SliceCharSource::new(json, true);
//! let mut reader = JsonReader::new(source);
//! loop {
//!     match reader.next().unwrap() {
//!         ReadOutcome::Event(event) => {
//!             // do something useful with `event`
//!             // match event {
//!             //     ...
//!             // }
//!             let _ = event;
//!         }
//!         ReadOutcome::NeedMoreInput => unreachable!("the source is already final"),
//!         ReadOutcome::Eof => break,
//!     }
//! }
//! ```
//!
//! ### Push-based parsing
//!
//! Push-based parsing is the most flexible way of using this crate. Push new
//! bytes into a [`PushCharSource`](crate::source::PushCharSource) and then
//! let the reader consume them until it returns
//! [`ReadOutcome::NeedMoreInput`]. Repeat this process until you receive
//! [`ReadOutcome::Eof`].
//!
//! This approach is very low-level but gives you the freedom to provide new
//! bytes to the reader whenever they are available and to generate new
//! events whenever you need them.
//!
//! ```
//! use evstream::reader::{JsonReader, ReadOutcome};
//! use evstream::source::PushCharSource;
//!
//! let json = r#"{"name": "Elvis"}"#.as_bytes();
//!
//! let source = PushCharSource::new();
//! let mut reader = JsonReader::new(source);
//! let mut i: usize = 0;
//! loop {
//!     let mut outcome = reader.next().unwrap();
//!     while outcome == ReadOutcome::NeedMoreInput {
//!         i += reader.source.push_bytes(&json[i..]);
//!         if i == json.len() {
//!             reader.source.done();
//!         }
//!         outcome = reader.next().unwrap();
//!     }
//!
//!     match outcome {
//!         ReadOutcome::Event(_event) => {
//!             // do something useful with `event`
//!         }
//!         ReadOutcome::Eof => break,
//!         ReadOutcome::NeedMoreInput => unreachable!(),
//!     }
//! }
//! ```
//!
//! ### Parsing from a `BufReader`
//!
//! [`BufReaderCharSource`](crate::source::BufReaderCharSource) lets you feed
//! the reader from a [`BufReader`](std::io::BufReader). This is useful if
//! you want to parse JSON from a file or a network connection.
//!
//! ```no_run
//! use std::fs::File;
//! use std::io::BufReader;
//!
//! use evstream::reader::{JsonReader, ReadOutcome};
//! use evstream::source::BufReaderCharSource;
//!
//! let file = File::open("some.json").unwrap();
//! let reader = BufReader::new(file);
//! let source = BufReaderCharSource::new(reader);
//!
//! let mut json_reader = JsonReader::new(source);
//! loop {
//!     let mut outcome = json_reader.next().unwrap();
//!     if outcome == ReadOutcome::NeedMoreInput {
//!         json_reader.source.fill_buf().unwrap();
//!         outcome = json_reader.next().unwrap();
//!     }
//!
//!     match outcome {
//!         ReadOutcome::Event(_event) => {}
//!         ReadOutcome::Eof => break,
//!         ReadOutcome::NeedMoreInput => break,
//!     }
//! }
//! ```
//!
//! ### Transcoding JSON to MessagePack
//!
//! Because the reader and the writer share one event model, re-encoding a
//! value is just forwarding every event from one to the other — as long as
//! the value doesn't contain a map or a list. MessagePack has no
//! indefinite-length composites, and the JSON reader can't know a map's or
//! a list's entry count before it has scanned past the closing bracket, so
//! it always emits `StartMap`/`StartList` as indeterminate-length; the
//! writer rejects those rather than silently miscounting. Top-level
//! scalars, strings, and (in CBOR-diagnostic mode) buffer literals have no
//! such restriction: the writer spools indeterminate-length strings and
//! buffers and computes their header from what it collected.
//!
//! ```
//! use evstream::reader::{JsonReader, ReadOutcome};
//! use evstream::source::SliceCharSource;
//! use evstream::writer::MsgpackWriter;
//!
//! let json = r#""Elvis""#;
//! let source = SliceCharSource::new(json, true);
//! let mut reader = JsonReader::new(source);
//!
//! let mut out = Vec::new();
//! let mut writer = MsgpackWriter::new(&mut out);
//! loop {
//!     match reader.next().unwrap() {
//!         ReadOutcome::Event(event) => writer.write_event(&event).unwrap(),
//!         ReadOutcome::NeedMoreInput => unreachable!("the source is already final"),
//!         ReadOutcome::Eof => break,
//!     }
//! }
//! assert_eq!(out, b"\xa5Elvis");
//! ```
pub mod error;
pub mod event;
pub mod helpers;
pub mod number;
pub mod options;
pub mod position;
pub mod reader;
pub mod source;
pub mod writer;
