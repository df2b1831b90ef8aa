//! End-to-end scenarios exercising the reader and writer together, as well
//! as the writer's own failure mode on indeterminate composites.

use evstream::error::WriterError;
use evstream::event::{Event, INDETERMINATE};
use evstream::number::Number;
use evstream::options::ReaderOptionsBuilder;
use evstream::reader::{JsonReader, ReadOutcome};
use evstream::source::SliceCharSource;
use evstream::writer::MsgpackWriter;

fn parse_all(json: &str) -> Vec<Event> {
    let source = SliceCharSource::new(json, true);
    let mut reader = JsonReader::new(source);
    let mut out = Vec::new();
    loop {
        match reader.next().unwrap() {
            ReadOutcome::Event(e) => out.push(e),
            ReadOutcome::Eof => break,
            ReadOutcome::NeedMoreInput => panic!("unexpected pause on a final source"),
        }
    }
    out
}

fn write_all(events: &[Event]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut writer = MsgpackWriter::new(&mut out);
    for e in events {
        writer.write_event(e).unwrap();
    }
    out
}

#[test]
fn empty_list_round_trips_to_fixarray_zero() {
    let events = parse_all("[]");
    assert_eq!(events, vec![Event::StartList(-1), Event::EndList]);

    let out = write_all(&[Event::StartList(0), Event::EndList]);
    assert_eq!(out, vec![0x90]);
}

#[test]
fn flat_object_round_trips_to_known_size_fixmap() {
    let events = parse_all(r#"{"a":1,"b":-3}"#);
    assert_eq!(
        events,
        vec![
            Event::StartMap(INDETERMINATE),
            Event::StartString(INDETERMINATE),
            Event::StringData("a".into()),
            Event::EndString,
            Event::PrimitiveNumber(Number::I32(1)),
            Event::StartString(INDETERMINATE),
            Event::StringData("b".into()),
            Event::EndString,
            Event::PrimitiveNumber(Number::I32(-3)),
            Event::EndMap,
        ]
    );

    let out = write_all(&[
        Event::StartMap(2),
        Event::StartString(1),
        Event::StringData("a".into()),
        Event::EndString,
        Event::PrimitiveNumber(Number::I32(1)),
        Event::StartString(1),
        Event::StringData("b".into()),
        Event::EndString,
        Event::PrimitiveNumber(Number::I32(-3)),
        Event::EndMap,
    ]);
    assert_eq!(out, vec![0x82, 0xa1, b'a', 0x01, 0xa1, b'b', 0xfd]);
}

#[test]
fn real_literal_prefers_f64_unless_big_decimal_is_requested_and_needed() {
    let source = SliceCharSource::new("3.14", true);
    let mut reader = JsonReader::new(source);
    assert_eq!(
        reader.next().unwrap(),
        ReadOutcome::Event(Event::PrimitiveNumber(Number::F64(3.14)))
    );

    // 3.14 round-trips through f64, so even with bigDecimal=true it's still
    // represented as F64.
    let source = SliceCharSource::new("3.14", true);
    let mut reader = JsonReader::with_options(
        source,
        ReaderOptionsBuilder::default().with_big_decimal(true).build(),
    );
    assert_eq!(
        reader.next().unwrap(),
        ReadOutcome::Event(Event::PrimitiveNumber(Number::F64(3.14)))
    );
}

#[test]
fn cbor_diag_tag_wraps_a_string() {
    let source = SliceCharSource::new(r#"32("http://x")"#, true);
    let mut reader =
        JsonReader::with_options(source, ReaderOptionsBuilder::default().with_cbor_diag(true).build());
    let mut out = Vec::new();
    loop {
        match reader.next().unwrap() {
            ReadOutcome::Event(e) => out.push(e),
            ReadOutcome::Eof => break,
            ReadOutcome::NeedMoreInput => panic!(),
        }
    }
    assert_eq!(
        out,
        vec![
            Event::Tag(32),
            Event::StartString(INDETERMINATE),
            Event::StringData("http://x".into()),
            Event::EndString,
        ]
    );
}

#[test]
fn streaming_split_map_emits_in_order_with_no_error() {
    use evstream::source::PushCharSource;

    let source = PushCharSource::new();
    let mut reader = JsonReader::new(source);

    let mut outcome = reader.next().unwrap();
    while outcome == ReadOutcome::NeedMoreInput {
        reader.source.push_bytes(b"{\"a\":");
        outcome = reader.next().unwrap();
    }
    assert_eq!(outcome, ReadOutcome::Event(Event::StartMap(INDETERMINATE)));
    assert_eq!(
        reader.next().unwrap(),
        ReadOutcome::Event(Event::StartString(INDETERMINATE))
    );
    assert_eq!(
        reader.next().unwrap(),
        ReadOutcome::Event(Event::StringData("a".into()))
    );
    assert_eq!(reader.next().unwrap(), ReadOutcome::Event(Event::EndString));

    let mut outcome = reader.next().unwrap();
    while outcome == ReadOutcome::NeedMoreInput {
        reader.source.push_bytes(b"1}");
        reader.source.done();
        outcome = reader.next().unwrap();
    }
    assert_eq!(
        outcome,
        ReadOutcome::Event(Event::PrimitiveNumber(Number::I32(1)))
    );
    assert_eq!(reader.next().unwrap(), ReadOutcome::Event(Event::EndMap));
    assert_eq!(reader.next().unwrap(), ReadOutcome::Eof);
}

#[test]
fn writer_rejects_indeterminate_map_size_and_writes_nothing() {
    let mut out = Vec::new();
    let mut writer = MsgpackWriter::new(&mut out);
    let err = writer.write_event(&Event::StartMap(INDETERMINATE)).unwrap_err();
    assert!(matches!(err, WriterError::IndeterminateComposite));
    assert!(out.is_empty());
}

#[test]
fn reader_to_writer_transcoding_forwards_a_scalar_value_directly() {
    let json = r#""hello""#;
    let source = SliceCharSource::new(json, true);
    let mut reader = JsonReader::new(source);

    let mut out = Vec::new();
    let mut writer = MsgpackWriter::new(&mut out);
    loop {
        match reader.next().unwrap() {
            ReadOutcome::Event(event) => {
                writer.write_event(&event).unwrap();
            }
            ReadOutcome::Eof => break,
            ReadOutcome::NeedMoreInput => panic!(),
        }
    }
    assert_eq!(out, b"\xa5hello");
}

#[test]
fn reader_to_writer_transcoding_rejects_a_forwarded_map_or_list() {
    // The JSON reader can't know a map's or a list's entry count until it
    // has scanned past the closing bracket, so it always emits those as
    // indeterminate-length. The writer rejects that rather than silently
    // miscounting; bridging the two requires buffering a count in between,
    // which is outside this crate's event-streaming core.
    let json = "[1,2,3]";
    let source = SliceCharSource::new(json, true);
    let mut reader = JsonReader::new(source);

    let mut out = Vec::new();
    let mut writer = MsgpackWriter::new(&mut out);
    let first = reader.next().unwrap();
    match first {
        ReadOutcome::Event(e @ Event::StartList(INDETERMINATE)) => {
            assert!(matches!(
                writer.write_event(&e),
                Err(WriterError::IndeterminateComposite)
            ));
        }
        other => panic!("unexpected first event: {other:?}"),
    }
}
