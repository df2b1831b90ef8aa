//! Boundary cases named explicitly: integer classification at the 32-bit
//! and 64-bit limits, the trailing-comma option, and lone/paired surrogate
//! escapes.

use evstream::error::ReaderError;
use evstream::event::Event;
use evstream::number::Number;
use evstream::options::ReaderOptionsBuilder;
use evstream::reader::{JsonReader, ReadOutcome};
use evstream::source::SliceCharSource;
use num_bigint::BigInt;

fn parse_one(json: &str) -> Event {
    let source = SliceCharSource::new(json, true);
    let mut reader = JsonReader::new(source);
    match reader.next().unwrap() {
        ReadOutcome::Event(e) => e,
        other => panic!("expected an event, got {other:?}"),
    }
}

#[test]
fn integers_are_classified_by_the_narrowest_exact_type() {
    assert_eq!(
        parse_one(&i32::MAX.to_string()),
        Event::PrimitiveNumber(Number::I32(i32::MAX))
    );
    assert_eq!(
        parse_one(&i32::MIN.to_string()),
        Event::PrimitiveNumber(Number::I32(i32::MIN))
    );
    // One past i32's range must promote to I64, not stay I32.
    assert_eq!(
        parse_one(&(i32::MAX as i64 + 1).to_string()),
        Event::PrimitiveNumber(Number::I64(i32::MAX as i64 + 1))
    );
    assert_eq!(
        parse_one(&i64::MAX.to_string()),
        Event::PrimitiveNumber(Number::I64(i64::MAX))
    );
    assert_eq!(
        parse_one(&i64::MIN.to_string()),
        Event::PrimitiveNumber(Number::I64(i64::MIN))
    );
    // One past i64's range must promote to BigInt.
    let beyond_i64 = format!("{}", BigInt::from(i64::MAX) + 1);
    assert_eq!(
        parse_one(&beyond_i64),
        Event::PrimitiveNumber(Number::BigInt(BigInt::from(i64::MAX) + 1))
    );
}

#[test]
fn a_lone_low_surrogate_escape_is_rejected() {
    let source = SliceCharSource::new(r#""\uDC00""#, true);
    let mut reader = JsonReader::new(source);
    loop {
        match reader.next() {
            Ok(ReadOutcome::Event(_)) => continue,
            Ok(ReadOutcome::Eof) => panic!("expected an error"),
            Ok(ReadOutcome::NeedMoreInput) => panic!(),
            Err(ReaderError::InvalidLiteral(_, _, _)) => break,
            Err(other) => panic!("wrong error variant: {other:?}"),
        }
    }
}

#[test]
fn trailing_comma_is_accepted_only_when_the_option_is_set() {
    let source = SliceCharSource::new("[1,2,]", true);
    let mut reader = JsonReader::new(source);
    let mut saw_error = false;
    loop {
        match reader.next() {
            Ok(ReadOutcome::Event(_)) => continue,
            Ok(ReadOutcome::Eof) => break,
            Ok(ReadOutcome::NeedMoreInput) => panic!(),
            Err(_) => {
                saw_error = true;
                break;
            }
        }
    }
    assert!(saw_error, "trailing comma should be an error by default");

    let source = SliceCharSource::new("[1,2,]", true);
    let mut reader = JsonReader::with_options(
        source,
        ReaderOptionsBuilder::default().with_trailing_comma(true).build(),
    );
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
            Event::StartList(-1),
            Event::PrimitiveNumber(Number::I32(1)),
            Event::PrimitiveNumber(Number::I32(2)),
            Event::EndList,
        ]
    );
}

#[test]
fn malformed_number_literals_are_rejected() {
    for bad in ["012", "01.5", "3.", "1e", "-"] {
        let source = SliceCharSource::new(bad, true);
        let mut reader = JsonReader::new(source);
        let mut saw_error = false;
        loop {
            match reader.next() {
                Ok(ReadOutcome::Event(_)) => continue,
                Ok(ReadOutcome::Eof) => break,
                Ok(ReadOutcome::NeedMoreInput) => panic!(),
                Err(ReaderError::SyntaxError(_, _)) => {
                    saw_error = true;
                    break;
                }
                Err(other) => panic!("wrong error variant for {bad:?}: {other:?}"),
            }
        }
        assert!(saw_error, "{bad:?} should be a syntax error");
    }
}

#[test]
fn depth_exceeding_max_depth_is_an_error() {
    let nested = "[".repeat(5) + &"]".repeat(5);
    let source = SliceCharSource::new(&nested, true);
    let mut reader = JsonReader::with_options(
        source,
        ReaderOptionsBuilder::default().with_max_depth(3).build(),
    );
    let mut saw_error = false;
    loop {
        match reader.next() {
            Ok(ReadOutcome::Event(_)) => continue,
            Ok(ReadOutcome::Eof) => break,
            Ok(ReadOutcome::NeedMoreInput) => panic!(),
            Err(ReaderError::DepthExceeded(_)) => {
                saw_error = true;
                break;
            }
            Err(other) => panic!("wrong error variant: {other:?}"),
        }
    }
    assert!(saw_error);
}
