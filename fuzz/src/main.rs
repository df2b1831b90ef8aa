use evstream::reader::{JsonReader, ReadOutcome};
use evstream::source::PushCharSource;

#[macro_use]
extern crate afl;

fn main() {
    fuzz!(|data: &[u8]| {
        let source = PushCharSource::new();
        let mut reader = JsonReader::new(source);
        let mut i: usize = 0;
        loop {
            let mut outcome = reader.next();
            while matches!(outcome, Ok(ReadOutcome::NeedMoreInput)) {
                i += reader.source.push_bytes(&data[i..]);
                if i == data.len() {
                    reader.source.done();
                }
                outcome = reader.next();
            }

            match outcome {
                Ok(ReadOutcome::Eof) | Err(_) => break,
                Ok(ReadOutcome::Event(_)) => continue,
                Ok(ReadOutcome::NeedMoreInput) => unreachable!(),
            }
        }
    });
}
