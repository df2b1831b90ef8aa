use criterion::{criterion_group, criterion_main, Criterion};
use evstream::reader::{JsonReader, ReadOutcome};
use evstream::source::SliceCharSource;
use serde_json::Value;

fn make_large(json: &str) -> String {
    let mut large = String::from("{");
    for i in 0..10000 {
        if large.len() > 1 {
            large.push(',');
        }
        large.push_str(&format!(r#""{}":"#, i));
        large.push_str(json);
    }
    large.push('}');
    large
}

fn evstream_parse(json: &str) {
    let source = SliceCharSource::new(json, true);
    let mut reader = JsonReader::new(source);
    loop {
        match reader.next().unwrap() {
            ReadOutcome::Event(_) => {}
            ReadOutcome::Eof => break,
            ReadOutcome::NeedMoreInput => panic!("a final source should never pause"),
        }
    }
}

fn evstream_benchmark(c: &mut Criterion) {
    let json = r#"{
        "author": "Elvis Presley",
        "title": "Jailhouse Rock",
        "year": 1957,
        "price": 1.23,
        "available": true,
        "sequel": null,
        "tags": ["rock", "roll", "classic"]
    }"#;

    let json_large = make_large(json);

    c.bench_function("evstream", |b| {
        b.iter(|| {
            evstream_parse(json);
        })
    });

    c.bench_function("evstream_large", |b| {
        b.iter(|| {
            evstream_parse(&json_large);
        })
    });

    c.bench_function("serde", |b| {
        b.iter(|| {
            let _: Value = serde_json::from_str(json).unwrap();
        })
    });

    c.bench_function("serde_large", |b| {
        b.iter(|| {
            let _: Value = serde_json::from_str(&json_large).unwrap();
        })
    });
}

criterion_group!(benches, evstream_benchmark);
criterion_main!(benches);
