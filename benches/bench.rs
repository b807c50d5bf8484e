use criterion::{criterion_group, criterion_main, Criterion};

use jsnpg::dom::EventLog;
use jsnpg::emitter::JsonEmitter;
use jsnpg::options::{GeneratorOptionsBuilder, ParserOptionsBuilder};
use jsnpg::{Parser, PullParser, Sink};

fn make_document(repeats: usize) -> String {
    let mut json = String::from("[");
    for i in 0..repeats {
        if i > 0 {
            json.push(',');
        }
        json.push_str(&format!(
            r#"{{"id":{i},"name":"item {i}","price":{:.2},"tags":["a","b","c"],"active":true,"note":null}}"#,
            i as f64 * 1.5,
        ));
    }
    json.push(']');
    json
}

fn push_parse(json: &[u8]) {
    let options = ParserOptionsBuilder::default().with_bytes(json).build();
    let mut log = EventLog::new();
    Parser::new(options).parse(&mut log).unwrap();
}

fn pull_parse(json: &[u8]) {
    let options = ParserOptionsBuilder::default().with_bytes(json).build();
    let mut parser = PullParser::new(&options).unwrap();
    loop {
        let outcome = parser.next().unwrap();
        if outcome.event() == jsnpg::Event::Eof {
            break;
        }
    }
}

fn generate(repeats: usize) -> String {
    let mut gen = GeneratorOptionsBuilder::default().build().into_emitter();
    gen.start_array();
    for i in 0..repeats {
        gen.start_object();
        gen.key(b"id");
        gen.integer(i as i64);
        gen.key(b"name");
        gen.string(format!("item {i}").as_bytes());
        gen.key(b"tags");
        gen.start_array();
        gen.string(b"a");
        gen.string(b"b");
        gen.string(b"c");
        gen.end_array();
        gen.end_object();
    }
    gen.end_array();
    gen.into_sink().as_str().to_string()
}

fn bench(c: &mut Criterion) {
    let small = make_document(50);
    let large = make_document(10_000);

    c.bench_function("push_parse_small", |b| b.iter(|| push_parse(small.as_bytes())));
    c.bench_function("push_parse_large", |b| b.iter(|| push_parse(large.as_bytes())));
    c.bench_function("pull_parse_small", |b| b.iter(|| pull_parse(small.as_bytes())));
    c.bench_function("pull_parse_large", |b| b.iter(|| pull_parse(large.as_bytes())));
    c.bench_function("generate_large", |b| b.iter(|| generate(10_000)));
}

criterion_group!(benches, bench);
criterion_main!(benches);
