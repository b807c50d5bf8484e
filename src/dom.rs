//! A minimal "DOM": an in-memory, append-only log of the events a parse
//! produced, stored just well enough to be replayed later as if from a
//! fresh parse.
//!
//! Records are appended into fixed-size chunks rather than one big
//! `Vec<u8>`, so that replaying a huge document doesn't require the whole
//! log to live in one contiguous allocation.

use crate::error::{Error, ErrorKind};
use crate::event::{Event, JsonType};
use crate::sink::Sink;

const CHUNK_SIZE: usize = 8192;

fn tag(t: JsonType) -> u8 {
    t as u8
}

fn untag(b: u8) -> JsonType {
    // SAFETY-free: `JsonType` is a fieldless, contiguous `#[repr(u8)]` enum
    // and every byte this module writes came from `tag()`, so this always
    // round-trips through a match instead of a transmute.
    match b {
        0 => JsonType::Null,
        1 => JsonType::True,
        2 => JsonType::False,
        3 => JsonType::Integer,
        4 => JsonType::Real,
        5 => JsonType::String,
        6 => JsonType::Key,
        7 => JsonType::StartArray,
        8 => JsonType::EndArray,
        9 => JsonType::StartObject,
        10 => JsonType::EndObject,
        _ => JsonType::Eof,
    }
}

/// An append-only, replayable record of a sequence of events.
#[derive(Default)]
pub struct EventLog {
    chunks: Vec<Vec<u8>>,
}

impl EventLog {
    pub fn new() -> Self {
        EventLog { chunks: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    fn current_mut(&mut self, additional: usize) -> &mut Vec<u8> {
        let needs_new = match self.chunks.last() {
            Some(c) => c.len() >= CHUNK_SIZE,
            None => true,
        };
        if needs_new {
            self.chunks
                .push(Vec::with_capacity(additional.max(CHUNK_SIZE)));
        }
        self.chunks.last_mut().unwrap()
    }

    fn push_tag(&mut self, t: JsonType) -> bool {
        self.current_mut(1).push(tag(t));
        true
    }

    fn push_integer(&mut self, value: i64) -> bool {
        let chunk = self.current_mut(1 + 8);
        chunk.push(tag(JsonType::Integer));
        chunk.extend_from_slice(&value.to_le_bytes());
        true
    }

    fn push_real(&mut self, value: f64) -> bool {
        let chunk = self.current_mut(1 + 8);
        chunk.push(tag(JsonType::Real));
        chunk.extend_from_slice(&value.to_bits().to_le_bytes());
        true
    }

    fn push_bytes(&mut self, t: JsonType, bytes: &[u8]) -> bool {
        let chunk = self.current_mut(1 + 4 + bytes.len());
        chunk.push(tag(t));
        chunk.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
        chunk.extend_from_slice(bytes);
        true
    }

    /// Replay every recorded event into `sink`, in the order it was
    /// recorded. Stops and returns an error the moment `sink` returns
    /// `false`, preferring [`Sink::take_error`] if it supplies one.
    pub fn replay_into<S: Sink>(&self, sink: &mut S) -> Result<(), Error> {
        let mut cursor = DomCursor::new(self);
        loop {
            match cursor.next() {
                Event::Eof => return Ok(()),
                event => {
                    if !dispatch(sink, event) {
                        return Err(sink
                            .take_error()
                            .unwrap_or_else(|| Error::new(ErrorKind::Terminated, 0)));
                    }
                }
            }
        }
    }
}

fn dispatch<S: Sink>(sink: &mut S, event: Event) -> bool {
    match event {
        Event::Null => sink.null(),
        Event::True => sink.boolean(true),
        Event::False => sink.boolean(false),
        Event::Integer(v) => sink.integer(v),
        Event::Real(v) => sink.real(v),
        Event::String(b) => sink.string(b),
        Event::Key(b) => sink.key(b),
        Event::StartArray => sink.start_array(),
        Event::EndArray => sink.end_array(),
        Event::StartObject => sink.start_object(),
        Event::EndObject => sink.end_object(),
        Event::Eof => true,
    }
}

impl Sink for EventLog {
    fn null(&mut self) -> bool {
        self.push_tag(JsonType::Null)
    }

    fn boolean(&mut self, is_true: bool) -> bool {
        self.push_tag(if is_true { JsonType::True } else { JsonType::False })
    }

    fn integer(&mut self, value: i64) -> bool {
        self.push_integer(value)
    }

    fn real(&mut self, value: f64) -> bool {
        self.push_real(value)
    }

    fn string(&mut self, bytes: &[u8]) -> bool {
        self.push_bytes(JsonType::String, bytes)
    }

    fn key(&mut self, bytes: &[u8]) -> bool {
        self.push_bytes(JsonType::Key, bytes)
    }

    fn start_array(&mut self) -> bool {
        self.push_tag(JsonType::StartArray)
    }

    fn end_array(&mut self) -> bool {
        self.push_tag(JsonType::EndArray)
    }

    fn start_object(&mut self) -> bool {
        self.push_tag(JsonType::StartObject)
    }

    fn end_object(&mut self) -> bool {
        self.push_tag(JsonType::EndObject)
    }
}

/// A read position into an [`EventLog`], used to pull events back out one
/// at a time (mirrors a regular pull parser's resumability).
pub struct DomCursor<'a> {
    log: &'a EventLog,
    chunk: usize,
    offset: usize,
}

impl<'a> DomCursor<'a> {
    pub fn new(log: &'a EventLog) -> Self {
        DomCursor {
            log,
            chunk: 0,
            offset: 0,
        }
    }

    /// The next recorded event, or [`Event::Eof`] once the log is
    /// exhausted.
    pub fn next(&mut self) -> Event<'a> {
        loop {
            let Some(chunk) = self.log.chunks.get(self.chunk) else {
                return Event::Eof;
            };
            if self.offset >= chunk.len() {
                self.chunk += 1;
                self.offset = 0;
                continue;
            }

            let t = untag(chunk[self.offset]);
            self.offset += 1;
            return match t {
                JsonType::Null => Event::Null,
                JsonType::True => Event::True,
                JsonType::False => Event::False,
                JsonType::StartArray => Event::StartArray,
                JsonType::EndArray => Event::EndArray,
                JsonType::StartObject => Event::StartObject,
                JsonType::EndObject => Event::EndObject,
                JsonType::Integer => {
                    let bytes: [u8; 8] = chunk[self.offset..self.offset + 8].try_into().unwrap();
                    self.offset += 8;
                    Event::Integer(i64::from_le_bytes(bytes))
                }
                JsonType::Real => {
                    let bytes: [u8; 8] = chunk[self.offset..self.offset + 8].try_into().unwrap();
                    self.offset += 8;
                    Event::Real(f64::from_bits(u64::from_le_bytes(bytes)))
                }
                JsonType::String | JsonType::Key => {
                    let len_bytes: [u8; 4] =
                        chunk[self.offset..self.offset + 4].try_into().unwrap();
                    let len = u32::from_le_bytes(len_bytes) as usize;
                    self.offset += 4;
                    let bytes = &chunk[self.offset..self.offset + len];
                    self.offset += len;
                    if t == JsonType::String {
                        Event::String(bytes)
                    } else {
                        Event::Key(bytes)
                    }
                }
                JsonType::Eof => Event::Eof,
            };
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn round_trips_a_small_document() {
        let mut log = EventLog::new();
        log.start_object();
        log.key(b"a");
        log.integer(1);
        log.key(b"b");
        log.real(2.5);
        log.key(b"c");
        log.string(b"hi");
        log.key(b"d");
        log.boolean(true);
        log.key(b"e");
        log.null();
        log.end_object();

        let mut cursor = DomCursor::new(&log);
        assert_eq!(cursor.next(), Event::StartObject);
        assert_eq!(cursor.next(), Event::Key(b"a"));
        assert_eq!(cursor.next(), Event::Integer(1));
        assert_eq!(cursor.next(), Event::Key(b"b"));
        assert_eq!(cursor.next(), Event::Real(2.5));
        assert_eq!(cursor.next(), Event::Key(b"c"));
        assert_eq!(cursor.next(), Event::String(b"hi"));
        assert_eq!(cursor.next(), Event::Key(b"d"));
        assert_eq!(cursor.next(), Event::True);
        assert_eq!(cursor.next(), Event::Key(b"e"));
        assert_eq!(cursor.next(), Event::Null);
        assert_eq!(cursor.next(), Event::EndObject);
        assert_eq!(cursor.next(), Event::Eof);
        assert_eq!(cursor.next(), Event::Eof);
    }

    #[test]
    fn spans_multiple_chunks() {
        let mut log = EventLog::new();
        log.start_array();
        for i in 0..10_000i64 {
            log.integer(i);
        }
        log.end_array();
        assert!(log.chunks.len() > 1);

        let mut cursor = DomCursor::new(&log);
        assert_eq!(cursor.next(), Event::StartArray);
        for i in 0..10_000i64 {
            assert_eq!(cursor.next(), Event::Integer(i));
        }
        assert_eq!(cursor.next(), Event::EndArray);
        assert_eq!(cursor.next(), Event::Eof);
    }

    struct Recorder(Vec<String>);
    impl Sink for Recorder {
        fn null(&mut self) -> bool {
            self.0.push("null".into());
            true
        }
        fn integer(&mut self, v: i64) -> bool {
            self.0.push(format!("int:{v}"));
            true
        }
        fn start_array(&mut self) -> bool {
            self.0.push("[".into());
            true
        }
        fn end_array(&mut self) -> bool {
            self.0.push("]".into());
            true
        }
    }

    #[test]
    fn replays_into_a_sink() {
        let mut log = EventLog::new();
        log.start_array();
        log.integer(1);
        log.null();
        log.end_array();

        let mut rec = Recorder(Vec::new());
        log.replay_into(&mut rec).unwrap();
        assert_eq!(rec.0, vec!["[", "int:1", "null", "]"]);
    }
}
