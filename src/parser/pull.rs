//! The pull (resumable) parse core: produces one event per call, holding
//! exactly the state a push parse would otherwise keep on the call stack.

use crate::bitstack::{BitStack, Container};
use crate::error::{Error, ErrorKind};
use crate::event::{Event, ParseOutcome};
use crate::input::InputCursor;
use crate::number::parse_number;
use crate::options::AllowFlags;
use crate::parser::shared::{parse_false, parse_null, parse_string, parse_true};

/// Where a resumable parse is up to. Mirrors `types.h`'s `parse_state`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum State {
    Start,
    Object,
    Key,
    KeyValue,
    ObjectComma,
    Array,
    ArrayValue,
    ArrayComma,
    Done,
    Eof,
}

fn state_change_value(state: State) -> State {
    match state {
        State::Start => State::Done,
        State::Key => State::KeyValue,
        State::Array | State::ArrayValue => State::ArrayValue,
        _ => unreachable!("state_change_value called in state {state:?}"),
    }
}

fn state_change_end(stack: &BitStack) -> State {
    match stack.peek() {
        Some(Container::Object) => State::KeyValue,
        Some(Container::Array) => State::ArrayValue,
        None => State::Done,
    }
}

/// A pull parser over an owned input buffer: call [`PullParser::next`]
/// repeatedly to retrieve one event at a time, resuming exactly where the
/// previous call left off.
pub struct PullParser {
    cursor: InputCursor,
    stack: BitStack,
    state: State,
    allow: AllowFlags,
}

impl PullParser {
    pub(crate) fn new(bytes: &[u8], max_nesting: usize, allow: AllowFlags) -> Self {
        PullParser {
            cursor: InputCursor::new(bytes),
            stack: BitStack::new(max_nesting),
            state: State::Start,
            allow,
        }
    }

    fn outcome(&self, event: Event<'_>) -> ParseOutcome<'_> {
        ParseOutcome::new(event, self.cursor.tell())
    }

    /// The next step of the parse: the event produced and the position it
    /// ended at, or [`Event::Eof`] once parsing completes successfully.
    /// Calling `next` again after `Eof` (or after an error) raises
    /// [`ErrorKind::Eof`].
    pub fn next(&mut self) -> Result<ParseOutcome<'_>, Error> {
        let opt_comments = self.allow.contains(AllowFlags::COMMENTS);
        let opt_trailing_commas = self.allow.contains(AllowFlags::TRAILING_COMMAS);
        let validate_utf8 = !self.allow.contains(AllowFlags::INVALID_UTF8_IN);

        let mut state = self.state;
        let mut b = self.cursor.consume_whitespace(opt_comments)?;

        if state == State::Eof {
            return Err(Error::new(ErrorKind::Eof, self.cursor.tell()));
        }

        loop {
            match state {
                State::KeyValue => {
                    if b == b'}' {
                        self.end_object()?;
                        return Ok(self.outcome(Event::EndObject));
                    } else if b == b',' {
                        self.cursor.take();
                        b = self.cursor.consume_whitespace(opt_comments)?;
                    }

                    if !opt_trailing_commas {
                        state = State::ObjectComma;
                        continue;
                    }
                    state = State::Object;
                    // Fall through to the `Object` arm with the byte we just read.
                    if b == b'}' {
                        self.end_object()?;
                        return Ok(self.outcome(Event::EndObject));
                    }
                    state = State::ObjectComma;
                    continue;
                }

                State::Object => {
                    if b == b'}' {
                        self.end_object()?;
                        return Ok(self.outcome(Event::EndObject));
                    }
                    state = State::ObjectComma;
                    continue;
                }

                State::ObjectComma => {
                    if b != b'"' {
                        return Err(Error::new(ErrorKind::ExpectedKey, self.cursor.tell()));
                    }
                    let (off, len) = parse_string(&mut self.cursor, validate_utf8)?;
                    b = self.cursor.consume_whitespace(opt_comments)?;
                    if b != b':' {
                        return Err(Error::new(ErrorKind::ExpectedKey, self.cursor.tell()));
                    }
                    self.cursor.take(); // ':'
                    self.state = State::Key;
                    return Ok(self.outcome(Event::Key(self.cursor.slice(off, len))));
                }

                State::ArrayValue => {
                    if b == b']' {
                        self.end_array()?;
                        return Ok(self.outcome(Event::EndArray));
                    } else if b == b',' {
                        self.cursor.take();
                        b = self.cursor.consume_whitespace(opt_comments)?;
                    } else {
                        return Err(Error::new(ErrorKind::Unexpected, self.cursor.tell()));
                    }

                    if !opt_trailing_commas {
                        state = State::ArrayComma;
                        continue;
                    }
                    state = State::Array;
                    continue;
                }

                State::Array => {
                    if b == b']' {
                        self.end_array()?;
                        return Ok(self.outcome(Event::EndArray));
                    }
                    // fall through: expect a value below.
                }

                State::Done => {
                    self.cursor.consume_whitespace(opt_comments)?;
                    if !self.cursor.eof() {
                        if self.allow.contains(AllowFlags::MULTIPLE_VALUES) {
                            state = State::Start;
                            continue;
                        }
                        if !self.allow.contains(AllowFlags::TRAILING_CHARS) {
                            return Err(Error::new(ErrorKind::Unexpected, self.cursor.tell()));
                        }
                    }
                    self.state = State::Eof;
                    return Ok(self.outcome(Event::Eof));
                }

                State::Start | State::Key | State::ArrayComma => {}

                State::Eof => unreachable!("handled above"),
            }

            debug_assert!(matches!(
                state,
                State::Start | State::Key | State::Array | State::ArrayComma
            ));

            match b {
                b'"' => {
                    let (off, len) = parse_string(&mut self.cursor, validate_utf8)?;
                    self.state = state_change_value(state);
                    return Ok(self.outcome(Event::String(self.cursor.slice(off, len))));
                }
                b'{' => {
                    self.stack
                        .push(Container::Object)
                        .map_err(|k| Error::new(k, self.cursor.tell()))?;
                    self.cursor.take();
                    self.state = State::Object;
                    return Ok(self.outcome(Event::StartObject));
                }
                b'[' => {
                    self.stack
                        .push(Container::Array)
                        .map_err(|k| Error::new(k, self.cursor.tell()))?;
                    self.cursor.take();
                    self.state = State::Array;
                    return Ok(self.outcome(Event::StartArray));
                }
                b't' => {
                    parse_true(&mut self.cursor)?;
                    self.state = state_change_value(state);
                    return Ok(self.outcome(Event::True));
                }
                b'f' => {
                    parse_false(&mut self.cursor)?;
                    self.state = state_change_value(state);
                    return Ok(self.outcome(Event::False));
                }
                b'n' => {
                    parse_null(&mut self.cursor)?;
                    self.state = state_change_value(state);
                    return Ok(self.outcome(Event::Null));
                }
                b'-' | b'0'..=b'9' => {
                    let event = parse_number(&mut self.cursor)?;
                    self.state = state_change_value(state);
                    return Ok(self.outcome(event));
                }
                _ => return Err(Error::new(ErrorKind::Unexpected, self.cursor.tell())),
            }
        }
    }

    fn end_object(&mut self) -> Result<(), Error> {
        self.stack
            .pop()
            .map_err(|k| Error::new(k, self.cursor.tell()))?;
        self.cursor.take(); // '}'
        self.state = state_change_end(&self.stack);
        Ok(())
    }

    fn end_array(&mut self) -> Result<(), Error> {
        self.stack
            .pop()
            .map_err(|k| Error::new(k, self.cursor.tell()))?;
        self.cursor.take(); // ']'
        self.state = state_change_end(&self.stack);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn events(input: &[u8], allow: AllowFlags) -> Vec<String> {
        let mut p = PullParser::new(input, 1024, allow);
        let mut out = Vec::new();
        loop {
            match p.next() {
                Ok(outcome) if outcome.event() == Event::Eof => {
                    out.push("eof".to_string());
                    break;
                }
                Ok(outcome) => out.push(format!("{:?}", outcome.event())),
                Err(e) => {
                    out.push(format!("err:{:?}", e.kind));
                    break;
                }
            }
        }
        out
    }

    #[test]
    fn flat_array() {
        let e = events(b"[1, 2]", AllowFlags::empty());
        assert_eq!(
            e,
            vec![
                "StartArray".to_string(),
                "Integer(1)".to_string(),
                "Integer(2)".to_string(),
                "EndArray".to_string(),
                "eof".to_string(),
            ]
        );
    }

    #[test]
    fn object_round_trip() {
        let e = events(br#"{"a": 1, "b": [true, null]}"#, AllowFlags::empty());
        assert_eq!(
            e,
            vec![
                "StartObject".to_string(),
                "Key([97])".to_string(),
                "Integer(1)".to_string(),
                "Key([98])".to_string(),
                "StartArray".to_string(),
                "True".to_string(),
                "Null".to_string(),
                "EndArray".to_string(),
                "EndObject".to_string(),
                "eof".to_string(),
            ]
        );
    }

    #[test]
    fn partial_array_then_eof_error() {
        let mut p = PullParser::new(b"[1, 2", 1024, AllowFlags::empty());
        assert_eq!(p.next().unwrap().event(), Event::StartArray);
        assert_eq!(p.next().unwrap().event(), Event::Integer(1));
        assert_eq!(p.next().unwrap().event(), Event::Integer(2));
        assert_eq!(p.next().unwrap_err().kind, ErrorKind::Eof);
    }

    #[test]
    fn further_calls_after_eof_error() {
        let mut p = PullParser::new(b"1", 1024, AllowFlags::empty());
        assert_eq!(p.next().unwrap().event(), Event::Integer(1));
        let outcome = p.next().unwrap();
        assert_eq!(outcome.event(), Event::Eof);
        assert_eq!(outcome.position(), 1);
        assert_eq!(p.next().unwrap_err().kind, ErrorKind::Eof);
    }

    #[test]
    fn array_value_unexpected_byte_errors() {
        let mut p = PullParser::new(b"[1 2]", 1024, AllowFlags::empty());
        assert_eq!(p.next().unwrap().event(), Event::StartArray);
        assert_eq!(p.next().unwrap().event(), Event::Integer(1));
        assert_eq!(p.next().unwrap_err().kind, ErrorKind::Unexpected);
    }

    #[test]
    fn key_outcome_exposes_bytes_via_accessor() {
        let mut p = PullParser::new(br#"{"a": 1}"#, 1024, AllowFlags::empty());
        p.next().unwrap(); // StartObject
        let key = p.next().unwrap();
        assert_eq!(key.key(), Some(&b"a"[..]));
        assert_eq!(key.string(), None);
    }
}
