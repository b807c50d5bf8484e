//! The push (SAX-style) parse core: an iterative loop that drives a
//! [`Sink`] directly from an input buffer, with no recursion regardless of
//! nesting depth.

use crate::bitstack::{BitStack, Container};
use crate::error::{Error, ErrorKind};
use crate::event::Event;
use crate::input::InputCursor;
use crate::number::parse_number;
use crate::options::AllowFlags;
use crate::parser::shared::{parse_false, parse_null, parse_string, parse_true};
use crate::sink::Sink;

/// Parse one JSON value (and everything nested in it) starting at `b`,
/// which must be the already-peeked first non-whitespace byte of the
/// value. Mirrors `parse.c`'s `parse_generate`, flattening recursive
/// descent into a loop with nesting tracked by `stack`.
fn parse_value<S: Sink>(
    cursor: &mut InputCursor,
    sink: &mut S,
    stack: &mut BitStack,
    allow: AllowFlags,
    mut b: u8,
) -> Result<(), Error> {
    let opt_comments = allow.contains(AllowFlags::COMMENTS);
    let opt_trailing_commas = allow.contains(AllowFlags::TRAILING_COMMAS);
    let validate_utf8 = !allow.contains(AllowFlags::INVALID_UTF8_IN);

    let mut in_container: Option<Container> = stack.peek();
    let mut more_todo = true;

    while more_todo {
        if in_container == Some(Container::Object) {
            if b != b'"' {
                return Err(Error::new(ErrorKind::ExpectedKey, cursor.tell()));
            }
            let (off, len) = parse_string(cursor, validate_utf8)?;
            b = cursor.consume_whitespace(opt_comments)?;
            if b != b':' {
                return Err(Error::new(ErrorKind::ExpectedKey, cursor.tell()));
            }
            if !sink.key(cursor.slice(off, len)) {
                return Err(terminated(sink, cursor.tell()));
            }
            cursor.take(); // ':'
            b = cursor.consume_whitespace(opt_comments)?;
        }

        match b {
            b'[' => {
                stack
                    .push(Container::Array)
                    .map_err(|k| Error::new(k, cursor.tell()))?;
                cursor.take();
                if !sink.start_array() {
                    return Err(terminated(sink, cursor.tell()));
                }
                b = cursor.consume_whitespace(opt_comments)?;
                if opt_trailing_commas && b == b',' {
                    cursor.take();
                    b = cursor.consume_whitespace(opt_comments)?;
                    if b != b']' {
                        return Err(Error::new(ErrorKind::Unexpected, cursor.tell()));
                    }
                }
                if b == b']' {
                    cursor.take();
                    stack.pop().map_err(|k| Error::new(k, cursor.tell()))?;
                    in_container = stack.peek();
                    if !sink.end_array() {
                        return Err(terminated(sink, cursor.tell()));
                    }
                } else {
                    in_container = Some(Container::Array);
                    continue;
                }
            }

            b'{' => {
                stack
                    .push(Container::Object)
                    .map_err(|k| Error::new(k, cursor.tell()))?;
                cursor.take();
                if !sink.start_object() {
                    return Err(terminated(sink, cursor.tell()));
                }
                b = cursor.consume_whitespace(opt_comments)?;
                if opt_trailing_commas && b == b',' {
                    cursor.take();
                    b = cursor.consume_whitespace(opt_comments)?;
                    if b != b'}' {
                        return Err(Error::new(ErrorKind::Unexpected, cursor.tell()));
                    }
                }
                if b == b'}' {
                    cursor.take();
                    stack.pop().map_err(|k| Error::new(k, cursor.tell()))?;
                    in_container = stack.peek();
                    if !sink.end_object() {
                        return Err(terminated(sink, cursor.tell()));
                    }
                } else {
                    in_container = Some(Container::Object);
                    continue;
                }
            }

            b'"' => {
                let (off, len) = parse_string(cursor, validate_utf8)?;
                if !sink.string(cursor.slice(off, len)) {
                    return Err(terminated(sink, cursor.tell()));
                }
            }

            b't' => {
                parse_true(cursor)?;
                if !sink.boolean(true) {
                    return Err(terminated(sink, cursor.tell()));
                }
            }

            b'f' => {
                parse_false(cursor)?;
                if !sink.boolean(false) {
                    return Err(terminated(sink, cursor.tell()));
                }
            }

            b'n' => {
                parse_null(cursor)?;
                if !sink.null() {
                    return Err(terminated(sink, cursor.tell()));
                }
            }

            b'-' | b'0'..=b'9' => match parse_number(cursor)? {
                Event::Real(v) => {
                    if !sink.real(v) {
                        return Err(terminated(sink, cursor.tell()));
                    }
                }
                Event::Integer(v) => {
                    if !sink.integer(v) {
                        return Err(terminated(sink, cursor.tell()));
                    }
                }
                _ => unreachable!(),
            },

            _ => return Err(Error::new(ErrorKind::Unexpected, cursor.tell())),
        }

        loop {
            b = cursor.consume_whitespace(opt_comments)?;
            if b == b',' {
                cursor.take();
                b = cursor.consume_whitespace(opt_comments)?;
                if !(opt_trailing_commas && (b == b'}' || b == b']')) {
                    break;
                }
            }
            if b == b'}' && in_container == Some(Container::Object) {
                cursor.take();
                stack.pop().map_err(|k| Error::new(k, cursor.tell()))?;
                in_container = stack.peek();
                if !sink.end_object() {
                    return Err(terminated(sink, cursor.tell()));
                }
            } else if b == b']' && in_container == Some(Container::Array) {
                cursor.take();
                stack.pop().map_err(|k| Error::new(k, cursor.tell()))?;
                in_container = stack.peek();
                if !sink.end_array() {
                    return Err(terminated(sink, cursor.tell()));
                }
            } else if in_container.is_none() {
                more_todo = false;
                break;
            } else {
                return Err(Error::new(ErrorKind::Unexpected, cursor.tell()));
            }
        }
    }

    Ok(())
}

fn terminated<S: Sink>(sink: &mut S, position: usize) -> Error {
    sink.take_error()
        .unwrap_or_else(|| Error::new(ErrorKind::Terminated, position))
}

/// Drive `sink` with the event sequence of the JSON text in `cursor`.
/// Honors `MULTIPLE_VALUES`/`TRAILING_CHARS` for what follows the first
/// top-level value. Mirrors `parse.c`'s `parse`.
pub(crate) fn parse<S: Sink>(
    cursor: &mut InputCursor,
    sink: &mut S,
    max_nesting: usize,
    allow: AllowFlags,
) -> Result<(), Error> {
    let opt_comments = allow.contains(AllowFlags::COMMENTS);
    let multiple_values = allow.contains(AllowFlags::MULTIPLE_VALUES);
    let trailing_chars = allow.contains(AllowFlags::TRAILING_CHARS);

    let mut stack = BitStack::new(max_nesting);

    loop {
        let b = cursor.consume_whitespace(opt_comments)?;
        parse_value(cursor, sink, &mut stack, allow, b)?;

        if !cursor.eof() {
            if multiple_values {
                continue;
            }
            if !trailing_chars {
                return Err(Error::new(ErrorKind::Unexpected, cursor.tell()));
            }
        }
        break;
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dom::EventLog;
    use crate::event::Event;
    use crate::generator::Generator;

    fn parse_into_log(input: &[u8], allow: AllowFlags) -> Result<EventLog, Error> {
        let mut cursor = InputCursor::new(input);
        let mut gen = Generator::new(EventLog::new(), 1024);
        parse(&mut cursor, &mut gen, 1024, allow)?;
        Ok(gen.into_sink())
    }

    #[test]
    fn flat_array() {
        let log = parse_into_log(b"[1, 2.5, \"a\", true, false, null]", AllowFlags::empty())
            .unwrap();
        let mut c = crate::dom::DomCursor::new(&log);
        assert_eq!(c.next(), Event::StartArray);
        assert_eq!(c.next(), Event::Integer(1));
        assert_eq!(c.next(), Event::Real(2.5));
        assert_eq!(c.next(), Event::String(b"a"));
        assert_eq!(c.next(), Event::True);
        assert_eq!(c.next(), Event::False);
        assert_eq!(c.next(), Event::Null);
        assert_eq!(c.next(), Event::EndArray);
        assert_eq!(c.next(), Event::Eof);
    }

    #[test]
    fn nested_object() {
        let log = parse_into_log(br#"{"a": {"b": [1, 2]}}"#, AllowFlags::empty()).unwrap();
        let mut c = crate::dom::DomCursor::new(&log);
        assert_eq!(c.next(), Event::StartObject);
        assert_eq!(c.next(), Event::Key(b"a"));
        assert_eq!(c.next(), Event::StartObject);
        assert_eq!(c.next(), Event::Key(b"b"));
        assert_eq!(c.next(), Event::StartArray);
        assert_eq!(c.next(), Event::Integer(1));
        assert_eq!(c.next(), Event::Integer(2));
        assert_eq!(c.next(), Event::EndArray);
        assert_eq!(c.next(), Event::EndObject);
        assert_eq!(c.next(), Event::EndObject);
    }

    #[test]
    fn empty_containers() {
        let log = parse_into_log(b"[[], {}]", AllowFlags::empty()).unwrap();
        let mut c = crate::dom::DomCursor::new(&log);
        assert_eq!(c.next(), Event::StartArray);
        assert_eq!(c.next(), Event::StartArray);
        assert_eq!(c.next(), Event::EndArray);
        assert_eq!(c.next(), Event::StartObject);
        assert_eq!(c.next(), Event::EndObject);
        assert_eq!(c.next(), Event::EndArray);
    }

    #[test]
    fn rejects_trailing_comma_by_default() {
        let err = parse_into_log(b"[1,]", AllowFlags::empty()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unexpected);
    }

    #[test]
    fn allows_trailing_comma_when_enabled() {
        parse_into_log(b"[1,]", AllowFlags::TRAILING_COMMAS).unwrap();
    }

    #[test]
    fn rejects_trailing_input_by_default() {
        let err = parse_into_log(b"1 2", AllowFlags::empty()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unexpected);
    }

    #[test]
    fn allows_trailing_input_when_enabled() {
        parse_into_log(b"1 2", AllowFlags::TRAILING_CHARS).unwrap();
    }

    #[test]
    fn comments_allowed_when_enabled() {
        let log = parse_into_log(b"[1 /* x */, 2] // trailer", AllowFlags::COMMENTS).unwrap();
        let mut c = crate::dom::DomCursor::new(&log);
        assert_eq!(c.next(), Event::StartArray);
        assert_eq!(c.next(), Event::Integer(1));
        assert_eq!(c.next(), Event::Integer(2));
        assert_eq!(c.next(), Event::EndArray);
    }

    #[test]
    fn object_without_key_quotes_errors() {
        let err = parse_into_log(b"{a: 1}", AllowFlags::empty()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ExpectedKey);
    }

    #[test]
    fn mismatched_close_errors() {
        let err = parse_into_log(b"[1, 2}", AllowFlags::empty()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unexpected);
    }
}
