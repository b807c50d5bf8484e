//! Parser entry points: dispatch to the push core, the pull core, or a DOM
//! replay depending on which [`Input`] an options value carries.
//!
//! Mirrors `parsenext.c`'s `jsnpg_parse_next`, which dispatches to either
//! the byte-stream state machine or `dom_parse_next` depending on whether a
//! byte stream or a captured DOM was supplied.

pub(crate) mod pull;
pub(crate) mod push;
pub(crate) mod shared;

use crate::dom::DomCursor;
use crate::error::{Error, ErrorKind};
use crate::event::{Event, ParseOutcome};
use crate::input::InputCursor;
use crate::options::{Input, ParserOptions};
use crate::sink::Sink;

/// A one-shot, push-style (SAX) parser: [`Parser::parse`] drives a
/// [`Sink`] with the input's full event sequence in one call.
pub struct Parser<'a> {
    options: ParserOptions<'a>,
}

impl<'a> Parser<'a> {
    /// Build a parser from `options`. Does not itself inspect `options`;
    /// [`Parser::parse`] reports [`ErrorKind::Opt`] if no input source, or
    /// more than one, was configured.
    pub fn new(options: ParserOptions<'a>) -> Self {
        Parser { options }
    }

    /// Drive `sink` with the event sequence of the configured input.
    pub fn parse<S: Sink>(&self, sink: &mut S) -> Result<(), Error> {
        if self.options.input_conflict {
            return Err(Error::new(ErrorKind::Opt, 0));
        }
        match self.options.input {
            Input::None => Err(Error::new(ErrorKind::Opt, 0)),
            Input::Bytes(bytes) => {
                let mut cursor = InputCursor::new(bytes);
                push::parse(&mut cursor, sink, self.options.max_nesting, self.options.allow)
            }
            Input::Dom(log) => log.replay_into(sink),
        }
    }
}

enum Core<'a> {
    Bytes(pull::PullParser),
    Dom { cursor: DomCursor<'a>, done: bool },
}

/// A resumable, pull-style parser: call [`PullParser::next`] repeatedly to
/// retrieve one event (and its byte position) at a time.
pub struct PullParser<'a> {
    core: Core<'a>,
}

impl<'a> PullParser<'a> {
    /// Build a pull parser from `options`. Reports [`ErrorKind::Opt`]
    /// immediately if no input source, or more than one, was configured.
    pub fn new(options: &ParserOptions<'a>) -> Result<Self, Error> {
        if options.input_conflict {
            return Err(Error::new(ErrorKind::Opt, 0));
        }
        let core = match options.input {
            Input::None => return Err(Error::new(ErrorKind::Opt, 0)),
            Input::Bytes(bytes) => {
                Core::Bytes(pull::PullParser::new(bytes, options.max_nesting, options.allow))
            }
            Input::Dom(log) => Core::Dom {
                cursor: DomCursor::new(log),
                done: false,
            },
        };
        Ok(PullParser { core })
    }

    /// The next step of the parse, or [`Event::Eof`] once parsing completes
    /// successfully. Calling `next` again after `Eof` raises
    /// [`ErrorKind::Eof`].
    pub fn next(&mut self) -> Result<ParseOutcome<'_>, Error> {
        match &mut self.core {
            Core::Bytes(p) => p.next(),
            Core::Dom { cursor, done } => {
                if *done {
                    return Err(Error::new(ErrorKind::Eof, 0));
                }
                let event = cursor.next();
                if event == Event::Eof {
                    *done = true;
                }
                Ok(ParseOutcome::new(event, 0))
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dom::EventLog;
    use crate::options::ParserOptionsBuilder;

    #[test]
    fn push_parser_reports_opt_with_no_input() {
        let options = ParserOptionsBuilder::default().build();
        let parser = Parser::new(options);
        let mut log = EventLog::new();
        assert_eq!(parser.parse(&mut log).unwrap_err().kind, ErrorKind::Opt);
    }

    #[test]
    fn pull_parser_reports_opt_with_no_input() {
        let options = ParserOptionsBuilder::default().build();
        assert_eq!(PullParser::new(&options).unwrap_err().kind, ErrorKind::Opt);
    }

    #[test]
    fn push_and_pull_report_opt_with_more_than_one_input() {
        let log = EventLog::new();
        let options = ParserOptionsBuilder::default()
            .with_bytes(b"[1]")
            .with_dom(&log)
            .build();
        assert_eq!(
            Parser::new(options.clone()).parse(&mut EventLog::new()).unwrap_err().kind,
            ErrorKind::Opt
        );
        assert_eq!(PullParser::new(&options).unwrap_err().kind, ErrorKind::Opt);
    }

    #[test]
    fn push_parser_drives_a_sink_from_bytes() {
        let options = ParserOptionsBuilder::default().with_bytes(b"[1, 2]").build();
        let parser = Parser::new(options);
        let mut log = EventLog::new();
        parser.parse(&mut log).unwrap();
        let mut cursor = DomCursor::new(&log);
        assert_eq!(cursor.next(), Event::StartArray);
        assert_eq!(cursor.next(), Event::Integer(1));
        assert_eq!(cursor.next(), Event::Integer(2));
        assert_eq!(cursor.next(), Event::EndArray);
        assert_eq!(cursor.next(), Event::Eof);
    }

    #[test]
    fn pull_parser_replays_a_dom() {
        let mut log = EventLog::new();
        log.start_array();
        log.integer(7);
        log.end_array();

        let options = ParserOptionsBuilder::default().with_dom(&log).build();
        let mut parser = PullParser::new(&options).unwrap();
        assert_eq!(parser.next().unwrap().event(), Event::StartArray);
        assert_eq!(parser.next().unwrap().event(), Event::Integer(7));
        assert_eq!(parser.next().unwrap().event(), Event::EndArray);
        assert_eq!(parser.next().unwrap().event(), Event::Eof);
        assert_eq!(parser.next().unwrap_err().kind, ErrorKind::Eof);
    }
}
