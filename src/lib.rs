//! # jsnpg
//!
//! An event-driven JSON parser and generator built around one event
//! alphabet ([`Event`]): `null`/`true`/`false`/`Integer`/`Real`/`String`/
//! `Key`/`StartArray`/`EndArray`/`StartObject`/`EndObject`/`Eof`. The same
//! alphabet is produced by both parse styles below, consumed by the
//! generator, and recorded/replayed by the event log in [`dom`].
//!
//! ## Examples
//!
//! ### Push-based parsing
//!
//! Push parsing drives a [`Sink`] directly: implement the methods you care
//! about (everything else defaults to a no-op), build a [`Parser`] from
//! [`ParserOptions`], and call [`Parser::parse`] once.
//!
//! ```
//! use jsnpg::{Parser, Sink};
//! use jsnpg::options::ParserOptionsBuilder;
//!
//! struct NameCollector {
//!     names: Vec<String>,
//!     want_value: bool,
//! }
//!
//! impl Sink for NameCollector {
//!     fn key(&mut self, bytes: &[u8]) -> bool {
//!         self.want_value = bytes == b"name";
//!         true
//!     }
//!
//!     fn string(&mut self, bytes: &[u8]) -> bool {
//!         if self.want_value {
//!             self.names.push(String::from_utf8_lossy(bytes).into_owned());
//!         }
//!         true
//!     }
//! }
//!
//! let json = r#"{"name": "Elvis"}"#.as_bytes();
//! let options = ParserOptionsBuilder::default().with_bytes(json).build();
//! let mut sink = NameCollector { names: Vec::new(), want_value: false };
//!
//! Parser::new(options).parse(&mut sink).unwrap();
//! assert_eq!(sink.names, vec!["Elvis"]);
//! ```
//!
//! ### Pull-based (resumable) parsing
//!
//! [`PullParser::next`] returns one [`event::ParseOutcome`] at a time,
//! resuming exactly where the previous call left off — useful when control
//! flow needs to live outside the parser (an async task, a state machine of
//! your own).
//!
//! ```
//! use jsnpg::PullParser;
//! use jsnpg::options::ParserOptionsBuilder;
//! use jsnpg::Event;
//!
//! let json = r#"{"name": "Elvis"}"#.as_bytes();
//! let options = ParserOptionsBuilder::default().with_bytes(json).build();
//! let mut parser = PullParser::new(&options).unwrap();
//!
//! loop {
//!     let outcome = parser.next().unwrap();
//!     match outcome.event() {
//!         Event::Eof => break,
//!         _ => {}
//!     }
//! }
//! ```
//!
//! ### Generating JSON
//!
//! [`Generator`] drives any [`Sink`]; pairing it with [`emitter::JsonEmitter`]
//! produces formatted JSON text directly, with no intermediate tree.
//!
//! ```
//! use jsnpg::Generator;
//! use jsnpg::emitter::JsonEmitter;
//!
//! let mut gen = Generator::new(JsonEmitter::new(2, true), 1024);
//! gen.start_object();
//! gen.key(b"name");
//! gen.string(b"Elvis");
//! gen.end_object();
//!
//! assert_eq!(gen.into_sink().as_str(), "{\n  \"name\": \"Elvis\"\n}");
//! ```

mod bitstack;
pub mod dom;
pub mod emitter;
pub mod error;
pub mod event;
pub mod generator;
mod input;
mod number;
pub mod options;
mod output;
mod parser;
pub mod sink;
mod utf8;

pub use error::{Error, ErrorKind, Result};
pub use event::{Event, JsonType, ParseOutcome};
pub use generator::{Generator, GeneratorExt};
pub use options::{AllowFlags, GeneratorOptions, GeneratorOptionsBuilder, ParserOptions, ParserOptionsBuilder};
pub use parser::{Parser, PullParser};
pub use sink::Sink;
