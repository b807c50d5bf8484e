//! The event alphabet shared by parsers and generators.

/// One atomic unit of a JSON document: a structural marker, a value, a key,
/// or a stream terminator.
///
/// `String` and `Key` carry a borrowed byte slice. The slice is valid until
/// the next parse step is taken or the underlying input is released.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Event<'a> {
    /// A `null` value.
    Null,

    /// The boolean value `true`.
    True,

    /// The boolean value `false`.
    False,

    /// An integer value that fits in a signed 64-bit integer and had no
    /// fractional or exponent part.
    Integer(i64),

    /// A floating point value.
    Real(f64),

    /// A string value.
    String(&'a [u8]),

    /// An object field name.
    Key(&'a [u8]),

    /// The start of a JSON array.
    StartArray,

    /// The end of a JSON array.
    EndArray,

    /// The start of a JSON object.
    StartObject,

    /// The end of a JSON object.
    EndObject,

    /// The end of the JSON text. Returned once parsing completes
    /// successfully; every call afterwards is an [`crate::ErrorKind::Eof`]
    /// error.
    Eof,
}

impl Event<'_> {
    /// The [`JsonType`] tag of this event, with no payload.
    pub fn json_type(&self) -> JsonType {
        match self {
            Event::Null => JsonType::Null,
            Event::True => JsonType::True,
            Event::False => JsonType::False,
            Event::Integer(_) => JsonType::Integer,
            Event::Real(_) => JsonType::Real,
            Event::String(_) => JsonType::String,
            Event::Key(_) => JsonType::Key,
            Event::StartArray => JsonType::StartArray,
            Event::EndArray => JsonType::EndArray,
            Event::StartObject => JsonType::StartObject,
            Event::EndObject => JsonType::EndObject,
            Event::Eof => JsonType::Eof,
        }
    }
}

/// One step of a resumable pull parse: the event produced, paired with the
/// byte position it ended at. Mirrors the C `jsnpg_result` union, which
/// bundles a type tag, a position and a payload into a single return value.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ParseOutcome<'a> {
    event: Event<'a>,
    position: usize,
}

impl<'a> ParseOutcome<'a> {
    pub(crate) fn new(event: Event<'a>, position: usize) -> Self {
        ParseOutcome { event, position }
    }

    /// The event produced by this step.
    pub fn event(&self) -> Event<'a> {
        self.event
    }

    /// The byte offset into the input just past this event.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The bytes of a `String` event, or `None` for any other event.
    pub fn string(&self) -> Option<&'a [u8]> {
        match self.event {
            Event::String(b) => Some(b),
            _ => None,
        }
    }

    /// The bytes of a `Key` event, or `None` for any other event.
    pub fn key(&self) -> Option<&'a [u8]> {
        match self.event {
            Event::Key(b) => Some(b),
            _ => None,
        }
    }
}

/// A bare event tag with no payload, used by the event log to record which
/// kind of event a record holds without re-deriving it from the payload.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum JsonType {
    Null,
    True,
    False,
    Integer,
    Real,
    String,
    Key,
    StartArray,
    EndArray,
    StartObject,
    EndObject,
    Eof,
}
