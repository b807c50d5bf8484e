//! Options for [`crate::Parser`]/[`crate::PullParser`] and
//! [`crate::Generator`]. Use [`ParserOptionsBuilder`]/
//! [`GeneratorOptionsBuilder`] to create instances of these structs.

use bitflags::bitflags;

/// The minimum effective value for `max_nesting`, regardless of what is
/// requested.
pub const MIN_MAX_NESTING: usize = 1024;

bitflags! {
    /// Relaxations from strict JSON that a parser or generator may allow.
    /// Or values together to enable more than one.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct AllowFlags: u32 {
        /// Allow C-style `//` and `/* */` comments wherever whitespace is
        /// allowed.
        const COMMENTS = 0x01;

        /// Allow a single trailing comma before the matching `]` or `}`.
        const TRAILING_COMMAS = 0x02;

        /// Do not error on unconsumed input after a top-level value.
        /// Ignored when `MULTIPLE_VALUES` is set.
        const TRAILING_CHARS = 0x04;

        /// Parse successive top-level values until EOF, emitting their
        /// events in order.
        const MULTIPLE_VALUES = 0x08;

        /// Skip UTF-8 validation of input string literals.
        const INVALID_UTF8_IN = 0x10;

        /// Disable UTF-8 validation when emitting output strings. Only
        /// honored by the builtin JSON emitter.
        const INVALID_UTF8_OUT = 0x20;
    }
}

/// The input a [`crate::Parser`]/[`crate::PullParser`] reads from. Exactly
/// one must be supplied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Input<'a> {
    None,
    Bytes(&'a [u8]),
    Dom(&'a crate::dom::EventLog),
}

/// Options for [`crate::Parser`]/[`crate::PullParser`]. Use
/// [`ParserOptionsBuilder`] to create instances of this struct.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParserOptions<'a> {
    pub(crate) max_nesting: usize,
    pub(crate) allow: AllowFlags,
    pub(crate) input: Input<'a>,
    /// Set once a second input source is supplied by the builder. Checked by
    /// [`crate::Parser::parse`]/[`crate::PullParser::new`] ahead of
    /// `input`, which by itself can only tell "none" from "one".
    pub(crate) input_conflict: bool,
}

impl Default for ParserOptions<'_> {
    fn default() -> Self {
        ParserOptions {
            max_nesting: MIN_MAX_NESTING,
            allow: AllowFlags::empty(),
            input: Input::None,
            input_conflict: false,
        }
    }
}

/// A builder for [`ParserOptions`].
///
/// ```rust
/// use jsnpg::options::ParserOptionsBuilder;
///
/// let opts = ParserOptionsBuilder::default()
///     .with_bytes(br#"{"k": [12.5, true,],}"#)
///     .with_max_nesting(16)
///     .build();
/// ```
#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub struct ParserOptionsBuilder<'a> {
    options: ParserOptions<'a>,
}

impl<'a> ParserOptionsBuilder<'a> {
    /// Set the maximum nesting depth. Values below [`MIN_MAX_NESTING`] are
    /// raised to it.
    pub fn with_max_nesting(mut self, max_nesting: usize) -> Self {
        self.options.max_nesting = max_nesting.max(MIN_MAX_NESTING);
        self
    }

    /// Set which relaxations from strict JSON are allowed.
    pub fn with_allow(mut self, allow: AllowFlags) -> Self {
        self.options.allow = allow;
        self
    }

    /// Parse from a byte buffer.
    pub fn with_bytes(mut self, bytes: &'a [u8]) -> Self {
        self.set_input(Input::Bytes(bytes));
        self
    }

    /// Parse from a string.
    pub fn with_str(mut self, s: &'a str) -> Self {
        self.set_input(Input::Bytes(s.as_bytes()));
        self
    }

    /// Parse by replaying a captured [`crate::dom::EventLog`].
    pub fn with_dom(mut self, dom: &'a crate::dom::EventLog) -> Self {
        self.set_input(Input::Dom(dom));
        self
    }

    fn set_input(&mut self, input: Input<'a>) {
        if self.options.input != Input::None {
            self.options.input_conflict = true;
        }
        self.options.input = input;
    }

    /// Build the options. Does not itself validate that exactly one input
    /// source was supplied: supplying zero, or more than one, is reported as
    /// [`crate::ErrorKind::Opt`] when the options are used to construct a
    /// parser.
    pub fn build(self) -> ParserOptions<'a> {
        self.options
    }
}

/// Options for [`crate::Generator`]. Use [`GeneratorOptionsBuilder`] to
/// create instances of this struct. Which sink the generator writes to
/// (JSON emitter, event log, or user-supplied [`crate::sink::Sink`]) is
/// chosen by which [`crate::Generator`] constructor is called, not by a
/// field here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GeneratorOptions {
    pub(crate) indent: u8,
    pub(crate) allow: AllowFlags,
    pub(crate) max_nesting: usize,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        GeneratorOptions {
            indent: 0,
            allow: AllowFlags::empty(),
            max_nesting: MIN_MAX_NESTING,
        }
    }
}

/// A builder for [`GeneratorOptions`].
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct GeneratorOptionsBuilder {
    options: GeneratorOptions,
}

impl GeneratorOptionsBuilder {
    /// Set the pretty-print indent width, clamped to `[0, 8]`. `0` means
    /// compact (no whitespace).
    pub fn with_indent(mut self, indent: u8) -> Self {
        self.options.indent = indent.min(8);
        self
    }

    /// Set which relaxations are allowed. Only
    /// [`AllowFlags::INVALID_UTF8_OUT`] has an effect on the builtin JSON
    /// emitter.
    pub fn with_allow(mut self, allow: AllowFlags) -> Self {
        self.options.allow = allow;
        self
    }

    /// Set the maximum nesting depth used by the debug-build invariant
    /// checker. Values below [`MIN_MAX_NESTING`] are raised to it.
    pub fn with_max_nesting(mut self, max_nesting: usize) -> Self {
        self.options.max_nesting = max_nesting.max(MIN_MAX_NESTING);
        self
    }

    /// Build the options.
    pub fn build(self) -> GeneratorOptions {
        self.options
    }
}

impl GeneratorOptions {
    /// Build a generator over the builtin [`crate::emitter::JsonEmitter`],
    /// honoring `indent` and [`AllowFlags::INVALID_UTF8_OUT`]. This is the
    /// default output sink: reach for [`GeneratorOptions::into_dom`] or
    /// [`GeneratorOptions::into_sink`] instead if something else should
    /// receive the events.
    pub fn into_emitter(self) -> crate::generator::Generator<crate::emitter::JsonEmitter> {
        let validate_utf8 = !self.allow.contains(AllowFlags::INVALID_UTF8_OUT);
        crate::generator::Generator::new(
            crate::emitter::JsonEmitter::new(self.indent, validate_utf8),
            self.max_nesting,
        )
    }

    /// Build a generator that records into a fresh [`crate::dom::EventLog`].
    pub fn into_dom(self) -> crate::generator::Generator<crate::dom::EventLog> {
        crate::generator::Generator::new(crate::dom::EventLog::new(), self.max_nesting)
    }

    /// Build a generator over a caller-supplied [`crate::sink::Sink`].
    pub fn into_sink<S: crate::sink::Sink>(self, sink: S) -> crate::generator::Generator<S> {
        crate::generator::Generator::new(sink, self.max_nesting)
    }
}
