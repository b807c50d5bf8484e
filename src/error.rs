//! Error taxonomy shared by the parser and generator.

use thiserror::Error;

/// The kind of error that stopped a parse or generate call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid or inconsistent option combination.
    Opt,

    /// Allocation failure.
    Alloc,

    /// Number does not match the JSON grammar, or its exponent is out of
    /// range.
    Number,

    /// Malformed UTF-8 in input or output.
    Utf8,

    /// Malformed `\u` surrogate pair.
    Surrogate,

    /// Nesting exceeds the configured maximum.
    StackOverflow,

    /// Close without a matching open.
    StackUnderflow,

    /// A value was required in the current state.
    ExpectedValue,

    /// A key was required in the current state.
    ExpectedKey,

    /// Tried to close an object but the innermost open container is an
    /// array.
    NoObject,

    /// Tried to close an array but the innermost open container is an
    /// object.
    NoArray,

    /// Unknown `\x` escape or bad hex digits in a `\u` escape.
    Escape,

    /// Any other grammar violation.
    Unexpected,

    /// A raw control byte appeared inside a string.
    Invalid,

    /// A sink requested termination.
    Terminated,

    /// The input ended mid-value, or `next()` was called past the end.
    Eof,
}

impl ErrorKind {
    /// A short, human-readable description, mirroring the original
    /// `error_msgs[]` table.
    pub fn message(self) -> &'static str {
        match self {
            ErrorKind::Opt => "Invalid option",
            ErrorKind::Alloc => "Out of memory",
            ErrorKind::Number => "Invalid number",
            ErrorKind::Utf8 => "Invalid UTF-8",
            ErrorKind::Surrogate => "Invalid surrogate",
            ErrorKind::StackOverflow => "Stack overflow",
            ErrorKind::StackUnderflow => "Stack underflow",
            ErrorKind::ExpectedValue => "Value expected",
            ErrorKind::ExpectedKey => "Key expected",
            ErrorKind::NoObject => "Not in object",
            ErrorKind::NoArray => "Not in array",
            ErrorKind::Escape => "Invalid escape",
            ErrorKind::Unexpected => "Unexpected input",
            ErrorKind::Invalid => "Invalid input",
            ErrorKind::Terminated => "Generator terminated",
            ErrorKind::Eof => "Unexpected end of input",
        }
    }
}

/// A parse or generate error: a [`ErrorKind`], the byte position it occurred
/// at, and a human-readable message.
#[derive(Error, Copy, Clone, Debug, PartialEq, Eq)]
#[error("{message} (at byte {position})")]
pub struct Error {
    /// The kind of error.
    pub kind: ErrorKind,

    /// The byte position in the input at which the error was detected. Zero
    /// for errors that are not tied to a specific input position (e.g.
    /// [`ErrorKind::Opt`]).
    pub position: usize,

    message: &'static str,
}

impl Error {
    /// Construct an error of the given kind at the given byte position.
    pub fn new(kind: ErrorKind, position: usize) -> Self {
        Error {
            kind,
            position,
            message: kind.message(),
        }
    }

    /// The error's human-readable message.
    pub fn message(&self) -> &'static str {
        self.message
    }
}

/// Convenience alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
