//! Literal and string-escape parsing shared by the push and pull parsers.
//! Numeric literals are handled separately by [`crate::number`].

use crate::error::{Error, ErrorKind};
use crate::input::InputCursor;
use crate::utf8;

/// Parse the remaining bytes of a literal (`rue`, `alse`, `ull`) after its
/// leading byte has already been matched by the caller's dispatch.
pub(crate) fn parse_literal(cursor: &mut InputCursor, rest: &[u8]) -> Result<(), Error> {
    cursor.take();
    for &want in rest {
        if !cursor.consume(want) {
            return Err(Error::new(ErrorKind::Unexpected, cursor.tell()));
        }
    }
    Ok(())
}

pub(crate) fn parse_true(cursor: &mut InputCursor) -> Result<(), Error> {
    parse_literal(cursor, b"rue")
}

pub(crate) fn parse_false(cursor: &mut InputCursor) -> Result<(), Error> {
    parse_literal(cursor, b"alse")
}

pub(crate) fn parse_null(cursor: &mut InputCursor) -> Result<(), Error> {
    parse_literal(cursor, b"ull")
}

fn hex_digit(b: u8) -> Option<u32> {
    match b {
        b'0'..=b'9' => Some(u32::from(b - b'0')),
        b'A'..=b'F' => Some(u32::from(b - b'A') + 10),
        b'a'..=b'f' => Some(u32::from(b - b'a') + 10),
        _ => None,
    }
}

fn parse_hex4(cursor: &mut InputCursor) -> Result<u32, Error> {
    let mut codepoint = 0u32;
    for _ in 0..4 {
        let d =
            hex_digit(cursor.peek()).ok_or_else(|| Error::new(ErrorKind::Escape, cursor.tell()))?;
        codepoint = (codepoint << 4) | d;
        cursor.take();
    }
    Ok(codepoint)
}

fn short_escape(b: u8) -> Option<u8> {
    match b {
        b'"' => Some(b'"'),
        b'/' => Some(b'/'),
        b'\\' => Some(b'\\'),
        b'b' => Some(0x08),
        b'f' => Some(0x0C),
        b'n' => Some(0x0A),
        b'r' => Some(0x0D),
        b't' => Some(0x09),
        _ => None,
    }
}

/// Parse a `\...` escape at the cursor (which must sit on the `\`),
/// returning the codepoint it represents. Combines `\uXXXX\uYYYY`
/// surrogate pairs into a single codepoint.
pub(crate) fn parse_escape(cursor: &mut InputCursor) -> Result<u32, Error> {
    cursor.take(); // '\\'
    let e = cursor.peek();

    if let Some(short) = short_escape(e) {
        cursor.take();
        return Ok(u32::from(short));
    }

    if e != b'u' {
        return Err(Error::new(ErrorKind::Escape, cursor.tell()));
    }
    cursor.take(); // 'u'

    let codepoint = parse_hex4(cursor)?;
    if !utf8::is_high_surrogate(codepoint) && !utf8::is_low_surrogate(codepoint) {
        return Ok(codepoint);
    }
    if !utf8::is_high_surrogate(codepoint) {
        return Err(Error::new(ErrorKind::Surrogate, cursor.tell()));
    }

    if !(cursor.consume(b'\\') && cursor.consume(b'u')) {
        return Err(Error::new(ErrorKind::Surrogate, cursor.tell()));
    }
    let low = parse_hex4(cursor)?;
    if !utf8::is_low_surrogate(low) {
        return Err(Error::new(ErrorKind::Surrogate, cursor.tell()));
    }
    Ok(utf8::combine_surrogate_pair(codepoint, low))
}

/// Parse a string literal starting at the cursor's read position (which
/// must sit on the opening `"`). Returns the `(offset, len)` of the
/// un-escaped bytes, fetchable with [`InputCursor::slice`].
pub(crate) fn parse_string(
    cursor: &mut InputCursor,
    validate_utf8: bool,
) -> Result<(usize, usize), Error> {
    cursor.take(); // '"'
    cursor.string_start();

    loop {
        let c = cursor.peek();
        if c == b'"' {
            return Ok(cursor.string_complete());
        } else if c == b'\\' {
            cursor.string_update();
            let codepoint = parse_escape(cursor)?;
            cursor.write_codepoint(codepoint);
            cursor.string_restart();
        } else if validate_utf8 && c >= 0x80 {
            if !cursor.validate_utf8() {
                return Err(Error::new(ErrorKind::Utf8, cursor.tell()));
            }
        } else if c < 0x20 {
            return Err(Error::new(ErrorKind::Invalid, cursor.tell()));
        } else {
            cursor.take();
        }
    }
}
