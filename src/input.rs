//! An abstraction over the input bytes: a read cursor plus the auxiliary
//! pointers needed to rewrite JSON string escapes in place.

use crate::error::{Error, ErrorKind};
use crate::utf8;

/// A byte buffer with a read cursor and the `string`/`write`/`mark`
/// pointers used to un-escape JSON strings without an extra allocation when
/// no escapes are present.
///
/// The cursor owns a private copy of the input (with a trailing sentinel
/// `0` byte, matching the original's null-terminated-scratch-copy design).
/// String spans are returned as `(offset, len)` pairs rather than borrowed
/// slices, since a `&mut self` call cannot hand back a slice borrowed from
/// `self` that outlives the call; [`InputCursor::slice`] turns such a pair
/// into a slice once the mutation is done.
pub struct InputCursor {
    buf: Vec<u8>,
    read: usize,
    string: usize,
    write: usize,
    mark: usize,
}

impl InputCursor {
    /// Copy `bytes` into a private, mutable buffer, skipping a leading
    /// UTF-8 byte order mark if present.
    pub fn new(bytes: &[u8]) -> Self {
        let skip = utf8::bom_len(bytes);
        let mut buf = Vec::with_capacity(bytes.len() - skip + 1);
        buf.extend_from_slice(&bytes[skip..]);
        buf.push(0);
        InputCursor {
            buf,
            read: 0,
            string: 0,
            write: 0,
            mark: 0,
        }
    }

    /// Number of input bytes, excluding the trailing sentinel.
    fn len(&self) -> usize {
        self.buf.len() - 1
    }

    /// Current read position.
    pub fn tell(&self) -> usize {
        self.read
    }

    /// `true` once the read cursor has consumed every input byte.
    pub fn eof(&self) -> bool {
        self.read == self.len()
    }

    /// The byte at the read cursor, without advancing. Returns the
    /// sentinel `0` at end of input.
    pub fn peek(&self) -> u8 {
        self.buf[self.read]
    }

    /// The byte at the read cursor, advancing past it.
    pub fn take(&mut self) -> u8 {
        let b = self.buf[self.read];
        self.read += 1;
        b
    }

    /// Advance past the read cursor iff the next byte equals `b`.
    pub fn consume(&mut self, b: u8) -> bool {
        if self.buf[self.read] != b {
            return false;
        }
        self.read += 1;
        true
    }

    /// Advance to the next occurrence of `b`, or to the end of input if
    /// none remains. Returns the byte found (`b`, or `0` at end of input).
    pub fn find(&mut self, b: u8) -> u8 {
        match self.buf[self.read..self.len()].iter().position(|&c| c == b) {
            Some(i) => {
                self.read += i;
                b
            }
            None => {
                self.read = self.len();
                0
            }
        }
    }

    /// Validate the 1-4 byte UTF-8 sequence at the read cursor and advance
    /// past it. Returns `false` (without advancing) if the sequence is
    /// malformed.
    pub fn validate_utf8(&mut self) -> bool {
        match utf8::validate_sequence(&self.buf[self.read..]) {
            Some(len) => {
                self.read += len;
                true
            }
            None => false,
        }
    }

    /// Skip whitespace (and, if `allow_comments`, `//` and `/* */`
    /// comments). Returns the first non-whitespace byte encountered (the
    /// sentinel `0` at end of input).
    pub fn consume_whitespace(&mut self, allow_comments: bool) -> Result<u8, Error> {
        loop {
            let c = self.skip_plain_whitespace();
            if !allow_comments || c != b'/' {
                return Ok(c);
            }

            self.take(); // '/'
            match self.peek() {
                b'*' => {
                    self.take();
                    loop {
                        let c = self.find(b'*');
                        if c == b'*' {
                            self.take();
                            if self.consume(b'/') {
                                break;
                            }
                        }
                        if self.eof() {
                            return Ok(0);
                        }
                    }
                }
                b'/' => {
                    self.find(b'\n');
                    if self.eof() {
                        return Ok(0);
                    }
                }
                _ => {
                    return Err(Error::new(ErrorKind::Unexpected, self.tell()));
                }
            }
        }
    }

    fn skip_plain_whitespace(&mut self) -> u8 {
        loop {
            let c = self.peek();
            if c == b' ' || c == b'\n' || c == b'\r' || c == b'\t' {
                self.read += 1;
            } else {
                return c;
            }
        }
    }

    /// Begin an in-place string rewrite at the read cursor, which must sit
    /// just past the opening `"`.
    pub fn string_start(&mut self) {
        self.string = self.read;
        self.write = self.read;
        self.mark = self.read;
    }

    /// Copy the pending literal run `[mark..read)` down to the write head
    /// (a no-op if nothing has diverged yet).
    pub fn string_update(&mut self) {
        if self.mark != self.write {
            let amt = self.read - self.mark;
            if amt > 0 {
                self.buf.copy_within(self.mark..self.read, self.write);
                self.write += amt;
            }
        } else {
            self.write = self.read;
        }
    }

    /// Resume tracking the literal run after an escape has been written.
    pub fn string_restart(&mut self) {
        self.mark = self.read;
    }

    /// UTF-8 encode `codepoint` at the write head, advancing it.
    pub fn write_codepoint(&mut self, codepoint: u32) {
        let (bytes, len) = utf8::encode(codepoint);
        self.buf[self.write..self.write + len].copy_from_slice(&bytes[..len]);
        self.write += len;
    }

    /// Copy the byte at the read cursor to the write head, advancing both.
    pub fn byte_copy(&mut self) {
        self.buf[self.write] = self.buf[self.read];
        self.write += 1;
        self.read += 1;
    }

    /// Complete an in-place string rewrite. The read cursor must sit on the
    /// closing `"`; it is advanced past it. Returns the `(offset, len)` of
    /// the un-escaped string; fetch the bytes with [`InputCursor::slice`].
    pub fn string_complete(&mut self) -> (usize, usize) {
        let (start, len) = if self.mark == self.string {
            (self.string, self.read - self.string)
        } else {
            self.string_update();
            (self.string, self.write - self.string)
        };
        self.read += 1; // closing quote
        (start, len)
    }

    /// Fetch a previously completed string span.
    pub fn slice(&self, offset: usize, len: usize) -> &[u8] {
        &self.buf[offset..offset + len]
    }

    /// Move the read cursor to an absolute byte position (used by the
    /// numeric parser's fallback path).
    pub fn seek(&mut self, pos: usize) {
        self.read = pos;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn strips_bom() {
        let c = InputCursor::new(&[0xEF, 0xBB, 0xBF, b'{', b'}']);
        assert_eq!(c.peek(), b'{');
    }

    #[test]
    fn string_without_escapes_is_zero_copy_span() {
        let mut c = InputCursor::new(br#""hello""#);
        c.take(); // opening quote
        c.string_start();
        while c.peek() != b'"' {
            c.take();
        }
        let (off, len) = c.string_complete();
        assert_eq!(c.slice(off, len), b"hello");
    }

    #[test]
    fn string_with_escape_compacts() {
        // "a\nb" -> a <LF> b
        let mut c = InputCursor::new(br#""a\nb""#);
        c.take(); // opening quote
        c.string_start();
        loop {
            match c.peek() {
                b'"' => break,
                b'\\' => {
                    c.string_update();
                    c.take(); // backslash
                    c.take(); // 'n'
                    c.write_codepoint(b'\n' as u32);
                    c.string_restart();
                }
                _ => c.take(),
            };
        }
        let (off, len) = c.string_complete();
        assert_eq!(c.slice(off, len), b"a\nb");
    }

    #[test]
    fn whitespace_and_comments() {
        let mut c = InputCursor::new(b"  // hi\n/* x */ 5");
        assert_eq!(c.consume_whitespace(true).unwrap(), b'5');
    }

    #[test]
    fn whitespace_without_comments_stops_at_slash() {
        let mut c = InputCursor::new(b"  /x");
        assert_eq!(c.consume_whitespace(false).unwrap(), b'/');
    }
}
