//! A [`Sink`] that prints canonical JSON, compact or pretty, with
//! escape-aware string emission.

use crate::error::{Error, ErrorKind};
use crate::output::OutputBuffer;
use crate::sink::Sink;
use crate::utf8;

/// Prints events as JSON text into an internal buffer, retrievable via
/// [`JsonEmitter::as_str`]/[`JsonEmitter::as_bytes`].
pub struct JsonEmitter {
    buf: OutputBuffer,
    indent: u8,
    level: u32,
    needs_newline: bool,
    needs_comma: bool,
    after_key: bool,
    validate_utf8: bool,
    error: Option<Error>,
}

impl JsonEmitter {
    /// `indent` is the per-level indent width; `0` means compact output.
    /// `validate_utf8` controls whether string bytes `>= 0x80` are
    /// validated as UTF-8 before being copied through verbatim.
    pub fn new(indent: u8, validate_utf8: bool) -> Self {
        JsonEmitter {
            buf: OutputBuffer::new(),
            indent,
            level: 0,
            needs_newline: false,
            needs_comma: false,
            after_key: false,
            validate_utf8,
            error: None,
        }
    }

    /// The printed JSON so far, as a string.
    pub fn as_str(&self) -> &str {
        // Our own escape scanner guarantees every byte sequence written is
        // valid UTF-8 JSON text.
        std::str::from_utf8(self.buf.as_bytes()).unwrap()
    }

    /// The printed JSON so far, as raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.buf.as_bytes()
    }

    fn indent_line(&mut self) {
        if self.needs_newline {
            self.buf.put(b'\n');
        } else {
            self.needs_newline = true;
        }
        self.buf
            .put_n(b' ', self.indent as usize * self.level as usize);
    }

    fn prefix(&mut self) {
        if !self.after_key {
            if self.needs_comma {
                self.buf.put(b',');
            }
            if self.indent > 0 {
                self.indent_line();
            }
        }
        self.needs_comma = true;
        self.after_key = false;
    }

    fn prefix_start(&mut self) {
        self.prefix();
        self.needs_comma = false;
        self.level += 1;
    }

    fn prefix_end(&mut self) {
        self.level -= 1;
        if self.needs_comma {
            self.needs_comma = false;
            self.prefix();
        }
        self.needs_comma = self.level > 0;
    }

    fn key_suffix(&mut self) {
        self.buf.put(b':');
        if self.indent > 0 {
            self.buf.put(b' ');
        }
        self.after_key = true;
    }

    fn find_next_special(bytes: &[u8], start: usize, validate_utf8: bool) -> usize {
        bytes[start..]
            .iter()
            .position(|&b| b == b'"' || b == b'\\' || b < 0x20 || (validate_utf8 && b >= 0x80))
            .map(|i| start + i)
            .unwrap_or(bytes.len())
    }

    fn short_escape(b: u8) -> Option<u8> {
        match b {
            0x08 => Some(b'b'),
            0x09 => Some(b't'),
            0x0A => Some(b'n'),
            0x0C => Some(b'f'),
            0x0D => Some(b'r'),
            b'"' => Some(b'"'),
            b'\\' => Some(b'\\'),
            _ => None,
        }
    }

    fn scan_escape(&mut self, bytes: &[u8]) -> Result<(), ErrorKind> {
        let mut pos1 = 0;
        loop {
            let pos2 = Self::find_next_special(bytes, pos1, self.validate_utf8);
            if pos2 >= bytes.len() {
                self.buf.puts(&bytes[pos1..pos2]);
                return Ok(());
            }
            let chr = bytes[pos2];
            self.buf.puts(&bytes[pos1..pos2]);

            if self.validate_utf8 && chr >= 0x80 {
                let len = utf8::validate_sequence(&bytes[pos2..]).ok_or(ErrorKind::Utf8)?;
                self.buf.puts(&bytes[pos2..pos2 + len]);
                pos1 = pos2 + len;
            } else if let Some(e) = Self::short_escape(chr) {
                self.buf.put(b'\\');
                self.buf.put(e);
                pos1 = pos2 + 1;
            } else {
                // Control byte with no short form: \u00XX, uppercase hex.
                const HEX: &[u8; 16] = b"0123456789ABCDEF";
                self.buf.puts(b"\\u00");
                self.buf.put(HEX[(chr >> 4) as usize]);
                self.buf.put(HEX[(chr & 0x0F) as usize]);
                pos1 = pos2 + 1;
            }
        }
    }

    fn print_string(&mut self, bytes: &[u8]) -> bool {
        self.prefix();
        self.buf.put(b'"');
        if let Err(kind) = self.scan_escape(bytes) {
            self.error = Some(Error::new(kind, 0));
            return false;
        }
        self.buf.put(b'"');
        true
    }
}

impl Sink for JsonEmitter {
    fn null(&mut self) -> bool {
        self.prefix();
        self.buf.puts(b"null");
        true
    }

    fn boolean(&mut self, is_true: bool) -> bool {
        self.prefix();
        self.buf.puts(if is_true { b"true" } else { b"false" });
        true
    }

    fn integer(&mut self, value: i64) -> bool {
        self.prefix();
        let mut fmt = itoa::Buffer::new();
        self.buf.puts(fmt.format(value).as_bytes());
        true
    }

    fn real(&mut self, value: f64) -> bool {
        self.prefix();
        let mut fmt = ryu::Buffer::new();
        self.buf.puts(fmt.format(value).as_bytes());
        true
    }

    fn string(&mut self, bytes: &[u8]) -> bool {
        self.print_string(bytes)
    }

    fn key(&mut self, bytes: &[u8]) -> bool {
        if !self.print_string(bytes) {
            return false;
        }
        self.key_suffix();
        true
    }

    fn start_array(&mut self) -> bool {
        self.prefix_start();
        self.buf.put(b'[');
        true
    }

    fn end_array(&mut self) -> bool {
        self.prefix_end();
        self.buf.put(b']');
        true
    }

    fn start_object(&mut self) -> bool {
        self.prefix_start();
        self.buf.put(b'{');
        true
    }

    fn end_object(&mut self) -> bool {
        self.prefix_end();
        self.buf.put(b'}');
        true
    }

    fn take_error(&mut self) -> Option<Error> {
        self.error.take()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn emit<F: FnOnce(&mut JsonEmitter)>(indent: u8, f: F) -> String {
        let mut e = JsonEmitter::new(indent, true);
        f(&mut e);
        e.as_str().to_string()
    }

    #[test]
    fn compact_array() {
        let s = emit(0, |e| {
            e.start_array();
            e.integer(1);
            e.real(2.5);
            e.string(b"a");
            e.boolean(true);
            e.null();
            e.start_object();
            e.key(b"k");
            e.start_array();
            e.end_array();
            e.end_object();
            e.end_array();
        });
        assert_eq!(s, r#"[1,2.5,"a",true,null,{"k":[]}]"#);
    }

    #[test]
    fn pretty_object() {
        let s = emit(2, |e| {
            e.start_object();
            e.key(b"a");
            e.integer(1);
            e.end_object();
        });
        assert_eq!(s, "{\n  \"a\": 1\n}");
    }

    #[test]
    fn escapes_control_and_quote_and_backslash() {
        let s = emit(0, |e| {
            e.string(b"a\nb\"c\\d\x01e");
        });
        assert_eq!(s, r#""a\nb\"c\\de""#);
    }

    #[test]
    fn passes_through_valid_utf8() {
        let s = emit(0, |e| {
            e.string("café".as_bytes());
        });
        assert_eq!(s, "\"café\"");
    }

    #[test]
    fn rejects_invalid_utf8_when_validating() {
        let mut e = JsonEmitter::new(0, true);
        assert!(!e.string(&[0xC0, 0x80]));
        assert_eq!(e.take_error().unwrap().kind, ErrorKind::Utf8);
    }
}
