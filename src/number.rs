//! Numeric parsing: sign, mantissa, fraction and exponent scanned in one
//! pass; integer values stay exact, real values use a fast exact path with
//! a correctly-rounded fallback.

use crate::error::{Error, ErrorKind};
use crate::event::Event;
use crate::input::InputCursor;

// We only keep the most significant digits. Max digits for i64 is 19;
// f64 mantissas are 15-17 digits so extra digits may be lost on
// conversion anyway.
const MAX_SIG_DIGITS: i32 = 19;
const MAX_EXPONENT: i64 = 1000;

// Powers of ten that are exactly representable as f64 (Clinger's fast-path
// criterion): for decimal exponent e in [-22, 22] and mantissa m with
// `m < 2^53`, `m * 10^e` or `m / 10^(-e)` rounds to the same value as the
// exact mathematical result, because both operands and the single rounding
// step are exact.
const POW10: [f64; 23] = [
    1e0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10, 1e11, 1e12, 1e13, 1e14, 1e15, 1e16,
    1e17, 1e18, 1e19, 1e20, 1e21, 1e22,
];

fn try_fast_path(mantissa: u64, exponent: i64, negative: bool) -> Option<f64> {
    if mantissa >> 53 != 0 {
        return None;
    }
    if !(-22..=22).contains(&exponent) {
        return None;
    }
    let mut value = mantissa as f64;
    if exponent >= 0 {
        value *= POW10[exponent as usize];
    } else {
        value /= POW10[(-exponent) as usize];
    }
    Some(if negative { -value } else { value })
}

/// Parse a JSON number starting at the cursor's read position (which must
/// sit on `-` or a digit). Produces [`Event::Integer`] when the mantissa
/// has no fractional/exponent part and fits in an `i64`, otherwise
/// [`Event::Real`].
pub fn parse_number<'a>(cursor: &mut InputCursor) -> Result<Event<'a>, Error> {
    let start_pos = cursor.tell();

    let mut force_double = false;
    let mut negative = false;
    let mut sum: u64;
    let mut exponent: i64 = 0;
    let mut sig_digits: i32 = 0;

    let mut c = cursor.take();
    if c == b'-' {
        negative = true;
        c = cursor.take();
    }

    if c.is_ascii_digit() {
        sum = u64::from(c - b'0');
        if sum != 0 {
            sig_digits += 1;
        }
    } else {
        return Err(Error::new(ErrorKind::Number, start_pos));
    }

    // Reject leading zeros before other digits: "01" is not valid JSON.
    // The grammar enforces this implicitly below: if sum == 0 (the first
    // digit was '0') we don't consume further integer-part digits.
    if sum != 0 {
        while cursor.peek().is_ascii_digit() {
            let d = cursor.take() - b'0';
            sig_digits += 1;
            if sig_digits <= MAX_SIG_DIGITS {
                sum = sum * 10 + u64::from(d);
            } else {
                exponent += 1;
            }
        }
    }

    if cursor.peek() == b'.' {
        cursor.take();
        force_double = true;

        if !cursor.peek().is_ascii_digit() {
            return Err(Error::new(ErrorKind::Number, cursor.tell()));
        }

        while cursor.peek().is_ascii_digit() {
            let d = cursor.take() - b'0';
            if sig_digits < MAX_SIG_DIGITS {
                sum = sum * 10 + u64::from(d);
                exponent -= 1;
                if sum != 0 {
                    sig_digits += 1;
                }
            }
        }
    }

    if cursor.peek() == b'e' || cursor.peek() == b'E' {
        cursor.take();
        force_double = true;
        let mut exp_sign: i64 = 1;
        let mut exp: i64 = 0;

        match cursor.peek() {
            b'-' => {
                cursor.take();
                exp_sign = -1;
            }
            b'+' => {
                cursor.take();
            }
            _ => {}
        }

        if !cursor.peek().is_ascii_digit() {
            return Err(Error::new(ErrorKind::Number, cursor.tell()));
        }

        while cursor.peek().is_ascii_digit() {
            let d = cursor.take() - b'0';
            exp = exp * 10 + i64::from(d);
            if exp > MAX_EXPONENT {
                return Err(Error::new(ErrorKind::Number, cursor.tell()));
            }
        }

        exponent += exp_sign * exp;
    }

    let overflows_i64 = if negative {
        sum > 1 + i64::MAX as u64
    } else {
        sum > i64::MAX as u64
    };
    force_double = force_double || sig_digits > MAX_SIG_DIGITS || overflows_i64;

    if force_double {
        let real = match try_fast_path(sum, exponent, negative) {
            Some(v) => v,
            None => {
                let end = cursor.tell();
                let span = cursor.slice(start_pos, end - start_pos);
                // `span` is exactly the bytes this function just scanned
                // against the JSON number grammar (sign, digits, '.',
                // digits, [eE][+-]digits), so it is guaranteed ASCII and
                // guaranteed to parse.
                std::str::from_utf8(span)
                    .unwrap()
                    .parse::<f64>()
                    .unwrap()
            }
        };
        Ok(Event::Real(real))
    } else {
        // Negate in unsigned space before the narrowing cast: `sum` can be
        // exactly `i64::MIN`'s magnitude (9223372036854775808), and negating
        // that as a signed i64 traps. Unsigned wraparound negation then cast
        // is well-defined and yields i64::MIN correctly.
        let integer = (if negative { sum.wrapping_neg() } else { sum }) as i64;
        Ok(Event::Integer(integer))
    }
}
