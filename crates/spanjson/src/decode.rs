//! On-demand decoding of string and number lexemes.
//!
//! The scanner reports values by span only, preserving the original lexeme
//! for exact round-tripping. These helpers decode a lexeme the scanner has
//! already validated; feeding them arbitrary bytes is safe but reports
//! `InvalidOperation` or `Malfunction` rather than attempting a rescue.

use crate::error::{Error, ErrorKind};
use crate::scan::{hex_value, is_hex_byte};
use crate::span::Span;
use crate::utf8::{self, is_high_surrogate, Decoded};

#[cfg(feature = "json5")]
use crate::unicode::{flags, ID_START};

/// Decoded output sink that counts the bytes a full decode needs while
/// writing only what fits.
struct ByteSink<'a> {
    needed: usize,
    written: usize,
    dest: Option<&'a mut [u8]>,
}

impl ByteSink<'_> {
    fn put(&mut self, cp: u32) {
        let mut buf = [0u8; 4];
        let n = utf8::encode(cp, &mut buf);
        if let Some(dest) = self.dest.as_deref_mut() {
            if self.needed + n <= dest.len() {
                dest[self.needed..self.needed + n].copy_from_slice(&buf[..n]);
                self.written += n;
            }
        }
        self.needed += n;
    }
}

fn invalid_operation() -> Error {
    Error::new(ErrorKind::InvalidOperation, Span::EMPTY, "invalid operation")
}

fn malfunction() -> Error {
    Error::new(ErrorKind::Malfunction, Span::EMPTY, "malformed string lexeme")
}

/// Decodes a `String` or `ObjectName` lexeme into raw bytes: strips the
/// delimiters, applies every escape, and recombines surrogate pairs.
///
/// With `out = None` the return value is the capacity a full decode needs.
/// With a buffer, the return value is the byte count written; a short
/// buffer yields `NoBufferSpace` after filling only what fits, and nothing
/// is ever written past the buffer's end. The output is not NUL-terminated:
/// decoded zero bytes (`\u0000`, and `\0` in JSON5) are legal content.
///
/// The lexeme must be one the scanner produced: delimited by `"` (or, in
/// JSON5, `'`), or a JSON5 unquoted identifier, in which case only
/// `\uXXXX` escapes are decoded. Anything else reports `InvalidOperation`.
///
/// # Examples
///
/// ```
/// let lexeme = br#""\uD83D\uDE00""#;
/// let mut buf = [0u8; 8];
/// let n = spanjson::stringify(lexeme, Some(&mut buf)).unwrap();
/// assert_eq!(&buf[..n], "😀".as_bytes());
/// ```
///
/// # Errors
///
/// `InvalidOperation` for an empty or undelimited lexeme, `NoBufferSpace`
/// for a short output buffer, and `Malfunction` when the lexeme is not one
/// the scanner could have produced.
pub fn stringify(lexeme: &[u8], out: Option<&mut [u8]>) -> Result<usize, Error> {
    if lexeme.is_empty() {
        return Err(invalid_operation());
    }

    let capacity_query = out.is_none();
    let mut sink = ByteSink {
        needed: 0,
        written: 0,
        dest: out,
    };

    if is_quote(lexeme[0]) {
        decode_quoted(lexeme, &mut sink)?;
    } else {
        decode_identifier(lexeme, &mut sink)?;
    }

    if capacity_query {
        return Ok(sink.needed);
    }
    match sink.dest.as_deref() {
        Some(dest) if sink.needed > dest.len() => Err(Error::new(
            ErrorKind::NoBufferSpace,
            Span::EMPTY,
            "insufficient buffer capacity",
        )),
        _ => Ok(sink.written),
    }
}

fn is_quote(byte: u8) -> bool {
    byte == b'"' || (cfg!(feature = "json5") && byte == b'\'')
}

fn decode_quoted(lexeme: &[u8], sink: &mut ByteSink) -> Result<(), Error> {
    let stop = lexeme.len() - 1;
    let mut cur = 1;

    while cur < stop {
        if lexeme[cur] != b'\\' {
            match utf8::decode(&lexeme[..stop], cur) {
                Decoded::Scalar { cp, len } => {
                    sink.put(cp);
                    cur += len as usize;
                }
                _ => return Err(malfunction()),
            }
            continue;
        }
        cur += 1; // skip the backslash

        #[cfg(feature = "json5")]
        {
            let nl = utf8::newline_len(lexeme, cur);
            if nl > 0 {
                cur += nl;
                continue;
            }
        }

        let escape = *lexeme.get(cur).ok_or_else(malfunction)?;
        cur += 1;
        match escape {
            b'"' => sink.put(u32::from(b'"')),
            b'\\' => sink.put(u32::from(b'\\')),
            b'/' => sink.put(u32::from(b'/')),
            b'b' => sink.put(0x08),
            b'f' => sink.put(0x0C),
            b'n' => sink.put(u32::from(b'\n')),
            b'r' => sink.put(u32::from(b'\r')),
            b't' => sink.put(u32::from(b'\t')),
            #[cfg(feature = "json5")]
            b'\'' => sink.put(u32::from(b'\'')),
            #[cfg(feature = "json5")]
            b'v' => sink.put(0x0B),
            #[cfg(feature = "json5")]
            b'0' => sink.put(0),
            #[cfg(feature = "json5")]
            b'x' => {
                let digits = lexeme.get(cur..cur + 2).ok_or_else(malfunction)?;
                if !digits.iter().copied().all(is_hex_byte) {
                    return Err(malfunction());
                }
                sink.put(hex_value(digits));
                cur += 2;
            }
            b'u' => {
                let (cp, next) = unicode_escape(lexeme, cur)?;
                cur = next;
                let cp = if is_high_surrogate(cp) {
                    // The scanner guarantees a low surrogate escape follows.
                    if lexeme.get(cur..cur + 2) != Some(b"\\u".as_slice()) {
                        return Err(malfunction());
                    }
                    let (low, next) = unicode_escape(lexeme, cur + 2)?;
                    cur = next;
                    0x10000 + ((cp - 0xD800) << 10) + (low - 0xDC00)
                } else {
                    cp
                };
                sink.put(cp);
            }
            _ => return Err(malfunction()),
        }
    }

    Ok(())
}

/// Decodes a JSON5 unquoted identifier, where only `\uXXXX` escapes occur.
/// Lone surrogate escapes are materialized as-is; identifiers are not
/// required to pair them.
#[cfg(feature = "json5")]
fn decode_identifier(lexeme: &[u8], sink: &mut ByteSink) -> Result<(), Error> {
    match utf8::decode(lexeme, 0) {
        Decoded::Scalar { cp, .. } if flags(cp) & ID_START != 0 || cp == u32::from(b'\\') => {}
        _ => return Err(invalid_operation()),
    }

    let mut cur = 0;
    while cur < lexeme.len() {
        if lexeme[cur] == b'\\' {
            if lexeme.get(cur + 1) != Some(&b'u') {
                return Err(malfunction());
            }
            let (cp, next) = unicode_escape(lexeme, cur + 2)?;
            sink.put(cp);
            cur = next;
        } else {
            match utf8::decode(lexeme, cur) {
                Decoded::Scalar { cp, len } => {
                    sink.put(cp);
                    cur += len as usize;
                }
                _ => return Err(malfunction()),
            }
        }
    }
    Ok(())
}

#[cfg(not(feature = "json5"))]
fn decode_identifier(_lexeme: &[u8], _sink: &mut ByteSink) -> Result<(), Error> {
    Err(invalid_operation())
}

/// Reads the four hex digits of a `\uXXXX` escape whose digits start at
/// `at`; returns the scalar and the offset past the escape.
fn unicode_escape(lexeme: &[u8], at: usize) -> Result<(u32, usize), Error> {
    let digits = lexeme.get(at..at + 4).ok_or_else(malfunction)?;
    if !digits.iter().copied().all(is_hex_byte) {
        return Err(malfunction());
    }
    Ok((hex_value(digits), at + 4))
}

#[cfg(feature = "float")]
pub use self::number::{numberify, Number};

#[cfg(feature = "float")]
mod number {
    use super::{invalid_operation, Error, ErrorKind, Span};
    use crate::utf8::is_digit;

    /// Storage type of decoded numbers.
    #[cfg(feature = "float-f32")]
    pub type Number = f32;
    /// Storage type of decoded numbers.
    #[cfg(not(feature = "float-f32"))]
    pub type Number = f64;

    fn out_of_range() -> Error {
        Error::new(ErrorKind::OutOfRange, Span::EMPTY, "number is out of range")
    }

    /// Decodes a `Number` lexeme, locale-independently, into a float.
    ///
    /// Accepts every numeric form the scanner accepts for the configured
    /// dialect. In JSON5, `NaN` and `Infinite` (with optional sign) map to
    /// the corresponding IEEE values and hexadecimal literals accumulate
    /// digit by digit.
    ///
    /// # Examples
    ///
    /// ```
    /// assert_eq!(spanjson::numberify(b"-12.5e1").unwrap(), -125.0);
    /// ```
    ///
    /// # Errors
    ///
    /// `InvalidOperation` for an empty lexeme; `OutOfRange` when the
    /// decoded magnitude overflows to infinity.
    pub fn numberify(lexeme: &[u8]) -> Result<Number, Error> {
        if lexeme.is_empty() {
            return Err(invalid_operation());
        }

        #[cfg(feature = "json5")]
        {
            let mut rest = lexeme;
            let mut sign = 1.0;
            match lexeme[0] {
                b'-' => {
                    sign = -1.0;
                    rest = &lexeme[1..];
                }
                b'+' => rest = &lexeme[1..],
                _ => {}
            }

            if rest == b"NaN" {
                return Ok(Number::NAN);
            }
            if rest == b"Infinite" {
                return Ok(sign * Number::INFINITY);
            }
            if rest.len() >= 2 && (rest[..2] == *b"0x" || rest[..2] == *b"0X") {
                return hex_number(&rest[2..], sign);
            }
        }

        decimal_number(lexeme)
    }

    #[cfg(feature = "json5")]
    fn hex_number(digits: &[u8], sign: Number) -> Result<Number, Error> {
        let mut value: Number = 0.0;
        for &d in digits {
            let v = match d {
                b'0'..=b'9' => d - b'0',
                b'a'..=b'f' => d - b'a' + 10,
                b'A'..=b'F' => d - b'A' + 10,
                _ => return Err(invalid_operation()),
            };
            value = value * 16.0 + Number::from(v);
        }
        if value.is_infinite() {
            return Err(out_of_range());
        }
        Ok(value * sign)
    }

    /// Hand-rolled decimal conversion: digit-by-digit accumulation with a
    /// final power-of-ten correction, independent of the host locale's
    /// decimal separator.
    fn decimal_number(lexeme: &[u8]) -> Result<Number, Error> {
        let mut sign: Number = 1.0;
        let mut cur = 0;
        match lexeme.first().copied() {
            Some(b'-') => {
                sign = -1.0;
                cur = 1;
            }
            #[cfg(feature = "json5")]
            Some(b'+') => cur = 1,
            _ => {}
        }

        let mut value: Number = 0.0;
        let mut exponent: i32 = 0;

        while let Some(&b) = lexeme.get(cur) {
            if !b.is_ascii_digit() {
                break;
            }
            value = value * 10.0 + Number::from(b - b'0');
            cur += 1;
        }

        if lexeme.get(cur) == Some(&b'.') {
            cur += 1;
            while let Some(&b) = lexeme.get(cur) {
                if !b.is_ascii_digit() {
                    break;
                }
                value = value * 10.0 + Number::from(b - b'0');
                exponent -= 1;
                cur += 1;
            }
        }

        if matches!(lexeme.get(cur), Some(&b'e') | Some(&b'E')) {
            cur += 1;
            let mut exp_sign: i32 = 1;
            match lexeme.get(cur).copied() {
                Some(b'+') => cur += 1,
                Some(b'-') => {
                    exp_sign = -1;
                    cur += 1;
                }
                _ => {}
            }
            let mut exp_value: i32 = 0;
            while let Some(&b) = lexeme.get(cur) {
                if !is_digit(u32::from(b)) {
                    break;
                }
                exp_value = exp_value.saturating_mul(10).saturating_add(i32::from(b - b'0'));
                cur += 1;
            }
            exponent = exponent.saturating_add(exp_value.saturating_mul(exp_sign));
        }

        // A zero mantissa ends both loops early; the scanner accepts
        // arbitrarily many exponent digits, so `exponent` may have
        // saturated far beyond any power of ten that changes the value.
        while exponent > 0 {
            value *= 10.0;
            exponent -= 1;
            if value.is_infinite() {
                return Err(out_of_range());
            }
            if value == 0.0 {
                break;
            }
        }
        while exponent < 0 {
            value *= 0.1;
            exponent += 1;
            if value == 0.0 {
                break;
            }
        }

        if value.is_infinite() {
            return Err(out_of_range());
        }
        Ok(value * sign)
    }
}

#[cfg(test)]
mod tests {
    use super::stringify;

    #[test]
    fn capacity_query_counts_decoded_bytes() {
        assert_eq!(stringify(br#""abc""#, None).unwrap(), 3);
        assert_eq!(stringify(br#""A""#, None).unwrap(), 1);
        assert_eq!(stringify(br#""\uD83D\uDE00""#, None).unwrap(), 4);
    }

    #[test]
    fn surrogate_pair_decodes_to_supplementary_plane() {
        let mut buf = [0u8; 4];
        let n = stringify(br#""\uD83D\uDE00""#, Some(&mut buf)).unwrap();
        assert_eq!(&buf[..n], &[0xF0, 0x9F, 0x98, 0x80]);
    }
}
