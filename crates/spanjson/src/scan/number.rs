//! Number recognition.
//!
//! The strict dialects accept `-? (0 | [1-9][0-9]*) ('.' [0-9]+)?
//! ([eE][+-]?[0-9]+)?`. JSON5 additionally accepts a leading `+`, a bare
//! leading or trailing decimal point, hexadecimal integers, and the spelled
//! literals `NaN` and `Infinite` with an optional sign.
//!
//! Recognition never decodes a value; the token carries only the lexeme
//! span. A malformed tail keeps scanning to the end of the would-be number
//! so the reported span and message match the last defect found, then the
//! first pending fault wins unless a later rule overwrote it.

use super::{Fault, Lexeme, Lexer, RawToken};
use crate::utf8::is_digit;
#[cfg(feature = "json5")]
use crate::utf8::{is_ascii_alpha, is_hex_digit};

#[cfg(feature = "json5")]
impl Lexer<'_> {
    pub(super) fn scan_number(&self) -> Result<RawToken, Fault> {
        let start = self.at as usize;
        let mut cur = start;
        let mut signed = false;
        let mut has_decimal = false;
        let mut done = false;

        if matches!(self.src[cur], b'-' | b'+') {
            signed = true;
            cur += 1;
        }

        let cp = self.scalar_at(cur);
        if is_digit(cp) {
            if matches!(self.src.get(cur..cur + 2), Some(b"0x") | Some(b"0X")) {
                cur += 2;
                if !is_hex_digit(self.scalar_at(cur)) {
                    return Err(Fault::syntax(cur as u32, 1, "expected hexadecimal number"));
                }
                while is_hex_digit(self.scalar_at(cur)) {
                    cur += 1;
                }
                done = true;
            } else {
                cur += 1;
                let first = cp;
                let mut digits = 1;
                while is_digit(self.scalar_at(cur)) {
                    cur += 1;
                    digits += 1;
                }
                if digits > 1 && first == u32::from(b'0') {
                    return Err(Fault::syntax(
                        start as u32,
                        (cur - start) as u32,
                        "illegal octal number",
                    ));
                }
            }
        } else if is_ascii_alpha(cp) {
            let id_start = cur;
            while is_ascii_alpha(self.scalar_at(cur)) {
                cur += 1;
            }
            let word = &self.src[id_start..cur];
            if word != b"NaN" && word != b"Infinite" {
                return Err(Fault::syntax(
                    id_start as u32,
                    (cur - id_start) as u32,
                    "expected NaN or Infinite",
                ));
            }
            done = true;
        }

        if !done {
            let mut pending: Option<Fault> = None;
            let mut cp = self.scalar_at(cur);

            if cp == u32::from(b'.') {
                has_decimal = true;
                cur += 1;
                while is_digit(self.scalar_at(cur)) {
                    cur += 1;
                }
                cp = self.scalar_at(cur);
            }

            // A sign or decimal point by itself is not a number.
            let mut digits = cur - start;
            if signed {
                digits -= 1;
            }
            if has_decimal {
                digits -= 1;
            }
            if digits == 0 {
                pending = Some(Fault::syntax(cur as u32, 1, "expected number"));
            }

            if cp == u32::from(b'e') || cp == u32::from(b'E') {
                cur += 1;
                let mut cp = self.scalar_at(cur);
                if cp == u32::from(b'+') || cp == u32::from(b'-') {
                    cur += 1;
                    cp = self.scalar_at(cur);
                }
                if !is_digit(cp) {
                    pending = Some(Fault::syntax(cur as u32, 1, "missing exponent"));
                }
                while is_digit(self.scalar_at(cur)) {
                    cur += 1;
                }
            }

            if let Some(fault) = pending {
                return Err(fault);
            }
        }

        Ok(RawToken {
            tag: Lexeme::Number,
            start: start as u32,
            len: (cur - start) as u32,
        })
    }
}

#[cfg(not(feature = "json5"))]
impl Lexer<'_> {
    pub(super) fn scan_number(&self) -> Result<RawToken, Fault> {
        let start = self.at as usize;
        let mut cur = start;

        if self.src[cur] == b'-' {
            cur += 1;
        }

        let mut cp = self.scalar_at(cur);
        if !is_digit(cp) {
            return Err(Fault::syntax(cur as u32, 1, "expected number"));
        }

        cur += 1;
        let first = cp;
        let mut digits = 1;
        loop {
            cp = self.scalar_at(cur);
            if !is_digit(cp) {
                break;
            }
            cur += 1;
            digits += 1;
        }

        if digits > 1 && first == u32::from(b'0') {
            return Err(Fault::syntax(
                start as u32,
                (cur - start) as u32,
                "illegal octal number",
            ));
        }

        let mut pending: Option<Fault> = None;

        if cp == u32::from(b'.') {
            cur += 1;
            digits = 0;
            loop {
                cp = self.scalar_at(cur);
                if !is_digit(cp) {
                    break;
                }
                cur += 1;
                digits += 1;
            }
            if digits == 0 {
                pending = Some(Fault::syntax(
                    start as u32,
                    (cur - start) as u32,
                    "expected fractional part",
                ));
            }
        }

        if cp == u32::from(b'e') || cp == u32::from(b'E') {
            cur += 1;
            cp = self.scalar_at(cur);
            if cp == u32::from(b'+') || cp == u32::from(b'-') {
                cur += 1;
                cp = self.scalar_at(cur);
            }
            if !is_digit(cp) {
                pending = Some(Fault::syntax(cur as u32, 1, "missing exponent"));
            }
            while is_digit(self.scalar_at(cur)) {
                cur += 1;
            }
        }

        if let Some(fault) = pending {
            return Err(fault);
        }

        Ok(RawToken {
            tag: Lexeme::Number,
            start: start as u32,
            len: (cur - start) as u32,
        })
    }
}
