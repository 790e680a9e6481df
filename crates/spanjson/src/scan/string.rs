//! String literal recognition.
//!
//! The token span covers both quote delimiters. Escapes are validated but
//! not decoded here; [`stringify`](crate::stringify) materializes the
//! payload on demand.

use super::{hex_value, is_hex_byte, Fault, Lexeme, Lexer, RawToken};
use crate::utf8::{self, is_high_surrogate, is_low_surrogate, Decoded};

impl Lexer<'_> {
    pub(super) fn scan_string(&self) -> Result<RawToken, Fault> {
        let src = self.src;
        let start = self.at as usize;
        let quote = src[start];
        let mut cur = start + 1;

        while let Some(&byte) = src.get(cur) {
            if byte <= 0x1F {
                return Err(Fault::syntax(cur as u32, 1, "unescaped control character"));
            }

            if byte == b'\\' {
                let escape_start = cur;
                cur += 1;
                if cur >= src.len() {
                    break; // runs into end of input; reported as unclosed
                }

                // A backslash before a line terminator continues the string
                // on the next line.
                #[cfg(feature = "json5")]
                {
                    let nl = utf8::newline_len(src, cur);
                    if nl > 0 {
                        cur += nl;
                        continue;
                    }
                }

                match src[cur] {
                    b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't' => cur += 1,
                    #[cfg(feature = "json5")]
                    b'\'' | b'v' | b'0' => cur += 1,
                    #[cfg(feature = "json5")]
                    b'x' => {
                        cur += 1;
                        let mut count = 0;
                        while let Some(&h) = src.get(cur) {
                            if !is_hex_byte(h) || count == 2 {
                                break;
                            }
                            count += 1;
                            cur += 1;
                        }
                        if count < 2 {
                            return Err(Fault::syntax(
                                escape_start as u32,
                                (cur - escape_start) as u32,
                                "expected two hex digits",
                            ));
                        }
                    }
                    b'u' => {
                        cur += 1;
                        let mut digits = [0u8; 4];
                        let mut count = 0;
                        while let Some(&h) = src.get(cur) {
                            if !is_hex_byte(h) || count == 4 {
                                break;
                            }
                            digits[count] = h;
                            count += 1;
                            cur += 1;
                        }
                        if count < 4 {
                            return Err(Fault::syntax(
                                escape_start as u32,
                                (cur - escape_start) as u32,
                                "expected four hex digits",
                            ));
                        }

                        let mut cp = hex_value(&digits);
                        if is_high_surrogate(cp) {
                            let escape_end = cur;

                            // A high surrogate must be immediately followed
                            // by an escaped low surrogate.
                            if src.len() >= cur + 6 && &src[cur..cur + 2] == b"\\u" {
                                cur += 2;
                                let mut low = [0u8; 4];
                                let mut count = 0;
                                while count < 4 && is_hex_byte(src[cur]) {
                                    low[count] = src[cur];
                                    count += 1;
                                    cur += 1;
                                }
                                if count == 4 {
                                    cp = hex_value(&low);
                                }
                            }

                            if !is_low_surrogate(cp) {
                                return Err(Fault::syntax(
                                    escape_start as u32,
                                    (escape_end - escape_start) as u32,
                                    "unmatched surrogate pair",
                                ));
                            }
                        } else if is_low_surrogate(cp) {
                            return Err(Fault::syntax(
                                escape_start as u32,
                                (cur - escape_start) as u32,
                                "unmatched surrogate pair",
                            ));
                        }
                    }
                    _ => {
                        let skip = match utf8::decode(src, cur) {
                            Decoded::Scalar { len, .. } => len as usize,
                            _ => 0,
                        };
                        cur += skip;
                        return Err(Fault::syntax(
                            escape_start as u32,
                            (cur - escape_start) as u32,
                            "invalid escape sequence",
                        ));
                    }
                }
            } else if byte == quote {
                cur += 1;
                return Ok(RawToken {
                    tag: Lexeme::String,
                    start: start as u32,
                    len: (cur - start) as u32,
                });
            } else {
                match utf8::decode(src, cur) {
                    Decoded::Scalar { len, .. } => cur += len as usize,
                    _ => return Err(Fault::encoding(cur as u32)),
                }
            }
        }

        Err(Fault::syntax(start as u32, 1, "unclosed string"))
    }
}
