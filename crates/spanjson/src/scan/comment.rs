//! Comment recognition, enabled by the `comments` extension (and therefore
//! always in JSON5).
//!
//! `// …` runs to the next newline sequence or end of input; `/* … */` runs
//! to the literal `*/` and is a syntax error when unterminated. Nested
//! block comments are not recognized.

#![cfg(any(feature = "json5", feature = "comments"))]

use super::{Fault, Lexer};
use crate::utf8::{self, Decoded};

impl Lexer<'_> {
    /// Length of the `//` comment at the cursor, including the delimiter
    /// but not the newline that ends it.
    pub(super) fn scan_line_comment(&self) -> usize {
        let start = self.at as usize;
        let mut cur = start + 2;

        while utf8::newline_len(self.src, cur) == 0 {
            match utf8::decode(self.src, cur) {
                Decoded::Scalar { len, .. } => cur += len as usize,
                // Malformed character or end of input; leave it for the
                // token recognizer.
                _ => break,
            }
        }

        cur - start
    }

    /// Length of the `/* … */` comment at the cursor, delimiters included.
    pub(super) fn scan_block_comment(&self) -> Result<usize, Fault> {
        let start = self.at as usize;
        let mut cur = start + 2;

        loop {
            if matches!(self.src.get(cur..cur + 2), Some(b"*/")) {
                return Ok(cur + 2 - start);
            }
            match utf8::decode(self.src, cur) {
                Decoded::Scalar { len, .. } => cur += len as usize,
                Decoded::Invalid => return Err(Fault::encoding(cur as u32)),
                Decoded::Eof => {
                    return Err(Fault::syntax(start as u32, 2, "unterminated multi-line comment"))
                }
            }
        }
    }
}
