use alloc::vec::Vec;

use crate::{tokens, Error, Span, Token, TokenKind};

mod scan_good;



#[cfg(feature = "tree")]
mod tree;

/// Steps `source` to exhaustion, collecting every token including `Eof`.
pub(crate) fn collect(source: &[u8]) -> Result<Vec<Token>, Error> {
    tokens(source).collect()
}

/// Token tags of a document expected to scan cleanly.
pub(crate) fn kinds(source: &[u8]) -> Vec<TokenKind> {
    collect(source)
        .unwrap_or_else(|e| panic!("{:?} failed to scan: {e}", core::str::from_utf8(source)))
        .iter()
        .map(|t| t.kind)
        .collect()
}

/// `(kind, offset, length)` triples of a document expected to scan cleanly.
pub(crate) fn spans(source: &[u8]) -> Vec<(TokenKind, u32, u32)> {
    collect(source)
        .unwrap()
        .iter()
        .map(|t| (t.kind, t.span.offset, t.span.length))
        .collect()
}

/// The error a malformed document is expected to produce.
pub(crate) fn scan_error(source: &[u8]) -> Error {
    match collect(source) {
        Ok(toks) => panic!(
            "{:?} unexpectedly scanned: {toks:?}",
            core::str::from_utf8(source)
        ),
        Err(e) => e,
    }
}

pub(crate) fn span(offset: u32, length: u32) -> Span {
    Span {
        offset,
        length,
    }
}
