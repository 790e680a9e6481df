//! Error values shared by the scanner, the decoding helpers, and the tree
//! builder.

use core::fmt;

use thiserror::Error;

use crate::span::Span;

/// Classification of every failure the crate can report.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Token shape or context violates the dialect grammar.
    #[error("bad syntax")]
    BadSyntax,
    /// An output buffer was too small for the decoded value.
    #[error("no buffer space")]
    NoBufferSpace,
    /// The UTF-8 decoder rejected a byte sequence.
    #[error("illegal byte sequence")]
    IllegalByteSequence,
    /// Numeric decoding overflowed to a non-finite value.
    #[error("out of range")]
    OutOfRange,
    /// API misuse, such as decoding an empty lexeme. Never latches.
    #[error("invalid operation")]
    InvalidOperation,
    /// A value would nest beyond the stream's depth bound.
    #[error("maximum nesting")]
    MaximumNesting,
    /// The tree builder's arena could not grow.
    #[error("out of memory")]
    OutOfMemory,
    /// The source buffer exceeds [`MAX_SOURCE`](crate::MAX_SOURCE).
    #[error("input too large")]
    InputTooLarge,
    /// A defensive check fired; this indicates a bug in the crate.
    #[error("malfunction")]
    Malfunction,
}

/// An inline, fixed-capacity error description.
///
/// Kept inline so the scanner state remains plain data: snapshotting a
/// [`Stream`](crate::Stream) with a bitwise copy carries the description
/// along. Descriptions are short US-English phrases of at most
/// [`ErrorMsg::CAPACITY`] bytes.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ErrorMsg {
    len: u8,
    bytes: [u8; ErrorMsg::CAPACITY],
}

impl ErrorMsg {
    /// Longest representable description, in bytes.
    pub const CAPACITY: usize = 35;

    pub(crate) const fn empty() -> ErrorMsg {
        ErrorMsg {
            len: 0,
            bytes: [0; ErrorMsg::CAPACITY],
        }
    }

    pub(crate) const fn from_str(msg: &str) -> ErrorMsg {
        let src = msg.as_bytes();
        assert!(src.len() <= ErrorMsg::CAPACITY);
        let mut bytes = [0u8; ErrorMsg::CAPACITY];
        let mut i = 0;
        while i < src.len() {
            bytes[i] = src[i];
            i += 1;
        }
        ErrorMsg {
            len: src.len() as u8,
            bytes,
        }
    }

    /// The description text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // Only ever populated from `&str` constants, so this cannot fail.
        core::str::from_utf8(&self.bytes[..self.len as usize]).unwrap_or("")
    }
}

impl fmt::Debug for ErrorMsg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for ErrorMsg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure report: the kind, the span of source it points at, and a short
/// human-readable description.
///
/// Spans are byte offsets; callers wanting line/column information re-scan
/// the source prefix and count newline sequences (`\n`, `\r`, `\r\n`,
/// U+2028, U+2029).
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
#[error("{message} at offset {}", .span.offset)]
pub struct Error {
    pub kind: ErrorKind,
    pub span: Span,
    message: ErrorMsg,
}

impl Error {
    pub(crate) const fn new(kind: ErrorKind, span: Span, message: &str) -> Error {
        Error {
            kind,
            span,
            message: ErrorMsg::from_str(message),
        }
    }

    pub(crate) const fn with_msg(kind: ErrorKind, span: Span, message: ErrorMsg) -> Error {
        Error {
            kind,
            span,
            message,
        }
    }

    /// The human-readable description, at most 35 bytes.
    #[must_use]
    pub fn description(&self) -> &str {
        self.message.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, ErrorKind, ErrorMsg};
    use crate::span::Span;

    #[test]
    fn message_round_trip() {
        let msg = ErrorMsg::from_str("expected value");
        assert_eq!(msg.as_str(), "expected value");
        assert_eq!(ErrorMsg::empty().as_str(), "");
    }

    #[test]
    fn display() {
        let err = Error::new(ErrorKind::BadSyntax, Span::new(3, 1), "expected value");
        assert_eq!(err.description(), "expected value");
        assert_eq!(std::format!("{err}"), "expected value at offset 3");
    }
}
