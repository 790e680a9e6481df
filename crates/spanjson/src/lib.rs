//! Embeddable JSON and JSON5 processing over a UTF-8 byte buffer.
//!
//! Two layers are exposed. The incremental [`Stream`] scanner turns the
//! buffer into a sequence of semantic [`Token`]s with byte-exact [`Span`]s,
//! one token per [`step`](Stream::step), without allocating and without
//! recursion; its entire state is plain copyable data, so scanning can be
//! suspended, snapshotted, and resumed at any token boundary. The
//! [`Document`] tree builder (feature `tree`) drives the scanner to
//! exhaustion and materializes a navigable value graph that stores spans
//! only, decoding strings and numbers on demand via [`stringify`] and
//! [`numberify`].
//!
//! The grammar is fixed at build time: RFC 8259 by default, RFC 4627 with
//! the `rfc4627` feature (root must be an array or object), or JSON5 with
//! the `json5` feature. The `comments` and `trailing-commas` extensions can
//! be enabled separately and are implied by `json5`.
//!
//! ```
//! use spanjson::{tokens, TokenKind};
//!
//! let mut kinds = tokens(b"[1,2,3]").map(|t| t.unwrap().kind);
//! assert_eq!(kinds.next(), Some(TokenKind::ArrayBegin));
//! assert_eq!(kinds.nth(2), Some(TokenKind::Number));
//! ```

#![no_std]
#![forbid(unsafe_code)]

#[cfg(feature = "tree")]
extern crate alloc;
#[cfg(all(test, not(feature = "tree")))]
extern crate alloc;
#[cfg(test)]
extern crate std;

mod decode;
mod error;
mod scan;
mod span;
mod stream;
mod token;
mod utf8;

#[cfg(feature = "json5")]
mod unicode;

#[cfg(feature = "tree")]
mod tree;

#[cfg(feature = "float")]
pub use decode::{numberify, Number};
pub use decode::stringify;
pub use error::{Error, ErrorKind, ErrorMsg};
pub use span::Span;
pub use stream::{tokens, Stream, Tokens, DEFAULT_MAX_DEPTH, MAX_SOURCE};
pub use token::{Token, TokenKind};

#[cfg(feature = "tree")]
pub use tree::{Children, Document, MemberRef, Members, ValueKind, ValueRef};

/// The grammar a build of this crate speaks.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dialect {
    /// RFC 4627: the root value must be an array or object.
    Rfc4627,
    /// RFC 8259: the root may be any value.
    Rfc8259,
    /// JSON5, which implies the comment and trailing-comma extensions.
    Json5,
}

/// The dialect selected at build time.
#[must_use]
pub const fn dialect() -> Dialect {
    if cfg!(feature = "json5") {
        Dialect::Json5
    } else if cfg!(feature = "rfc4627") {
        Dialect::Rfc4627
    } else {
        Dialect::Rfc8259
    }
}

/// Whether `//` and `/* … */` comments are recognized in this build.
#[must_use]
pub const fn comments_enabled() -> bool {
    cfg!(any(feature = "comments", feature = "json5"))
}

/// Whether a trailing `,` before `]`/`}` is permitted in this build.
#[must_use]
pub const fn trailing_commas_enabled() -> bool {
    cfg!(any(feature = "trailing-commas", feature = "json5"))
}

#[cfg(test)]
mod tests;
