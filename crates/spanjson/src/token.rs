//! Semantic tokens emitted by the scanner.

use crate::span::Span;

/// The scanner's output alphabet.
///
/// Tokens mark points of interest in the document rather than raw lexical
/// tokens: structural punctuation (`,`, `:`) is consumed silently, while
/// container pushes and pops, scalar values, and object member names each
/// surface as one token.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// No token; reported alongside errors.
    #[default]
    Invalid,
    Null,
    True,
    False,
    /// A numeric literal. The lexeme is not decoded; see
    /// [`numberify`](crate::numberify).
    Number,
    /// A string literal, delimiters included. The lexeme is not decoded; see
    /// [`stringify`](crate::stringify).
    String,
    ArrayBegin,
    ArrayEnd,
    ObjectBegin,
    ObjectEnd,
    /// An object member name: a string literal, or in JSON5 an unquoted
    /// identifier. Always immediately followed by the member's value token.
    ObjectName,
    /// End of input. The stream stays finished once this is returned.
    Eof,
}

/// One semantic token with the byte-exact span of its lexeme.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub(crate) const fn new(kind: TokenKind, span: Span) -> Token {
        Token { kind, span }
    }
}
