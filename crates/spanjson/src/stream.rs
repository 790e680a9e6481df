//! The resumable scanner: persistent state plus the `step` operation.
//!
//! [`Stream`] is the scanner's entire persistent state and is plain data:
//! `Copy`, comparable, and free of borrows into the source. The source
//! buffer is passed to every [`step`](Stream::step) instead of being
//! stored, so a state snapshot taken with a plain assignment (or `memcpy`
//! across an FFI boundary) resumes exactly where the original left off.
//!
//! The grammar runs as a pushdown machine over a fixed-capacity stack of
//! state tags, one frame per pending compound value. `step` never recurses
//! and never allocates; each call reads the resume tag from the top of the
//! stack, consumes input up to exactly one semantic token, and returns it.
//!
//! # Examples
//!
//! ```
//! use spanjson::{Stream, TokenKind};
//!
//! let source = b"{\"abc\":123}";
//! let mut stream: Stream = Stream::new();
//! let mut kinds = Vec::new();
//! loop {
//!     let token = stream.step(source).unwrap();
//!     kinds.push(token.kind);
//!     if token.kind == TokenKind::Eof {
//!         break;
//!     }
//! }
//! assert_eq!(
//!     kinds,
//!     [
//!         TokenKind::ObjectBegin,
//!         TokenKind::ObjectName,
//!         TokenKind::Number,
//!         TokenKind::ObjectEnd,
//!         TokenKind::Eof,
//!     ]
//! );
//! ```

use crate::error::{Error, ErrorKind, ErrorMsg};
use crate::scan::{Fault, Lexeme, Lexer, RawToken};
use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Upper bound on scannable input, guaranteeing byte offsets fit in `i32`.
pub const MAX_SOURCE: usize = 1 << 30;

/// Default nesting bound of [`Stream`].
pub const DEFAULT_MAX_DEPTH: usize = 16;

/// One tag per resume point of the pushdown machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
enum State {
    /// Expecting the top-level value (and an optional BOM at offset 0).
    Root,
    /// A value just finished at this depth; pop, or expect EOF at depth 0.
    FinishedValue,
    ArrayEndOrElement,
    FinishedArrayElement,
    ObjectKeyOrObjectEnd,
    ObjectValue,
    FinishedObjectValue,
    /// Absorbing: re-reports `BadSyntax`.
    SyntaxError,
    /// Absorbing: re-reports `IllegalByteSequence`.
    EncodingError,
    /// Absorbing: re-reports `MaximumNesting`.
    NestingError,
    /// Absorbing: re-reports `InputTooLarge`.
    CapacityError,
    /// EOF was delivered; further steps keep returning it.
    Finished,
}

/// Persistent scanner state with a compile-time nesting bound.
///
/// See the [module documentation](self) for the contract. The default
/// `MAX_DEPTH` of 16 suits typical configuration documents; deeper data
/// needs a larger bound, at a cost of `MAX_DEPTH` bytes of state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stream<const MAX_DEPTH: usize = DEFAULT_MAX_DEPTH> {
    cursor: u32,
    token: TokenKind,
    span: Span,
    depth: u8,
    frames: [State; MAX_DEPTH],
    error: ErrorMsg,
}

impl<const MAX_DEPTH: usize> Default for Stream<MAX_DEPTH> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const MAX_DEPTH: usize> Stream<MAX_DEPTH> {
    const DEPTH_BOUND: () = assert!(
        MAX_DEPTH >= 1 && MAX_DEPTH <= 128,
        "MAX_DEPTH must lie in 1..=128"
    );

    /// A fresh stream positioned at offset 0.
    #[must_use]
    pub fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::DEPTH_BOUND;
        Stream {
            cursor: 0,
            token: TokenKind::Invalid,
            span: Span::EMPTY,
            depth: 0,
            frames: [State::Root; MAX_DEPTH],
            error: ErrorMsg::empty(),
        }
    }

    /// Byte offset of the next undecoded code unit.
    #[must_use]
    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    /// Tag of the most recently emitted token.
    #[must_use]
    pub fn last_token(&self) -> TokenKind {
        self.token
    }

    /// Span of the most recently emitted token (or of the latched error).
    #[must_use]
    pub fn last_span(&self) -> Span {
        self.span
    }

    /// Current nesting depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        usize::from(self.depth)
    }

    /// Description of the latched error, empty when none occurred.
    #[must_use]
    pub fn error_description(&self) -> &str {
        self.error.as_str()
    }

    /// True once EOF has been delivered.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.frames[usize::from(self.depth)] == State::Finished
    }

    /// True once the stream latched a terminal error.
    #[must_use]
    pub fn has_failed(&self) -> bool {
        matches!(
            self.frames[usize::from(self.depth)],
            State::SyntaxError | State::EncodingError | State::NestingError | State::CapacityError
        )
    }

    /// Advances the scanner by exactly one semantic token.
    ///
    /// `source` must be the same buffer on every call for a given stream;
    /// only its prefix up to the cursor has been examined so far. End of
    /// input is an `Ok` carrying [`TokenKind::Eof`]. After a terminal
    /// error, every further call re-reports the same error without moving
    /// the cursor.
    pub fn step(&mut self, source: &[u8]) -> Result<Token, Error> {
        self.guard_capacity(source.len())?;

        let mut lx = Lexer::new(source, self.cursor);

        // A finished value pops before dispatch so the machine below always
        // resumes an unfinished one. At depth 0 the only continuation is
        // end of input.
        if self.frames[usize::from(self.depth)] == State::FinishedValue {
            if self.depth == 0 {
                let tok = self.peek_or_latch(&mut lx)?;
                if tok.tag != Lexeme::Eof {
                    return Err(self.fail_syntax(Span::new(lx.at, 1), "expected EOF"));
                }
                self.frames[0] = State::Finished;
                self.token = TokenKind::Eof;
                self.span = tok.span();
                self.cursor = lx.at;
                return Ok(Token::new(TokenKind::Eof, self.span));
            }
            self.depth -= 1;
        }

        let result = match self.frames[usize::from(self.depth)] {
            State::Root => self.parse_root(&mut lx),
            State::ArrayEndOrElement => self.parse_array_element_or_end(&mut lx),
            State::FinishedArrayElement => self.finished_array_element(&mut lx),
            State::ObjectKeyOrObjectEnd => self.parse_object_key_or_end(&mut lx),
            State::ObjectValue => self.parse_object_value(&mut lx),
            State::FinishedObjectValue => self.finished_object_value(&mut lx),
            State::SyntaxError => return Err(self.latched(ErrorKind::BadSyntax)),
            State::EncodingError => return Err(self.latched(ErrorKind::IllegalByteSequence)),
            State::NestingError => return Err(self.latched(ErrorKind::MaximumNesting)),
            State::CapacityError => return Err(self.latched(ErrorKind::InputTooLarge)),
            State::Finished => return Ok(Token::new(self.token, self.span)),
            State::FinishedValue => {
                return Err(Error::new(
                    ErrorKind::Malfunction,
                    self.span,
                    "scanner state corrupted",
                ))
            }
        };

        self.cursor = lx.at;
        result
    }

    fn parse_root(&mut self, lx: &mut Lexer) -> Result<Token, Error> {
        // A UTF-8 BOM is tolerated once, at offset 0 only.
        if lx.at == 0 && lx.src.starts_with(&[0xEF, 0xBB, 0xBF]) {
            lx.at = 3;
        }

        let tok = self.peek_or_latch(lx)?;
        match tok.tag {
            Lexeme::ArrayOpen => {
                Ok(self.emit(lx, &tok, TokenKind::ArrayBegin, State::ArrayEndOrElement))
            }
            Lexeme::ObjectOpen => Ok(self.emit(
                lx,
                &tok,
                TokenKind::ObjectBegin,
                State::ObjectKeyOrObjectEnd,
            )),
            #[cfg(any(not(feature = "rfc4627"), feature = "json5"))]
            Lexeme::Null => Ok(self.emit(lx, &tok, TokenKind::Null, State::FinishedValue)),
            #[cfg(any(not(feature = "rfc4627"), feature = "json5"))]
            Lexeme::True => Ok(self.emit(lx, &tok, TokenKind::True, State::FinishedValue)),
            #[cfg(any(not(feature = "rfc4627"), feature = "json5"))]
            Lexeme::False => Ok(self.emit(lx, &tok, TokenKind::False, State::FinishedValue)),
            #[cfg(any(not(feature = "rfc4627"), feature = "json5"))]
            Lexeme::Number => Ok(self.emit(lx, &tok, TokenKind::Number, State::FinishedValue)),
            #[cfg(any(not(feature = "rfc4627"), feature = "json5"))]
            Lexeme::String => Ok(self.emit(lx, &tok, TokenKind::String, State::FinishedValue)),
            _ => Err(self.fail_syntax(Span::EMPTY, "expected root value")),
        }
    }

    /// Enters a value, reserving a stack frame for it.
    fn parse_value(&mut self, lx: &mut Lexer, msg: &'static str) -> Result<Token, Error> {
        if usize::from(self.depth) >= MAX_DEPTH - 1 {
            return Err(self.fail(
                ErrorKind::MaximumNesting,
                State::NestingError,
                Span::new(lx.at, 1),
                "maximum nesting depth exceeded",
            ));
        }
        self.depth += 1;

        let tok = self.peek_or_latch(lx)?;
        match tok.tag {
            Lexeme::Null => Ok(self.emit(lx, &tok, TokenKind::Null, State::FinishedValue)),
            Lexeme::True => Ok(self.emit(lx, &tok, TokenKind::True, State::FinishedValue)),
            Lexeme::False => Ok(self.emit(lx, &tok, TokenKind::False, State::FinishedValue)),
            Lexeme::Number => Ok(self.emit(lx, &tok, TokenKind::Number, State::FinishedValue)),
            Lexeme::String => Ok(self.emit(lx, &tok, TokenKind::String, State::FinishedValue)),
            Lexeme::ArrayOpen => {
                Ok(self.emit(lx, &tok, TokenKind::ArrayBegin, State::ArrayEndOrElement))
            }
            Lexeme::ObjectOpen => Ok(self.emit(
                lx,
                &tok,
                TokenKind::ObjectBegin,
                State::ObjectKeyOrObjectEnd,
            )),
            _ => Err(self.fail_syntax(Span::new(lx.at, 1), msg)),
        }
    }

    fn parse_array_element(&mut self, lx: &mut Lexer) -> Result<Token, Error> {
        // After the element, check for a separator or the closer.
        self.frames[usize::from(self.depth)] = State::FinishedArrayElement;
        self.parse_value(lx, "expected value")
    }

    fn parse_array_element_or_end(&mut self, lx: &mut Lexer) -> Result<Token, Error> {
        let tok = self.peek_or_latch(lx)?;
        if tok.tag == Lexeme::ArrayClose {
            Ok(self.emit(lx, &tok, TokenKind::ArrayEnd, State::FinishedValue))
        } else {
            self.parse_array_element(lx)
        }
    }

    fn finished_array_element(&mut self, lx: &mut Lexer) -> Result<Token, Error> {
        let tok = self.peek_or_latch(lx)?;
        match tok.tag {
            Lexeme::Comma => {
                lx.eat(&tok);
                if cfg!(feature = "trailing-commas") {
                    self.parse_array_element_or_end(lx)
                } else {
                    self.parse_array_element(lx)
                }
            }
            Lexeme::ArrayClose => {
                Ok(self.emit(lx, &tok, TokenKind::ArrayEnd, State::FinishedValue))
            }
            _ => Err(self.fail_syntax(Span::new(lx.at, 1), "expected ']' or ','")),
        }
    }

    fn parse_object_key(&mut self, lx: &mut Lexer, tok: &RawToken) -> Result<Token, Error> {
        match tok.tag {
            Lexeme::String => Ok(self.emit(lx, tok, TokenKind::ObjectName, State::ObjectValue)),
            #[cfg(feature = "json5")]
            Lexeme::Id => Ok(self.emit(lx, tok, TokenKind::ObjectName, State::ObjectValue)),
            _ => Err(self.fail_syntax(Span::new(lx.at, 1), "expected '}' or string")),
        }
    }

    fn parse_object_key_or_end(&mut self, lx: &mut Lexer) -> Result<Token, Error> {
        let tok = self.peek_or_latch(lx)?;
        if tok.tag == Lexeme::ObjectClose {
            Ok(self.emit(lx, &tok, TokenKind::ObjectEnd, State::FinishedValue))
        } else {
            self.parse_object_key(lx, &tok)
        }
    }

    fn parse_object_value(&mut self, lx: &mut Lexer) -> Result<Token, Error> {
        let tok = self.peek_or_latch(lx)?;
        if tok.tag != Lexeme::Colon {
            return Err(self.fail_syntax(Span::new(lx.at, 1), "expected ':'"));
        }
        lx.eat(&tok);
        self.frames[usize::from(self.depth)] = State::FinishedObjectValue;
        self.parse_value(lx, "expected value after ':'")
    }

    fn finished_object_value(&mut self, lx: &mut Lexer) -> Result<Token, Error> {
        let tok = self.peek_or_latch(lx)?;
        match tok.tag {
            Lexeme::Comma => {
                lx.eat(&tok);
                if cfg!(feature = "trailing-commas") {
                    self.parse_object_key_or_end(lx)
                } else {
                    let tok = self.peek_or_latch(lx)?;
                    self.parse_object_key(lx, &tok)
                }
            }
            Lexeme::ObjectClose => {
                Ok(self.emit(lx, &tok, TokenKind::ObjectEnd, State::FinishedValue))
            }
            _ => Err(self.fail_syntax(Span::new(lx.at, 1), "expected '}' or ','")),
        }
    }

    fn emit(&mut self, lx: &mut Lexer, tok: &RawToken, kind: TokenKind, next: State) -> Token {
        lx.eat(tok);
        self.token = kind;
        self.span = tok.span();
        self.frames[usize::from(self.depth)] = next;
        Token::new(kind, self.span)
    }

    fn peek_or_latch(&mut self, lx: &mut Lexer) -> Result<RawToken, Error> {
        lx.peek().map_err(|fault| self.latch(fault))
    }

    fn latch(&mut self, fault: Fault) -> Error {
        let state = match fault.kind {
            ErrorKind::IllegalByteSequence => State::EncodingError,
            _ => State::SyntaxError,
        };
        self.fail(fault.kind, state, fault.span, fault.msg)
    }

    /// Latches `CapacityError` the first time an oversized buffer is
    /// presented. Once any error state is latched, re-reporting is the
    /// dispatch arms' job, like the other absorbing states.
    fn guard_capacity(&mut self, len: usize) -> Result<(), Error> {
        if !self.has_failed() && len > MAX_SOURCE {
            return Err(self.fail(
                ErrorKind::InputTooLarge,
                State::CapacityError,
                Span::new(self.cursor, 0),
                "input buffer is too large",
            ));
        }
        Ok(())
    }

    fn fail_syntax(&mut self, span: Span, msg: &'static str) -> Error {
        self.fail(ErrorKind::BadSyntax, State::SyntaxError, span, msg)
    }

    fn fail(&mut self, kind: ErrorKind, state: State, span: Span, msg: &'static str) -> Error {
        self.token = TokenKind::Invalid;
        self.span = span;
        self.frames[usize::from(self.depth)] = state;
        self.error = ErrorMsg::from_str(msg);
        Error::with_msg(kind, span, self.error)
    }

    fn latched(&self, kind: ErrorKind) -> Error {
        Error::with_msg(kind, self.span, self.error)
    }
}

// Test-only seam: exercises the capacity guard without materializing a
// buffer past MAX_SOURCE.
#[cfg(test)]
impl<const MAX_DEPTH: usize> Stream<MAX_DEPTH> {
    pub(crate) fn test_guard_capacity(&mut self, len: usize) -> Result<(), Error> {
        self.guard_capacity(len)
    }
}

/// Iterator over the tokens of one document, ending after `Eof` or the
/// first error.
///
/// # Examples
///
/// ```
/// use spanjson::{tokens, TokenKind};
///
/// let kinds: Result<Vec<_>, _> = tokens(b"[1,2]").map(|r| r.map(|t| t.kind)).collect();
/// assert_eq!(kinds.unwrap().last(), Some(&TokenKind::Eof));
/// ```
pub struct Tokens<'a, const MAX_DEPTH: usize = DEFAULT_MAX_DEPTH> {
    stream: Stream<MAX_DEPTH>,
    source: &'a [u8],
    done: bool,
}

impl<'a, const MAX_DEPTH: usize> Tokens<'a, MAX_DEPTH> {
    /// Creates a token iterator with a custom depth bound.
    #[must_use]
    pub fn new(source: &'a [u8]) -> Self {
        Tokens {
            stream: Stream::new(),
            source,
            done: false,
        }
    }

    /// The underlying stream state.
    #[must_use]
    pub fn stream(&self) -> &Stream<MAX_DEPTH> {
        &self.stream
    }
}

impl<const MAX_DEPTH: usize> Iterator for Tokens<'_, MAX_DEPTH> {
    type Item = Result<Token, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.stream.step(self.source);
        match &item {
            Ok(token) if token.kind == TokenKind::Eof => self.done = true,
            Err(_) => self.done = true,
            Ok(_) => {}
        }
        Some(item)
    }
}

/// Tokens of `source` under the default depth bound.
#[must_use]
pub fn tokens(source: &[u8]) -> Tokens<'_> {
    Tokens::new(source)
}
