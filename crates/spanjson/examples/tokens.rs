//! Print one line per semantic token of a document given on the command
//! line (or a small builtin sample), with its span and lexeme.
//!
//! ```text
//! cargo run --example tokens -- '{"a":[1,2]}'
//! ```
#![allow(missing_docs)]

use std::process::ExitCode;

use spanjson::{tokens, TokenKind};

fn main() -> ExitCode {
    let source = std::env::args()
        .nth(1)
        .unwrap_or_else(|| r#"{"name":"spanjson","tags":[1,2.5,null,true]}"#.to_string());
    let bytes = source.as_bytes();

    for item in tokens(bytes) {
        match item {
            Ok(tok) => {
                let lexeme = if tok.kind == TokenKind::Eof {
                    ""
                } else {
                    std::str::from_utf8(&bytes[tok.span.as_range()]).unwrap_or("<non-utf8>")
                };
                println!(
                    "{:<12} @ {:>3}+{:<3} {lexeme}",
                    format!("{:?}", tok.kind),
                    tok.span.offset,
                    tok.span.length,
                );
            }
            Err(err) => {
                eprintln!(
                    "error: {} at offset {} ({:?})",
                    err.description(),
                    err.span.offset,
                    err.kind
                );
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}
