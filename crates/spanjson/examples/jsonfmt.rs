//! Command-line driver: reads a document from stdin, validates it, and
//! re-emits it compactly or pretty-printed. Lexemes are emitted verbatim
//! from the source, so numbers and strings round-trip exactly.
//!
//! Exit status: 0 on success, 1 for malformed input, 2 for a processing
//! error, 3 for a bad command-line option.
#![allow(missing_docs)]

use std::io::{Read, Write};
use std::process::exit;

use spanjson::{Document, ErrorKind, Span, ValueKind, ValueRef};

/// Keeps the scanner's 1 GiB guard comfortably out of reach and offsets
/// well inside `i32`.
const STDIN_LIMIT: usize = 10 * 1024 * 1024;

#[derive(Clone, Copy)]
struct Options {
    quiet: bool,
    pretty: bool,
    use_tabs: bool,
    indent_width: usize,
}

fn main() {
    let mut options = Options {
        quiet: false,
        pretty: false,
        use_tabs: false,
        indent_width: 4,
    };

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        match arg {
            "-h" | "--help" => {
                print_help();
                return;
            }
            "-q" | "--quiet" => options.quiet = true,
            "-p" | "--pretty" => options.pretty = true,
            "-t" | "--tabs" => options.use_tabs = true,
            "-i" => {
                i += 1;
                let Some(width) = args.get(i).and_then(|w| w.parse().ok()) else {
                    eprintln!("error: -i expects a number");
                    exit(3);
                };
                options.indent_width = width;
            }
            _ if arg.starts_with("--indent=") => {
                let Ok(width) = arg["--indent=".len()..].parse() else {
                    eprintln!("error: --indent expects a number");
                    exit(3);
                };
                options.indent_width = width;
            }
            _ => {
                eprintln!("error: unknown option {arg:?} (try --help)");
                exit(3);
            }
        }
        i += 1;
    }

    let source = read_stdin_capped();
    let doc = match Document::parse(&source) {
        Ok(doc) => doc,
        Err(err) => {
            if err.kind == ErrorKind::OutOfMemory {
                eprintln!("error: memory allocation failed");
                exit(2);
            }
            let (line, column) = source_location(&source, err.span.offset);
            eprintln!("stdin:{line}:{column}: error: {}", err.description());
            exit(1);
        }
    };

    if !options.quiet {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        let result = if options.pretty {
            pretty_print(&mut out, &source, doc.root(), 0, &options)
        } else {
            compact_print(&mut out, &source, doc.root())
        };
        if result.and_then(|()| writeln!(out)).is_err() {
            exit(2);
        }
    }
}

fn read_stdin_capped() -> Vec<u8> {
    let mut buf = Vec::new();
    let stdin = std::io::stdin();
    match stdin.lock().take(STDIN_LIMIT as u64 + 1).read_to_end(&mut buf) {
        Ok(_) if buf.len() <= STDIN_LIMIT => buf,
        Ok(_) => {
            eprintln!("error: input too large");
            exit(2);
        }
        Err(_) => {
            eprintln!("error: failed to read stdin");
            exit(2);
        }
    }
}

/// Line and column (both 1-based) of a byte offset, counting newline
/// sequences. Columns count code points, not grapheme clusters.
fn source_location(source: &[u8], offset: u32) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;
    let mut at = 0usize;
    let offset = offset as usize;

    while at < offset && at < source.len() {
        if source[at..].starts_with(b"\r\n") {
            line += 1;
            column = 1;
            at += 2;
            continue;
        }
        let (cp, len) = decode_lossy(&source[at..]);
        if matches!(cp, 0x000A | 0x000D | 0x2028 | 0x2029) {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
        at += len;
    }
    (line, column)
}

fn decode_lossy(bytes: &[u8]) -> (u32, usize) {
    match std::str::from_utf8(&bytes[..bytes.len().min(4)]) {
        Ok(s) => match s.chars().next() {
            Some(c) => (c as u32, c.len_utf8()),
            None => (0, 1),
        },
        Err(e) if e.valid_up_to() > 0 => {
            let c = std::str::from_utf8(&bytes[..e.valid_up_to()])
                .ok()
                .and_then(|s| s.chars().next())
                .unwrap_or('\u{FFFD}');
            (c as u32, c.len_utf8())
        }
        Err(_) => (0xFFFD, 1),
    }
}

fn lexeme<'a>(source: &'a [u8], span: Span) -> &'a [u8] {
    span.slice(source).unwrap_or(b"")
}

fn compact_print<W: Write>(out: &mut W, source: &[u8], value: ValueRef) -> std::io::Result<()> {
    match value.kind() {
        ValueKind::Array => {
            out.write_all(b"[")?;
            for (i, child) in value.children().enumerate() {
                if i > 0 {
                    out.write_all(b",")?;
                }
                compact_print(out, source, child)?;
            }
            out.write_all(b"]")
        }
        ValueKind::Object => {
            out.write_all(b"{")?;
            for (i, member) in value.members().enumerate() {
                if i > 0 {
                    out.write_all(b",")?;
                }
                out.write_all(lexeme(source, member.name_span()))?;
                out.write_all(b":")?;
                compact_print(out, source, member.value())?;
            }
            out.write_all(b"}")
        }
        _ => out.write_all(lexeme(source, value.span())),
    }
}

fn indent<W: Write>(out: &mut W, depth: usize, options: &Options) -> std::io::Result<()> {
    if options.use_tabs {
        for _ in 0..depth {
            out.write_all(b"\t")?;
        }
    } else {
        for _ in 0..depth * options.indent_width {
            out.write_all(b" ")?;
        }
    }
    Ok(())
}

fn pretty_print<W: Write>(
    out: &mut W,
    source: &[u8],
    value: ValueRef,
    depth: usize,
    options: &Options,
) -> std::io::Result<()> {
    match value.kind() {
        ValueKind::Array => {
            if value.is_empty() == Some(true) {
                return out.write_all(b"[]");
            }
            out.write_all(b"[\n")?;
            let count = value.len().unwrap_or(0);
            for (i, child) in value.children().enumerate() {
                indent(out, depth + 1, options)?;
                pretty_print(out, source, child, depth + 1, options)?;
                out.write_all(if i + 1 < count { b",\n" } else { b"\n" })?;
            }
            indent(out, depth, options)?;
            out.write_all(b"]")
        }
        ValueKind::Object => {
            if value.is_empty() == Some(true) {
                return out.write_all(b"{}");
            }
            out.write_all(b"{\n")?;
            let count = value.len().unwrap_or(0);
            for (i, member) in value.members().enumerate() {
                indent(out, depth + 1, options)?;
                out.write_all(lexeme(source, member.name_span()))?;
                out.write_all(b": ")?;
                pretty_print(out, source, member.value(), depth + 1, options)?;
                out.write_all(if i + 1 < count { b",\n" } else { b"\n" })?;
            }
            indent(out, depth, options)?;
            out.write_all(b"}")
        }
        _ => out.write_all(lexeme(source, value.span())),
    }
}

fn print_help() {
    println!("Usage: jsonfmt [options...]");
    println!();
    println!("Reads a document from stdin and writes it back to stdout.");
    println!("Errors go to stderr with line and column information.");
    println!();
    println!("This build speaks: {:?}", spanjson::dialect());
    println!("  comments:        {}", spanjson::comments_enabled());
    println!("  trailing commas: {}", spanjson::trailing_commas_enabled());
    println!("  maximum depth:   {}", spanjson::DEFAULT_MAX_DEPTH);
    println!();
    println!("Options:");
    println!("  -q, --quiet       Validate only; no output.");
    println!("  -p, --pretty      Pretty-print instead of compact output.");
    println!("  -i N, --indent=N  Indent width for --pretty (default 4).");
    println!("  -t, --tabs        Indent with tabs.");
    println!("  -h, --help        This message.");
    println!();
    println!("Exit status:");
    println!("  0  if OK,");
    println!("  1  if the input is malformed,");
    println!("  2  if an error occurred while processing the input,");
    println!("  3  if an invalid command-line option is specified.");
}
