//! Public-API integration: rebuild documents through the tree and compare
//! against `serde_json` as an oracle. Strict-JSON inputs only, so the
//! corpus is valid in every dialect this crate can be built with.

#![cfg(all(feature = "tree", feature = "float", not(feature = "float-f32")))]

use serde_json::Value as Oracle;
use spanjson::{numberify, stringify, Document, ValueKind, ValueRef};

fn decode_string(source: &[u8], span: spanjson::Span) -> String {
    let lexeme = &source[span.as_range()];
    let needed = stringify(lexeme, None).unwrap();
    let mut buf = vec![0u8; needed];
    let written = stringify(lexeme, Some(&mut buf)).unwrap();
    buf.truncate(written);
    String::from_utf8(buf).unwrap()
}

fn rebuild(source: &[u8], value: ValueRef) -> Oracle {
    match value.kind() {
        ValueKind::Null => Oracle::Null,
        ValueKind::Bool => Oracle::Bool(value.as_bool().unwrap()),
        ValueKind::Number => {
            let n = numberify(&source[value.span().as_range()]).unwrap();
            serde_json::Number::from_f64(n).map_or(Oracle::Null, Oracle::Number)
        }
        ValueKind::String => Oracle::String(decode_string(source, value.span())),
        ValueKind::Array => {
            Oracle::Array(value.children().map(|v| rebuild(source, v)).collect())
        }
        ValueKind::Object => Oracle::Object(
            value
                .members()
                .map(|m| (decode_string(source, m.name_span()), rebuild(source, m.value())))
                .collect(),
        ),
    }
}

#[test]
fn documents_agree_with_serde_json() {
    let corpus: &[&str] = &[
        r#"{}"#,
        r#"[]"#,
        r#"{"abc":123}"#,
        r#"[1,2,3]"#,
        r#"{"a":1,"b":[true,null]}"#,
        r#"{"nested":{"deep":{"deeper":[[],{}]}}}"#,
        r#"["Aé€😀"]"#,
        r#"{"esc":"a\"b\\c\/d\b\f\n\r\t"}"#,
        r#"[0,-0,0.5,-1.25,2e3,2E3,2e+3,42]"#,
        r#"{"dup":1,"dup":2}"#,
        r#"  {  "ws" : [ 1 , 2 ]  }  "#,
    ];

    for doc_src in corpus {
        let bytes = doc_src.as_bytes();
        let ours = Document::parse(bytes).expect(doc_src);
        let rebuilt = rebuild(bytes, ours.root());
        let oracle: Oracle = serde_json::from_str(doc_src).unwrap();
        // serde_json keeps the last duplicate, and so does rebuilding into
        // a map in insertion order.
        assert_eq!(rebuilt, oracle, "{doc_src}");
    }
}

#[test]
fn token_count_matches_value_count() {
    let source = br#"{"a":[1,2,3],"b":{"c":null},"d":"s"}"#;
    let doc = Document::parse(source).unwrap();

    let value_tokens = spanjson::tokens(source)
        .map(Result::unwrap)
        .filter(|t| {
            matches!(
                t.kind,
                spanjson::TokenKind::Null
                    | spanjson::TokenKind::True
                    | spanjson::TokenKind::False
                    | spanjson::TokenKind::Number
                    | spanjson::TokenKind::String
                    | spanjson::TokenKind::ArrayBegin
                    | spanjson::TokenKind::ObjectBegin
            )
        })
        .count();

    assert_eq!(doc.value_count(), value_tokens);
}

#[test]
fn numbers_preserve_lexemes_for_round_tripping() {
    let source = br#"[1.10, 100e-2]"#;
    let doc = Document::parse(source).unwrap();
    let lexemes: Vec<&[u8]> = doc
        .root()
        .children()
        .map(|v| &source[v.span().as_range()])
        .collect();
    // The exact source text survives; decoding is a separate step.
    assert_eq!(lexemes, [&b"1.10"[..], b"100e-2"]);

    let decoded: Vec<f64> = lexemes.iter().map(|l| numberify(l).unwrap()).collect();
    assert!((decoded[0] - 1.1).abs() < 1e-9, "{decoded:?}");
    assert!((decoded[1] - 1.0).abs() < 1e-9, "{decoded:?}");
}
