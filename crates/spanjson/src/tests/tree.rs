//! The document tree builder: construction, traversal, spans, teardown.

use alloc::vec::Vec;

use super::span;
use crate::{Document, ErrorKind, ValueKind};

#[test]
fn small_document() {
    let source = br#"{"a":1,"b":[true,null]}"#;
    let doc = Document::parse(source).unwrap();
    let root = doc.root();

    assert_eq!(root.kind(), ValueKind::Object);
    assert_eq!(root.len(), Some(2));
    assert_eq!(root.span(), span(0, source.len() as u32));
    assert_eq!(doc.value_count(), 5);

    let members: Vec<_> = root.members().collect();
    assert_eq!(members.len(), 2);

    assert_eq!(members[0].name_span().slice(source).unwrap(), br#""a""#);
    let a = members[0].value();
    assert_eq!(a.kind(), ValueKind::Number);
    assert_eq!(a.span().slice(source).unwrap(), b"1");

    assert_eq!(members[1].name_span().slice(source).unwrap(), br#""b""#);
    let b = members[1].value();
    assert_eq!(b.kind(), ValueKind::Array);
    assert_eq!(b.len(), Some(2));
    assert_eq!(b.span(), span(11, 11));

    let elems: Vec<_> = b.children().collect();
    assert_eq!(elems.len(), 2);
    assert_eq!(elems[0].kind(), ValueKind::Bool);
    assert_eq!(elems[0].as_bool(), Some(true));
    assert_eq!(elems[1].kind(), ValueKind::Null);
    assert_eq!(elems[1].as_bool(), None);
}

#[test]
fn lengths_agree_with_walks() {
    let source = br#"{"xs":[1,2,3,4],"m":{"k":"v"},"e":[],"o":{}}"#;
    let doc = Document::parse(source).unwrap();

    for member in doc.root().members() {
        let value = member.value();
        match value.kind() {
            ValueKind::Array => {
                let walked = value.children().count();
                assert_eq!(value.len(), Some(walked));

                let mut linked = 0;
                let mut cursor = value.first_child();
                while let Some(child) = cursor {
                    linked += 1;
                    cursor = child.next_sibling();
                }
                assert_eq!(linked, walked);
            }
            ValueKind::Object => {
                assert_eq!(value.len(), Some(value.members().count()));
            }
            _ => assert_eq!(value.len(), None),
        }
    }
}

#[test]
fn insertion_order_and_duplicates() {
    let source = br#"{"k":1,"j":2,"k":3}"#;
    let doc = Document::parse(source).unwrap();

    let names: Vec<_> = doc
        .root()
        .members()
        .map(|m| m.name_span().slice(source).unwrap())
        .collect();
    assert_eq!(names, [&br#""k""#[..], br#""j""#, br#""k""#]);

    let values: Vec<_> = doc
        .root()
        .members()
        .map(|m| m.value().span().slice(source).unwrap())
        .collect();
    assert_eq!(values, [&b"1"[..], b"2", b"3"]);
}

#[test]
fn empty_compounds() {
    let doc = Document::parse(b"[]").unwrap();
    assert_eq!(doc.root().len(), Some(0));
    assert_eq!(doc.root().is_empty(), Some(true));
    assert!(doc.root().first_child().is_none());
    assert_eq!(doc.root().children().count(), 0);

    let doc = Document::parse(b"{}").unwrap();
    assert_eq!(doc.root().len(), Some(0));
    assert!(doc.root().first_member().is_none());
}

#[test]
fn compound_spans_cover_delimiters() {
    let source = b" [ [1] , [2,3] ] ";
    let doc = Document::parse(source).unwrap();
    assert_eq!(doc.root().span(), span(1, 15));

    let inner: Vec<_> = doc.root().children().map(|v| v.span()).collect();
    assert_eq!(inner, [span(3, 3), span(9, 5)]);
}

#[cfg(not(feature = "rfc4627"))]
#[test]
fn scalar_roots() {
    let doc = Document::parse(b"42").unwrap();
    assert_eq!(doc.root().kind(), ValueKind::Number);
    assert_eq!(doc.root().span(), span(0, 2));
    assert_eq!(doc.value_count(), 1);

    let doc = Document::parse(b"true").unwrap();
    assert_eq!(doc.root().as_bool(), Some(true));
}

#[cfg(feature = "float")]
#[test]
fn numbers_decode_from_spans() {
    let source = b"[1,2.5,4e2]";
    let doc = Document::parse(source).unwrap();
    let nums: Vec<_> = doc
        .root()
        .children()
        .map(|v| crate::numberify(v.span().slice(source).unwrap()).unwrap())
        .collect();
    assert_eq!(nums, [1.0, 2.5, 400.0]);
}

#[test]
fn scanner_errors_surface_verbatim() {
    if crate::trailing_commas_enabled() {
        return;
    }
    let err = Document::parse(b"[1,]").unwrap_err();
    assert_eq!(err.kind, ErrorKind::BadSyntax);
    assert_eq!(err.span, span(3, 1));
    assert_eq!(err.description(), "expected value");
}

#[test]
fn nesting_bound_applies() {
    let mut source = Vec::new();
    source.extend([b'['; 17]);
    source.extend([b']'; 17]);
    let err = Document::parse(&source).unwrap_err();
    assert_eq!(err.kind, ErrorKind::MaximumNesting);

    let mut ok = Vec::new();
    ok.extend([b'['; 16]);
    ok.extend([b']'; 16]);
    assert!(Document::parse(&ok).is_ok());
}

#[test]
fn custom_depth_bound() {
    assert!(Document::parse_with::<4>(b"[[[[]]]]").is_ok());
    assert_eq!(
        Document::parse_with::<4>(b"[[[[[]]]]]").unwrap_err().kind,
        ErrorKind::MaximumNesting
    );
}

#[test]
fn deep_document_drops_without_recursion() {
    // Teardown walks no owning pointers; dropping a deep graph is just
    // dropping two vectors.
    let mut source = Vec::new();
    source.extend([b'['; 16]);
    source.extend([b']'; 16]);
    let doc = Document::parse(&source).unwrap();
    assert_eq!(doc.root().len(), Some(1));
    drop(doc);
}
