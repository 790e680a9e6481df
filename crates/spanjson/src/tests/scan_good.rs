//! Token streams and spans for well-formed documents, valid in every
//! dialect unless guarded otherwise.

use alloc::vec;

use super::{kinds, spans};
use crate::TokenKind::*;

#[test]
fn object_with_one_member() {
    assert_eq!(
        spans(br#"{"abc":123}"#),
        vec![
            (ObjectBegin, 0, 1),
            (ObjectName, 1, 5),
            (Number, 7, 3),
            (ObjectEnd, 10, 1),
            (Eof, 11, 0),
        ]
    );
}

#[test]
fn array_of_numbers() {
    assert_eq!(
        spans(b"[1,2,3]"),
        vec![
            (ArrayBegin, 0, 1),
            (Number, 1, 1),
            (Number, 3, 1),
            (Number, 5, 1),
            (ArrayEnd, 6, 1),
            (Eof, 7, 0),
        ]
    );
}

#[test]
fn nested_compounds() {
    assert_eq!(
        kinds(br#"{"a":1,"b":[true,null]}"#),
        vec![
            ObjectBegin, ObjectName, Number, ObjectName, ArrayBegin, True, Null, ArrayEnd,
            ObjectEnd, Eof,
        ]
    );
}

#[test]
fn empty_compounds() {
    assert_eq!(kinds(b"[]"), vec![ArrayBegin, ArrayEnd, Eof]);
    assert_eq!(kinds(b"{}"), vec![ObjectBegin, ObjectEnd, Eof]);
    assert_eq!(kinds(b"[[]]"), vec![ArrayBegin, ArrayBegin, ArrayEnd, ArrayEnd, Eof]);
}

#[test]
fn whitespace_between_tokens() {
    assert_eq!(
        spans(b" [ 1 , 2 ]\t"),
        vec![
            (ArrayBegin, 1, 1),
            (Number, 3, 1),
            (Number, 7, 1),
            (ArrayEnd, 9, 1),
            (Eof, 11, 0),
        ]
    );
    assert_eq!(kinds(b"\r\n{\n}\r"), vec![ObjectBegin, ObjectEnd, Eof]);
}

#[test]
fn bom_consumed_at_offset_zero() {
    assert_eq!(
        spans(b"\xEF\xBB\xBF[1]"),
        vec![(ArrayBegin, 3, 1), (Number, 4, 1), (ArrayEnd, 5, 1), (Eof, 6, 0)]
    );
}

#[test]
fn keywords() {
    assert_eq!(
        kinds(b"[null,true,false]"),
        vec![ArrayBegin, Null, True, False, ArrayEnd, Eof]
    );
}

#[test]
fn number_shapes() {
    for source in [
        &b"[0]"[..],
        b"[-0]",
        b"[42]",
        b"[-9]",
        b"[3.25]",
        b"[-0.001]",
        b"[1e3]",
        b"[1E3]",
        b"[2e+9]",
        b"[2e-9]",
        b"[1.25e-300]",
        b"[0.0]",
    ] {
        assert_eq!(
            kinds(source),
            vec![ArrayBegin, Number, ArrayEnd, Eof],
            "{}",
            core::str::from_utf8(source).unwrap()
        );
    }
}

#[test]
fn string_shapes() {
    for source in [
        &br#"[""]"#[..],
        br#"["abc"]"#,
        br#"["\" \\ \/ \b \f \n \r \t"]"#,
        br#"["\uD83D\uDE00"]"#,
        "[\"Aé€\"]".as_bytes(),
        "[\"héllo € 😀\"]".as_bytes(),
    ] {
        assert_eq!(
            kinds(source),
            vec![ArrayBegin, String, ArrayEnd, Eof],
            "{}",
            core::str::from_utf8(source).unwrap()
        );
    }
}

#[test]
fn string_span_covers_delimiters() {
    assert_eq!(
        spans(br#"["ab"]"#),
        vec![(ArrayBegin, 0, 1), (String, 1, 4), (ArrayEnd, 5, 1), (Eof, 6, 0)]
    );
}

#[test]
fn object_name_followed_by_value() {
    let toks = kinds(br#"{"a":{"b":{"c":[]}}}"#);
    for window in toks.windows(2) {
        if window[0] == ObjectName {
            assert!(
                matches!(window[1], Null | True | False | Number | String | ArrayBegin | ObjectBegin),
                "{window:?}"
            );
        }
    }
}

#[test]
fn duplicate_member_names_scan() {
    assert_eq!(
        kinds(br#"{"k":1,"k":2}"#),
        vec![ObjectBegin, ObjectName, Number, ObjectName, Number, ObjectEnd, Eof]
    );
}

#[test]
fn stepping_after_eof_keeps_returning_eof() {
    let source = b"[]";
    let mut stream: crate::Stream = crate::Stream::new();
    let mut last = stream.step(source).unwrap();
    for _ in 0..4 {
        last = stream.step(source).unwrap();
    }
    assert_eq!(last.kind, Eof);
    assert!(stream.is_finished());
}

#[cfg(not(feature = "rfc4627"))]
mod any_root {
    use super::super::{kinds, spans};
    use crate::TokenKind::*;
    use alloc::vec;

    #[test]
    fn scalar_roots() {
        assert_eq!(kinds(b"null"), vec![Null, Eof]);
        assert_eq!(kinds(b"true"), vec![True, Eof]);
        assert_eq!(kinds(b"false"), vec![False, Eof]);
        assert_eq!(kinds(b"12.5"), vec![Number, Eof]);
        assert_eq!(kinds(br#""str""#), vec![String, Eof]);
    }

    #[test]
    fn scalar_root_spans() {
        assert_eq!(spans(b" 17 "), vec![(Number, 1, 2), (Eof, 4, 0)]);
    }
}
