//! Fuzz the tree builder: arbitrary bytes either parse into a coherent
//! document or report an error; traversal never panics and counts agree
//! with link walks.
#![no_main]

use libfuzzer_sys::fuzz_target;
use spanjson::{Document, ValueKind, ValueRef};

fn walk(value: ValueRef, budget: &mut usize) {
    if *budget == 0 {
        return;
    }
    *budget -= 1;

    match value.kind() {
        ValueKind::Array => {
            let walked = value.children().count();
            assert_eq!(value.len(), Some(walked));
            for child in value.children() {
                walk(child, budget);
            }
        }
        ValueKind::Object => {
            let walked = value.members().count();
            assert_eq!(value.len(), Some(walked));
            for member in value.members() {
                let _ = member.name_span();
                walk(member.value(), budget);
            }
        }
        ValueKind::Bool => {
            assert!(value.as_bool().is_some());
        }
        _ => {
            assert!(value.as_bool().is_none());
        }
    }
}

fuzz_target!(|data: &[u8]| {
    match Document::parse(data) {
        Ok(doc) => {
            let mut budget = 1 << 16;
            walk(doc.root(), &mut budget);
        }
        Err(err) => {
            assert!(!err.description().is_empty());
        }
    }
});
