//! In-memory document tree built on top of the scanner.
//!
//! [`Document`] owns an arena of value nodes and object members; navigation
//! hands out copyable [`ValueRef`]/[`MemberRef`] handles borrowing the
//! arena. Values store spans, not decoded payloads: strings and numbers
//! decode on demand through [`stringify`](crate::stringify) and
//! [`numberify`](crate::numberify) against the original source buffer,
//! which the document does not retain.
//!
//! Array elements and object members sit in singly-linked insertion-ordered
//! lists through arena indices. Duplicate member names are preserved in
//! order. Dropping the document frees the whole graph at once; no recursion
//! is involved because nodes hold indices, not owning pointers.
//!
//! # Examples
//!
//! ```
//! use spanjson::{Document, ValueKind};
//!
//! let source = br#"{"a":1,"b":[true,null]}"#;
//! let doc = Document::parse(source).unwrap();
//! let root = doc.root();
//! assert_eq!(root.kind(), ValueKind::Object);
//! assert_eq!(root.len(), Some(2));
//!
//! let names: Vec<_> = root
//!     .members()
//!     .map(|m| m.name_span().slice(source).unwrap())
//!     .collect();
//! assert_eq!(names, [&b"\"a\""[..], &b"\"b\""[..]]);
//! ```

mod build;

use alloc::vec::Vec;

use crate::error::{Error, ErrorKind};
use crate::span::Span;
use crate::stream::DEFAULT_MAX_DEPTH;

/// Classification of a tree value.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

type NodeIx = u32;
type MemberIx = u32;

#[derive(Debug)]
enum Payload {
    Null,
    Bool(bool),
    Number,
    String,
    Array {
        first: Option<NodeIx>,
        count: u32,
    },
    Object {
        first: Option<MemberIx>,
        count: u32,
    },
}

#[derive(Debug)]
struct Node {
    payload: Payload,
    span: Span,
    next: Option<NodeIx>,
}

#[derive(Debug)]
struct Member {
    name: Span,
    value: NodeIx,
    next: Option<MemberIx>,
}

/// A parsed document owning its value graph.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Node>,
    members: Vec<Member>,
    root: NodeIx,
}

impl Document {
    /// Parses `source` to exhaustion under the default nesting bound.
    ///
    /// # Errors
    ///
    /// Scanner errors surface verbatim, span and description included.
    /// An arena growth failure reports `OutOfMemory`; the partially built
    /// graph is dropped.
    pub fn parse(source: &[u8]) -> Result<Document, Error> {
        Self::parse_with::<DEFAULT_MAX_DEPTH>(source)
    }

    /// Parses with a custom nesting bound matching `Stream<MAX_DEPTH>`.
    ///
    /// # Errors
    ///
    /// As for [`parse`](Self::parse).
    pub fn parse_with<const MAX_DEPTH: usize>(source: &[u8]) -> Result<Document, Error> {
        build::build::<MAX_DEPTH>(source)
    }

    /// The root value. The first value of the document is always the root
    /// and owns every other value transitively.
    #[must_use]
    pub fn root(&self) -> ValueRef<'_> {
        ValueRef {
            doc: self,
            ix: self.root,
        }
    }

    /// Number of values in the document, the root included.
    #[must_use]
    pub fn value_count(&self) -> usize {
        self.nodes.len()
    }

    fn node(&self, ix: NodeIx) -> &Node {
        &self.nodes[ix as usize]
    }

    fn member(&self, ix: MemberIx) -> &Member {
        &self.members[ix as usize]
    }
}

/// A borrowed handle on one value of a [`Document`].
#[derive(Clone, Copy)]
pub struct ValueRef<'doc> {
    doc: &'doc Document,
    ix: NodeIx,
}

impl<'doc> ValueRef<'doc> {
    /// The value's classification.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self.doc.node(self.ix).payload {
            Payload::Null => ValueKind::Null,
            Payload::Bool(_) => ValueKind::Bool,
            Payload::Number => ValueKind::Number,
            Payload::String => ValueKind::String,
            Payload::Array { .. } => ValueKind::Array,
            Payload::Object { .. } => ValueKind::Object,
        }
    }

    /// The boolean payload, or `None` for non-boolean values.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self.doc.node(self.ix).payload {
            Payload::Bool(b) => Some(b),
            _ => None,
        }
    }

    /// Element count for arrays, member count for objects, `None` for
    /// scalar values.
    #[must_use]
    pub fn len(&self) -> Option<usize> {
        match self.doc.node(self.ix).payload {
            Payload::Array { count, .. } | Payload::Object { count, .. } => Some(count as usize),
            _ => None,
        }
    }

    /// True for an empty array or object, `None` for scalars.
    #[must_use]
    pub fn is_empty(&self) -> Option<bool> {
        self.len().map(|n| n == 0)
    }

    /// The lexeme span of the value. For compounds this covers everything
    /// from the opening to the closing delimiter.
    #[must_use]
    pub fn span(&self) -> Span {
        self.doc.node(self.ix).span
    }

    /// First element of an array.
    #[must_use]
    pub fn first_child(&self) -> Option<ValueRef<'doc>> {
        match self.doc.node(self.ix).payload {
            Payload::Array { first, .. } => first.map(|ix| ValueRef { doc: self.doc, ix }),
            _ => None,
        }
    }

    /// Next element in the enclosing array.
    #[must_use]
    pub fn next_sibling(&self) -> Option<ValueRef<'doc>> {
        self.doc
            .node(self.ix)
            .next
            .map(|ix| ValueRef { doc: self.doc, ix })
    }

    /// Iterates the elements of an array in insertion order. Empty for
    /// non-arrays.
    #[must_use]
    pub fn children(&self) -> Children<'doc> {
        Children {
            next: self.first_child(),
        }
    }

    /// First member of an object.
    #[must_use]
    pub fn first_member(&self) -> Option<MemberRef<'doc>> {
        match self.doc.node(self.ix).payload {
            Payload::Object { first, .. } => first.map(|ix| MemberRef { doc: self.doc, ix }),
            _ => None,
        }
    }

    /// Iterates the members of an object in insertion order, duplicates
    /// included. Empty for non-objects.
    #[must_use]
    pub fn members(&self) -> Members<'doc> {
        Members {
            next: self.first_member(),
        }
    }
}

impl core::fmt::Debug for ValueRef<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ValueRef")
            .field("kind", &self.kind())
            .field("span", &self.span())
            .finish()
    }
}

/// A borrowed handle on one object member.
#[derive(Clone, Copy)]
pub struct MemberRef<'doc> {
    doc: &'doc Document,
    ix: MemberIx,
}

impl<'doc> MemberRef<'doc> {
    /// Span of the member name lexeme, delimiters included for quoted
    /// names.
    #[must_use]
    pub fn name_span(&self) -> Span {
        self.doc.member(self.ix).name
    }

    /// The member's value.
    #[must_use]
    pub fn value(&self) -> ValueRef<'doc> {
        ValueRef {
            doc: self.doc,
            ix: self.doc.member(self.ix).value,
        }
    }

    /// Next member of the enclosing object.
    #[must_use]
    pub fn next_member(&self) -> Option<MemberRef<'doc>> {
        self.doc
            .member(self.ix)
            .next
            .map(|ix| MemberRef { doc: self.doc, ix })
    }
}

impl core::fmt::Debug for MemberRef<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MemberRef")
            .field("name", &self.name_span())
            .finish()
    }
}

/// Iterator over array elements.
pub struct Children<'doc> {
    next: Option<ValueRef<'doc>>,
}

impl<'doc> Iterator for Children<'doc> {
    type Item = ValueRef<'doc>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.next = current.next_sibling();
        Some(current)
    }
}

/// Iterator over object members.
pub struct Members<'doc> {
    next: Option<MemberRef<'doc>>,
}

impl<'doc> Iterator for Members<'doc> {
    type Item = MemberRef<'doc>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.next = current.next_member();
        Some(current)
    }
}

fn out_of_memory(span: Span) -> Error {
    Error::new(ErrorKind::OutOfMemory, span, "memory allocation failed")
}
