//! Token-driven construction of the document tree.
//!
//! The builder drives [`Stream::step`] to exhaustion while maintaining a
//! fixed-capacity stack of compound frames, one per open array or object.
//! Each frame tracks the compound's arena index and the tail of its child
//! or member list so appends are O(1). An `ObjectName` token opens a
//! pending member; the next value token fills its value slot.

use alloc::vec::Vec;

use super::{out_of_memory, Document, Member, MemberIx, Node, NodeIx, Payload};
use crate::error::Error;
use crate::span::Span;
use crate::stream::Stream;
use crate::token::{Token, TokenKind};

#[derive(Clone, Copy, Default)]
struct Frame {
    node: NodeIx,
    tail_child: Option<NodeIx>,
    tail_member: Option<MemberIx>,
}

struct Builder<const MAX_DEPTH: usize> {
    nodes: Vec<Node>,
    members: Vec<Member>,
    frames: [Frame; MAX_DEPTH],
    depth: usize,
}

pub(super) fn build<const MAX_DEPTH: usize>(source: &[u8]) -> Result<Document, Error> {
    let mut stream: Stream<MAX_DEPTH> = Stream::new();
    let mut builder = Builder::<MAX_DEPTH> {
        nodes: Vec::new(),
        members: Vec::new(),
        frames: [Frame::default(); MAX_DEPTH],
        depth: 0,
    };

    loop {
        let token = stream.step(source)?;
        if token.kind == TokenKind::Eof {
            break;
        }
        builder.process(&token)?;
    }

    Ok(Document {
        nodes: builder.nodes,
        members: builder.members,
        root: 0,
    })
}

impl<const MAX_DEPTH: usize> Builder<MAX_DEPTH> {
    fn process(&mut self, token: &Token) -> Result<(), Error> {
        match token.kind {
            TokenKind::ArrayBegin => {
                let ix = self.alloc_node(
                    Payload::Array {
                        first: None,
                        count: 0,
                    },
                    token.span,
                )?;
                self.link(ix);
                self.push_frame(ix);
            }
            TokenKind::ObjectBegin => {
                let ix = self.alloc_node(
                    Payload::Object {
                        first: None,
                        count: 0,
                    },
                    token.span,
                )?;
                self.link(ix);
                self.push_frame(ix);
            }
            TokenKind::ArrayEnd | TokenKind::ObjectEnd => {
                let frame = self.frames[self.depth - 1];
                let node = &mut self.nodes[frame.node as usize];
                node.span.length = token.span.end() - node.span.offset;
                self.frames[self.depth - 1] = Frame::default();
                self.depth -= 1;
            }
            TokenKind::Null => {
                let ix = self.alloc_node(Payload::Null, token.span)?;
                self.link(ix);
            }
            TokenKind::True | TokenKind::False => {
                let ix = self.alloc_node(
                    Payload::Bool(token.kind == TokenKind::True),
                    token.span,
                )?;
                self.link(ix);
            }
            TokenKind::Number => {
                let ix = self.alloc_node(Payload::Number, token.span)?;
                self.link(ix);
            }
            TokenKind::String => {
                let ix = self.alloc_node(Payload::String, token.span)?;
                self.link(ix);
            }
            TokenKind::ObjectName => self.open_member(token.span)?,
            TokenKind::Invalid | TokenKind::Eof => {}
        }
        Ok(())
    }

    fn alloc_node(&mut self, payload: Payload, span: Span) -> Result<NodeIx, Error> {
        self.nodes
            .try_reserve(1)
            .map_err(|_| out_of_memory(span))?;
        let ix = self.nodes.len() as NodeIx;
        self.nodes.push(Node {
            payload,
            span,
            next: None,
        });
        Ok(ix)
    }

    fn push_frame(&mut self, node: NodeIx) {
        // The scanner refuses input nesting deeper than MAX_DEPTH, so a
        // frame slot is always free here.
        self.frames[self.depth] = Frame {
            node,
            tail_child: None,
            tail_member: None,
        };
        self.depth += 1;
    }

    /// Links a freshly allocated value into the enclosing compound: appends
    /// to an array's element list, or fills the pending member of an
    /// object.
    fn link(&mut self, ix: NodeIx) {
        if self.depth == 0 {
            return; // the root value
        }

        let frame = self.frames[self.depth - 1];
        let parent = frame.node as usize;
        if matches!(self.nodes[parent].payload, Payload::Array { .. }) {
            match frame.tail_child {
                None => {
                    if let Payload::Array { first, .. } = &mut self.nodes[parent].payload {
                        *first = Some(ix);
                    }
                }
                Some(tail) => self.nodes[tail as usize].next = Some(ix),
            }
            if let Payload::Array { count, .. } = &mut self.nodes[parent].payload {
                *count += 1;
            }
            self.frames[self.depth - 1].tail_child = Some(ix);
        } else if let Payload::Object { count, .. } = &mut self.nodes[parent].payload {
            *count += 1;
            if let Some(tail) = frame.tail_member {
                self.members[tail as usize].value = ix;
            }
        }
    }

    /// Opens a pending member on the top object; the next value token fills
    /// its value slot through [`link`](Self::link).
    fn open_member(&mut self, name: Span) -> Result<(), Error> {
        self.members
            .try_reserve(1)
            .map_err(|_| out_of_memory(name))?;
        let ix = self.members.len() as MemberIx;
        self.members.push(Member {
            name,
            value: 0,
            next: None,
        });

        let frame = &mut self.frames[self.depth - 1];
        let parent = frame.node as usize;
        if let Payload::Object { first, .. } = &mut self.nodes[parent].payload {
            match frame.tail_member {
                None => *first = Some(ix),
                Some(tail) => self.members[tail as usize].next = Some(ix),
            }
            frame.tail_member = Some(ix);
        }
        Ok(())
    }
}
