//! Nesting stack engine.
//!
//! Each open block is a [`Frame`] that owns its container outright. When a
//! deeper block opens, the previous entry of the enclosing block must still
//! hold an empty placeholder; when the block closes (on dedent or at end of
//! input) its container is moved into that placeholder slot. No frame ever
//! borrows another, so there is no aliasing between parent and child.

use std::cmp::Ordering;

use tracing::trace;

use crate::errors::{EntryKind, ErrorReporting, ParseError, ParseErrorKind, SourceContext};
use crate::syntax::entry::{Entry, Positioned};
use crate::syntax::node::Node;
use crate::syntax::scanner::ScannedLine;

#[derive(Debug)]
enum Container {
    Sequence(Vec<Node>),
    Mapping(Vec<(String, Node)>),
}

impl Container {
    fn for_entry(entry: &Entry) -> Self {
        match entry {
            Entry::Item(_) => Container::Sequence(Vec::new()),
            Entry::Pair(..) => Container::Mapping(Vec::new()),
        }
    }

    fn kind(&self) -> EntryKind {
        match self {
            Container::Sequence(_) => EntryKind::Sequence,
            Container::Mapping(_) => EntryKind::Mapping,
        }
    }

    /// The last sequence item or the value of the last-inserted key.
    fn last_slot_mut(&mut self) -> Option<&mut Node> {
        match self {
            Container::Sequence(items) => items.last_mut(),
            Container::Mapping(entries) => entries.last_mut().map(|(_, v)| v),
        }
    }

    fn into_node(self) -> Node {
        match self {
            Container::Sequence(items) => Node::Sequence(items),
            Container::Mapping(entries) => Node::Mapping(entries),
        }
    }
}

/// One open, not yet finished block.
#[derive(Debug)]
struct Frame {
    indent: usize,
    container: Container,
}

/// Value inserted for an entry: its inline text, or a placeholder when empty.
fn scalar(value: String) -> Node {
    if value.is_empty() {
        Node::placeholder()
    } else {
        Node::Scalar(value)
    }
}

pub struct NestingStack<'a> {
    ctx: &'a SourceContext,
    /// Bottom to top; `indent` strictly increases.
    frames: Vec<Frame>,
}

impl<'a> NestingStack<'a> {
    pub fn new(ctx: &'a SourceContext) -> Self {
        Self {
            ctx,
            frames: Vec::new(),
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Feeds one classified entry of `line` into the stack.
    pub fn push_line(&mut self, line: &ScannedLine, at: Positioned) -> Result<(), ParseError> {
        let Positioned { indent, entry } = at;
        let Some(top) = self.frames.last_mut() else {
            trace!(line = line.number, indent, "open root block");
            self.open(indent, entry);
            return Ok(());
        };

        match indent.cmp(&top.indent) {
            Ordering::Greater => {
                let parent = top.container.kind();
                let slot_free = top
                    .container
                    .last_slot_mut()
                    .is_some_and(|slot| slot.is_placeholder());
                if !slot_free {
                    return Err(self.ctx.report(
                        ParseErrorKind::UnexpectedNesting { parent },
                        line.number,
                        line.span,
                    ));
                }
                trace!(line = line.number, indent, "open nested block");
                self.open(indent, entry);
                Ok(())
            }
            Ordering::Equal => self.insert(line, indent, entry),
            Ordering::Less => {
                self.unwind_to(line, indent)?;
                self.insert(line, indent, entry)
            }
        }
    }

    /// Closes every open block and returns the root.
    pub fn finish(mut self, last_line: usize) -> Result<Node, ParseError> {
        while !self.frames.is_empty() {
            if let Some(root) = self.close_top() {
                return Ok(root);
            }
        }
        Err(self
            .ctx
            .report(ParseErrorKind::EmptyDocument, last_line.max(1), (0, 0).into()))
    }

    fn open(&mut self, indent: usize, entry: Entry) {
        let mut container = Container::for_entry(&entry);
        match (&mut container, entry) {
            (Container::Sequence(items), Entry::Item(value)) => items.push(scalar(value)),
            (Container::Mapping(entries), Entry::Pair(key, value)) => {
                entries.push((key, scalar(value)))
            }
            // for_entry always matches the entry kind
            _ => {}
        }
        self.frames.push(Frame { indent, container });
    }

    fn insert(&mut self, line: &ScannedLine, indent: usize, entry: Entry) -> Result<(), ParseError> {
        let Some(top) = self.frames.last_mut() else {
            self.open(indent, entry);
            return Ok(());
        };

        match (&mut top.container, entry) {
            (Container::Sequence(items), Entry::Item(value)) => {
                items.push(scalar(value));
                Ok(())
            }
            (Container::Mapping(entries), Entry::Pair(key, value)) => {
                if entries.iter().any(|(k, _)| *k == key) {
                    return Err(self.ctx.report(
                        ParseErrorKind::DuplicateKey { key },
                        line.number,
                        line.span,
                    ));
                }
                entries.push((key, scalar(value)));
                Ok(())
            }
            (container, entry) => Err(self.ctx.report(
                ParseErrorKind::MixedEntryType {
                    expected: container.kind(),
                    found: entry.kind(),
                },
                line.number,
                line.span,
            )),
        }
    }

    /// Pops blocks until the top one sits at exactly `indent`.
    fn unwind_to(&mut self, line: &ScannedLine, indent: usize) -> Result<(), ParseError> {
        while self.frames.len() > 1 && self.frames.last().is_some_and(|f| f.indent > indent) {
            self.close_top();
        }
        match self.frames.last() {
            Some(top) if top.indent == indent => {
                trace!(line = line.number, depth = self.frames.len(), "dedent");
                Ok(())
            }
            _ => Err(self.ctx.report(
                ParseErrorKind::NoEnclosingLevel { indent },
                line.number,
                line.span,
            )),
        }
    }

    /// Pops the top frame into its parent's last slot. Returns the node when
    /// there is no parent left to receive it.
    fn close_top(&mut self) -> Option<Node> {
        let frame = self.frames.pop()?;
        let node = frame.container.into_node();
        match self
            .frames
            .last_mut()
            .and_then(|parent| parent.container.last_slot_mut())
        {
            Some(slot) => {
                *slot = node;
                None
            }
            None => Some(node),
        }
    }
}
