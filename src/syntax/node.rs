//! The parsed document: scalars, sequences and insertion-ordered mappings.

use std::fmt;

/// One value of a parsed document. Scalars are never type-coerced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Scalar(String),
    Sequence(Vec<Node>),
    /// Entries in file order. Keys are unique; the parser enforces it.
    Mapping(Vec<(String, Node)>),
}

impl Node {
    /// The placeholder stored for `- ` and `key:` lines until a nested block
    /// (if any) replaces it.
    pub(crate) fn placeholder() -> Self {
        Node::Scalar(String::new())
    }

    pub(crate) fn is_placeholder(&self) -> bool {
        matches!(self, Node::Scalar(s) if s.is_empty())
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Node::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Node::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&[(String, Node)]> {
        match self {
            Node::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    /// Looks up `key` if this node is a mapping.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_mapping()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Scalar(_) => "scalar",
            Node::Sequence(_) => "sequence",
            Node::Mapping(_) => "mapping",
        }
    }

    /// Number of nested container levels; a scalar has depth 0.
    pub fn depth(&self) -> usize {
        match self {
            Node::Scalar(_) => 0,
            Node::Sequence(items) => 1 + items.iter().map(Node::depth).max().unwrap_or(0),
            Node::Mapping(entries) => {
                1 + entries.iter().map(|(_, v)| v.depth()).max().unwrap_or(0)
            }
        }
    }

    fn write_block(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let pad = " ".repeat(indent);
        match self {
            Node::Scalar(s) => writeln!(f, "{}{}", pad, s),
            Node::Sequence(items) => {
                for item in items {
                    match item {
                        Node::Scalar(s) => writeln!(f, "{}- {}", pad, s)?,
                        nested => {
                            writeln!(f, "{}-", pad)?;
                            nested.write_block(f, indent + 2)?;
                        }
                    }
                }
                Ok(())
            }
            Node::Mapping(entries) => {
                for (key, value) in entries {
                    match value {
                        Node::Scalar(s) => writeln!(f, "{}{}: {}", pad, key, s)?,
                        nested => {
                            writeln!(f, "{}{}:", pad, key)?;
                            nested.write_block(f, indent + 2)?;
                        }
                    }
                }
                Ok(())
            }
        }
    }
}

/// Block-style rendering for inspection. Not a round-trip writer: `#` and
/// trailing spaces inside scalars are not escaped.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_block(f, 0)
    }
}
