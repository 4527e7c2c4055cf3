//! Parser for the block-style YAML subset used by suite files.
//!
//! Only block sequences (`- item`) and block mappings (`key: value`) are
//! understood. There are no flow collections, anchors, multi-document streams
//! or type coercion: every scalar is kept as the trimmed text of its line.
//! Nesting is inferred from indentation alone, in a single pass with no
//! lookahead.
//!
//! ```
//! use minisciath::syntax::{parse_str, Node};
//!
//! let doc = parse_str("inline.yml", "- name: t1\n  command: run1\n").unwrap();
//! let first = &doc.as_sequence().unwrap()[0];
//! assert_eq!(first.get("command"), Some(&Node::Scalar("run1".into())));
//! ```

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::errors::{ParseError, SourceContext, SuiteError};

pub mod entry;
pub mod node;
pub mod scanner;
pub mod stack;

pub use crate::errors::EntryKind;
pub use node::Node;

use entry::classify;
use scanner::{raw_lines, scan_line};
use stack::NestingStack;

/// Parses `text`; `name` is only used in diagnostics.
pub fn parse_str(name: &str, text: &str) -> Result<Node, ParseError> {
    let ctx = SourceContext::new(name, text);
    let mut stack = NestingStack::new(&ctx);
    let mut last_line = 0;

    for (number, offset, raw) in raw_lines(text) {
        last_line = number;
        let Some(line) = scan_line(&ctx, number, offset, raw)? else {
            continue;
        };
        for entry in classify(&ctx, &line)? {
            stack.push_line(&line, entry)?;
        }
    }

    let root = stack.finish(last_line)?;
    debug!(file = name, lines = last_line, depth = root.depth(), "parsed document");
    Ok(root)
}

/// Reads the whole file, then parses it.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Node, SuiteError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| SuiteError::io(path, e))?;
    Ok(parse_str(&path.display().to_string(), &text)?)
}
