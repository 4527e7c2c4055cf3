//! Entry classifier: `- value` versus `key: value`.
//!
//! A compact line such as `- name: t1` holds two entries: an empty sequence
//! item at the dash and a mapping entry starting at the key's column. The
//! classifier splits it so the nesting engine only ever sees one entry per
//! column.

use crate::errors::{EntryKind, ErrorReporting, ParseError, ParseErrorKind, SourceContext};
use crate::syntax::scanner::ScannedLine;

/// A classified entry, ready for the nesting engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// `- value`; an empty value means a nested block follows.
    Item(String),
    /// `key: value`; an empty value means a nested block follows.
    Pair(String, String),
}

impl Entry {
    pub fn kind(&self) -> EntryKind {
        match self {
            Entry::Item(_) => EntryKind::Sequence,
            Entry::Pair(..) => EntryKind::Mapping,
        }
    }
}

/// An entry together with the column it starts at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Positioned {
    pub indent: usize,
    pub entry: Entry,
}

/// Classifies a scanned line into one or more entries, outermost first.
pub fn classify(ctx: &SourceContext, line: &ScannedLine) -> Result<Vec<Positioned>, ParseError> {
    let mut entries = Vec::with_capacity(1);
    let mut indent = line.indent;
    let mut content = line.content.as_str();

    loop {
        if let Some(rest) = content.strip_prefix('-') {
            let nested = rest.trim_start();
            if rest.starts_with(' ') && starts_compact_entry(nested) {
                entries.push(Positioned {
                    indent,
                    entry: Entry::Item(String::new()),
                });
                indent += content.len() - nested.len();
                content = nested;
                continue;
            }
            entries.push(Positioned {
                indent,
                entry: Entry::Item(rest.trim().to_string()),
            });
            return Ok(entries);
        }

        entries.push(Positioned {
            indent,
            entry: classify_pair(ctx, line, content)?,
        });
        return Ok(entries);
    }
}

fn classify_pair(ctx: &SourceContext, line: &ScannedLine, content: &str) -> Result<Entry, ParseError> {
    let Some((key, value)) = content.split_once(':') else {
        return Err(ctx.report(
            ParseErrorKind::MalformedEntry {
                content: content.to_string(),
            },
            line.number,
            line.span,
        ));
    };

    let key = key.trim();
    if key.is_empty() {
        return Err(ctx.report(ParseErrorKind::EmptyKey, line.number, line.span));
    }
    Ok(Entry::Pair(key.to_string(), value.trim().to_string()))
}

/// Whether the text after a dash is itself an entry rather than a scalar:
/// another `-` item, or a key whose first colon ends the text or is followed
/// by a space.
fn starts_compact_entry(text: &str) -> bool {
    if text == "-" || text.starts_with("- ") {
        return true;
    }
    match text.find(':') {
        Some(i) => {
            let after = &text[i + 1..];
            i > 0 && (after.is_empty() || after.starts_with(' '))
        }
        None => false,
    }
}
