//! Line scanner: indentation width, comment stripping, blank-line filtering.

use miette::SourceSpan;

use crate::errors::{ErrorReporting, ParseError, ParseErrorKind, SourceContext};

const BOM: char = '\u{feff}';

/// A non-blank line with its indentation measured and comment removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedLine {
    /// 1-based line number.
    pub number: usize,
    /// Count of leading spaces.
    pub indent: usize,
    pub content: String,
    /// Byte range of the raw line in the source, for diagnostics.
    pub span: SourceSpan,
}

/// Splits `text` into `(line_number, byte_offset, line)` triples. Accepts
/// `\n` and `\r\n` endings.
pub fn raw_lines(text: &str) -> impl Iterator<Item = (usize, usize, &str)> {
    let mut offset = 0;
    text.split_inclusive('\n').enumerate().map(move |(i, chunk)| {
        let start = offset;
        offset += chunk.len();
        let line = chunk.strip_suffix('\n').unwrap_or(chunk);
        let line = line.strip_suffix('\r').unwrap_or(line);
        (i + 1, start, line)
    })
}

/// Scans one raw line. Returns `Ok(None)` for blank and comment-only lines.
pub fn scan_line(
    ctx: &SourceContext,
    number: usize,
    offset: usize,
    raw: &str,
) -> Result<Option<ScannedLine>, ParseError> {
    let (raw, offset) = match (number, raw.strip_prefix(BOM)) {
        (1, Some(rest)) => (rest, offset + BOM.len_utf8()),
        _ => (raw, offset),
    };

    let body = raw.trim_start();
    let leading = &raw[..raw.len() - body.len()];
    if leading.chars().any(|c| c != ' ') {
        return Err(ctx.report(
            ParseErrorKind::NonSpaceIndent,
            number,
            (offset, leading.len().max(1)).into(),
        ));
    }

    let content = strip_comment(body);
    if content.is_empty() {
        return Ok(None);
    }

    Ok(Some(ScannedLine {
        number,
        indent: leading.len(),
        content,
        span: (offset, raw.len()).into(),
    }))
}

/// Cuts the line at the first unescaped `#`; `\#` stands for a literal hash.
fn strip_comment(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'#') => {
                out.push('#');
                chars.next();
            }
            '#' => break,
            _ => out.push(c),
        }
    }
    out.truncate(out.trim_end().len());
    out
}
