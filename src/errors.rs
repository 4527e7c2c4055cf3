//! MiniSciATH Error Handling
//!
//! Parse errors carry the file name, the 1-based line number and the named
//! source so that `miette` can render a snippet of the offending line.
//! Everything past parsing (loading, selecting, running) is a [`SuiteError`].

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceSpan};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

// ============================================================================
// SOURCE CONTEXT - Error reporting infrastructure
// ============================================================================

/// The text being parsed together with the name used in diagnostics.
#[derive(Debug, Clone)]
pub struct SourceContext {
    pub name: String,
    pub content: Arc<NamedSource<String>>,
}

impl SourceContext {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            content: Arc::new(NamedSource::new(name.clone(), content.into())),
            name,
        }
    }
}

// ============================================================================
// PARSE ERRORS
// ============================================================================

/// A fatal structural error found while parsing a suite file.
#[derive(Debug)]
pub struct ParseError {
    /// What went wrong
    pub kind: ParseErrorKind,
    /// Where it happened
    pub source_info: SourceInfo,
    /// Optional hint rendered by miette
    pub help: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Non-space leading whitespace.
    NonSpaceIndent,
    /// A dedent that lands between two open levels.
    NoEnclosingLevel { indent: usize },
    MalformedEntry { content: String },
    EmptyKey,
    MixedEntryType {
        expected: EntryKind,
        found: EntryKind,
    },
    UnexpectedNesting { parent: EntryKind },
    DuplicateKey { key: String },
    EmptyDocument,
}

/// The two kinds of block entry the format knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Sequence,
    Mapping,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Sequence => write!(f, "sequence"),
            EntryKind::Mapping => write!(f, "mapping"),
        }
    }
}

/// Coarse classification used by tests and by the CLI exit path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Indentation,
    MalformedEntry,
    MixedEntryType,
    UnexpectedNesting,
    DuplicateKey,
    EmptyDocument,
}

#[derive(Debug, Clone)]
pub struct SourceInfo {
    pub file: String,
    /// 1-based; 0 only for errors not tied to a line.
    pub line: usize,
    pub source: Arc<NamedSource<String>>,
    pub primary_span: SourceSpan,
}

impl ParseErrorKind {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NonSpaceIndent | Self::NoEnclosingLevel { .. } => ErrorCategory::Indentation,
            Self::MalformedEntry { .. } | Self::EmptyKey => ErrorCategory::MalformedEntry,
            Self::MixedEntryType { .. } => ErrorCategory::MixedEntryType,
            Self::UnexpectedNesting { .. } => ErrorCategory::UnexpectedNesting,
            Self::DuplicateKey { .. } => ErrorCategory::DuplicateKey,
            Self::EmptyDocument => ErrorCategory::EmptyDocument,
        }
    }

    pub const fn code_suffix(&self) -> &'static str {
        match self {
            Self::NonSpaceIndent | Self::NoEnclosingLevel { .. } => "indentation",
            Self::MalformedEntry { .. } | Self::EmptyKey => "malformed_entry",
            Self::MixedEntryType { .. } => "mixed_entry_type",
            Self::UnexpectedNesting { .. } => "unexpected_nesting",
            Self::DuplicateKey { .. } => "duplicate_key",
            Self::EmptyDocument => "empty_document",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::NonSpaceIndent => "indent with spaces only",
            Self::NoEnclosingLevel { .. } => "invalid indentation",
            Self::MalformedEntry { .. } => "neither `- item` nor `key: value`",
            Self::EmptyKey => "missing key",
            Self::MixedEntryType { .. } => "invalid entry type",
            Self::UnexpectedNesting { .. } => "nested block starts here",
            Self::DuplicateKey { .. } => "duplicate key",
            Self::EmptyDocument => "no entries",
        }
    }

    fn default_help(&self) -> Option<String> {
        match self {
            Self::NonSpaceIndent => Some("replace tabs with spaces".into()),
            Self::UnexpectedNesting { parent } => Some(format!(
                "remove the inline value on the previous {} line, or the nested block",
                parent
            )),
            _ => None,
        }
    }
}

impl ParseError {
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    pub fn line(&self) -> usize {
        self.source_info.line
    }

    pub fn file(&self) -> &str {
        &self.source_info.file
    }
}

impl std::error::Error for ParseError {}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: file parse error: ",
            self.source_info.file, self.source_info.line
        )?;
        match &self.kind {
            ParseErrorKind::NonSpaceIndent => write!(f, "indent with spaces only"),
            ParseErrorKind::NoEnclosingLevel { indent } => write!(
                f,
                "invalid indentation: no enclosing level at column {}",
                indent
            ),
            ParseErrorKind::MalformedEntry { content } => {
                write!(f, "malformed entry '{}'", content)
            }
            ParseErrorKind::EmptyKey => write!(f, "mapping entry has an empty key"),
            ParseErrorKind::MixedEntryType { expected, found } => write!(
                f,
                "invalid entry type: {} entry in a {} block",
                found, expected
            ),
            ParseErrorKind::UnexpectedNesting { parent } => write!(
                f,
                "data not allowed on previous {} line, when nesting",
                parent
            ),
            ParseErrorKind::DuplicateKey { key } => write!(f, "duplicate key: {}", key),
            ParseErrorKind::EmptyDocument => write!(f, "document has no entries"),
        }
    }
}

impl Diagnostic for ParseError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!(
            "minisciath::parse::{}",
            self.kind.code_suffix()
        )))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display + 'a>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = vec![LabeledSpan::new_with_span(
            Some(self.kind.label().to_string()),
            self.source_info.primary_span,
        )];
        Some(Box::new(labels.into_iter()))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&*self.source_info.source)
    }
}

/// Anything that knows where it is in a file can build a [`ParseError`].
pub trait ErrorReporting {
    fn report(&self, kind: ParseErrorKind, line: usize, span: SourceSpan) -> ParseError;
}

impl ErrorReporting for SourceContext {
    fn report(&self, kind: ParseErrorKind, line: usize, span: SourceSpan) -> ParseError {
        let help = kind.default_help();
        ParseError {
            kind,
            source_info: SourceInfo {
                file: self.name.clone(),
                line,
                source: Arc::clone(&self.content),
                primary_span: span,
            },
            help,
        }
    }
}

// ============================================================================
// SUITE ERRORS
// ============================================================================

/// Errors raised after parsing: loading, validating, selecting and running.
#[derive(Debug, Error, Diagnostic)]
pub enum SuiteError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    #[error("failed to read '{}'", path.display())]
    #[diagnostic(code(minisciath::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("incorrectly formatted input file: {message}")]
    #[diagnostic(code(minisciath::suite::format))]
    Format { message: String },

    #[error("test entry {index}: {message}")]
    #[diagnostic(code(minisciath::suite::entry))]
    InvalidEntry { index: usize, message: String },

    #[error("illegal test name '{name}'")]
    #[diagnostic(
        code(minisciath::suite::name),
        help("use numbers, letters, and underscores")
    )]
    IllegalName { name: String },

    #[error("duplicate test name '{name}' not allowed")]
    #[diagnostic(code(minisciath::suite::duplicate))]
    DuplicateName { name: String },

    #[error("empty group name for test '{name}' not allowed")]
    #[diagnostic(code(minisciath::suite::group))]
    EmptyGroup { name: String },

    #[error("unrecognized test '{name}' selected")]
    #[diagnostic(code(minisciath::select::unknown))]
    UnknownTest { name: String },

    #[error("cannot split command '{command}' into arguments")]
    #[diagnostic(
        code(minisciath::run::command),
        help("check for unbalanced quotes or an empty command")
    )]
    BadCommand { command: String },

    #[error("failed to launch '{program}'")]
    #[diagnostic(code(minisciath::run::launch))]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl SuiteError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SuiteError::Io {
            path: path.into(),
            source,
        }
    }
}

// ============================================================================
// ERROR FORMATTING UTILITIES
// ============================================================================

/// Renders a diagnostic with full miette formatting on stderr.
pub fn print_error<E>(error: E)
where
    E: Diagnostic + Send + Sync + 'static,
{
    let report = miette::Report::new(error);
    eprintln!("{report:?}");
}
