//! Suite loader: turns a parsed document into validated test definitions.
//!
//! A suite file is a top-level sequence of mappings:
//!
//! ```yaml
//! - name: hello
//!   command: echo hello
//!   expected: expected/hello.txt
//!   group: smoke        # optional
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::errors::SuiteError;
use crate::syntax::{self, Node};

static TEST_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\w+$").expect("valid regex"));

const KNOWN_KEYS: [&str; 4] = ["name", "command", "expected", "group"];

/// One regression test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub name: String,
    pub command: String,
    pub expected: PathBuf,
    pub group: Option<String>,
}

/// All tests of a suite file, in file order.
#[derive(Debug, Clone, Default)]
pub struct Suite {
    pub tests: Vec<TestCase>,
}

/// Which tests of a suite to run.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Explicit names, run in the given order.
    pub subset: Option<Vec<String>>,
    pub only_group: Option<String>,
    pub exclude_group: Option<String>,
}

impl Selection {
    /// Parses a `-t a,b,c` style list. Empty pieces are ignored.
    pub fn parse_subset(list: &str) -> Vec<String> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }

    /// `(only group x)(excluding group y)` suffix for summaries.
    pub fn group_info(&self) -> String {
        let mut info = String::new();
        if let Some(group) = &self.only_group {
            info.push_str(&format!("(only group {})", group));
        }
        if let Some(group) = &self.exclude_group {
            info.push_str(&format!("(excluding group {})", group));
        }
        info
    }
}

pub fn load_suite<P: AsRef<Path>>(path: P) -> Result<Suite, SuiteError> {
    let doc = syntax::parse_file(path.as_ref())?;
    let suite = Suite::from_document(&doc)?;
    debug!(path = %path.as_ref().display(), tests = suite.tests.len(), "loaded suite");
    Ok(suite)
}

impl Suite {
    pub fn from_document(doc: &Node) -> Result<Self, SuiteError> {
        let entries = doc.as_sequence().ok_or_else(|| SuiteError::Format {
            message: "must have a top level sequence".into(),
        })?;

        let mut tests = Vec::with_capacity(entries.len());
        let mut seen = HashSet::new();
        for (index, entry) in entries.iter().enumerate() {
            let test = test_from_entry(index + 1, entry)?;
            if !seen.insert(test.name.clone()) {
                return Err(SuiteError::DuplicateName { name: test.name });
            }
            tests.push(test);
        }
        Ok(Self { tests })
    }

    pub fn get(&self, name: &str) -> Option<&TestCase> {
        self.tests.iter().find(|t| t.name == name)
    }

    /// Applies the subset first, then the group filters.
    pub fn select(&self, selection: &Selection) -> Result<Vec<&TestCase>, SuiteError> {
        let mut active: Vec<&TestCase> = match &selection.subset {
            Some(names) => names
                .iter()
                .map(|name| {
                    self.get(name)
                        .ok_or_else(|| SuiteError::UnknownTest { name: name.clone() })
                })
                .collect::<Result<_, _>>()?,
            None => self.tests.iter().collect(),
        };

        if let Some(group) = &selection.exclude_group {
            active.retain(|t| t.group.as_deref() != Some(group.as_str()));
        }
        if let Some(group) = &selection.only_group {
            active.retain(|t| t.group.as_deref() == Some(group.as_str()));
        }
        Ok(active)
    }
}

fn test_from_entry(index: usize, entry: &Node) -> Result<TestCase, SuiteError> {
    let invalid = |message: String| SuiteError::InvalidEntry { index, message };

    let fields = entry
        .as_mapping()
        .ok_or_else(|| invalid(format!("must be a mapping, found a {}", entry.kind_name())))?;

    for (key, _) in fields {
        if !KNOWN_KEYS.contains(&key.as_str()) {
            warn!(entry = index, key = %key, "ignoring unknown key");
        }
    }

    let field = |key: &str| -> Result<Option<&str>, SuiteError> {
        match entry.get(key) {
            None => Ok(None),
            Some(node) => node.as_scalar().map(Some).ok_or_else(|| {
                invalid(format!("'{}' must be a scalar, found a {}", key, node.kind_name()))
            }),
        }
    };

    let expected = field("expected")?
        .filter(|e| !e.is_empty())
        .ok_or_else(|| invalid("each test entry must define an expected file".into()))?;
    let command = field("command")?
        .ok_or_else(|| invalid("each test entry must specify a command".into()))?;
    let name = field("name")?
        .ok_or_else(|| invalid("each test entry must specify a name".into()))?;

    if !TEST_NAME.is_match(name) {
        return Err(SuiteError::IllegalName { name: name.into() });
    }

    let group = match field("group")? {
        Some("") => return Err(SuiteError::EmptyGroup { name: name.into() }),
        other => other.map(String::from),
    };

    Ok(TestCase {
        name: name.into(),
        command: command.into(),
        expected: PathBuf::from(expected),
        group,
    })
}
