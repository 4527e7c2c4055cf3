//! Runs test commands and compares their output with the stored expectation.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use difference::{Changeset, Difference};
use tracing::{debug, info};

use crate::errors::SuiteError;
use crate::suite::TestCase;

/// Runtime options derived from the command line.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Overwrite expected files with the current output instead of comparing.
    pub update: bool,
    /// Where `<name>.output` files are written when not updating.
    pub output_dir: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            update: false,
            output_dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug)]
pub enum Outcome {
    Passed,
    /// Output differs; the diff goes from expected to actual, line by line.
    Failed { diff: Vec<Difference> },
    Missing,
    Updated,
    /// The command could not be split, launched, or its output captured.
    Error(SuiteError),
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed { .. } | Outcome::Error(_))
    }
}

#[derive(Debug)]
pub struct TestRun {
    pub name: String,
    pub expected: PathBuf,
    pub output: PathBuf,
    pub outcome: Outcome,
}

impl RunConfig {
    pub fn output_path(&self, test: &TestCase) -> PathBuf {
        if self.update {
            test.expected.clone()
        } else {
            self.output_dir.join(format!("{}.output", test.name))
        }
    }
}

pub fn run_test(test: &TestCase, config: &RunConfig) -> TestRun {
    let output = config.output_path(test);
    let outcome = match execute(&test.command, &output) {
        Ok(()) if config.update => Outcome::Updated,
        Ok(()) => verify(&test.expected, &output),
        Err(e) => Outcome::Error(e),
    };
    info!(test = %test.name, outcome = outcome_name(&outcome), "test finished");
    TestRun {
        name: test.name.clone(),
        expected: test.expected.clone(),
        output,
        outcome,
    }
}

fn outcome_name(outcome: &Outcome) -> &'static str {
    match outcome {
        Outcome::Passed => "passed",
        Outcome::Failed { .. } => "failed",
        Outcome::Missing => "missing",
        Outcome::Updated => "updated",
        Outcome::Error(_) => "error",
    }
}

/// Splits `command` shell-style and runs it with stdout and stderr both
/// redirected into `output`. The exit status is not part of the verdict.
pub fn execute(command: &str, output: &Path) -> Result<(), SuiteError> {
    let args = shlex::split(command)
        .filter(|args| !args.is_empty())
        .ok_or_else(|| SuiteError::BadCommand {
            command: command.to_string(),
        })?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| SuiteError::io(parent, e))?;
    }
    let stdout = File::create(output).map_err(|e| SuiteError::io(output, e))?;
    let stderr = stdout.try_clone().map_err(|e| SuiteError::io(output, e))?;

    debug!(program = %args[0], args = ?&args[1..], output = %output.display(), "spawning");
    let status = Command::new(&args[0])
        .args(&args[1..])
        .stdin(Stdio::null())
        .stdout(stdout)
        .stderr(stderr)
        .status()
        .map_err(|source| SuiteError::Launch {
            program: args[0].clone(),
            source,
        })?;
    debug!(?status, "command exited");
    Ok(())
}

/// Compares the captured output against the expected file byte for byte.
pub fn verify(expected: &Path, output: &Path) -> Outcome {
    if !expected.is_file() {
        return Outcome::Missing;
    }
    let read = |path: &Path| fs::read(path).map_err(|e| SuiteError::io(path, e));
    let (want, got) = match (read(expected), read(output)) {
        (Ok(want), Ok(got)) => (want, got),
        (Err(e), _) | (_, Err(e)) => return Outcome::Error(e),
    };
    if want == got {
        return Outcome::Passed;
    }

    Outcome::Failed {
        diff: line_diff(&String::from_utf8_lossy(&want), &String::from_utf8_lossy(&got)),
    }
}

/// Line diff of `want` against `got`. Every chunk holds whole lines joined by
/// `\n` with no trailing newline.
pub fn line_diff(want: &str, got: &str) -> Vec<Difference> {
    let trim = |text: &str| text.strip_suffix('\n').unwrap_or(text).to_string();
    let mut diff = Changeset::new(&trim(want), &trim(got), "\n").diffs;
    if diff.iter().all(|d| matches!(d, Difference::Same(_))) {
        // Only the final newline differs.
        diff.push(if want.ends_with('\n') {
            Difference::Rem(String::new())
        } else {
            Difference::Add(String::new())
        });
    }
    diff
}
