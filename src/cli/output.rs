//! Handles all user-facing output for the CLI.
//!
//! Status lines, colored diffs and the final summary are written through a
//! [`Reporter`], so the same code drives the terminal and in-memory buffers
//! used in tests.

use std::io;
use std::path::Path;

use difference::Difference;
use termcolor::{Color, ColorSpec, WriteColor};

use crate::runner::{Outcome, TestRun};
use crate::suite::{Selection, TestCase};

const BANNER: &str = "[MiniSciATH]";
const FAILURE: &str = "FAILURE";

// ============================================================================
// SUMMARY
// ============================================================================

/// Tallies of one invocation.
#[derive(Debug, Default)]
pub struct Summary {
    /// Tests defined in the suite file.
    pub total: usize,
    /// Tests selected to run.
    pub active: usize,
    pub update: bool,
    pub failed: Vec<String>,
    pub missing: Vec<String>,
}

impl Summary {
    pub fn new(total: usize, active: usize, update: bool) -> Self {
        Self {
            total,
            active,
            update,
            ..Default::default()
        }
    }

    pub fn record(&mut self, run: &TestRun) {
        match run.outcome {
            Outcome::Missing => self.missing.push(run.name.clone()),
            ref outcome if outcome.is_failure() => self.failed.push(run.name.clone()),
            _ => {}
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.missing.is_empty()
    }
}

// ============================================================================
// REPORTER
// ============================================================================

pub struct Reporter<W> {
    out: W,
}

impl<W: WriteColor> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn running(&mut self, test: &TestCase) -> io::Result<()> {
        self.info(&format!("Running {}", test.name))?;
        writeln!(self.out, "   {}", test.command)
    }

    pub fn outcome(&mut self, run: &TestRun) -> io::Result<()> {
        match &run.outcome {
            Outcome::Passed => self.info("Success.")?,
            Outcome::Updated => self.info("Expected output updated.")?,
            Outcome::Missing => self.failure(&format!(
                "Expected file {} missing",
                run.expected.display()
            ))?,
            Outcome::Error(e) => self.failure(&error_chain(e))?,
            Outcome::Failed { diff } => {
                self.failure(". Output differs from expected:")?;
                self.diff(&run.expected, &run.output, diff)?;
            }
        }
        writeln!(self.out)
    }

    pub fn summary(
        &mut self,
        summary: &Summary,
        selection: &Selection,
        program: &str,
        input: &Path,
    ) -> io::Result<()> {
        let group_info = selection.group_info();
        if !summary.is_success() {
            let broken = summary.failed.len() + summary.missing.len();
            self.failure(&format!(
                " {} ({} of {} total tests)",
                group_info, broken, summary.total
            ))?;
            if !summary.missing.is_empty() {
                self.info("To generate missing expected files from current output")?;
                writeln!(
                    self.out,
                    "   {} {} -t {} --update",
                    program,
                    input.display(),
                    summary.missing.join(",")
                )?;
            }
            if !summary.failed.is_empty() {
                self.info("To re-run with only failed tests")?;
                writeln!(
                    self.out,
                    "   {} {} -t {}",
                    program,
                    input.display(),
                    summary.failed.join(",")
                )?;
            }
        } else if !summary.update {
            self.info(&format!(
                "SUCCESS {} ({} of {} total tests)",
                group_info, summary.active, summary.total
            ))?;
        }
        Ok(())
    }

    // ========================================================================
    // PRIVATE HELPERS
    // ========================================================================

    fn banner(&mut self) -> io::Result<()> {
        self.out.set_color(
            ColorSpec::new()
                .set_fg(Some(Color::White))
                .set_bg(Some(Color::Blue))
                .set_intense(true),
        )?;
        write!(self.out, "{}", BANNER)?;
        self.out.reset()
    }

    fn info(&mut self, message: &str) -> io::Result<()> {
        self.banner()?;
        writeln!(self.out, " {}", message)
    }

    /// Banner, a red `FAILURE` tag, then `message` verbatim.
    fn failure(&mut self, message: &str) -> io::Result<()> {
        self.banner()?;
        write!(self.out, " ")?;
        self.out.set_color(
            ColorSpec::new()
                .set_fg(Some(Color::White))
                .set_bg(Some(Color::Red)),
        )?;
        write!(self.out, "{}", FAILURE)?;
        self.out.reset()?;
        let sep = if message.starts_with(['.', ' ']) { "" } else { " " };
        writeln!(self.out, "{}{}", sep, message)
    }

    fn diff(&mut self, expected: &Path, output: &Path, diffs: &[Difference]) -> io::Result<()> {
        writeln!(self.out, "--- {}", expected.display())?;
        writeln!(self.out, "+++ {}", output.display())?;
        for diff in diffs {
            let (marker, text, color) = match diff {
                Difference::Same(x) => (' ', x, None),
                Difference::Add(x) => ('+', x, Some(Color::Green)),
                Difference::Rem(x) => ('-', x, Some(Color::Red)),
            };
            self.out.set_color(ColorSpec::new().set_fg(color))?;
            for line in text.split('\n') {
                writeln!(self.out, "{}{}", marker, line)?;
            }
            self.out.reset()?;
        }
        Ok(())
    }
}

/// `error: cause: cause...` on a single line.
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut text = error.to_string();
    let mut cause = error.source();
    while let Some(inner) = cause {
        text.push_str(&format!(": {}", inner));
        cause = inner.source();
    }
    text
}
