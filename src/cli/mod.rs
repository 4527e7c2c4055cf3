//! The MiniSciATH Command-Line Interface.
//!
//! Loads the suite, runs the selected tests in order and reports. Exit codes:
//! `0` all good, `1` a test failed or lacks its expected file, `2` the suite
//! could not be loaded or the selection is invalid.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use termcolor::{ColorChoice, StandardStream, WriteColor};
use tracing::debug;

use crate::cli::args::{Args, ColorMode};
use crate::cli::output::{Reporter, Summary};
use crate::errors::{print_error, SuiteError};
use crate::runner::run_test;
use crate::suite::load_suite;
use crate::syntax;

pub mod args;
pub mod output;

const EXIT_FAILURE: u8 = 1;
const EXIT_ERROR: u8 = 2;

/// The main entry point for the CLI.
pub fn run() -> ExitCode {
    let args = Args::parse();
    let program = std::env::args()
        .next()
        .unwrap_or_else(|| "minisciath".to_string());

    let mut stdout = StandardStream::stdout(color_choice(args.color));
    let result = if args.dump {
        dump(&args, &mut stdout)
    } else {
        run_suite(&args, &program, &mut stdout)
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(EXIT_FAILURE),
        Err(e) => {
            print_error(e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Runs every selected test. Returns whether all of them passed.
pub fn run_suite<W: WriteColor>(
    args: &Args,
    program: &str,
    out: &mut W,
) -> Result<bool, SuiteError> {
    let suite = load_suite(&args.input_filename)?;
    let selection = args.selection();
    let active = suite.select(&selection)?;
    let config = args.run_config();
    debug!(total = suite.tests.len(), active = active.len(), update = config.update, "starting run");

    let mut reporter = Reporter::new(out);
    let mut summary = Summary::new(suite.tests.len(), active.len(), config.update);
    for test in active {
        reporter.running(test).map_err(report_io)?;
        let run = run_test(test, &config);
        reporter.outcome(&run).map_err(report_io)?;
        summary.record(&run);
    }
    reporter
        .summary(&summary, &selection, program, &args.input_filename)
        .map_err(report_io)?;
    Ok(summary.is_success())
}

/// Prints the parsed document in block style.
fn dump<W: WriteColor>(args: &Args, out: &mut W) -> Result<bool, SuiteError> {
    let doc = syntax::parse_file(&args.input_filename)?;
    write!(out, "{}", doc).map_err(report_io)?;
    Ok(true)
}

fn report_io(e: io::Error) -> SuiteError {
    SuiteError::io("<stdout>", e)
}

fn color_choice(mode: ColorMode) -> ColorChoice {
    match mode {
        ColorMode::Always => ColorChoice::Always,
        ColorMode::Never => ColorChoice::Never,
        ColorMode::Auto if atty::is(atty::Stream::Stdout) => ColorChoice::Auto,
        ColorMode::Auto => ColorChoice::Never,
    }
}
