//! Defines the command-line arguments for the MiniSciATH CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::runner::RunConfig;
use crate::suite::Selection;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "minisciath",
    version,
    about = "MiniSciATH, a minimal regression testing system."
)]
pub struct Args {
    /// Name of input file defining tests.
    #[arg(required = true)]
    pub input_filename: PathBuf,

    /// Comma-separated names of tests to run.
    #[arg(short = 't', long)]
    pub test_subset: Option<String>,

    /// Update expected output of all tests that are run.
    #[arg(short, long)]
    pub update: bool,

    /// Exclude tests outside of a given group.
    #[arg(long, value_name = "GROUP")]
    pub only_group: Option<String>,

    /// Exclude tests from a given group.
    #[arg(long, value_name = "GROUP")]
    pub exclude_group: Option<String>,

    /// Directory receiving `<name>.output` files.
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// When to colorize output.
    #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// Print the parsed input file and exit without running anything.
    #[arg(long)]
    pub dump: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

impl Args {
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            update: self.update,
            output_dir: self.output_dir.clone(),
        }
    }

    pub fn selection(&self) -> Selection {
        Selection {
            subset: self.test_subset.as_deref().map(Selection::parse_subset),
            only_group: self.only_group.clone(),
            exclude_group: self.exclude_group.clone(),
        }
    }
}
