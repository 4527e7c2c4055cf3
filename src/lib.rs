pub use crate::errors::{ParseError, SuiteError};
pub use crate::syntax::{parse_file, parse_str, Node};

pub mod cli;
pub mod errors;
pub mod runner;
pub mod suite;
pub mod syntax;
