//! Command-line interface for alac-autotag.
//!
//! Running without a command converts the configured library, matching
//! the double-click behaviour of the portable build.

mod commands;
pub mod prompt;

pub use commands::{Cli, run_command};
