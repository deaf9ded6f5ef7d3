//! alac-autotag - Convert FLAC to ALAC and fix up tags for iTunes.
//!
//! Transcodes every FLAC file in a source directory with qaac, then uses
//! metaflac and AtomicParsley to move featured-artist credits into the
//! title or artist tag and to normalize hip-hop genre spellings.

pub mod cleanup;
pub mod cli;
pub mod config;
pub mod converter;
pub mod error;
pub mod metadata;
pub mod model;
pub mod normalize;
#[cfg(test)]
pub mod test_utils;
pub mod tools;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Logs go to stderr so `--json` output stays parseable
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("alac_autotag=info".parse()?))
        .init();

    cli::run_command(&args)
}
