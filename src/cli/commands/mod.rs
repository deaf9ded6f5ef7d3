//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `convert`: transcode and tag the library (default)
//! - `cleanup`: remove stray tag-writer temp files
//! - `preview`: show the tag changes for one file pair
//! - `tools`: tool availability check and config file creation

mod cleanup;
mod convert;
mod preview;
mod tools;

use clap::{Args, Parser, Subcommand};
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

use crate::config::{self, Config};
use crate::model::TagPlacement;

pub use cleanup::cmd_cleanup;
pub use convert::cmd_convert;
pub use preview::cmd_preview;
pub use tools::{cmd_check_tools, cmd_init_config};

/// Convert FLAC to ALAC and fix up tags for iTunes
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: config.toml next to the executable, then the
    /// user config directory)
    #[arg(short, long, global = true, env = "ALAC_AUTOTAG_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Convert every FLAC file and tag the results (default)
    Convert(ConvertArgs),
    /// Remove temp files left behind by interrupted tag writes
    Cleanup {
        /// Directory to sweep (default: the destination directory)
        dir: Option<PathBuf>,
    },
    /// Show the tag writes for an existing FLAC/M4A pair without writing
    Preview {
        /// FLAC source file
        source: PathBuf,
        /// Transcoded M4A file
        destination: PathBuf,
        /// Where featured artists go
        #[arg(short, long, value_enum)]
        placement: Option<TagPlacement>,
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check that the external tools can be started
    CheckTools,
    /// Write a config file with default values
    InitConfig {
        /// Featured-artist placement to store
        #[arg(short, long, value_enum)]
        placement: Option<TagPlacement>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Options of the convert command
#[derive(Args, Debug, Clone, Default)]
pub struct ConvertArgs {
    /// Directory holding FLAC files
    #[arg(short, long)]
    pub source: Option<PathBuf>,
    /// Directory receiving ALAC files
    #[arg(short, long)]
    pub destination: Option<PathBuf>,
    /// Where featured artists go (asked interactively when unset)
    #[arg(short, long, value_enum)]
    pub placement: Option<TagPlacement>,
    /// Print the report as JSON instead of progress lines
    #[arg(long)]
    pub json: bool,
    /// Don't wait for Enter before exiting
    #[arg(long)]
    pub no_pause: bool,
    /// Skip the temp file sweep
    #[arg(long)]
    pub no_cleanup: bool,
}

/// Loaded configuration plus the directory relative paths resolve against.
pub struct Context {
    pub base_dir: PathBuf,
    pub config: Config,
    pub config_override: Option<PathBuf>,
}

impl Context {
    fn load(cli: &Cli) -> Self {
        let base_dir = config::base_dir();
        let config = config::load(cli.config.as_deref(), &base_dir);
        Self {
            base_dir,
            config,
            config_override: cli.config.clone(),
        }
    }
}

/// Run the specified CLI command, defaulting to `convert`.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let ctx = Context::load(cli);

    match &cli.command {
        None => cmd_convert(&ctx, &ConvertArgs::default()),
        Some(Commands::Convert(args)) => cmd_convert(&ctx, args),
        Some(Commands::Cleanup { dir }) => cmd_cleanup(&ctx, dir.as_ref()),
        Some(Commands::Preview {
            source,
            destination,
            placement,
            json,
        }) => cmd_preview(&ctx, source, destination, *placement, *json),
        Some(Commands::CheckTools) => cmd_check_tools(&ctx),
        Some(Commands::InitConfig { placement, force }) => {
            cmd_init_config(&ctx, *placement, *force)
        }
    }
}

// ============================================================================
// Shared helper functions
// ============================================================================

/// Placement from the flag, then the config, then an interactive prompt.
///
/// With `json` set the prompt goes to stderr so stdout stays parseable.
pub(crate) fn resolve_placement(
    flag: Option<TagPlacement>,
    config: &Config,
    json: bool,
) -> io::Result<TagPlacement> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    if json {
        resolve_placement_from(flag, config, &mut input, &mut io::stderr())
    } else {
        resolve_placement_from(flag, config, &mut input, &mut io::stdout())
    }
}

fn resolve_placement_from<R: BufRead, W: Write>(
    flag: Option<TagPlacement>,
    config: &Config,
    input: &mut R,
    output: &mut W,
) -> io::Result<TagPlacement> {
    match flag.or_else(|| config.placement()) {
        Some(placement) => Ok(placement),
        None => crate::cli::prompt::prompt_placement(input, output),
    }
}

/// Hold the console window open when started by double-click.
pub(crate) fn pause_if_interactive() {
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        return;
    }
    let mut input = stdin.lock();
    if let Err(e) = crate::cli::prompt::wait_for_enter(&mut input, &mut io::stdout()) {
        tracing::debug!("Exit prompt failed: {}", e);
    }
}
