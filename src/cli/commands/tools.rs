//! Setup commands: external tool check and config file creation.

use super::Context;
use crate::config::{self, Config, ConfigError};
use crate::model::TagPlacement;
use crate::tools::{ExternalTools, ToolKind};

/// Report which external tools can be started
pub fn cmd_check_tools(ctx: &Context) -> anyhow::Result<()> {
    let tools = ExternalTools::new(ctx.config.tool_paths(&ctx.base_dir));

    println!("External tools");
    println!("==============");
    let mut missing = 0;
    for kind in ToolKind::ALL {
        let path = tools.paths().get(kind);
        match tools.probe(kind) {
            Some(version) => println!(
                "  ✓ {:<28} {} ({})",
                kind.to_string(),
                path.display(),
                version
            ),
            None => {
                missing += 1;
                println!("  ✗ {:<28} {} not found", kind.to_string(), path.display());
            }
        }
    }

    if missing > 0 {
        println!();
        println!("{} of {} tools unavailable.", missing, ToolKind::ALL.len());
        println!("Place the missing programs next to the executable, add them to PATH,");
        println!("or set their paths in the [tools] section of the config file.");
    } else {
        println!();
        println!("All tools available.");
    }
    Ok(())
}

/// Write a default config file
pub fn cmd_init_config(
    ctx: &Context,
    placement: Option<TagPlacement>,
    force: bool,
) -> anyhow::Result<()> {
    let path = match &ctx.config_override {
        Some(path) => path.clone(),
        None => config::config_path().ok_or(ConfigError::NoConfigDir)?,
    };
    if path.exists() && !force {
        return Err(ConfigError::Exists(path).into());
    }

    let mut config = Config::default();
    config.preferences.featured_artists = placement.map(|p| p.as_str().to_string());
    config::save(&config, &path)?;

    println!("Wrote {}", path.display());
    Ok(())
}
