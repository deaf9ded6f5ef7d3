//! Cleanup command.

use std::path::PathBuf;

use super::Context;
use crate::cleanup;
use crate::model::DESTINATION_EXTENSION;

/// Remove tag-writer temp files from `dir` (default: destination directory)
pub fn cmd_cleanup(ctx: &Context, dir: Option<&PathBuf>) -> anyhow::Result<()> {
    let dir = dir
        .cloned()
        .unwrap_or_else(|| ctx.config.destination_dir(&ctx.base_dir));

    if !dir.is_dir() {
        println!("Nothing to clean: {} is not a directory.", dir.display());
        return Ok(());
    }

    let report = cleanup::sweep(&dir, DESTINATION_EXTENSION);
    for path in &report.removed {
        println!("Removed temp file: {}", path.display());
    }
    for (path, err) in &report.failed {
        eprintln!("Failed to remove {}: {}", path.display(), err);
    }

    println!(
        "Removed {} temp file(s), {} failed.",
        report.removed.len(),
        report.failed.len()
    );
    Ok(())
}
