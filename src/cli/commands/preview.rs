//! Preview command: show planned tag writes for one converted file.

use std::path::Path;

use super::{Context, resolve_placement};
use crate::converter::TrackPlan;
use crate::error::Error;
use crate::model::TagPlacement;
use crate::tools::ExternalTools;

/// Print what a conversion would write to `destination`, without writing
pub fn cmd_preview(
    ctx: &Context,
    source: &Path,
    destination: &Path,
    placement: Option<TagPlacement>,
    json: bool,
) -> anyhow::Result<()> {
    for path in [source, destination] {
        if !path.is_file() {
            return Err(Error::not_found(path).context("preview").into());
        }
    }

    let placement = resolve_placement(placement, &ctx.config, json)?;
    let tools = ExternalTools::new(ctx.config.tool_paths(&ctx.base_dir));
    let plan = TrackPlan::build(
        &tools,
        source,
        destination,
        placement,
        ctx.config.decoding.strategy,
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    println!("Source:      {}", source.display());
    println!("Destination: {}", destination.display());
    println!("Artists:     {}", format_list(&plan.artists));
    println!("Title:       {}", plan.title.as_deref().unwrap_or("(none)"));
    println!("Genre:       {}", plan.genre.as_deref().unwrap_or("(none)"));
    println!();

    if plan.genre_fix.is_none() && plan.writes.is_empty() {
        println!("No tag changes.");
        return Ok(());
    }
    println!("Planned writes ({}):", placement);
    if let Some(genre) = plan.genre_fix {
        println!("  GENRE  -> {}", genre);
    }
    for (field, value) in &plan.writes {
        println!("  {:<6} -> {}", field.label(), value);
    }
    Ok(())
}

fn format_list(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(" | ")
    }
}
