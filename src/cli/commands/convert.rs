//! Convert command: transcode the library and fix up tags.

use serde::Serialize;

use super::{ConvertArgs, Context, pause_if_interactive, resolve_placement};
use crate::cleanup::{self, CleanupReport};
use crate::converter::{self, ConversionReport, ConvertEvent, ConvertOptions};
use crate::model::{DESTINATION_EXTENSION, display_name};
use crate::tools::ExternalTools;

const RULE: &str = "====================";

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    placement: &'a str,
    conversion: &'a ConversionReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    cleanup: Option<&'a CleanupReport>,
}

/// Convert every FLAC file and tag the results
pub fn cmd_convert(ctx: &Context, args: &ConvertArgs) -> anyhow::Result<()> {
    let source_dir = args
        .source
        .clone()
        .unwrap_or_else(|| ctx.config.source_dir(&ctx.base_dir));
    let destination_dir = args
        .destination
        .clone()
        .unwrap_or_else(|| ctx.config.destination_dir(&ctx.base_dir));

    if !args.json {
        println!("--- alac-autotag: Convert FLAC to ALAC and automate tags for iTunes ---");
    }
    let placement = resolve_placement(args.placement, &ctx.config, args.json)?;

    let options = ConvertOptions {
        source_dir,
        destination_dir,
        placement,
        decode: ctx.config.decoding.strategy,
    };
    tracing::debug!("Convert options: {:?}", options);

    let tools = ExternalTools::new(ctx.config.tool_paths(&ctx.base_dir));
    let report = converter::convert_library(&tools, &options, |event| {
        if !args.json {
            println!("{}", describe_event(event));
        }
    });

    let cleanup = (ctx.config.cleanup.enabled && !args.no_cleanup)
        .then(|| cleanup::sweep(&options.destination_dir, DESTINATION_EXTENSION));

    if args.json {
        let json = JsonReport {
            placement: placement.as_str(),
            conversion: &report,
            cleanup: cleanup.as_ref(),
        };
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    println!("{}", summary(&report));
    if let Some(cleanup) = &cleanup {
        for path in &cleanup.removed {
            println!("Removed temp file: {}", path.display());
        }
        for (path, err) in &cleanup.failed {
            println!("Failed to remove temp file {}: {}", path.display(), err);
        }
    }

    if !args.no_pause {
        pause_if_interactive();
    }
    Ok(())
}

/// Console line(s) for one converter event.
fn describe_event(event: &ConvertEvent) -> String {
    match event {
        ConvertEvent::Missing(source) => format!("Failed: {} not found.", display_name(source)),
        ConvertEvent::Converted { source, .. } => {
            format!("{}\nConverted: {} to ALAC.", RULE, display_name(source))
        }
        ConvertEvent::TagUpdated { destination, field } => {
            format!("Updated {} tag for {}.", field.label(), display_name(destination))
        }
        ConvertEvent::TagWriteFailed {
            destination,
            field,
            error,
        } => format!(
            "Failed to update {} tag for {}: {}",
            field.label(),
            display_name(destination),
            error
        ),
        ConvertEvent::NoArtists(source) => {
            format!("No artists found for {}.", display_name(source))
        }
        ConvertEvent::NoTitle(destination) => {
            format!("No title found for {}.", display_name(destination))
        }
    }
}

fn summary(report: &ConversionReport) -> String {
    if report.found == 0 {
        return "No FLAC files found in the specified path.".to_string();
    }
    format!(
        "{}\nSuccessfully converted and tagged {} audio file(s).",
        RULE, report.converted
    )
}
