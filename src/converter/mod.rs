//! Transcode-and-tag pipeline.
//!
//! Each FLAC file in the source directory goes through:
//! 1. locate: skip it if it vanished since the directory was listed
//! 2. transcode: run the encoder into the destination directory
//! 3. extract: artists from the source, title and genre from the result
//! 4. genre fix-up: rewrite hip-hop/rap spellings
//! 5. tag fix-up: featured-artist annotation on title or artist
//!
//! Files are processed one at a time; every tool call blocks until the
//! process exits. Progress is reported through [`ConvertEvent`]s.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

use crate::metadata::{self, DecodeStrategy};
use crate::model::{
    ArtistCredits, DestinationTrack, SOURCE_EXTENSION, SourceTrack, TagField, TagPlacement,
};
use crate::normalize::{self, TagValues};
use crate::tools::Toolchain;

/// Inputs of a conversion run.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub source_dir: PathBuf,
    pub destination_dir: PathBuf,
    pub placement: TagPlacement,
    pub decode: DecodeStrategy,
}

/// Progress notifications emitted while converting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertEvent {
    /// Source disappeared between listing and processing
    Missing(PathBuf),
    /// Encoder finished (successfully or not) for this source
    Converted {
        source: PathBuf,
        destination: PathBuf,
    },
    /// A tag was rewritten
    TagUpdated {
        destination: PathBuf,
        field: TagField,
    },
    /// The tag writer failed for a field
    TagWriteFailed {
        destination: PathBuf,
        field: TagField,
        error: String,
    },
    /// No artist credits in the source; artist/title left alone
    NoArtists(PathBuf),
    /// No title in the destination; artist/title left alone
    NoTitle(PathBuf),
}

/// Totals of a conversion run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversionReport {
    /// Source files found in the listing
    pub found: usize,
    /// Files run through the encoder
    pub converted: usize,
    /// Sources that vanished before processing
    pub missing: Vec<PathBuf>,
    /// Destinations whose artist/title could not be computed
    pub untagged: Vec<PathBuf>,
    pub genre_updates: usize,
    pub tag_writes: usize,
    pub write_failures: usize,
}

/// Everything the normalizer decided for one source/destination pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackPlan {
    pub artists: Vec<String>,
    pub title: Option<String>,
    pub genre: Option<String>,
    /// Genre to write, when it would change
    pub genre_fix: Option<&'static str>,
    pub tags: Option<TagValues>,
    /// Artist/title writes, in writer order
    pub writes: Vec<(TagField, String)>,
}

impl TrackPlan {
    /// Extract metadata and compute the tag changes, without writing.
    pub fn build(
        tools: &impl Toolchain,
        source: &Path,
        destination: &Path,
        placement: TagPlacement,
        decode: DecodeStrategy,
    ) -> Self {
        let credits = metadata::extract_artists(tools, source, decode);
        let title = metadata::extract_title(tools, destination, decode);
        let genre = metadata::extract_genre(tools, destination, decode);
        Self::from_metadata(credits, title, genre, placement)
    }

    /// Pure part of [`build`](Self::build).
    pub fn from_metadata(
        credits: ArtistCredits,
        title: Option<String>,
        genre: Option<String>,
        placement: TagPlacement,
    ) -> Self {
        let genre_fix = normalize::corrected_genre(genre.as_deref())
            .filter(|fixed| genre.as_deref() != Some(*fixed));
        let tags = normalize::compute_tags(&credits, title.as_deref(), placement);
        let writes = match (&tags, &title) {
            (Some(values), Some(original)) => normalize::planned_writes(values, original),
            _ => Vec::new(),
        };
        Self {
            artists: credits.as_slice().to_vec(),
            title,
            genre,
            genre_fix,
            tags,
            writes,
        }
    }
}

/// FLAC files directly inside `dir`, sorted by file name.
///
/// A missing or unreadable directory yields an empty list.
pub fn list_source_tracks(dir: &Path) -> Vec<SourceTrack> {
    if !dir.is_dir() {
        tracing::warn!("Source directory {:?} does not exist", dir);
        return Vec::new();
    }

    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|s| s.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(SOURCE_EXTENSION))
        })
        .map(|e| SourceTrack::new(e.into_path()))
        .collect()
}

/// Convert and tag every FLAC file in `options.source_dir`.
pub fn convert_library(
    tools: &impl Toolchain,
    options: &ConvertOptions,
    mut on_event: impl FnMut(&ConvertEvent),
) -> ConversionReport {
    let sources = list_source_tracks(&options.source_dir);
    let mut report = ConversionReport {
        found: sources.len(),
        ..Default::default()
    };

    if sources.is_empty() {
        tracing::info!("No source files found in {:?}", options.source_dir);
        return report;
    }

    if let Err(e) = fs::create_dir_all(&options.destination_dir) {
        tracing::warn!(
            "Failed to create destination directory {:?}: {}",
            options.destination_dir,
            e
        );
    }

    for source in &sources {
        convert_track(tools, options, source, &mut report, &mut on_event);
    }

    tracing::info!(
        "Converted {} of {} file(s), {} missing, {} untagged",
        report.converted,
        report.found,
        report.missing.len(),
        report.untagged.len()
    );
    report
}

fn convert_track(
    tools: &impl Toolchain,
    options: &ConvertOptions,
    source: &SourceTrack,
    report: &mut ConversionReport,
    on_event: &mut impl FnMut(&ConvertEvent),
) {
    if !source.path.exists() {
        tracing::warn!("Source {:?} vanished before conversion", source.path);
        report.missing.push(source.path.clone());
        on_event(&ConvertEvent::Missing(source.path.clone()));
        return;
    }

    let destination = source.destination_in(&options.destination_dir);

    // Encoder failures are not told apart from success: a failed encode
    // leaves nothing to tag and the extract steps find no fields.
    if let Err(e) = tools.transcode(&source.path, &destination.path) {
        tracing::warn!("Encoder reported a problem for {:?}: {}", source.path, e);
    }
    on_event(&ConvertEvent::Converted {
        source: source.path.clone(),
        destination: destination.path.clone(),
    });

    let plan = TrackPlan::build(
        tools,
        &source.path,
        &destination.path,
        options.placement,
        options.decode,
    );

    if let Some(genre) = plan.genre_fix
        && write_field(tools, &destination, TagField::Genre, genre, report, on_event)
    {
        report.genre_updates += 1;
    }

    if plan.tags.is_none() {
        report.untagged.push(destination.path.clone());
        if plan.artists.is_empty() {
            on_event(&ConvertEvent::NoArtists(source.path.clone()));
        } else {
            on_event(&ConvertEvent::NoTitle(destination.path.clone()));
        }
    }

    for (field, value) in &plan.writes {
        write_field(tools, &destination, *field, value, report, on_event);
    }

    report.converted += 1;
}

/// Returns whether the write succeeded.
fn write_field(
    tools: &impl Toolchain,
    destination: &DestinationTrack,
    field: TagField,
    value: &str,
    report: &mut ConversionReport,
    on_event: &mut impl FnMut(&ConvertEvent),
) -> bool {
    match tools.write_tag(&destination.path, field, value) {
        Ok(()) => {
            tracing::debug!("Wrote {:?} = {:?} to {:?}", field, value, destination.path);
            report.tag_writes += 1;
            on_event(&ConvertEvent::TagUpdated {
                destination: destination.path.clone(),
                field,
            });
            true
        }
        Err(e) => {
            tracing::warn!(
                "Failed to write {:?} to {:?}: {}",
                field,
                destination.path,
                e
            );
            report.write_failures += 1;
            on_event(&ConvertEvent::TagWriteFailed {
                destination: destination.path.clone(),
                field,
                error: e.to_string(),
            });
            false
        }
    }
}
