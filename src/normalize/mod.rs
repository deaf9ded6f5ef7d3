//! Tag normalization rules.
//!
//! Two rules decide what gets written back to the destination:
//! - genre: every common spelling of hip-hop/rap becomes `Hip-Hop/Rap`
//! - featured artists: `A, B & C` appended as `(feat. ...)` to either the
//!   title or the artist, depending on [`TagPlacement`]
//!
//! Everything here is pure; the converter decides when to call the writer.

use serde::Serialize;

use crate::model::{ArtistCredits, TagField, TagPlacement};

/// Canonical genre label for all recognized hip-hop/rap spellings.
pub const CANONICAL_HIP_HOP: &str = "Hip-Hop/Rap";

/// Spellings that are rewritten to [`CANONICAL_HIP_HOP`].
pub const HIP_HOP_VARIANTS: &[&str] = &[
    "Rap",
    "Hip Hop",
    "Hip-Hop",
    "Rap/Hip Hop",
    "Rap/Hip-Hop",
    "Hip Hop/Rap",
];

/// The canonical genre for `genre`, or `None` when it should stay as is.
///
/// Matching is case-sensitive and anchored at the start of the genre, so
/// `"Rap Metal"` is rewritten too while `"Trap"` is not.
pub fn corrected_genre(genre: Option<&str>) -> Option<&'static str> {
    let genre = genre?;
    HIP_HOP_VARIANTS
        .iter()
        .any(|variant| genre.starts_with(variant))
        .then_some(CANONICAL_HIP_HOP)
}

/// `"B"`, `"B & C"`, `"B, C & D"`, ...
///
/// Callers pass at least one credit; an empty slice yields an empty string.
pub fn build_featured_artists(featured: &[String]) -> String {
    match featured {
        [] => String::new(),
        [only] => only.clone(),
        [rest @ .., last] => format!("{} & {}", rest.join(", "), last),
    }
}

/// Final artist and title values for a destination track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagValues {
    pub artist: String,
    pub title: String,
}

/// Compute the artist/title tags for `credits` and `title`.
///
/// Returns `None` when there is nothing to tag with: no credits or no title.
pub fn compute_tags(
    credits: &ArtistCredits,
    title: Option<&str>,
    placement: TagPlacement,
) -> Option<TagValues> {
    let primary = credits.primary()?;
    let title = title?;

    if credits.len() == 1 {
        return Some(TagValues {
            artist: primary.to_string(),
            title: title.to_string(),
        });
    }

    let featured = build_featured_artists(credits.featured());
    let values = match placement {
        TagPlacement::Title => TagValues {
            artist: primary.to_string(),
            title: format!("{} (feat. {})", title, featured),
        },
        TagPlacement::Artist => TagValues {
            artist: format!("{} (feat. {})", primary, featured),
            title: title.to_string(),
        },
    };
    Some(values)
}

/// Writer calls needed to apply `values` to a file whose title is
/// `original_title`.
///
/// The title is only written when it changed. The artist is always written:
/// the encoder copies every source credit into the artist atom, so even a
/// plain primary artist differs from what the file holds.
pub fn planned_writes(values: &TagValues, original_title: &str) -> Vec<(TagField, String)> {
    let mut writes = Vec::with_capacity(2);
    if values.title != original_title {
        writes.push((TagField::Title, values.title.clone()));
    }
    writes.push((TagField::Artist, values.artist.clone()));
    writes
}
