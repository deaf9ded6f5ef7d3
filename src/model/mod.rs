//! Core data types shared by the extractor, normalizer and converter.
//!
//! - [`SourceTrack`] / [`DestinationTrack`]: the FLAC input and the ALAC output
//! - [`ArtistCredits`]: ordered artist credits read from the source
//! - [`TagPlacement`]: where featured artists are written
//! - [`TagField`]: the fields the tag writer can overwrite

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Extension of source files picked up by the converter.
pub const SOURCE_EXTENSION: &str = "flac";

/// Extension of files produced by the encoder.
pub const DESTINATION_EXTENSION: &str = "m4a";

/// A lossless source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTrack {
    pub path: PathBuf,
}

impl SourceTrack {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Base filename without extension.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// The transcoded counterpart inside `destination_dir`.
    pub fn destination_in(&self, destination_dir: &Path) -> DestinationTrack {
        DestinationTrack {
            path: destination_dir.join(format!("{}.{}", self.stem(), DESTINATION_EXTENSION)),
        }
    }
}

/// A transcoded output file, tagged in place after encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationTrack {
    pub path: PathBuf,
}

/// File name of `path` for progress output, or the whole path when it has
/// no final component.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Artist credits in the order the source lists them.
///
/// The first credit is the primary artist; every later credit is featured.
/// An empty list means no artist was found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtistCredits(Vec<String>);

impl ArtistCredits {
    pub fn new(credits: Vec<String>) -> Self {
        Self(credits)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn primary(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Every credit after the primary one.
    pub fn featured(&self) -> &[String] {
        self.0.get(1..).unwrap_or(&[])
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for ArtistCredits {
    fn from(credits: Vec<String>) -> Self {
        Self(credits)
    }
}

impl<'a> From<&[&'a str]> for ArtistCredits {
    fn from(credits: &[&'a str]) -> Self {
        Self(credits.iter().map(|s| s.to_string()).collect())
    }
}

/// Which tag receives the featured-artist annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TagPlacement {
    /// `Main (feat. Guest)` in the artist tag
    Artist,
    /// `Song (feat. Guest)` in the title tag, as iTunes does
    Title,
}

impl TagPlacement {
    pub fn as_str(&self) -> &'static str {
        match self {
            TagPlacement::Artist => "artist",
            TagPlacement::Title => "title",
        }
    }
}

impl fmt::Display for TagPlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TagPlacement {
    type Err = Error;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "artist" => Ok(TagPlacement::Artist),
            "title" => Ok(TagPlacement::Title),
            _ => Err(Error::invalid_placement(s.trim())),
        }
    }
}

/// A field the tag writer can overwrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TagField {
    Title,
    Artist,
    Genre,
}

impl TagField {
    /// Command-line flag understood by the tag writer.
    pub fn writer_flag(&self) -> &'static str {
        match self {
            TagField::Title => "--title",
            TagField::Artist => "--artist",
            TagField::Genre => "--genre",
        }
    }

    /// Upper-case label for progress output.
    pub fn label(&self) -> &'static str {
        match self {
            TagField::Title => "TITLE",
            TagField::Artist => "ARTIST",
            TagField::Genre => "GENRE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_uses_source_stem() {
        let source = SourceTrack::new("/music/FLAC/01 - Intro.flac");
        let dest = source.destination_in(Path::new("/music/ALAC"));
        assert_eq!(dest.path, PathBuf::from("/music/ALAC/01 - Intro.m4a"));
        assert_eq!(display_name(&dest.path), "01 - Intro.m4a");
    }

    #[test]
    fn test_stem_keeps_inner_dots() {
        let source = SourceTrack::new("/in/Mr. Brightside.flac");
        assert_eq!(source.stem(), "Mr. Brightside");
        assert_eq!(display_name(&source.path), "Mr. Brightside.flac");
    }

    #[test]
    fn test_display_name_without_file_component() {
        assert_eq!(display_name(Path::new("/")), "/");
    }

    #[test]
    fn test_credits_primary_and_featured() {
        let credits = ArtistCredits::from(&["A", "B", "C"][..]);
        assert_eq!(credits.primary(), Some("A"));
        assert_eq!(credits.featured(), &["B".to_string(), "C".to_string()]);
        assert_eq!(credits.len(), 3);
    }

    #[test]
    fn test_empty_credits() {
        let credits = ArtistCredits::default();
        assert!(credits.is_empty());
        assert_eq!(credits.primary(), None);
        assert!(credits.featured().is_empty());
    }

    #[test]
    fn test_placement_parse_is_case_insensitive() {
        assert_eq!("Title".parse::<TagPlacement>().unwrap(), TagPlacement::Title);
        assert_eq!(" ARTIST \n".parse::<TagPlacement>().unwrap(), TagPlacement::Artist);
    }

    #[test]
    fn test_placement_rejects_unknown() {
        assert!(matches!(
            "album".parse::<TagPlacement>(),
            Err(Error::InvalidPlacement(v)) if v == "album"
        ));
        assert!("".parse::<TagPlacement>().is_err());
    }

    #[test]
    fn test_placement_display_roundtrip() {
        for placement in [TagPlacement::Artist, TagPlacement::Title] {
            assert_eq!(placement.to_string().parse::<TagPlacement>().unwrap(), placement);
        }
    }

    #[test]
    fn test_writer_flags() {
        assert_eq!(TagField::Title.writer_flag(), "--title");
        assert_eq!(TagField::Artist.writer_flag(), "--artist");
        assert_eq!(TagField::Genre.writer_flag(), "--genre");
    }
}
