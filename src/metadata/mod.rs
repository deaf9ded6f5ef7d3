//! Metadata extraction from external tool output.
//!
//! Artists are read from the FLAC source (one `ARTIST=` line per credit);
//! title and genre are read from the transcoded M4A, where the inspector
//! lists atoms as `Atom "©nam" contains: <value>`.
//!
//! Extraction fails soft: when a tool cannot run or exits non-zero the
//! failure is logged and the field is reported as missing.

pub mod decode;

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::Result;
use crate::model::ArtistCredits;
use crate::tools::Toolchain;

pub use decode::DecodeStrategy;

/// Title atom.
pub const TITLE_ATOM: &str = "\u{a9}nam";

/// Free-text genre atom.
pub const GENRE_ATOM: &str = "\u{a9}gen";

/// Standard (ID3v1 list) genre atom, used when no free-text genre is set.
pub const STANDARD_GENRE_ATOM: &str = "gnre";

static ARTIST_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(?i:ARTIST)=(.*)$").expect("valid artist pattern"));

/// Artist credits from a tag reader listing, in order of appearance.
pub fn parse_artists(text: &str) -> Vec<String> {
    ARTIST_LINE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim_end_matches('\r').to_string())
        .collect()
}

/// Value of `atom` from an inspector listing, if present.
///
/// A leading `©` also matches any other non-ASCII character, which is what
/// the byte 0xA9 turns into when the listing was decoded with the wrong
/// code page.
pub fn parse_atom(text: &str, atom: &str) -> Option<String> {
    let name = match atom.strip_prefix('\u{a9}') {
        Some(rest) => format!(r"[^\x00-\x7F]{}", regex::escape(rest)),
        None => regex::escape(atom),
    };
    let pattern = format!(r#"Atom "{}" contains: (.*)"#, name);
    let re = Regex::new(&pattern).ok()?;
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim_end_matches('\r').to_string())
}

/// Read the artist credits of `source`.
pub fn extract_artists(
    tools: &impl Toolchain,
    source: &Path,
    strategy: DecodeStrategy,
) -> ArtistCredits {
    match read_artist_listing(tools, source, strategy) {
        Ok(text) => ArtistCredits::new(parse_artists(&text)),
        Err(e) => {
            tracing::warn!("Failed to retrieve artists from {:?}: {}", source, e);
            ArtistCredits::default()
        }
    }
}

/// Read the title of `destination`.
pub fn extract_title(
    tools: &impl Toolchain,
    destination: &Path,
    strategy: DecodeStrategy,
) -> Option<String> {
    match read_atom_listing(tools, destination, strategy) {
        Ok(text) => parse_atom(&text, TITLE_ATOM),
        Err(e) => {
            tracing::warn!("Failed to retrieve title from {:?}: {}", destination, e);
            None
        }
    }
}

/// Read the genre of `destination`, preferring the free-text atom.
pub fn extract_genre(
    tools: &impl Toolchain,
    destination: &Path,
    strategy: DecodeStrategy,
) -> Option<String> {
    match read_atom_listing(tools, destination, strategy) {
        Ok(text) => {
            parse_atom(&text, GENRE_ATOM).or_else(|| parse_atom(&text, STANDARD_GENRE_ATOM))
        }
        Err(e) => {
            tracing::warn!("Failed to retrieve genre from {:?}: {}", destination, e);
            None
        }
    }
}

fn read_artist_listing(
    tools: &impl Toolchain,
    source: &Path,
    strategy: DecodeStrategy,
) -> Result<String> {
    let raw = tools.read_artists(source)?;
    Ok(decode::decode(&raw, strategy).into_owned())
}

fn read_atom_listing(
    tools: &impl Toolchain,
    destination: &Path,
    strategy: DecodeStrategy,
) -> Result<String> {
    let raw = tools.inspect(destination)?;
    Ok(decode::decode(&raw, strategy).into_owned())
}
