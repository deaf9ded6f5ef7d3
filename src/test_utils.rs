//! Test utilities and fixtures for alac-autotag tests.
//!
//! [`MockToolchain`] stands in for the external programs: it records every
//! call and replays canned reader/inspector output, so converter and
//! extractor tests never spawn a process.
//!
//! # Example
//!
//! ```ignore
//! let tools = MockToolchain::new()
//!     .with_artist_output("ARTIST=A\nARTIST=B\n")
//!     .with_atom_output(&atom_listing(&[(TITLE_ATOM, "Song")]));
//! let report = convert_library(&tools, &options, |_| {});
//! assert_eq!(tools.writes().len(), 2);
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::model::TagField;
use crate::tools::{ToolError, ToolKind, Toolchain};

/// A recorded tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    Transcode(PathBuf, PathBuf),
    ReadArtists(PathBuf),
    Inspect(PathBuf),
    WriteTag(PathBuf, TagField, String),
}

/// Recording [`Toolchain`] with canned outputs.
///
/// Outputs can be set for every file or per file name; per-file entries win.
/// Unconfigured calls succeed with empty output.
#[derive(Debug, Default)]
pub struct MockToolchain {
    calls: RefCell<Vec<ToolCall>>,
    artist_output: Vec<u8>,
    artist_by_name: HashMap<String, Vec<u8>>,
    atom_output: Vec<u8>,
    atom_by_name: HashMap<String, Vec<u8>>,
    fail_encoder: bool,
    fail_reader: bool,
    fail_inspector: bool,
    fail_writer: bool,
}

impl MockToolchain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_artist_output(self, text: &str) -> Self {
        self.with_artist_bytes(text.as_bytes().to_vec())
    }

    pub fn with_artist_bytes(mut self, bytes: Vec<u8>) -> Self {
        self.artist_output = bytes;
        self
    }

    pub fn with_artists_for(mut self, file_name: &str, text: &str) -> Self {
        self.artist_by_name
            .insert(file_name.to_string(), text.as_bytes().to_vec());
        self
    }

    pub fn with_atom_output(self, text: &str) -> Self {
        self.with_atom_bytes(text.as_bytes().to_vec())
    }

    pub fn with_atom_bytes(mut self, bytes: Vec<u8>) -> Self {
        self.atom_output = bytes;
        self
    }

    pub fn with_atoms_for(mut self, file_name: &str, text: &str) -> Self {
        self.atom_by_name
            .insert(file_name.to_string(), text.as_bytes().to_vec());
        self
    }

    pub fn failing_encoder(mut self) -> Self {
        self.fail_encoder = true;
        self
    }

    pub fn failing_reader(mut self) -> Self {
        self.fail_reader = true;
        self
    }

    pub fn failing_inspector(mut self) -> Self {
        self.fail_inspector = true;
        self
    }

    pub fn failing_writer(mut self) -> Self {
        self.fail_writer = true;
        self
    }

    /// Every call so far, in order.
    pub fn calls(&self) -> Vec<ToolCall> {
        self.calls.borrow().clone()
    }

    /// Number of inspector runs.
    pub fn inspect_calls(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, ToolCall::Inspect(_)))
            .count()
    }

    /// Every tag write, in order.
    pub fn writes(&self) -> Vec<(PathBuf, TagField, String)> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                ToolCall::WriteTag(path, field, value) => {
                    Some((path.clone(), *field, value.clone()))
                }
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: ToolCall) {
        self.calls.borrow_mut().push(call);
    }

    fn output_for(by_name: &HashMap<String, Vec<u8>>, fallback: &[u8], path: &Path) -> Vec<u8> {
        path.file_name()
            .and_then(|n| by_name.get(&*n.to_string_lossy()))
            .cloned()
            .unwrap_or_else(|| fallback.to_vec())
    }

    fn failure(tool: ToolKind) -> ToolError {
        ToolError::Failed {
            tool,
            status: Some(1),
            stderr: "mock failure".to_string(),
        }
    }
}

impl Toolchain for MockToolchain {
    fn transcode(&self, source: &Path, destination: &Path) -> Result<(), ToolError> {
        self.record(ToolCall::Transcode(
            source.to_path_buf(),
            destination.to_path_buf(),
        ));
        if self.fail_encoder {
            return Err(Self::failure(ToolKind::Encoder));
        }
        // Leave an output file behind like the real encoder
        let _ = std::fs::write(destination, b"");
        Ok(())
    }

    fn read_artists(&self, source: &Path) -> Result<Vec<u8>, ToolError> {
        self.record(ToolCall::ReadArtists(source.to_path_buf()));
        if self.fail_reader {
            return Err(Self::failure(ToolKind::TagReader));
        }
        Ok(Self::output_for(
            &self.artist_by_name,
            &self.artist_output,
            source,
        ))
    }

    fn inspect(&self, destination: &Path) -> Result<Vec<u8>, ToolError> {
        self.record(ToolCall::Inspect(destination.to_path_buf()));
        if self.fail_inspector {
            return Err(Self::failure(ToolKind::TagInspector));
        }
        Ok(Self::output_for(
            &self.atom_by_name,
            &self.atom_output,
            destination,
        ))
    }

    fn write_tag(
        &self,
        destination: &Path,
        field: TagField,
        value: &str,
    ) -> Result<(), ToolError> {
        self.record(ToolCall::WriteTag(
            destination.to_path_buf(),
            field,
            value.to_string(),
        ));
        if self.fail_writer {
            return Err(Self::failure(ToolKind::TagWriter));
        }
        Ok(())
    }
}

/// Inspector output listing `(atom, value)` pairs.
pub fn atom_listing(atoms: &[(&str, &str)]) -> String {
    atoms
        .iter()
        .map(|(atom, value)| format!("Atom \"{}\" contains: {}\n", atom, value))
        .collect()
}

/// A temp directory holding empty files named `names`.
///
/// Keep the returned `TempDir` alive for the duration of the test.
pub fn source_library(names: &[&str]) -> (TempDir, Vec<PathBuf>) {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let paths = names
        .iter()
        .map(|name| {
            let path = dir.path().join(name);
            std::fs::write(&path, b"fLaC").expect("Failed to create fixture file");
            path
        })
        .collect();
    (dir, paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_records_calls() {
        let tools = MockToolchain::new().with_artist_output("ARTIST=A\n");
        let out = tools.read_artists(Path::new("/in/a.flac")).unwrap();
        assert_eq!(out, b"ARTIST=A\n");
        assert_eq!(
            tools.calls(),
            vec![ToolCall::ReadArtists(PathBuf::from("/in/a.flac"))]
        );
    }

    #[test]
    fn test_per_file_output_wins() {
        let tools = MockToolchain::new()
            .with_artist_output("ARTIST=Default\n")
            .with_artists_for("b.flac", "ARTIST=B\n");
        assert_eq!(tools.read_artists(Path::new("a.flac")).unwrap(), b"ARTIST=Default\n");
        assert_eq!(tools.read_artists(Path::new("/x/b.flac")).unwrap(), b"ARTIST=B\n");
    }

    #[test]
    fn test_failing_writer_still_records() {
        let tools = MockToolchain::new().failing_writer();
        assert!(tools.write_tag(Path::new("a.m4a"), TagField::Genre, "Pop").is_err());
        assert_eq!(tools.writes().len(), 1);
    }

    #[test]
    fn test_atom_listing_format() {
        assert_eq!(
            atom_listing(&[("\u{a9}nam", "Song")]),
            "Atom \"\u{a9}nam\" contains: Song\n"
        );
    }

    #[test]
    fn test_source_library_creates_files() {
        let (dir, paths) = source_library(&["a.flac", "b.flac"]);
        assert_eq!(paths.len(), 2);
        assert!(paths.iter().all(|p| p.starts_with(dir.path()) && p.exists()));
    }
}
