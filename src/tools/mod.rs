//! The external tool boundary.
//!
//! Conversion and tagging are done entirely by shelling out:
//! - encoder (`qaac`): FLAC -> ALAC
//! - tag reader (`metaflac`): Vorbis comments of the source
//! - tag inspector / writer (`AtomicParsley`): atoms of the destination
//!
//! [`Toolchain`] is the seam between the converter and those processes.
//! Production code uses [`ExternalTools`]; tests substitute the recording
//! mock from `test_utils`.

mod process;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::model::TagField;

pub use process::ExternalTools;

/// The four roles an external program plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Encoder,
    TagReader,
    TagInspector,
    TagWriter,
}

impl ToolKind {
    pub const ALL: [ToolKind; 4] = [
        ToolKind::Encoder,
        ToolKind::TagReader,
        ToolKind::TagInspector,
        ToolKind::TagWriter,
    ];

    /// Program file name used when none is configured.
    #[cfg(windows)]
    pub fn default_program(&self) -> &'static str {
        match self {
            ToolKind::Encoder => "qaac64.exe",
            ToolKind::TagReader => "metaflac.exe",
            ToolKind::TagInspector | ToolKind::TagWriter => "AtomicParsley.exe",
        }
    }

    /// Program file name used when none is configured.
    #[cfg(not(windows))]
    pub fn default_program(&self) -> &'static str {
        match self {
            ToolKind::Encoder => "qaac",
            ToolKind::TagReader => "metaflac",
            ToolKind::TagInspector | ToolKind::TagWriter => "AtomicParsley",
        }
    }

    /// Argument that makes the tool print its version and exit.
    pub fn version_arg(&self) -> &'static str {
        match self {
            ToolKind::Encoder => "--check",
            ToolKind::TagReader | ToolKind::TagInspector | ToolKind::TagWriter => "--version",
        }
    }

    fn role(&self) -> &'static str {
        match self {
            ToolKind::Encoder => "encoder",
            ToolKind::TagReader => "tag reader",
            ToolKind::TagInspector => "tag inspector",
            ToolKind::TagWriter => "tag writer",
        }
    }

    fn short_name(&self) -> &'static str {
        match self {
            ToolKind::Encoder => "qaac",
            ToolKind::TagReader => "metaflac",
            ToolKind::TagInspector | ToolKind::TagWriter => "AtomicParsley",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.role(), self.short_name())
    }
}

/// Resolved program paths for every tool role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub encoder: PathBuf,
    pub tag_reader: PathBuf,
    pub tag_inspector: PathBuf,
    pub tag_writer: PathBuf,
}

impl ToolPaths {
    pub fn get(&self, kind: ToolKind) -> &Path {
        match kind {
            ToolKind::Encoder => &self.encoder,
            ToolKind::TagReader => &self.tag_reader,
            ToolKind::TagInspector => &self.tag_inspector,
            ToolKind::TagWriter => &self.tag_writer,
        }
    }

    /// Default programs: next to `base_dir` when present there, otherwise
    /// the bare name so the OS resolves it through `PATH`.
    pub fn defaults_in(base_dir: &Path) -> Self {
        let pick = |kind: ToolKind| {
            let beside = base_dir.join(kind.default_program());
            if beside.is_file() {
                beside
            } else {
                PathBuf::from(kind.default_program())
            }
        };
        Self {
            encoder: pick(ToolKind::Encoder),
            tag_reader: pick(ToolKind::TagReader),
            tag_inspector: pick(ToolKind::TagInspector),
            tag_writer: pick(ToolKind::TagWriter),
        }
    }
}

/// Failure to run an external tool.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("failed to start {tool}: {source}")]
    Spawn {
        tool: ToolKind,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with {}: {stderr}", exit_label(.status))]
    Failed {
        tool: ToolKind,
        status: Option<i32>,
        stderr: String,
    },
}

fn exit_label(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("status {}", code),
        None => "no status (terminated by signal)".to_string(),
    }
}

/// The operations the converter needs from the outside world.
///
/// Outputs are returned as raw bytes; decoding is the extractor's job
/// because the tools do not agree on a charset.
pub trait Toolchain {
    /// Encode `source` into `destination`.
    fn transcode(&self, source: &Path, destination: &Path) -> Result<(), ToolError>;

    /// Raw `ARTIST=` listing of the source.
    fn read_artists(&self, source: &Path) -> Result<Vec<u8>, ToolError>;

    /// Raw atom listing of the destination.
    fn inspect(&self, destination: &Path) -> Result<Vec<u8>, ToolError>;

    /// Overwrite a single field of the destination in place.
    fn write_tag(&self, destination: &Path, field: TagField, value: &str)
    -> Result<(), ToolError>;
}
