//! Process-backed [`Toolchain`] implementation.
//!
//! Every call blocks until the child exits. stdout is captured for the
//! reader and inspector; stderr is always captured and only surfaces in
//! debug logs and error values.

use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use super::{ToolError, ToolKind, ToolPaths, Toolchain};
use crate::model::TagField;

/// Runs the configured external programs.
#[derive(Debug, Clone)]
pub struct ExternalTools {
    paths: ToolPaths,
}

impl ExternalTools {
    pub fn new(paths: ToolPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &ToolPaths {
        &self.paths
    }

    /// Run `kind` with `args` and wait for it.
    fn run<I, S>(&self, kind: ToolKind, args: I) -> Result<Output, ToolError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let program = self.paths.get(kind);
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ToolError::Spawn { tool: kind, source })?;

        if !output.stderr.is_empty() {
            tracing::debug!(
                "{} stderr: {}",
                kind,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(output)
    }

    /// Like [`run`](Self::run) but a non-zero exit is an error.
    fn run_checked<I, S>(&self, kind: ToolKind, args: I) -> Result<Vec<u8>, ToolError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let output = self.run(kind, args)?;
        if !output.status.success() {
            return Err(ToolError::Failed {
                tool: kind,
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output.stdout)
    }

    /// Start the tool with its version flag and return the first line it
    /// prints, or `None` when it cannot be started.
    pub fn probe(&self, kind: ToolKind) -> Option<String> {
        let output = self.run(kind, [kind.version_arg()]).ok()?;
        // qaac --check and AtomicParsley --version disagree on stream and
        // exit code, so take whichever stream has text.
        let text = if output.stdout.is_empty() {
            output.stderr
        } else {
            output.stdout
        };
        let text = String::from_utf8_lossy(&text);
        Some(
            text.lines()
                .map(str::trim)
                .find(|line| !line.is_empty())
                .unwrap_or("(no version output)")
                .to_string(),
        )
    }
}

impl Toolchain for ExternalTools {
    fn transcode(&self, source: &Path, destination: &Path) -> Result<(), ToolError> {
        self.run_checked(
            ToolKind::Encoder,
            [
                OsStr::new("--alac"),
                OsStr::new("--threading"),
                OsStr::new("--copy-artwork"),
                OsStr::new("-i"),
                source.as_os_str(),
                OsStr::new("-o"),
                destination.as_os_str(),
            ],
        )
        .map(|_| ())
    }

    fn read_artists(&self, source: &Path) -> Result<Vec<u8>, ToolError> {
        self.run_checked(
            ToolKind::TagReader,
            [OsStr::new("--show-tag=ARTIST"), source.as_os_str()],
        )
    }

    fn inspect(&self, destination: &Path) -> Result<Vec<u8>, ToolError> {
        self.run_checked(
            ToolKind::TagInspector,
            [destination.as_os_str(), OsStr::new("-t")],
        )
    }

    fn write_tag(
        &self,
        destination: &Path,
        field: TagField,
        value: &str,
    ) -> Result<(), ToolError> {
        // Values go through OsStr untouched, so non-ASCII text reaches the
        // writer as UTF-8 bytes (UTF-16 on Windows) without any shell quoting.
        self.run_checked(
            ToolKind::TagWriter,
            [
                destination.as_os_str(),
                OsStr::new(field.writer_flag()),
                OsStr::new(value),
                OsStr::new("--overWrite"),
            ],
        )
        .map(|_| ())
    }
}
