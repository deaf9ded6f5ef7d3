//! Configuration system using TOML files.
//!
//! Lookup order (first existing file wins):
//! 1. the file given with `--config`
//! 2. `config.toml` next to the executable
//! 3. the OS-standard config directory:
//!    - Windows: %APPDATA%\alac-autotag\config.toml
//!    - macOS: ~/Library/Application Support/alac-autotag/config.toml
//!    - Linux: ~/.config/alac-autotag/config.toml
//!
//! Every key is optional. Relative paths resolve against the directory of
//! the executable, so a portable folder holding the program, the tools and
//! `FLAC/` + `ALAC/` works without any configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::metadata::DecodeStrategy;
use crate::model::TagPlacement;
use crate::tools::{ToolKind, ToolPaths};

/// File name looked up next to the executable and in the config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Source and destination directories
    pub paths: PathsConfig,

    /// Tagging preferences
    pub preferences: PreferencesConfig,

    /// External program locations
    pub tools: ToolsConfig,

    /// Tool output decoding
    pub decoding: DecodingConfig,

    /// Temp file sweep after conversion
    pub cleanup: CleanupConfig,
}

/// Library directories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory scanned for FLAC files
    pub source: PathBuf,

    /// Directory receiving ALAC files
    pub destination: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("FLAC"),
            destination: PathBuf::from("ALAC"),
        }
    }
}

/// Tagging preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferencesConfig {
    /// "artist" or "title". Kept as text so a typo only triggers the prompt
    /// instead of rejecting the whole file.
    pub featured_artists: Option<String>,
}

/// External program locations (unset = default name)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub encoder: Option<PathBuf>,
    pub tag_reader: Option<PathBuf>,
    pub tag_inspector: Option<PathBuf>,
    pub tag_writer: Option<PathBuf>,
}

/// Tool output decoding
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodingConfig {
    /// "auto" (detect) or "utf8"
    pub strategy: DecodeStrategy,
}

/// Temp file sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupConfig {
    /// Run the sweep after every conversion
    pub enabled: bool,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Config {
    /// Source directory, resolved against `base_dir`.
    pub fn source_dir(&self, base_dir: &Path) -> PathBuf {
        resolve(base_dir, &self.paths.source)
    }

    /// Destination directory, resolved against `base_dir`.
    pub fn destination_dir(&self, base_dir: &Path) -> PathBuf {
        resolve(base_dir, &self.paths.destination)
    }

    /// The configured placement, if it is a valid one.
    pub fn placement(&self) -> Option<TagPlacement> {
        let raw = self.preferences.featured_artists.as_deref()?;
        match raw.parse() {
            Ok(placement) => Some(placement),
            Err(e) => {
                tracing::warn!("Ignoring configured placement: {}", e);
                None
            }
        }
    }

    /// Program paths: configured ones resolved against `base_dir`, defaults
    /// for the rest.
    pub fn tool_paths(&self, base_dir: &Path) -> ToolPaths {
        let defaults = ToolPaths::defaults_in(base_dir);
        let pick = |configured: &Option<PathBuf>, kind: ToolKind| match configured {
            Some(path) => resolve_program(base_dir, path),
            None => defaults.get(kind).to_path_buf(),
        };
        ToolPaths {
            encoder: pick(&self.tools.encoder, ToolKind::Encoder),
            tag_reader: pick(&self.tools.tag_reader, ToolKind::TagReader),
            tag_inspector: pick(&self.tools.tag_inspector, ToolKind::TagInspector),
            tag_writer: pick(&self.tools.tag_writer, ToolKind::TagWriter),
        }
    }
}

fn resolve(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// Bare program names stay as-is for `PATH` lookup; anything with a
/// directory component resolves like other paths.
fn resolve_program(base_dir: &Path, path: &Path) -> PathBuf {
    if path.components().count() > 1 {
        resolve(base_dir, path)
    } else {
        let beside = base_dir.join(path);
        if beside.is_file() {
            beside
        } else {
            path.to_path_buf()
        }
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Directory of the running executable, falling back to the working
/// directory.
pub fn base_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("alac-autotag"))
}

/// Get the full path to the config file in the config directory
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join(CONFIG_FILE_NAME))
}

/// Files checked by [`load`], in order.
pub fn candidate_paths(explicit: Option<&Path>, base_dir: &Path) -> Vec<PathBuf> {
    match explicit {
        Some(path) => vec![path.to_path_buf()],
        None => std::iter::once(base_dir.join(CONFIG_FILE_NAME))
            .chain(config_path())
            .collect(),
    }
}

/// Load configuration from disk
///
/// Returns default config if no file exists or it can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load(explicit: Option<&Path>, base_dir: &Path) -> Config {
    let Some(path) = candidate_paths(explicit, base_dir)
        .into_iter()
        .find(|p| p.is_file())
    else {
        tracing::info!("No config file found, using defaults");
        return Config::default();
    };

    match load_file(&path) {
        Ok(config) => {
            tracing::info!("Loaded config from {:?}", path);
            config
        }
        Err(e) => {
            tracing::error!("{}", e);
            tracing::warn!("Using default configuration");
            Config::default()
        }
    }
}

/// Read and parse a single config file.
pub fn load_file(path: &Path) -> Result<Config, ConfigError> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
    toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
}

/// Save configuration to `path`
///
/// Creates the parent directory if it doesn't exist.
pub fn save(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    // Serialize to pretty TOML
    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Config file {} already exists (use --force to overwrite)", .0.display())]
    Exists(PathBuf),

    #[error("Failed to read config file {}: {}", .0.display(), .1)]
    Read(PathBuf, std::io::Error),

    #[error("Failed to parse config file {}: {}", .0.display(), .1)]
    Parse(PathBuf, toml::de::Error),

    #[error("Failed to create config directory {}: {}", .0.display(), .1)]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {}: {}", .0.display(), .1)]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {} to {}: {}", .0.display(), .1.display(), .2)]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================
