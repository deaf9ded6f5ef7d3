//! Removal of stray tag-writer temp files.
//!
//! AtomicParsley overwrites a file by writing `<name>-data-<random>.m4a`
//! next to it and renaming on success. An interrupted run leaves those
//! behind; [`sweep`] deletes them.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

/// Infix the tag writer puts in temp file names.
pub const TEMP_INFIX: &str = "-data-";

/// Outcome of a sweep.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanupReport {
    pub removed: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

/// Whether `path` looks like a leftover temp file with `extension`.
pub fn is_temp_artifact(path: &Path, extension: &str) -> bool {
    let ext_matches = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension));
    let stem_matches = path
        .file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|s| s.contains(TEMP_INFIX));
    ext_matches && stem_matches
}

/// Delete every temp artifact directly inside `dir`.
///
/// A failed deletion is logged and recorded; the sweep carries on.
pub fn sweep(dir: &Path, extension: &str) -> CleanupReport {
    let mut report = CleanupReport::default();

    if !dir.is_dir() {
        tracing::debug!("Cleanup skipped, {:?} is not a directory", dir);
        return report;
    }

    let candidates: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| is_temp_artifact(p, extension))
        .collect();

    for path in candidates {
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::info!("Removed temp file {:?}", path);
                report.removed.push(path);
            }
            Err(e) => {
                tracing::warn!("Failed to remove temp file {:?}: {}", path, e);
                report.failed.push((path, e.to_string()));
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_is_temp_artifact() {
        assert!(is_temp_artifact(Path::new("X-data-1.m4a"), "m4a"));
        assert!(is_temp_artifact(Path::new("/a/Song-data-x7Gq.M4A"), "m4a"));
        assert!(!is_temp_artifact(Path::new("Y.m4a"), "m4a"));
        assert!(!is_temp_artifact(Path::new("X-data-1.flac"), "m4a"));
        assert!(!is_temp_artifact(Path::new("metadata-1.m4a"), "m4a"));
    }

    #[test]
    fn test_sweep_removes_only_temp_files() {
        let dir = tempdir().unwrap();
        let temp = dir.path().join("X-data-1.m4a");
        let keep = dir.path().join("Y.m4a");
        std::fs::write(&temp, b"partial").unwrap();
        std::fs::write(&keep, b"audio").unwrap();

        let report = sweep(dir.path(), "m4a");

        assert_eq!(report.removed, vec![temp.clone()]);
        assert!(report.failed.is_empty());
        assert!(!temp.exists());
        assert!(keep.exists());
    }

    #[test]
    fn test_sweep_ignores_subdirectories() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        let deep = nested.join("Z-data-2.m4a");
        std::fs::write(&deep, b"partial").unwrap();

        let report = sweep(dir.path(), "m4a");

        assert!(report.removed.is_empty());
        assert!(deep.exists());
    }

    #[test]
    fn test_sweep_missing_directory() {
        let report = sweep(Path::new("/nonexistent/alac-autotag/ALAC"), "m4a");
        assert!(report.removed.is_empty());
        assert!(report.failed.is_empty());
    }

    #[test]
    fn test_sweep_removes_several_in_name_order() {
        let dir = tempdir().unwrap();
        for name in ["b-data-2.m4a", "a-data-1.m4a", "c.m4a"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }

        let report = sweep(dir.path(), "m4a");

        assert_eq!(
            report.removed,
            vec![dir.path().join("a-data-1.m4a"), dir.path().join("b-data-2.m4a")]
        );
    }
}
