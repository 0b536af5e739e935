//! Source discovery for raw survey files.
//!
//! This module finds the raw input files that make up one logical input
//! set, respecting the configured extension.

use crate::error::{PipelineError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Configuration for source scanning.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Directory holding the raw files.
    pub input_dir: PathBuf,
    /// File extension to include (without dot).
    pub extension: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("data/raw"),
            extension: "csv".to_string(),
        }
    }
}

impl From<&crate::config::InputConfig> for ScanConfig {
    fn from(config: &crate::config::InputConfig) -> Self {
        Self {
            input_dir: config.dir.clone(),
            extension: config.extension.clone(),
        }
    }
}

/// A discovered raw source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    /// Full path to the file.
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

/// Scanner for discovering raw source files.
pub struct SourceScanner {
    config: ScanConfig,
}

impl SourceScanner {
    /// Create a new source scanner.
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    pub fn input_dir(&self) -> &Path {
        &self.config.input_dir
    }

    /// Scan the input directory for matching files, sorted by name.
    ///
    /// Only the top level of the directory is considered. Fails with
    /// `NoSourceData` when the directory is absent or holds no match.
    pub fn scan(&self) -> Result<Vec<ScannedFile>> {
        let dir = &self.config.input_dir;
        if !dir.is_dir() {
            debug!("Input directory {} does not exist", dir.display());
            return Err(PipelineError::NoSourceData { dir: dir.clone() });
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(|e| PipelineError::SourceParse {
                path: e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.clone()),
                reason: e.to_string(),
            })?;

            if !entry.file_type().is_file() || !self.matches(entry.path()) {
                continue;
            }

            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            debug!("Found source {} ({} bytes)", entry.path().display(), size);
            files.push(ScannedFile {
                path: entry.into_path(),
                size,
            });
        }

        if files.is_empty() {
            return Err(PipelineError::NoSourceData { dir: dir.clone() });
        }

        Ok(files)
    }

    /// Check if a file matches scan criteria.
    pub fn matches(&self, path: &Path) -> bool {
        // Hidden files
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if name.starts_with('.') {
                return false;
            }
        }

        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.config.extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn scanner_for(dir: &Path) -> SourceScanner {
        SourceScanner::new(ScanConfig {
            input_dir: dir.to_path_buf(),
            extension: "csv".to_string(),
        })
    }

    #[test]
    fn test_scan_sorted_and_filtered() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("b.csv"), "x").unwrap();
        fs::write(tmp.path().join("a.CSV"), "x").unwrap();
        fs::write(tmp.path().join("notes.txt"), "x").unwrap();
        fs::write(tmp.path().join(".hidden.csv"), "x").unwrap();
        fs::create_dir(tmp.path().join("nested")).unwrap();
        fs::write(tmp.path().join("nested/c.csv"), "x").unwrap();

        let files = scanner_for(tmp.path()).scan().unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.CSV", "b.csv"]);
        assert_eq!(files[0].size, 1);
    }

    #[test]
    fn test_empty_dir_has_no_sources() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("readme.md"), "x").unwrap();

        let err = scanner_for(tmp.path()).scan().unwrap_err();
        assert!(matches!(err, PipelineError::NoSourceData { .. }));
    }

    #[test]
    fn test_missing_dir_has_no_sources() {
        let tmp = TempDir::new().unwrap();
        let err = scanner_for(&tmp.path().join("absent")).scan().unwrap_err();
        assert!(matches!(err, PipelineError::NoSourceData { .. }));
    }
}
