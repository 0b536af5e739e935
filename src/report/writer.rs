//! Report persistence.
//!
//! Artifacts are written to a temporary file in the output directory and
//! then linked into place without clobbering, so a failed write leaves
//! nothing behind and an existing report is never replaced.

use super::generator::ReportArtifact;
use crate::error::{PipelineError, Result};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Upper bound on `_N` suffixes tried for one timestamp.
const MAX_NAME_ATTEMPTS: usize = 1000;

fn persistence_error(path: &Path, source: io::Error) -> PipelineError {
    PipelineError::Persistence {
        path: path.to_path_buf(),
        source,
    }
}

/// Writes report artifacts into an output directory.
///
/// At most `max_name_attempts` names are tried per artifact: the bare
/// timestamp, then `_1`, `_2`, ... When all are taken, persistence fails
/// and the temporary file is removed.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    output_dir: PathBuf,
    max_name_attempts: usize,
}

impl ReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            max_name_attempts: MAX_NAME_ATTEMPTS,
        }
    }

    #[cfg(test)]
    pub fn with_max_name_attempts(mut self, attempts: usize) -> Self {
        self.max_name_attempts = attempts;
        self
    }

    /// File name for an artifact; `attempt > 0` adds a `_N` suffix.
    pub fn file_name(artifact: &ReportArtifact, attempt: usize) -> String {
        let stamp = artifact.generated_at.format("%Y-%m-%d_%H-%M-%S");
        let ext = artifact.format.extension();
        if attempt == 0 {
            format!("report_{}.{}", stamp, ext)
        } else {
            format!("report_{}_{}.{}", stamp, attempt, ext)
        }
    }

    /// Persist an artifact and return where it was written.
    pub fn persist(&self, artifact: &ReportArtifact) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)
            .map_err(|e| persistence_error(&self.output_dir, e))?;

        let mut tmp = NamedTempFile::new_in(&self.output_dir)
            .map_err(|e| persistence_error(&self.output_dir, e))?;
        tmp.write_all(artifact.body.as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| persistence_error(tmp.path(), e))?;

        for attempt in 0..self.max_name_attempts {
            let path = self.output_dir.join(Self::file_name(artifact, attempt));
            match tmp.persist_noclobber(&path) {
                Ok(_) => return Ok(path),
                Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
                    debug!("{} already exists, trying next name", path.display());
                    tmp = e.file;
                }
                Err(e) => return Err(persistence_error(&path, e.error)),
            }
        }

        // Dropping `tmp` deletes the temporary file
        drop(tmp);
        Err(persistence_error(
            &self.output_dir,
            io::Error::new(
                io::ErrorKind::AlreadyExists,
                "no free report name for this timestamp",
            ),
        ))
    }
}
