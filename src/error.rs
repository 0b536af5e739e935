//! Error types for the report pipeline.
//!
//! Every variant is fatal to the run that raised it. The orchestrator wraps
//! them in a [`StageError`] so callers can tell which stage failed.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("No source data found in {}", dir.display())]
    NoSourceData { dir: PathBuf },

    #[error("Failed to parse source {}: {reason}", path.display())]
    SourceParse { path: PathBuf, reason: String },

    #[error("Invalid outcome value {value:?} in record {index} (expected 0/1 or true/false)")]
    InvalidOutcomeValue { index: usize, value: String },

    #[error("Dataset contains no records")]
    EmptyDataset,

    #[error("Failed to render report: {0}")]
    Render(#[from] serde_json::Error),

    #[error("Failed to write report to {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The pipeline stage a run was in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Extracting,
    Transforming,
    Loading,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Extracting => write!(f, "extract"),
            Stage::Transforming => write!(f, "transform"),
            Stage::Loading => write!(f, "load"),
            Stage::Done => write!(f, "done"),
            Stage::Failed => write!(f, "failed"),
        }
    }
}

/// A failed run: the stage that failed and why.
#[derive(Error, Debug)]
#[error("{stage} stage failed: {source}")]
pub struct StageError {
    pub stage: Stage,
    #[source]
    pub source: PipelineError,
}

impl StageError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        match self.stage {
            Stage::Extracting => 2,
            Stage::Transforming => 3,
            _ => 4,
        }
    }
}
