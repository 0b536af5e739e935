//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::report::ReportFormat;
use clap::Parser;
use std::path::PathBuf;

/// PollReport - public opinion survey summary job
///
/// Reads every raw survey CSV in the input directory, computes overall and
/// per-demographic support rates, and writes a timestamped report. Each
/// invocation is one complete run; schedule it with cron or CI.
///
/// Examples:
///   pollreport
///   pollreport --input-dir data/raw --output-dir docs
///   pollreport --format json
///   pollreport --dry-run
///   pollreport --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Directory holding the raw survey files
    ///
    /// Defaults to the config file value, or data/raw.
    #[arg(short, long, value_name = "DIR", env = "POLLREPORT_INPUT_DIR")]
    pub input_dir: Option<PathBuf>,

    /// Directory reports are written to
    ///
    /// Defaults to the config file value, or docs.
    #[arg(short, long, value_name = "DIR", env = "POLLREPORT_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Report format (text, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<ReportFormat>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .pollreport.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// List the raw sources that would be read, then exit
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .pollreport.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        // A missing input directory is reported by the pipeline itself
        if let Some(ref dir) = self.input_dir {
            if dir.exists() && !dir.is_dir() {
                return Err(format!("Input path is not a directory: {}", dir.display()));
            }
        }

        if let Some(ref dir) = self.output_dir {
            if dir.exists() && !dir.is_dir() {
                return Err(format!("Output path is not a directory: {}", dir.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
