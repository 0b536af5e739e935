//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.pollreport.toml` files.

use crate::report::{RenderOptions, ReportFormat};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".pollreport.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Raw input settings.
    #[serde(default)]
    pub input: InputConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Where raw survey files are read from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Directory holding the raw files.
    #[serde(default = "default_input_dir")]
    pub dir: PathBuf,

    /// Extension of raw files (without dot).
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            dir: default_input_dir(),
            extension: default_extension(),
        }
    }
}

fn default_input_dir() -> PathBuf {
    PathBuf::from("data/raw")
}

fn default_extension() -> String {
    "csv".to_string()
}

/// Report output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Directory reports are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Report format.
    #[serde(default)]
    pub format: ReportFormat,

    /// Width of the category label column in text reports.
    #[serde(default = "default_label_width")]
    pub label_width: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            format: ReportFormat::default(),
            label_width: default_label_width(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("docs")
}

fn default_label_width() -> usize {
    20
}

impl ReportConfig {
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            format: self.format,
            label_width: self.label_width,
        }
    }
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were actually given.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref dir) = args.input_dir {
            self.input.dir = dir.clone();
        }
        if let Some(ref dir) = args.output_dir {
            self.report.output_dir = dir.clone();
        }
        if let Some(format) = args.format {
            self.report.format = format;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Args;
    use clap::Parser;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.input.dir, PathBuf::from("data/raw"));
        assert_eq!(config.input.extension, "csv");
        assert_eq!(config.report.output_dir, PathBuf::from("docs"));
        assert_eq!(config.report.format, ReportFormat::Text);
        assert_eq!(config.report.label_width, 20);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[input]
dir = "/srv/survey/raw"

[report]
format = "json"
label_width = 12
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.input.dir, PathBuf::from("/srv/survey/raw"));
        assert_eq!(config.input.extension, "csv");
        assert_eq!(config.report.output_dir, PathBuf::from("docs"));
        assert_eq!(config.report.format, ReportFormat::Json);
        assert_eq!(config.report.render_options().label_width, 12);
    }

    #[test]
    fn test_args_override_only_when_given() {
        let mut config = Config::default();
        config.report.format = ReportFormat::Json;

        let args = Args::parse_from(["pollreport", "--input-dir", "incoming"]);
        config.merge_with_args(&args);

        assert_eq!(config.input.dir, PathBuf::from("incoming"));
        assert_eq!(config.report.output_dir, PathBuf::from("docs"));
        assert_eq!(config.report.format, ReportFormat::Json);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[input]"));
        assert!(toml_str.contains("[report]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.report.label_width, 20);
    }
}
