//! Report rendering.
//!
//! This module turns a summary into the text (or JSON) body of a report.
//! Output depends only on the summary and the generation timestamp.

use crate::error::Result;
use crate::models::{Demographic, SummaryResult};
use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::Serialize;

/// Report title line.
pub const REPORT_TITLE: &str = "Public Opinion Data Summary Report";

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Plain text (default)
    #[default]
    Text,
    /// JSON
    Json,
}

impl ReportFormat {
    /// File extension used when persisting.
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Json => "json",
        }
    }
}

/// Rendering options.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub format: ReportFormat,
    /// Width the category label column is padded to.
    pub label_width: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            format: ReportFormat::Text,
            label_width: 20,
        }
    }
}

/// A rendered report, ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportArtifact {
    pub generated_at: DateTime<FixedOffset>,
    pub format: ReportFormat,
    pub body: String,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    title: &'static str,
    generated_at: String,
    #[serde(flatten)]
    summary: &'a SummaryResult,
}

/// Render a summary into a report artifact.
pub fn render(
    summary: &SummaryResult,
    generated_at: DateTime<FixedOffset>,
    options: &RenderOptions,
) -> Result<ReportArtifact> {
    let body = match options.format {
        ReportFormat::Text => generate_text_report(summary, &generated_at, options.label_width),
        ReportFormat::Json => generate_json_report(summary, &generated_at)?,
    };

    Ok(ReportArtifact {
        generated_at,
        format: options.format,
        body,
    })
}

fn iso_timestamp(ts: &DateTime<FixedOffset>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Generate the plain text report.
pub fn generate_text_report(
    summary: &SummaryResult,
    generated_at: &DateTime<FixedOffset>,
    label_width: usize,
) -> String {
    let mut lines = vec![
        REPORT_TITLE.to_string(),
        "=".repeat(36),
        format!("Generated: {}", iso_timestamp(generated_at)),
        String::new(),
        format!("Overall support rate: {:.3}", summary.overall_support_rate),
        String::new(),
    ];

    for demographic in Demographic::ALL {
        lines.extend(generate_breakdown_section(summary, demographic, label_width));
    }

    lines.join("\n")
}

/// Lines for one demographic, followed by a blank separator.
fn generate_breakdown_section(
    summary: &SummaryResult,
    demographic: Demographic,
    label_width: usize,
) -> Vec<String> {
    let mut lines = vec![format!("Support by {}:", demographic)];

    if let Some(breakdown) = summary.breakdown(demographic) {
        for (value, stats) in &breakdown.categories {
            lines.push(format!(
                "  {:<width$} — respondents: {:4}, support_rate: {:.3}",
                value,
                stats.respondent_count,
                stats.support_rate,
                width = label_width
            ));
        }
    }

    lines.push(String::new());
    lines
}

/// Generate a JSON report.
pub fn generate_json_report(
    summary: &SummaryResult,
    generated_at: &DateTime<FixedOffset>,
) -> Result<String> {
    let report = JsonReport {
        title: REPORT_TITLE,
        generated_at: iso_timestamp(generated_at),
        summary,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}
