//! Load stage: render and persist reports.

pub mod generator;
pub mod writer;

pub use generator::{render, RenderOptions, ReportArtifact, ReportFormat};
pub use writer::ReportWriter;
