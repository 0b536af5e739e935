//! Pipeline orchestration.
//!
//! Runs extract, transform and load strictly in sequence. Each stage starts
//! only once the previous one has returned its full output; the first
//! failure ends the run and nothing downstream executes.

use crate::analysis::aggregate;
use crate::error::{PipelineError, Stage, StageError};
use crate::extract::Extractor;
use crate::report::{render, RenderOptions, ReportWriter};
use chrono::{DateTime, FixedOffset, Local};
use std::path::PathBuf;
use tracing::{error, info};

/// Source of generation timestamps.
pub type Clock = Box<dyn Fn() -> DateTime<FixedOffset>>;

/// Called with every stage the run enters, `Failed` included.
pub type StageObserver = Box<dyn FnMut(Stage)>;

fn local_now() -> DateTime<FixedOffset> {
    Local::now().fixed_offset()
}

/// Sequences one extract → transform → load run.
pub struct Orchestrator {
    extractor: Extractor,
    writer: ReportWriter,
    render_options: RenderOptions,
    clock: Clock,
    observer: Option<StageObserver>,
    stage: Stage,
}

impl Orchestrator {
    pub fn new(extractor: Extractor, writer: ReportWriter, render_options: RenderOptions) -> Self {
        Self {
            extractor,
            writer,
            render_options,
            clock: Box::new(local_now),
            observer: None,
            stage: Stage::Extracting,
        }
    }

    /// Replace the timestamp source.
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<FixedOffset> + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Watch stage transitions as they happen.
    pub fn with_observer(mut self, observer: impl FnMut(Stage) + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    fn notify(&mut self) {
        if let Some(observer) = self.observer.as_mut() {
            observer(self.stage);
        }
    }

    fn advance(&mut self, next: Stage) {
        info!("Pipeline stage: {:?} -> {:?}", self.stage, next);
        self.stage = next;
        self.notify();
    }

    fn fail(&mut self, source: PipelineError) -> StageError {
        let stage = self.stage;
        error!("Pipeline failed during {} stage: {}", stage, source);
        self.stage = Stage::Failed;
        self.notify();
        StageError { stage, source }
    }

    /// Run the pipeline to completion, returning the report location.
    ///
    /// Consumes the orchestrator: a run is never resumed or repeated.
    pub fn run(mut self) -> Result<PathBuf, StageError> {
        info!("Starting public opinion report pipeline");
        self.notify();

        let dataset = match self.extractor.extract() {
            Ok(dataset) => dataset,
            Err(e) => return Err(self.fail(e)),
        };
        self.advance(Stage::Transforming);

        let summary = match aggregate(&dataset) {
            Ok(summary) => summary,
            Err(e) => return Err(self.fail(e)),
        };
        drop(dataset);
        info!(
            "Aggregated {} respondents, overall support rate {:.3}",
            summary.respondent_count, summary.overall_support_rate
        );
        self.advance(Stage::Loading);

        let generated_at = (self.clock)();
        let location = match render(&summary, generated_at, &self.render_options)
            .and_then(|artifact| self.writer.persist(&artifact))
        {
            Ok(location) => location,
            Err(e) => return Err(self.fail(e)),
        };
        self.advance(Stage::Done);

        info!("Report written to {}", location.display());
        Ok(location)
    }
}
