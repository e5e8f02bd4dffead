// Batch analysis pipeline: ingestion, processing and report assembly

pub mod ingestion;
pub mod processing;
pub mod report;

use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info, instrument};

use crate::config::PipelineConfig;
use crate::error::AnalyzerError;
use crate::pipeline::processing::aggregate::aggregate;
use crate::pipeline::processing::filename::parse_filename;
use crate::pipeline::processing::normalize::{normalize_all, normalizer_for};
use crate::pipeline::processing::projector::{RawRecord, TaskSchema};
use crate::pipeline::processing::session::SessionLoader;
use crate::pipeline::processing::twins;
use crate::types::{BatchInput, Diagnostic, Diagnostics, SourceFile, TaskKind};

pub use report::{GroupSummary, Report, ReportTable};

/// Result of one batch run
#[derive(Debug, Serialize)]
pub struct BatchOutcome {
    pub task: TaskKind,
    /// `None` when nothing survived ingestion and normalization.
    pub report: Option<Report>,
    pub diagnostics: Vec<Diagnostic>,
    pub files_seen: usize,
    pub rows_excluded: usize,
}

/// Stateless transform from a set of uploaded files to a report.
pub struct Pipeline {
    preamble_rows: usize,
}

impl Pipeline {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            preamble_rows: config.preamble_rows,
        }
    }

    /// Visual search: every file is its own session.
    fn load_independent(
        &self,
        sources: Vec<SourceFile>,
        loader: &SessionLoader,
        diagnostics: &mut Diagnostics,
    ) -> Vec<RawRecord> {
        let mut records = Vec::new();
        for source in sources {
            let metadata = match parse_filename(&source.name, TaskKind::VisualSearch) {
                Ok(metadata) => metadata,
                Err(err) => {
                    diagnostics.record(&source.name, &err);
                    continue;
                }
            };
            match loader.load(&source, &metadata) {
                Ok(rows) => records.extend(rows),
                Err(err) => diagnostics.record(&source.name, &err),
            }
        }
        records
    }

    /// Run the whole batch. Per-file problems become diagnostics; nothing
    /// here aborts the batch.
    #[instrument(skip(self, batch), fields(task = %task))]
    pub fn run(&self, task: TaskKind, batch: BatchInput) -> BatchOutcome {
        let started = Instant::now();
        let mut diagnostics = Diagnostics::default();

        if batch.is_empty() {
            diagnostics.info(None, "No input files supplied yet");
            return BatchOutcome {
                task,
                report: None,
                diagnostics: diagnostics.into_vec(),
                files_seen: 0,
                rows_excluded: 0,
            };
        }

        let sources = ingestion::collect_sources(batch, &mut diagnostics);
        let files_seen = sources.len();
        info!("🔧 Processing {} files", files_seen);

        let loader = SessionLoader::new(TaskSchema::for_task(task), self.preamble_rows);
        let records = match task {
            TaskKind::VisualSearch => self.load_independent(sources, &loader, &mut diagnostics),
            TaskKind::Stroop => {
                let reconciled = twins::reconcile(sources, &loader, &mut diagnostics);
                if reconciled.timeouts_dropped > 0 {
                    diagnostics.info(
                        None,
                        format!("Dropped {} timeout trials", reconciled.timeouts_dropped),
                    );
                }
                reconciled.records
            }
        };
        debug!("{} projected rows", records.len());

        let normalizer = normalizer_for(task);
        let outcome = normalize_all(normalizer.as_ref(), records);
        if outcome.excluded > 0 {
            diagnostics.info(
                None,
                format!(
                    "Dropped {} rows with unrecognized grouping labels",
                    outcome.excluded
                ),
            );
        }

        if outcome.trials.is_empty() {
            let err = AnalyzerError::EmptyBatch;
            diagnostics.push(err.severity(), None, err.to_string());
            return BatchOutcome {
                task,
                report: None,
                diagnostics: diagnostics.into_vec(),
                files_seen,
                rows_excluded: outcome.excluded,
            };
        }

        let stats = aggregate(&outcome.trials);
        let report = report::assemble(task, &outcome.trials, &stats);
        info!(
            "✅ {} trials in {} groups",
            report.raw.rows.len(),
            report.groups.len()
        );

        metrics::counter!("analyzer_groups_total", "task" => task.name())
            .increment(report.groups.len() as u64);
        metrics::histogram!("analyzer_run_duration_seconds", "task" => task.name())
            .record(started.elapsed().as_secs_f64());

        BatchOutcome {
            task,
            report: Some(report),
            diagnostics: diagnostics.into_vec(),
            files_seen,
            rows_excluded: outcome.excluded,
        }
    }
}
