use std::path::PathBuf;
use tracing::info;

use crate::app::ports::ReportOutputPort;
use crate::config::{AnalyzerConfig, OutputFormat};
use crate::infra::json_output_adapter::JsonOutputAdapter;
use crate::infra::workbook_output_adapter::WorkbookOutputAdapter;
use crate::pipeline::{BatchOutcome, Pipeline};
use crate::types::{BatchInput, Diagnostic, Severity, TaskKind};

/// Use case for analyzing one batch and exporting its report
pub struct AnalyzeUseCase {
    pipeline: Pipeline,
    outputs: Vec<Box<dyn ReportOutputPort>>,
}

#[derive(Debug)]
pub struct AnalyzeResult {
    pub outcome: BatchOutcome,
    pub written: Vec<PathBuf>,
}

impl AnalyzeUseCase {
    pub fn new(pipeline: Pipeline, outputs: Vec<Box<dyn ReportOutputPort>>) -> Self {
        Self { pipeline, outputs }
    }

    /// Create a use case with the outputs named in the config
    pub fn from_config(config: &AnalyzerConfig, task: TaskKind) -> Self {
        let outputs = config
            .output
            .formats
            .iter()
            .map(|format| -> Box<dyn ReportOutputPort> {
                match format {
                    OutputFormat::Xlsx => Box::new(WorkbookOutputAdapter::new(
                        config.output.dir.join(config.output.workbook_name_for(task)),
                    )),
                    OutputFormat::Json => Box::new(JsonOutputAdapter::new(config.output.dir.clone())),
                }
            })
            .collect();
        Self::new(Pipeline::new(&config.pipeline), outputs)
    }

    /// Run the pipeline and hand any report to every output.
    ///
    /// Export failures are added to the diagnostics rather than returned.
    pub fn run(&self, task: TaskKind, batch: BatchInput) -> AnalyzeResult {
        let mut outcome = self.pipeline.run(task, batch);
        let mut written = Vec::new();

        if let Some(report) = &outcome.report {
            for output in &self.outputs {
                match output.write_report(report) {
                    Ok(path) => {
                        info!("💾 {} report written to {}", output.name(), path.display());
                        written.push(path);
                    }
                    Err(err) => {
                        tracing::error!("{} export failed: {}", output.name(), err);
                        outcome.diagnostics.push(Diagnostic {
                            severity: Severity::Error,
                            subject: Some(output.name().to_string()),
                            message: err.to_string(),
                        });
                    }
                }
            }
        }

        AnalyzeResult { outcome, written }
    }
}
