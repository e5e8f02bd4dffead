use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use crate::app::ports::ReportOutputPort;
use crate::error::Result;
use crate::pipeline::{GroupSummary, Report, ReportTable};
use crate::types::TaskKind;

#[derive(Serialize)]
struct JsonReport<'a> {
    task: TaskKind,
    generated_at: DateTime<Utc>,
    groups: &'a [GroupSummary],
    summary: &'a ReportTable,
    raw: &'a ReportTable,
}

/// Writes `<task>_<timestamp>.json` into the output directory.
pub struct JsonOutputAdapter {
    output_dir: PathBuf,
}

impl JsonOutputAdapter {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }
}

impl ReportOutputPort for JsonOutputAdapter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn write_report(&self, report: &Report) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let generated_at = Utc::now();
        let filename = format!("{}_{}.json", report.task.name(), generated_at.format("%Y%m%d_%H%M%S"));
        let filepath = self.output_dir.join(filename);

        let body = JsonReport {
            task: report.task,
            generated_at,
            groups: &report.groups,
            summary: &report.summary,
            raw: &report.raw,
        };
        fs::write(&filepath, serde_json::to_string_pretty(&body)?)?;
        Ok(filepath)
    }
}
