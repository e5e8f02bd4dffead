use std::path::PathBuf;

use crate::error::Result;
use crate::pipeline::Report;

/// Export collaborator for a finished report.
pub trait ReportOutputPort: Send + Sync {
    /// Short name used in logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Write the report, returning where it went.
    fn write_report(&self, report: &Report) -> Result<PathBuf>;
}
