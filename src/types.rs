use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{error, info, warn};

use crate::constants;
use crate::error::{AnalyzerError, Result};

/// The two experiment paradigms the analyzer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    VisualSearch,
    Stroop,
}

impl TaskKind {
    pub fn name(&self) -> &'static str {
        match self {
            TaskKind::VisualSearch => constants::VISUAL_SEARCH_TASK,
            TaskKind::Stroop => constants::STROOP_TASK,
        }
    }

    /// Look up a task by its CLI name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim() {
            constants::VISUAL_SEARCH_TASK => Some(TaskKind::VisualSearch),
            constants::STROOP_TASK => Some(TaskKind::Stroop),
            _ => None,
        }
    }

    /// Stroop sessions may be split across `.1`/`.2` twin files.
    pub fn uses_twin_files(&self) -> bool {
        matches!(self, TaskKind::Stroop)
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Participant/condition/timepoint decoded from a source file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMetadata {
    pub participant: String,
    pub condition: String,
    pub time: String,
}

/// Where a source file came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOrigin {
    Loose,
    Archive { archive: String },
}

impl SourceOrigin {
    /// Metric label for the intake route.
    pub fn label(&self) -> &'static str {
        match self {
            SourceOrigin::Loose => "loose",
            SourceOrigin::Archive { .. } => "archive",
        }
    }
}

/// A named byte blob handed to the pipeline.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub bytes: Vec<u8>,
    pub origin: SourceOrigin,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
            origin: SourceOrigin::Loose,
        }
    }

    /// Read a file from disk, keeping only its file name as the blob name.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        Ok(Self::new(name, bytes))
    }

    /// Lower-cased extension including the leading dot, or an empty string.
    pub fn extension(&self) -> String {
        extension_of(&self.name)
    }
}

pub fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

/// Everything supplied for one batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchInput {
    pub files: Vec<SourceFile>,
    pub archive: Option<SourceFile>,
}

impl BatchInput {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.archive.is_none()
    }
}

/// A single cell value as read from a source table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    pub fn text(value: &str) -> Self {
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value.to_string())
        }
    }

    pub fn from_option(value: Option<f64>) -> Self {
        value.map(Cell::Number).unwrap_or(Cell::Empty)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Numeric coercion: unparseable or non-finite values become `None`.
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            Cell::Empty => return None,
            Cell::Number(n) => *n,
            Cell::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Cell::Number(n) => write!(f, "{n}"),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Advisory message attributed to a file (or to the whole batch).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub subject: Option<String>,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        match &self.subject {
            Some(subject) => write!(f, "[{label}] {subject}: {}", self.message),
            None => write!(f, "[{label}] {}", self.message),
        }
    }
}

/// Ordered collection of diagnostics; every push is mirrored to tracing.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn push(&mut self, severity: Severity, subject: Option<&str>, message: impl Into<String>) {
        let message = message.into();
        let subject_str = subject.unwrap_or("-");
        match severity {
            Severity::Info => info!(subject = subject_str, "{}", message),
            Severity::Warning => warn!(subject = subject_str, "{}", message),
            Severity::Error => error!(subject = subject_str, "{}", message),
        }
        self.entries.push(Diagnostic {
            severity,
            subject: subject.map(str::to_string),
            message,
        });
    }

    pub fn info(&mut self, subject: Option<&str>, message: impl Into<String>) {
        self.push(Severity::Info, subject, message);
    }

    pub fn warn(&mut self, subject: Option<&str>, message: impl Into<String>) {
        self.push(Severity::Warning, subject, message);
    }

    /// Report an error at the severity its kind calls for.
    pub fn record(&mut self, subject: &str, err: &AnalyzerError) {
        metrics::counter!("analyzer_file_failures_total", "kind" => err.kind()).increment(1);
        self.push(err.severity(), Some(subject), err.to_string());
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.entries.iter().filter(|d| d.severity == severity).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(Cell::Text(" 550 ".to_string()).as_number(), Some(550.0));
        assert_eq!(Cell::Number(1.0).as_number(), Some(1.0));
        assert_eq!(Cell::Text("hit".to_string()).as_number(), None);
        assert_eq!(Cell::Text("NaN".to_string()).as_number(), None);
        assert_eq!(Cell::Empty.as_number(), None);
    }

    #[test]
    fn test_whole_numbers_display_without_fraction() {
        assert_eq!(Cell::Number(4.0).to_string(), "4");
        assert_eq!(Cell::Number(4.5).to_string(), "4.5");
        assert_eq!(Cell::Empty.to_string(), "");
    }

    #[test]
    fn test_task_names_round_trip() {
        assert_eq!(TaskKind::from_name("stroop"), Some(TaskKind::Stroop));
        assert_eq!(TaskKind::from_name("visual_search"), Some(TaskKind::VisualSearch));
        assert_eq!(TaskKind::from_name("flanker"), None);
    }

    #[test]
    fn test_extension_is_lowercased() {
        assert_eq!(extension_of("sub/P1_VS_CRL_PRE.XLSX"), ".xlsx");
        assert_eq!(extension_of("README"), "");
    }

    #[test]
    fn test_diagnostics_record_uses_error_severity() {
        let mut diagnostics = Diagnostics::default();
        diagnostics.record(
            "notes.txt",
            &AnalyzerError::UnrecognizedFilename { name: "notes.txt".to_string() },
        );
        assert_eq!(diagnostics.count(Severity::Warning), 1);
        assert_eq!(diagnostics.entries()[0].subject.as_deref(), Some("notes.txt"));
    }
}
