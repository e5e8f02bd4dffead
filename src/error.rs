use thiserror::Error;

use crate::types::Severity;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Unsupported file type: {extension}")]
    UnsupportedFileType { extension: String },

    #[error("Unrecognized file name (expected P<id>_<Task>_<CONDITION>_<TIMEPOINT>): {name}")]
    UnrecognizedFilename { name: String },

    #[error("Not enough columns: need more than {required_index}, found {found}")]
    InsufficientColumns { required_index: usize, found: usize },

    #[error("Incomplete twin pair '{key}': expected 2 files, found {count}")]
    IncompleteTwinPair { key: String, count: usize },

    #[error("Archive could not be read: {0}")]
    ArchiveRead(#[from] zip::result::ZipError),

    #[error("No rows survived ingestion and normalization")]
    EmptyBatch,

    #[error("CSV read failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet read failed: {0}")]
    Spreadsheet(#[from] calamine::XlsxError),

    #[error("Spreadsheet has no worksheets")]
    NoWorksheet,

    #[error("Workbook export failed: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AnalyzerError {
    /// How a per-file occurrence of this error is reported.
    pub fn severity(&self) -> Severity {
        match self {
            AnalyzerError::UnrecognizedFilename { .. }
            | AnalyzerError::InsufficientColumns { .. }
            | AnalyzerError::IncompleteTwinPair { .. }
            | AnalyzerError::EmptyBatch => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Short machine-friendly label, used for metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalyzerError::UnsupportedFileType { .. } => "unsupported_file_type",
            AnalyzerError::UnrecognizedFilename { .. } => "unrecognized_filename",
            AnalyzerError::InsufficientColumns { .. } => "insufficient_columns",
            AnalyzerError::IncompleteTwinPair { .. } => "incomplete_twin_pair",
            AnalyzerError::ArchiveRead(_) => "archive_read",
            AnalyzerError::EmptyBatch => "empty_batch",
            AnalyzerError::Csv(_) => "csv",
            AnalyzerError::Spreadsheet(_) | AnalyzerError::NoWorksheet => "spreadsheet",
            AnalyzerError::Workbook(_) => "workbook",
            AnalyzerError::Json(_) => "json",
            AnalyzerError::Toml(_) => "toml",
            AnalyzerError::Io(_) => "io",
            AnalyzerError::Config(_) => "config",
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
