//! Decoding of named byte blobs into rectangular tables.
//!
//! Every source table starts with a fixed instrument preamble. The row after
//! the preamble is the column header row; data rows follow it.

pub mod csv_reader;
pub mod xlsx_reader;

use tracing::debug;

use crate::constants;
use crate::error::{AnalyzerError, Result};
use crate::types::Cell;

pub use csv_reader::CsvTableReader;
pub use xlsx_reader::XlsxTableReader;

/// A rectangular table: every row has exactly `width()` cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub rows: Vec<Vec<Cell>>,
    width: usize,
}

impl Table {
    /// Build a table from a raw cell grid, dropping the preamble and the
    /// header row after it. The header still counts towards the width;
    /// short rows are padded with empty cells.
    pub fn from_grid(grid: Vec<Vec<Cell>>, preamble_rows: usize) -> Self {
        let mut remaining = grid.into_iter().skip(preamble_rows);
        let header_width = remaining.next().map(|row| row.len()).unwrap_or(0);
        let mut rows: Vec<Vec<Cell>> = remaining.collect();

        let width = rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(header_width))
            .max()
            .unwrap_or(0);
        for row in &mut rows {
            row.resize(width, Cell::Empty);
        }

        Self { rows, width }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Decodes one byte blob into a table.
pub trait TableReader {
    fn read(&self, bytes: &[u8]) -> Result<Table>;
}

/// A wrapper that adds metrics to any reader implementation
pub struct MetricsReader<R: TableReader> {
    inner: R,
    format: &'static str,
}

impl<R: TableReader> MetricsReader<R> {
    pub fn new(inner: R, format: &'static str) -> Self {
        Self { inner, format }
    }
}

impl<R: TableReader> TableReader for MetricsReader<R> {
    fn read(&self, bytes: &[u8]) -> Result<Table> {
        let start_time = std::time::Instant::now();
        let result = self.inner.read(bytes);
        metrics::histogram!("analyzer_read_duration_seconds", "format" => self.format)
            .record(start_time.elapsed().as_secs_f64());
        match &result {
            Ok(table) => {
                metrics::counter!("analyzer_tables_read_total", "format" => self.format).increment(1);
                metrics::counter!("analyzer_rows_read_total", "format" => self.format)
                    .increment(table.len() as u64);
            }
            Err(_) => {
                metrics::counter!("analyzer_table_read_errors_total", "format" => self.format).increment(1);
            }
        }
        result
    }
}

/// Pick a reader for a lower-cased extension (with leading dot).
pub fn reader_for_extension(extension: &str, preamble_rows: usize) -> Result<Box<dyn TableReader>> {
    match extension {
        constants::CSV_EXTENSION => Ok(Box::new(MetricsReader::new(
            CsvTableReader::new(preamble_rows),
            "csv",
        ))),
        constants::XLSX_EXTENSION => Ok(Box::new(MetricsReader::new(
            XlsxTableReader::new(preamble_rows),
            "xlsx",
        ))),
        other => Err(AnalyzerError::UnsupportedFileType {
            extension: if other.is_empty() { "(none)".to_string() } else { other.to_string() },
        }),
    }
}

/// Read a named blob, choosing the decoder from the name's extension.
pub fn read_table(name: &str, bytes: &[u8], preamble_rows: usize) -> Result<Table> {
    let extension = crate::types::extension_of(name);
    let reader = reader_for_extension(&extension, preamble_rows)?;
    let table = reader.read(bytes)?;
    debug!(
        "read {}: {} rows x {} columns",
        name,
        table.len(),
        table.width()
    );
    Ok(table)
}
