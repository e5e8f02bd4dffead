use csv::ReaderBuilder;

use super::{Table, TableReader};
use crate::error::Result;
use crate::types::Cell;

/// Reads delimited text. Rows may have differing field counts.
pub struct CsvTableReader {
    preamble_rows: usize,
}

impl CsvTableReader {
    pub fn new(preamble_rows: usize) -> Self {
        Self { preamble_rows }
    }
}

impl TableReader for CsvTableReader {
    fn read(&self, bytes: &[u8]) -> Result<Table> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes);

        let mut grid = Vec::new();
        for record in reader.records() {
            let record = record?;
            grid.push(record.iter().map(Cell::text).collect());
        }
        Ok(Table::from_grid(grid, self.preamble_rows))
    }
}
