use calamine::{Data, Reader, Xlsx};
use std::io::Cursor;

use super::{Table, TableReader};
use crate::error::{AnalyzerError, Result};
use crate::types::Cell;

/// Reads the first worksheet of an XLSX workbook.
pub struct XlsxTableReader {
    preamble_rows: usize,
}

impl XlsxTableReader {
    pub fn new(preamble_rows: usize) -> Self {
        Self { preamble_rows }
    }
}

impl TableReader for XlsxTableReader {
    fn read(&self, bytes: &[u8]) -> Result<Table> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or(AnalyzerError::NoWorksheet)??;

        // calamine trims leading empty rows/columns; restore absolute positions
        let (row_offset, col_offset) = range
            .start()
            .map(|(r, c)| (r as usize, c as usize))
            .unwrap_or((0, 0));

        let mut grid: Vec<Vec<Cell>> = vec![Vec::new(); row_offset];
        for row in range.rows() {
            let mut cells = vec![Cell::Empty; col_offset];
            cells.extend(row.iter().map(cell_from_data));
            grid.push(cells);
        }
        Ok(Table::from_grid(grid, self.preamble_rows))
    }
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::text(s),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Number(if *b { 1.0 } else { 0.0 }),
        other => Cell::text(&other.to_string()),
    }
}
