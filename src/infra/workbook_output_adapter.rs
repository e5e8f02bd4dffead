use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::fs;
use std::path::PathBuf;

use crate::app::ports::ReportOutputPort;
use crate::error::Result;
use crate::pipeline::{Report, ReportTable};
use crate::types::Cell;

/// Writes the two-sheet workbook: summary first, combined raw second.
pub struct WorkbookOutputAdapter {
    path: PathBuf,
}

impl WorkbookOutputAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn write_table(sheet: &mut Worksheet, table: &ReportTable, header: &Format) -> Result<()> {
        sheet.set_name(&table.name)?;
        for (col, name) in table.columns.iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, name, header)?;
        }
        for (row_idx, row) in table.rows.iter().enumerate() {
            let row_num = row_idx as u32 + 1;
            for (col, cell) in row.iter().enumerate() {
                let col = col as u16;
                match cell {
                    // Empty cells stay blank
                    Cell::Empty => {}
                    Cell::Number(n) => {
                        sheet.write_number(row_num, col, *n)?;
                    }
                    Cell::Text(s) => {
                        sheet.write_string(row_num, col, s)?;
                    }
                }
            }
        }
        sheet.autofit();
        Ok(())
    }

    /// Build the workbook in memory.
    pub fn to_bytes(report: &Report) -> Result<Vec<u8>> {
        let header = Format::new().set_bold();
        let mut workbook = Workbook::new();
        Self::write_table(workbook.add_worksheet(), &report.summary, &header)?;
        Self::write_table(workbook.add_worksheet(), &report.raw, &header)?;
        Ok(workbook.save_to_buffer()?)
    }
}

impl ReportOutputPort for WorkbookOutputAdapter {
    fn name(&self) -> &'static str {
        "xlsx"
    }

    fn write_report(&self, report: &Report) -> Result<PathBuf> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let bytes = Self::to_bytes(report)?;
        fs::write(&self.path, bytes)?;
        Ok(self.path.clone())
    }
}
