use tracing::debug;

use crate::error::Result;
use crate::pipeline::processing::projector::{project_records, RawRecord, TaskSchema};
use crate::pipeline::processing::reader::read_table;
use crate::types::{SessionMetadata, SourceFile};

/// Reads one source file and projects it into metadata-tagged rows.
pub struct SessionLoader {
    schema: &'static TaskSchema,
    preamble_rows: usize,
}

impl SessionLoader {
    pub fn new(schema: &'static TaskSchema, preamble_rows: usize) -> Self {
        Self {
            schema,
            preamble_rows,
        }
    }

    pub fn load(&self, source: &SourceFile, metadata: &SessionMetadata) -> Result<Vec<RawRecord>> {
        let table = read_table(&source.name, &source.bytes, self.preamble_rows)?;
        let records = project_records(&table, self.schema, &source.name, metadata)?;
        debug!("{}: projected {} rows", source.name, records.len());
        Ok(records)
    }
}
