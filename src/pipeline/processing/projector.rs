//! Positional column projection, driven by a per-task schema.

use crate::error::{AnalyzerError, Result};
use crate::pipeline::processing::reader::Table;
use crate::types::{Cell, SessionMetadata, TaskKind};

/// Which source columns a task needs, and what they are called.
#[derive(Debug)]
pub struct TaskSchema {
    pub task: TaskKind,
    /// (zero-based source index, canonical field name)
    pub columns: &'static [(usize, &'static str)],
    /// Positions within the projection, not source indices.
    pub response_time_field: usize,
    pub correct_field: usize,
}

// D, E, F, S, T
pub const VISUAL_SEARCH_SCHEMA: TaskSchema = TaskSchema {
    task: TaskKind::VisualSearch,
    columns: &[
        (3, "TargetPresence"),
        (4, "SearchType"),
        (5, "SetSizeRaw"),
        (18, "ResponseTime"),
        (19, "Correct"),
    ],
    response_time_field: 3,
    correct_field: 4,
};

// C, S, T, U
pub const STROOP_SCHEMA: TaskSchema = TaskSchema {
    task: TaskKind::Stroop,
    columns: &[(2, "StimCondition"), (18, "S"), (19, "T"), (20, "U")],
    response_time_field: 2,
    correct_field: 3,
};

impl TaskSchema {
    pub fn for_task(task: TaskKind) -> &'static TaskSchema {
        match task {
            TaskKind::VisualSearch => &VISUAL_SEARCH_SCHEMA,
            TaskKind::Stroop => &STROOP_SCHEMA,
        }
    }

    pub fn max_index(&self) -> usize {
        self.columns.iter().map(|(idx, _)| *idx).max().unwrap_or(0)
    }

    pub fn field_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|(_, name)| *name).collect()
    }
}

/// One projected trial row with the metadata of the session it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub source: String,
    pub metadata: SessionMetadata,
    /// Values in schema order.
    pub fields: Vec<Cell>,
}

impl RawRecord {
    pub fn field(&self, position: usize) -> &Cell {
        self.fields.get(position).unwrap_or(&Cell::Empty)
    }
}

/// Project the schema's columns out of `table`.
///
/// Tables too narrow to hold every required index yield
/// `InsufficientColumns` instead of a partial projection.
pub fn project(table: &Table, schema: &TaskSchema) -> Result<Vec<Vec<Cell>>> {
    let required_index = schema.max_index();
    if table.width() <= required_index {
        return Err(AnalyzerError::InsufficientColumns {
            required_index,
            found: table.width(),
        });
    }

    Ok(table
        .rows
        .iter()
        .map(|row| {
            schema
                .columns
                .iter()
                .map(|(idx, _)| row[*idx].clone())
                .collect()
        })
        .collect())
}

/// Project and attach session metadata to every row.
pub fn project_records(
    table: &Table,
    schema: &TaskSchema,
    source: &str,
    metadata: &SessionMetadata,
) -> Result<Vec<RawRecord>> {
    Ok(project(table, schema)?
        .into_iter()
        .map(|fields| RawRecord {
            source: source.to_string(),
            metadata: metadata.clone(),
            fields,
        })
        .collect())
}
