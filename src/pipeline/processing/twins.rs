//! Pairing of Stroop `.1`/`.2` block files into single sessions.

use tracing::{debug, instrument};

use crate::error::AnalyzerError;
use crate::pipeline::processing::filename::{parse_filename, twin_pair_key};
use crate::pipeline::processing::projector::RawRecord;
use crate::pipeline::processing::session::SessionLoader;
use crate::types::{Diagnostics, SourceFile, TaskKind};

/// Position of the `S` (response outcome) field in the Stroop projection.
const OUTCOME_FIELD: usize = 1;
const TIMEOUT: &str = "timeout";

/// Files sharing one twin-pair key, in discovery order.
#[derive(Debug)]
pub struct TwinGroup {
    pub key: String,
    pub files: Vec<SourceFile>,
}

/// Group files by pairing key; groups keep the order of their first file.
pub fn group_twins(sources: Vec<SourceFile>) -> Vec<TwinGroup> {
    let mut groups: Vec<TwinGroup> = Vec::new();
    for source in sources {
        let key = twin_pair_key(&source.name);
        match groups.iter_mut().find(|g| g.key == key) {
            Some(group) => group.files.push(source),
            None => groups.push(TwinGroup {
                key,
                files: vec![source],
            }),
        }
    }
    groups
}

#[derive(Debug, Default)]
pub struct ReconciledRecords {
    pub records: Vec<RawRecord>,
    pub timeouts_dropped: usize,
}

/// Drop trials whose outcome is a timeout (case-insensitive), returning how many.
pub fn drop_timeouts(records: &mut Vec<RawRecord>) -> usize {
    let before = records.len();
    records.retain(|r| !r.field(OUTCOME_FIELD).to_string().eq_ignore_ascii_case(TIMEOUT));
    before - records.len()
}

/// Concatenate each twin group into one session's rows.
///
/// Metadata comes from the first file of a group. Groups that are not
/// exactly a pair are still processed, with a warning.
#[instrument(skip_all, fields(files = sources.len()))]
pub fn reconcile(
    sources: Vec<SourceFile>,
    loader: &SessionLoader,
    diagnostics: &mut Diagnostics,
) -> ReconciledRecords {
    let mut out = ReconciledRecords::default();

    for group in group_twins(sources) {
        let first_name = &group.files[0].name;
        let metadata = match parse_filename(first_name, TaskKind::Stroop) {
            Ok(metadata) => metadata,
            Err(err) => {
                for file in &group.files {
                    diagnostics.record(&file.name, &err);
                }
                continue;
            }
        };

        if group.files.len() != 2 {
            let err = AnalyzerError::IncompleteTwinPair {
                key: group.key.clone(),
                count: group.files.len(),
            };
            diagnostics.record(first_name, &err);
        }

        let mut session_rows = Vec::new();
        for file in &group.files {
            match loader.load(file, &metadata) {
                Ok(rows) => session_rows.extend(rows),
                Err(err) => diagnostics.record(&file.name, &err),
            }
        }

        let dropped = drop_timeouts(&mut session_rows);
        if dropped > 0 {
            debug!("{}: dropped {} timeout trials", group.key, dropped);
        }
        out.timeouts_dropped += dropped;
        out.records.extend(session_rows);
    }

    metrics::counter!("analyzer_timeouts_dropped_total").increment(out.timeouts_dropped as u64);
    out
}
