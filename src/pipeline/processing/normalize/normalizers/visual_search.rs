use super::super::{
    set_size_code, Exclusion, NormalizedTrial, SearchType, TargetPresence, TrialLabels,
    TrialNormalizer,
};
use crate::pipeline::processing::projector::{RawRecord, VISUAL_SEARCH_SCHEMA};
use crate::types::TaskKind;

// Positions within the visual-search projection
const TARGET_PRESENCE: usize = 0;
const SEARCH_TYPE: usize = 1;
const SET_SIZE_RAW: usize = 2;

/// Normalizer for visual-search trials
/// Unknown search types, presence values or blank set sizes exclude the row.
pub struct VisualSearchNormalizer;

impl VisualSearchNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for VisualSearchNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TrialNormalizer for VisualSearchNormalizer {
    fn task(&self) -> TaskKind {
        TaskKind::VisualSearch
    }

    fn normalize(&self, record: RawRecord) -> Result<NormalizedTrial, Exclusion> {
        let search_raw = record.field(SEARCH_TYPE);
        let search_type = SearchType::parse(search_raw).or_exclude("SearchType", search_raw)?;

        let presence_raw = record.field(TARGET_PRESENCE);
        let presence =
            TargetPresence::parse(presence_raw).or_exclude("TargetPresence", presence_raw)?;

        let set_size_raw = record.field(SET_SIZE_RAW);
        let set_size = set_size_code(set_size_raw).or_exclude("SetSizeRaw", set_size_raw)?;

        let response_time = record
            .field(VISUAL_SEARCH_SCHEMA.response_time_field)
            .as_number();
        let correct = record.field(VISUAL_SEARCH_SCHEMA.correct_field).as_number();

        Ok(NormalizedTrial::new(
            record,
            TrialLabels::VisualSearch {
                search_type,
                presence,
                set_size,
            },
            response_time,
            correct,
        ))
    }
}
