use super::super::{Exclusion, NormalizedTrial, StimCondition, TrialLabels, TrialNormalizer};
use crate::pipeline::processing::projector::{RawRecord, STROOP_SCHEMA};
use crate::types::TaskKind;

const STIM_CONDITION: usize = 0;

/// Normalizer for Stroop trials
/// Unknown stimulus conditions pass through title-cased; only blanks are excluded.
pub struct StroopNormalizer;

impl StroopNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StroopNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TrialNormalizer for StroopNormalizer {
    fn task(&self) -> TaskKind {
        TaskKind::Stroop
    }

    fn normalize(&self, record: RawRecord) -> Result<NormalizedTrial, Exclusion> {
        let stim_raw = record.field(STIM_CONDITION);
        let stim_condition = StimCondition::parse(stim_raw).or_exclude("StimCondition", stim_raw)?;

        let response_time = record.field(STROOP_SCHEMA.response_time_field).as_number();
        let correct = record.field(STROOP_SCHEMA.correct_field).as_number();

        Ok(NormalizedTrial::new(
            record,
            TrialLabels::Stroop { stim_condition },
            response_time,
            correct,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Cell, SessionMetadata};

    fn record(fields: [&str; 4]) -> RawRecord {
        RawRecord {
            source: "P5_Stroop_CRL_PRE.1.csv".to_string(),
            metadata: SessionMetadata {
                participant: "5".to_string(),
                condition: "CRL".to_string(),
                time: "PRE".to_string(),
            },
            fields: fields.iter().map(|f| Cell::text(f)).collect(),
        }
    }

    #[test]
    fn test_normalize_known_condition() {
        let trial = StroopNormalizer::new()
            .normalize(record(["INCONGRUENT", "hit", "812", "1"]))
            .unwrap();
        assert_eq!(trial.group_key, "P5_CRL_PRE_Incongruent");
        assert_eq!(trial.response_time, Some(812.0));
        assert!(trial.is_accurate());
    }

    #[test]
    fn test_unknown_condition_passes_through() {
        let trial = StroopNormalizer::new()
            .normalize(record(["neutral", "miss", "700", "0"]))
            .unwrap();
        assert_eq!(trial.group_key, "P5_CRL_PRE_Neutral");
        assert!(!trial.is_accurate());
    }

    #[test]
    fn test_blank_condition_excluded() {
        let err = StroopNormalizer::new()
            .normalize(record(["", "", "", ""]))
            .unwrap_err();
        assert_eq!(err.field, "StimCondition");
    }
}
