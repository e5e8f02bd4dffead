//! Per-group accuracy and reaction-time statistics.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::pipeline::processing::normalize::NormalizedTrial;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStats {
    pub total: usize,
    pub accurate_count: usize,
    pub percent_accuracy: f64,
    /// Over accurate trials only; `None` when there are none.
    pub mean_rt: Option<f64>,
    /// Sample standard deviation; `None` below two accurate observations.
    pub sd_rt: Option<f64>,
}

/// Two decimals, ties to even.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Standard deviation with the n-1 denominator.
pub fn sample_sd(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((sum_sq / (values.len() - 1) as f64).sqrt())
}

/// Statistics over one group's trials.
pub fn compute_stats<'a>(trials: impl IntoIterator<Item = &'a NormalizedTrial>) -> GroupStats {
    let mut total = 0usize;
    let mut accurate_count = 0usize;
    let mut accurate_rts = Vec::new();

    for trial in trials {
        total += 1;
        if trial.is_accurate() {
            accurate_count += 1;
            // Accurate trials with an unparseable RT still count as accurate
            if let Some(rt) = trial.response_time {
                accurate_rts.push(rt);
            }
        }
    }

    let percent_accuracy = if total == 0 {
        0.0
    } else {
        round2(accurate_count as f64 / total as f64 * 100.0)
    };

    GroupStats {
        total,
        accurate_count,
        percent_accuracy,
        mean_rt: mean(&accurate_rts).map(round2),
        sd_rt: sample_sd(&accurate_rts).map(round2),
    }
}

/// Partition trials by group key and compute each group's statistics.
pub fn aggregate(trials: &[NormalizedTrial]) -> BTreeMap<String, GroupStats> {
    let mut partitions: BTreeMap<&str, Vec<&NormalizedTrial>> = BTreeMap::new();
    for trial in trials {
        partitions.entry(trial.group_key.as_str()).or_default().push(trial);
    }

    partitions
        .into_iter()
        .map(|(key, members)| (key.to_string(), compute_stats(members)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::processing::normalize::{StimCondition, TrialLabels};
    use crate::pipeline::processing::projector::RawRecord;
    use crate::types::SessionMetadata;

    fn trial(key_participant: &str, rt: Option<f64>, correct: Option<f64>) -> NormalizedTrial {
        NormalizedTrial::new(
            RawRecord {
                source: "f.csv".to_string(),
                metadata: SessionMetadata {
                    participant: key_participant.to_string(),
                    condition: "CRL".to_string(),
                    time: "PRE".to_string(),
                },
                fields: vec![],
            },
            TrialLabels::Stroop {
                stim_condition: StimCondition::Congruent,
            },
            rt,
            correct,
        )
    }

    #[test]
    fn test_round2_ties_go_to_even() {
        assert_eq!(round2(675.125), 675.12);
        assert_eq!(round2(675.375), 675.38);
    }

    #[test]
    fn test_tied_mean_rounds_to_even() {
        let trials = vec![trial("5", Some(700.0), Some(1.0)), trial("5", Some(650.25), Some(1.0))];
        assert_eq!(compute_stats(&trials).mean_rt, Some(675.12));
    }

    #[test]
    fn test_sample_sd() {
        assert_eq!(sample_sd(&[700.0]), None);
        assert_eq!(round2(sample_sd(&[700.0, 650.0]).unwrap()), 35.36);
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_stats_over_accurate_trials_only() {
        let trials = vec![
            trial("1", Some(700.0), Some(1.0)),
            trial("1", Some(650.0), Some(1.0)),
            trial("1", Some(2000.0), Some(0.0)),
            trial("1", None, None),
        ];
        let stats = compute_stats(&trials);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.accurate_count, 2);
        assert_eq!(stats.percent_accuracy, 50.0);
        assert_eq!(stats.mean_rt, Some(675.0));
        assert_eq!(stats.sd_rt, Some(35.36));
    }

    #[test]
    fn test_no_accurate_trials_leaves_rt_undefined() {
        let stats = compute_stats(&[trial("1", Some(900.0), Some(0.0))]);
        assert_eq!(stats.accurate_count, 0);
        assert_eq!(stats.percent_accuracy, 0.0);
        assert_eq!(stats.mean_rt, None);
        assert_eq!(stats.sd_rt, None);
    }

    #[test]
    fn test_empty_group() {
        let stats = compute_stats(std::iter::empty());
        assert_eq!(stats.total, 0);
        assert_eq!(stats.percent_accuracy, 0.0);
    }

    #[test]
    fn test_percent_rounding() {
        let trials = vec![
            trial("1", Some(500.0), Some(1.0)),
            trial("1", Some(500.0), Some(0.0)),
            trial("1", Some(500.0), Some(0.0)),
        ];
        assert_eq!(compute_stats(&trials).percent_accuracy, 33.33);
    }

    #[test]
    fn test_aggregate_partitions_by_key() {
        let trials = vec![
            trial("1", Some(500.0), Some(1.0)),
            trial("2", Some(600.0), Some(1.0)),
            trial("1", Some(700.0), Some(1.0)),
        ];
        let groups = aggregate(&trials);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups["P1_CRL_PRE_Congruent"].total, 2);
        assert_eq!(groups["P1_CRL_PRE_Congruent"].mean_rt, Some(600.0));
        assert_eq!(groups["P2_CRL_PRE_Congruent"].sd_rt, None);
    }
}
