//! Summary and enriched raw tables, ready for rendering or export.

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use crate::constants;
use crate::pipeline::processing::aggregate::GroupStats;
use crate::pipeline::processing::normalize::{NormalizedTrial, TrialLabels};
use crate::pipeline::processing::projector::TaskSchema;
use crate::types::{Cell, SessionMetadata, TaskKind};

/// A named rectangular table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportTable {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl ReportTable {
    pub fn column(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Values of one column, top to bottom.
    pub fn column_values(&self, name: &str) -> Vec<&Cell> {
        match self.column(name) {
            Some(idx) => self.rows.iter().map(|r| &r[idx]).collect(),
            None => Vec::new(),
        }
    }
}

/// One summary row in typed form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub group_key: String,
    pub metadata: SessionMetadata,
    pub labels: Vec<String>,
    pub stats: GroupStats,
}

impl GroupSummary {
    fn sort_key(&self) -> Vec<&str> {
        let mut key = vec![
            self.metadata.participant.as_str(),
            self.metadata.condition.as_str(),
            self.metadata.time.as_str(),
        ];
        key.extend(self.labels.iter().map(String::as_str));
        key.push(self.group_key.as_str());
        key
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub task: TaskKind,
    pub groups: Vec<GroupSummary>,
    pub summary: ReportTable,
    pub raw: ReportTable,
}

impl Report {
    pub fn group(&self, key: &str) -> Option<&GroupSummary> {
        self.groups.iter().find(|g| g.group_key == key)
    }
}

fn stat_cells(stats: &GroupStats) -> [Cell; 4] {
    [
        Cell::from_option(stats.mean_rt),
        Cell::from_option(stats.sd_rt),
        Cell::Number(stats.accurate_count as f64),
        Cell::Number(stats.percent_accuracy),
    ]
}

fn metadata_cells(metadata: &SessionMetadata) -> [Cell; 3] {
    [
        Cell::text(&metadata.participant),
        Cell::text(&metadata.condition),
        Cell::text(&metadata.time),
    ]
}

/// One row per group, metadata taken from the group's first trial, sorted
/// by participant, condition, time and then the task's label fields.
fn build_groups(
    trials: &[NormalizedTrial],
    stats: &BTreeMap<String, GroupStats>,
) -> Vec<GroupSummary> {
    let mut seen = HashSet::new();
    let mut groups = Vec::new();
    for trial in trials {
        if !seen.insert(trial.group_key.as_str()) {
            continue;
        }
        let Some(group_stats) = stats.get(&trial.group_key) else {
            continue;
        };
        groups.push(GroupSummary {
            group_key: trial.group_key.clone(),
            metadata: trial.record.metadata.clone(),
            labels: trial.labels.values(),
            stats: group_stats.clone(),
        });
    }
    groups.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    groups
}

fn summary_table(task: TaskKind, groups: &[GroupSummary]) -> ReportTable {
    let mut columns = vec![
        constants::GROUP_COLUMN,
        constants::PARTICIPANT_COLUMN,
        constants::CONDITION_COLUMN,
        constants::TIME_COLUMN,
    ];
    columns.extend_from_slice(TrialLabels::columns(task));
    columns.push(constants::TOTAL_TRIALS_COLUMN);
    columns.extend_from_slice(&constants::STAT_COLUMNS);

    let rows = groups
        .iter()
        .map(|group| {
            let mut row = vec![Cell::text(&group.group_key)];
            row.extend(metadata_cells(&group.metadata));
            row.extend(group.labels.iter().map(|l| Cell::text(l)));
            row.push(Cell::Number(group.stats.total as f64));
            row.extend(stat_cells(&group.stats));
            row
        })
        .collect();

    ReportTable {
        name: constants::SUMMARY_SHEET.to_string(),
        columns: columns.into_iter().map(str::to_string).collect(),
        rows,
    }
}

/// Every surviving trial, in input order, with its group's statistics
/// appended at the right.
fn raw_table(
    task: TaskKind,
    trials: &[NormalizedTrial],
    stats: &BTreeMap<String, GroupStats>,
) -> ReportTable {
    let schema = TaskSchema::for_task(task);
    let mut columns = vec![
        constants::PARTICIPANT_COLUMN,
        constants::CONDITION_COLUMN,
        constants::TIME_COLUMN,
    ];
    columns.extend(schema.field_names());
    columns.extend_from_slice(TrialLabels::columns(task));
    columns.push(constants::GROUP_COLUMN);
    columns.extend_from_slice(&constants::STAT_COLUMNS);

    let rows = trials
        .iter()
        .filter_map(|trial| {
            let group_stats = stats.get(&trial.group_key)?;
            let mut fields = trial.record.fields.clone();
            fields.resize(schema.columns.len(), Cell::Empty);
            // Reaction time and correctness are reported in coerced form
            fields[schema.response_time_field] = Cell::from_option(trial.response_time);
            fields[schema.correct_field] = Cell::from_option(trial.correct);

            let mut row = Vec::with_capacity(columns.len());
            row.extend(metadata_cells(&trial.record.metadata));
            row.extend(fields);
            row.extend(trial.labels.values().iter().map(|l| Cell::text(l)));
            row.push(Cell::text(&trial.group_key));
            row.extend(stat_cells(group_stats));
            Some(row)
        })
        .collect();

    ReportTable {
        name: constants::RAW_SHEET.to_string(),
        columns: columns.into_iter().map(str::to_string).collect(),
        rows,
    }
}

pub fn assemble(
    task: TaskKind,
    trials: &[NormalizedTrial],
    stats: &BTreeMap<String, GroupStats>,
) -> Report {
    let groups = build_groups(trials, stats);
    Report {
        task,
        summary: summary_table(task, &groups),
        raw: raw_table(task, trials, stats),
        groups,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::processing::aggregate::aggregate;
    use crate::pipeline::processing::normalize::{SearchType, StimCondition, TargetPresence};
    use crate::pipeline::processing::projector::RawRecord;

    fn stroop_trial(participant: &str, stim: StimCondition, rt: f64, correct: f64) -> NormalizedTrial {
        NormalizedTrial::new(
            RawRecord {
                source: "f.csv".to_string(),
                metadata: SessionMetadata {
                    participant: participant.to_string(),
                    condition: "CRL".to_string(),
                    time: "PRE".to_string(),
                },
                fields: vec![
                    Cell::text(stim.label()),
                    Cell::text("hit"),
                    Cell::Text(rt.to_string()),
                    Cell::Text(correct.to_string()),
                ],
            },
            TrialLabels::Stroop { stim_condition: stim },
            Some(rt),
            Some(correct),
        )
    }

    #[test]
    fn test_summary_sorted_lexicographically() {
        let trials = vec![
            stroop_trial("3", StimCondition::Incongruent, 800.0, 1.0),
            stroop_trial("10", StimCondition::Congruent, 600.0, 1.0),
            stroop_trial("3", StimCondition::Congruent, 700.0, 0.0),
        ];
        let report = assemble(TaskKind::Stroop, &trials, &aggregate(&trials));
        let keys: Vec<&str> = report.groups.iter().map(|g| g.group_key.as_str()).collect();
        assert_eq!(
            keys,
            vec!["P10_CRL_PRE_Congruent", "P3_CRL_PRE_Congruent", "P3_CRL_PRE_Incongruent"]
        );
        assert_eq!(report.summary.rows.len(), 3);
        assert_eq!(report.summary.rows[0][0], Cell::text("P10_CRL_PRE_Congruent"));
    }

    #[test]
    fn test_raw_rows_keep_input_order_and_broadcast_stats() {
        let trials = vec![
            stroop_trial("3", StimCondition::Congruent, 700.0, 1.0),
            stroop_trial("3", StimCondition::Incongruent, 800.0, 0.0),
            stroop_trial("3", StimCondition::Congruent, 650.0, 1.0),
        ];
        let report = assemble(TaskKind::Stroop, &trials, &aggregate(&trials));
        assert_eq!(report.raw.rows.len(), 3);
        let last = report.raw.columns.len() - 4;
        assert_eq!(&report.raw.columns[last..], &constants::STAT_COLUMNS.map(str::to_string));
        let means = report.raw.column_values(constants::MEAN_RT_COLUMN);
        assert_eq!(means, vec![&Cell::Number(675.0), &Cell::Empty, &Cell::Number(675.0)]);
        assert_eq!(report.raw.column_values("T")[0], &Cell::Number(700.0));
    }

    #[test]
    fn test_visual_search_columns() {
        let trial = NormalizedTrial::new(
            RawRecord {
                source: "f.csv".to_string(),
                metadata: SessionMetadata {
                    participant: "3".to_string(),
                    condition: "CRL".to_string(),
                    time: "PRE".to_string(),
                },
                fields: vec![
                    Cell::text("present"),
                    Cell::text("feature"),
                    Cell::text("04abc"),
                    Cell::text("550"),
                    Cell::text("1"),
                ],
            },
            TrialLabels::VisualSearch {
                search_type: SearchType::Feature,
                presence: TargetPresence::Present,
                set_size: "04".to_string(),
            },
            Some(550.0),
            Some(1.0),
        );
        let trials = vec![trial];
        let report = assemble(TaskKind::VisualSearch, &trials, &aggregate(&trials));
        assert_eq!(
            report.summary.columns,
            vec![
                "Group", "Participant", "Condition", "Time", "ConditionLabel", "PresenceLabel",
                "SetSize", "Total Trials", "Mean RT", "SD RT", "Accurate Responses",
                "Percent Accuracy"
            ]
        );
        assert_eq!(report.raw.columns.len(), 3 + 5 + 3 + 1 + 4);
        assert_eq!(report.raw.column_values("SetSizeRaw")[0], &Cell::text("04abc"));
        assert_eq!(report.raw.column_values("SetSize")[0], &Cell::text("04"));
    }
}
