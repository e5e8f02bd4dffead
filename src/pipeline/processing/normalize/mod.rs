//! Canonical labels, group keys and row exclusion.
//!
//! Categorical lookups are total: every raw value maps either to a known
//! label or to `LabelMatch::Unmatched`, and a row with any unmatched
//! grouping field is excluded before aggregation.

pub mod normalizers;

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::constants;
use crate::pipeline::processing::projector::RawRecord;
use crate::types::{Cell, SessionMetadata, TaskKind};

pub use normalizers::{normalizer_for, StroopNormalizer, VisualSearchNormalizer};

/// Outcome of a categorical lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelMatch<T> {
    Known(T),
    Unmatched,
}

impl<T> LabelMatch<T> {
    /// Turn a miss into an `Exclusion` naming the field and raw value.
    pub fn or_exclude(self, field: &'static str, raw: &Cell) -> Result<T, Exclusion> {
        match self {
            LabelMatch::Known(value) => Ok(value),
            LabelMatch::Unmatched => Err(Exclusion {
                field,
                raw: raw.to_string(),
            }),
        }
    }
}

fn folded(raw: &Cell) -> String {
    raw.to_string().trim().to_lowercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchType {
    Feature,
    Conjunction,
}

impl SearchType {
    pub fn parse(raw: &Cell) -> LabelMatch<Self> {
        match folded(raw).as_str() {
            "feature" => LabelMatch::Known(SearchType::Feature),
            "conjunction" => LabelMatch::Known(SearchType::Conjunction),
            _ => LabelMatch::Unmatched,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SearchType::Feature => "Feature",
            SearchType::Conjunction => "Conj",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetPresence {
    Present,
    Absent,
}

impl TargetPresence {
    pub fn parse(raw: &Cell) -> LabelMatch<Self> {
        match folded(raw).as_str() {
            "present" => LabelMatch::Known(TargetPresence::Present),
            "absent" => LabelMatch::Known(TargetPresence::Absent),
            _ => LabelMatch::Unmatched,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TargetPresence::Present => "P",
            TargetPresence::Absent => "A",
        }
    }
}

/// First two characters of the raw set-size field, kept as text so that
/// zero-padded codes like `04` survive.
pub fn set_size_code(raw: &Cell) -> LabelMatch<String> {
    if raw.is_empty() {
        return LabelMatch::Unmatched;
    }
    let code: String = raw.to_string().chars().take(2).collect();
    if code.trim().is_empty() {
        LabelMatch::Unmatched
    } else {
        LabelMatch::Known(code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StimCondition {
    Congruent,
    Incongruent,
    DoublyIncongruent,
    /// Any other non-blank value, title-cased.
    Other(String),
}

impl StimCondition {
    pub fn parse(raw: &Cell) -> LabelMatch<Self> {
        let text = raw.to_string();
        let text = text.trim();
        match text.to_lowercase().as_str() {
            // The pass-through has nothing to title-case here, and a group
            // key needs a non-empty label, so blank conditions are dropped.
            "" => LabelMatch::Unmatched,
            "congruent" => LabelMatch::Known(StimCondition::Congruent),
            "incongruent" => LabelMatch::Known(StimCondition::Incongruent),
            "doubly incongruent" => LabelMatch::Known(StimCondition::DoublyIncongruent),
            _ => LabelMatch::Known(StimCondition::Other(title_case(text))),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            StimCondition::Congruent => "Congruent",
            StimCondition::Incongruent => "Incongruent",
            StimCondition::DoublyIncongruent => "Doubly Incongruent",
            StimCondition::Other(label) => label,
        }
    }
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest.
pub fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut previous_alpha = false;
    for ch in raw.chars() {
        if ch.is_alphabetic() {
            if previous_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            previous_alpha = true;
        } else {
            out.push(ch);
            previous_alpha = false;
        }
    }
    out
}

/// Canonical categorical labels of one trial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrialLabels {
    VisualSearch {
        search_type: SearchType,
        presence: TargetPresence,
        set_size: String,
    },
    Stroop {
        stim_condition: StimCondition,
    },
}

impl TrialLabels {
    /// Label values in group-key (and sort) order.
    pub fn values(&self) -> Vec<String> {
        match self {
            TrialLabels::VisualSearch {
                search_type,
                presence,
                set_size,
            } => vec![
                search_type.label().to_string(),
                presence.label().to_string(),
                set_size.clone(),
            ],
            TrialLabels::Stroop { stim_condition } => vec![stim_condition.label().to_string()],
        }
    }

    /// Column names matching `values()`.
    pub fn columns(task: TaskKind) -> &'static [&'static str] {
        match task {
            TaskKind::VisualSearch => &[
                constants::CONDITION_LABEL_COLUMN,
                constants::PRESENCE_LABEL_COLUMN,
                constants::SET_SIZE_COLUMN,
            ],
            TaskKind::Stroop => &[constants::STIM_CONDITION_LABEL_COLUMN],
        }
    }
}

/// `P{participant}_{condition}_{time}_{labels...}`
pub fn group_key(metadata: &SessionMetadata, labels: &TrialLabels) -> String {
    let mut parts = vec![
        format!("P{}", metadata.participant),
        metadata.condition.clone(),
        metadata.time.clone(),
    ];
    parts.extend(labels.values());
    parts.join("_")
}

/// A row that passed normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTrial {
    pub record: RawRecord,
    pub labels: TrialLabels,
    pub response_time: Option<f64>,
    pub correct: Option<f64>,
    pub group_key: String,
}

impl NormalizedTrial {
    pub fn new(
        record: RawRecord,
        labels: TrialLabels,
        response_time: Option<f64>,
        correct: Option<f64>,
    ) -> Self {
        let group_key = group_key(&record.metadata, &labels);
        Self {
            record,
            labels,
            response_time,
            correct,
            group_key,
        }
    }

    /// Missing or unparseable correctness never counts as accurate.
    pub fn is_accurate(&self) -> bool {
        self.correct == Some(1.0)
    }
}

/// Why a row was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exclusion {
    pub field: &'static str,
    pub raw: String,
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized {} value '{}'", self.field, self.raw)
    }
}

/// Trait for turning projected rows into labelled trials
pub trait TrialNormalizer: Send + Sync {
    fn task(&self) -> TaskKind;

    fn normalize(&self, record: RawRecord) -> Result<NormalizedTrial, Exclusion>;
}

#[derive(Debug, Default)]
pub struct NormalizationOutcome {
    pub trials: Vec<NormalizedTrial>,
    pub excluded: usize,
}

/// Normalize every record, keeping input order and counting exclusions.
pub fn normalize_all(normalizer: &dyn TrialNormalizer, records: Vec<RawRecord>) -> NormalizationOutcome {
    let mut outcome = NormalizationOutcome::default();
    for record in records {
        let source = record.source.clone();
        match normalizer.normalize(record) {
            Ok(trial) => outcome.trials.push(trial),
            Err(exclusion) => {
                debug!("excluding row from {}: {}", source, exclusion);
                outcome.excluded += 1;
            }
        }
    }
    metrics::counter!("analyzer_rows_excluded_total", "task" => normalizer.task().name())
        .increment(outcome.excluded as u64);
    outcome
}
