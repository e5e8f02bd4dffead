// Task-specific normalizer implementations
pub mod stroop;
pub mod visual_search;

pub use stroop::StroopNormalizer;
pub use visual_search::VisualSearchNormalizer;

use super::TrialNormalizer;
use crate::types::TaskKind;

/// Get the normalizer for a task
pub fn normalizer_for(task: TaskKind) -> Box<dyn TrialNormalizer> {
    match task {
        TaskKind::VisualSearch => Box::new(VisualSearchNormalizer::new()),
        TaskKind::Stroop => Box::new(StroopNormalizer::new()),
    }
}
