//! Session metadata encoded in source file names.
//!
//! Expected shape: `P<participant>_<TaskMarker>_<CONDITION>_<TIMEPOINT>[.1|.2].<ext>`,
//! optionally nested under folders. Only the base name is inspected.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use crate::error::{AnalyzerError, Result};
use crate::types::{SessionMetadata, TaskKind};

/// A `.1`/`.2` block marker directly before the extension.
static TWIN_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.[12]$").expect("valid regex"));

const MIN_SEGMENTS: usize = 4;

/// Map timepoint aliases onto their canonical codes.
pub fn map_time(raw: &str) -> String {
    let upper = raw.trim().to_uppercase();
    match upper.as_str() {
        "POST1" => "POST15".to_string(),
        "POST2" => "POST30".to_string(),
        _ => upper,
    }
}

/// File name without folders or extension.
fn base_stem(name: &str) -> String {
    Path::new(name)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

pub fn strip_twin_suffix(stem: &str) -> &str {
    match TWIN_SUFFIX.find(stem) {
        Some(m) => &stem[..m.start()],
        None => stem,
    }
}

/// Parse session metadata out of a (possibly nested) file name.
pub fn parse_filename(name: &str, task: TaskKind) -> Result<SessionMetadata> {
    let stem = base_stem(name);
    let stem = if task.uses_twin_files() {
        strip_twin_suffix(&stem)
    } else {
        stem.as_str()
    };

    let parts: Vec<&str> = stem.split('_').collect();
    if parts.len() < MIN_SEGMENTS {
        return Err(AnalyzerError::UnrecognizedFilename {
            name: name.to_string(),
        });
    }

    // parts[1] is the task marker and is not checked
    let participant = parts[0].trim();
    let participant = participant.strip_prefix('P').unwrap_or(participant).trim();

    Ok(SessionMetadata {
        participant: participant.to_string(),
        condition: parts[2].trim().to_uppercase(),
        time: map_time(parts[3]),
    })
}

/// Key shared by the `.1`/`.2` halves of one Stroop session: the base
/// file name with the block marker removed. Folders are ignored and the
/// extension is kept, so halves pair across archive folders but a `.csv`
/// never pairs with an `.xlsx`.
pub fn twin_pair_key(name: &str) -> String {
    let stem = base_stem(name);
    let stripped = strip_twin_suffix(&stem);
    match Path::new(name).extension() {
        Some(ext) => format!("{}.{}", stripped, ext.to_string_lossy()),
        None => stripped.to_string(),
    }
}
