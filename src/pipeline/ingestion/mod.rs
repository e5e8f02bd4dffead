// Pipeline ingestion: intake of loose files and archive members

pub mod archive;

use tracing::info;

use crate::types::{BatchInput, Diagnostics, SourceFile};

pub use archive::expand_archive;

/// Loose files first, then archive entries, each in the order given.
///
/// An unreadable archive is reported once and contributes nothing; loose
/// files are unaffected.
pub fn collect_sources(batch: BatchInput, diagnostics: &mut Diagnostics) -> Vec<SourceFile> {
    let BatchInput { files, archive } = batch;
    let mut sources = files;

    if let Some(archive) = archive {
        match expand_archive(&archive) {
            Ok(entries) => {
                info!("{}: {} tabular entries", archive.name, entries.len());
                sources.extend(entries);
            }
            Err(err) => diagnostics.record(&archive.name, &err),
        }
    }

    for source in &sources {
        metrics::counter!("analyzer_sources_collected_total", "origin" => source.origin.label())
            .increment(1);
    }
    sources
}
