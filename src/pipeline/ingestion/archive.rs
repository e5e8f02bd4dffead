//! Expansion of a zip archive into the tabular files it contains.

use std::io::{Cursor, Read};
use tracing::{debug, instrument};
use zip::result::ZipError;
use zip::ZipArchive;

use crate::constants;
use crate::error::{AnalyzerError, Result};
use crate::types::{extension_of, SourceFile, SourceOrigin};

/// Every supported file in the archive, with its internal path as name.
///
/// Any failure while enumerating or reading fails the whole archive; no
/// partial set of entries is returned.
#[instrument(skip(archive), fields(archive = %archive.name, bytes = archive.bytes.len()))]
pub fn expand_archive(archive: &SourceFile) -> Result<Vec<SourceFile>> {
    let mut zip = ZipArchive::new(Cursor::new(archive.bytes.as_slice()))?;
    let mut entries = Vec::new();

    for index in 0..zip.len() {
        let mut entry = zip.by_index(index)?;
        if entry.is_dir() {
            continue;
        }
        let name = entry.name().to_string();
        let extension = extension_of(&name);
        if !constants::is_supported_extension(&extension) {
            debug!("skipping archive entry {} ({})", name, extension);
            continue;
        }

        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry
            .read_to_end(&mut bytes)
            .map_err(|e| AnalyzerError::ArchiveRead(ZipError::Io(e)))?;
        entries.push(SourceFile {
            name,
            bytes,
            origin: SourceOrigin::Archive {
                archive: archive.name.clone(),
            },
        });
    }

    debug!("expanded {} tabular entries", entries.len());
    Ok(entries)
}
