//! Zip extraction into the add-ons directory.
//!
//! Every entry lands under the target directory: directories are created as
//! needed and existing files with the same name are overwritten. Entries whose
//! names would escape the target (absolute paths, `..`) are skipped.

mod error;

pub use error::ExtractError;

use std::fs::{self, File};
use std::io::{self, Read, Seek};
use std::path::{Path, PathBuf};

use tracing::{debug, instrument, warn};
use zip::ZipArchive;

use crate::download::ArchiveBuffer;

/// Counts from one extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    /// Files written.
    pub files: usize,
    /// Directory entries created.
    pub directories: usize,
    /// Entries skipped because their names were unsafe.
    pub skipped: usize,
}

/// Extracts `buffer` into `dest` on the blocking thread pool.
///
/// # Errors
///
/// Returns [`ExtractError::Archive`] for unreadable archives,
/// [`ExtractError::Io`] for filesystem failures and [`ExtractError::Task`] if
/// the blocking task dies.
#[instrument(skip(buffer), fields(dest = %dest.display(), bytes = buffer.len()))]
pub async fn extract_archive(
    buffer: ArchiveBuffer,
    dest: &Path,
) -> Result<ExtractSummary, ExtractError> {
    let dest = dest.to_path_buf();
    tokio::task::spawn_blocking(move || {
        let reader = buffer
            .into_reader()
            .map_err(|e| ExtractError::io(&dest, e))?;
        extract_zip(reader, &dest)
    })
    .await?
}

/// Extracts every entry of a zip read from `reader` into `dest`.
///
/// # Errors
///
/// Returns [`ExtractError::Archive`] if the container or an entry is corrupt,
/// or [`ExtractError::Io`] if a directory or file cannot be written.
pub fn extract_zip<R: Read + Seek>(reader: R, dest: &Path) -> Result<ExtractSummary, ExtractError> {
    let mut archive = ZipArchive::new(reader)?;
    fs::create_dir_all(dest).map_err(|e| ExtractError::io(dest, e))?;

    let mut summary = ExtractSummary::default();
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;

        let Some(relative) = entry.enclosed_name() else {
            warn!(entry = entry.name(), "skipping entry with unsafe path");
            summary.skipped += 1;
            continue;
        };
        let out_path: PathBuf = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path).map_err(|e| ExtractError::io(&out_path, e))?;
            summary.directories += 1;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ExtractError::io(parent, e))?;
        }
        let mut out = File::create(&out_path).map_err(|e| ExtractError::io(&out_path, e))?;
        io::copy(&mut entry, &mut out).map_err(|e| ExtractError::entry(&out_path, e))?;
        summary.files += 1;
    }

    debug!(
        files = summary.files,
        directories = summary.directories,
        skipped = summary.skipped,
        "archive extracted"
    );
    Ok(summary)
}
