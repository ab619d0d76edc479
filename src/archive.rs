//! Archive-content extraction seam.
//!
//! Packaged resource locations are zip archives. The collector consumes them
//! through the [`ArchiveSource`] trait: one operation that copies the entries
//! lying under a resource root and matching an inclusion pattern set into a
//! target directory, with the root prefix stripped off.
//!
//! The production implementation is [`ZipSource`], backed by the `zip` crate.
//! The trait keeps collection logic testable without real archives and leaves
//! room for other packaging formats behind the same seam.

use crate::pattern::PatternSet;
use std::fs::{self, File};
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid archive: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Read-side of a packaged resource location.
pub trait ArchiveSource {
    /// Copy every file entry under `root` that matches `patterns` into
    /// `target`, stripping the `root` prefix so entries land directly under
    /// the target. Returns the number of files written.
    ///
    /// `root` is a forward-slash path without a trailing slash, e.g.
    /// `resources/frontend`. Entries are matched by their path relative to
    /// that root.
    fn extract_matching(
        &self,
        archive: &Path,
        root: &str,
        patterns: &PatternSet,
        target: &Path,
    ) -> Result<usize, ArchiveError>;
}

/// Zip-backed [`ArchiveSource`].
pub struct ZipSource;

impl ArchiveSource for ZipSource {
    fn extract_matching(
        &self,
        archive: &Path,
        root: &str,
        patterns: &PatternSet,
        target: &Path,
    ) -> Result<usize, ArchiveError> {
        let file = File::open(archive)?;
        let mut zip = zip::ZipArchive::new(file)?;
        let prefix = format!("{}/", root);
        let mut copied = 0;

        for index in 0..zip.len() {
            let mut entry = zip.by_index(index)?;
            if entry.is_dir() {
                continue;
            }
            // Entries whose names escape the archive root are skipped.
            if entry.enclosed_name().is_none() {
                continue;
            }
            let name = entry.name().to_string();
            let Some(relative) = name.strip_prefix(&prefix) else {
                continue;
            };
            if relative.is_empty() || !patterns.matches(relative) {
                continue;
            }

            let destination = target.join(Path::new(relative));
            if let Some(parent) = destination.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut out = File::create(&destination)?;
            io::copy(&mut entry, &mut out)?;
            copied += 1;
        }

        Ok(copied)
    }
}
