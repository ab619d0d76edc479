//! Frontend resource collection.
//!
//! Stage 1 of the frontstage pipeline. Gathers the frontend files that
//! project dependencies ship inside their packages into one staged directory
//! the bundler can resolve imports from.
//!
//! ## Resource Layout
//!
//! Every resource location — a plain directory or a zip archive — is probed
//! for fixed resource roots:
//!
//! ```text
//! <location>/
//! ├── resources/frontend/           # current layout
//! ├── resources/static/frontend/    # legacy layout
//! └── resources/**/themes/          # packaged themes (archives only)
//! ```
//!
//! Directory locations have their recognized roots copied wholesale: they are
//! project modules under the user's control, so nothing is filtered out.
//! Archive locations are filtered down to `*.js`, `*.css`, `*.ts` and `*.map`
//! files under the frontend roots, plus everything below a `themes/` folder.
//!
//! All roots merge flat into the target directory. A later location silently
//! overwrites an earlier one's file of the same relative path; nothing tracks
//! where a staged file came from.

use crate::archive::{ArchiveError, ArchiveSource, ZipSource};
use crate::output::{self, Reporter};
use crate::pattern::PatternSet;
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum CollectError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Archive extraction failed: {0}")]
    Archive(#[from] ArchiveError),
}

/// Subpath holding a location's current-layout frontend resources.
const CURRENT_ROOT: &str = "resources/frontend";
/// Older layout still found in published packages.
const LEGACY_ROOT: &str = "resources/static/frontend";
/// Root probed for packaged themes; archives only.
const THEME_ROOT: &str = "resources";

const FRONTEND_INCLUSIONS: &[&str] = &["**/*.js", "**/*.css", "**/*.ts", "**/*.map"];
const THEME_INCLUSIONS: &[&str] = &["**/themes/**/*"];

/// Where to collect from and where to stage to.
///
/// Locations that do not exist on disk are dropped at construction time,
/// silently: a dependency without packaged frontend resources is normal, not
/// an error. The surviving locations form a set; callers must not rely on
/// any particular processing order.
#[derive(Debug, Clone)]
pub struct CollectOptions {
    target_dir: PathBuf,
    locations: BTreeSet<PathBuf>,
}

impl CollectOptions {
    pub fn new(
        target_dir: impl Into<PathBuf>,
        locations: impl IntoIterator<Item = PathBuf>,
    ) -> Self {
        Self {
            target_dir: target_dir.into(),
            locations: locations
                .into_iter()
                .filter(|location| location.exists())
                .collect(),
        }
    }

    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    pub fn locations(&self) -> &BTreeSet<PathBuf> {
        &self.locations
    }
}

/// What a collection run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectSummary {
    pub locations_visited: usize,
    pub files_copied: usize,
    pub elapsed: Duration,
}

/// Collect frontend resources using the zip-backed archive source.
pub fn collect(
    options: &CollectOptions,
    reporter: &impl Reporter,
) -> Result<CollectSummary, CollectError> {
    collect_with_source(&ZipSource, options, reporter)
}

/// Collect using a specific archive source (allows testing with a mock).
///
/// Creates the target directory if needed, visits every location once, and
/// ends with one summary line through the reporter. The first failed copy
/// aborts the run; files staged before it stay where they are.
pub fn collect_with_source(
    source: &impl ArchiveSource,
    options: &CollectOptions,
    reporter: &impl Reporter,
) -> Result<CollectSummary, CollectError> {
    let start = Instant::now();
    fs::create_dir_all(options.target_dir())?;

    let frontend_patterns = PatternSet::parse(FRONTEND_INCLUSIONS);
    let theme_patterns = PatternSet::parse(THEME_INCLUSIONS);

    let mut files_copied = 0;
    for location in options.locations() {
        reporter.debug(&output::format_visit(location));

        if location.is_dir() {
            files_copied += copy_local_resources(location, options.target_dir())?;
        } else {
            for (root, patterns) in [
                (CURRENT_ROOT, &frontend_patterns),
                (LEGACY_ROOT, &frontend_patterns),
                (THEME_ROOT, &theme_patterns),
            ] {
                files_copied +=
                    source.extract_matching(location, root, patterns, options.target_dir())?;
            }
        }
    }

    let summary = CollectSummary {
        locations_visited: options.locations().len(),
        files_copied,
        elapsed: start.elapsed(),
    };
    reporter.info(&output::format_collect_summary(
        summary.locations_visited,
        summary.files_copied,
        summary.elapsed.as_millis(),
    ));
    Ok(summary)
}

/// Copy the recognized resource roots of a directory location wholesale.
fn copy_local_resources(location: &Path, target: &Path) -> Result<usize, CollectError> {
    let mut copied = 0;
    for root in [CURRENT_ROOT, LEGACY_ROOT] {
        let source_root = location.join(root);
        if !source_root.is_dir() {
            continue;
        }
        for entry in WalkDir::new(&source_root) {
            let entry = entry.map_err(io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(&source_root)
                .expect("walk entries stay under their root");
            let destination = target.join(relative);
            if let Some(parent) = destination.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &destination)?;
            copied += 1;
        }
    }
    Ok(copied)
}
