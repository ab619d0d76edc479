//! Shared test utilities for the frontstage test suite.
//!
//! Small filesystem builders for fixture trees and zip archives, plus a
//! sorted directory lister for asserting on collector output.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_file(&tmp.path().join("loc/resources/frontend/app.js"), b"app");
//! write_zip(
//!     &tmp.path().join("widgets.zip"),
//!     &[("resources/frontend/widget.js", b"widget")],
//! );
//!
//! assert_eq!(list_files(&tmp.path().join("loc")), vec![
//!     PathBuf::from("resources/frontend/app.js"),
//! ]);
//! ```

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

// =========================================================================
// Fixture builders
// =========================================================================

/// Write a file, creating parent directories as needed.
pub fn write_file(path: &Path, contents: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

/// Build a zip archive from `(entry name, contents)` pairs.
///
/// Entry names use forward slashes, the way zip stores them.
pub fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let file = fs::File::create(path).unwrap();
    let mut writer = ZipWriter::new(file);
    for (name, contents) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(contents).unwrap();
    }
    writer.finish().unwrap();
}

// =========================================================================
// Output assertions
// =========================================================================

/// All files under `dir`, as sorted paths relative to it.
///
/// A missing directory lists as empty, so assertions on untouched targets
/// stay one-liners.
pub fn list_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            entry
                .path()
                .strip_prefix(dir)
                .expect("walk entries stay under their root")
                .to_path_buf()
        })
        .collect();
    files.sort();
    files
}
