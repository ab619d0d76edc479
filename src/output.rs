//! Reporting and output formatting for both pipeline stages.
//!
//! # Invocation-Scoped Reporting
//!
//! The crate never configures a process-wide logger. Every component takes a
//! [`Reporter`] for the duration of one invocation and sends all user-facing
//! text through it. The CLI hands each stage a [`Console`]; tests hand in a
//! recording reporter and assert on the exact lines.
//!
//! # Output Format
//!
//! ```text
//! Visiting /home/dev/app/libs/widgets.zip
//! Visited 2 resource locations (3 files) in 12 ms
//! Created bundler configuration file: /home/dev/app/bundler.config.js
//! ```
//!
//! # Architecture
//!
//! Every line is produced by a pure `format_*` function — no I/O, no side
//! effects — so tests can assert on exact text. [`Console`] is the production
//! sink: info to stdout, warnings to stderr, debug only when verbose.

use std::path::Path;

/// Reporting capability handed to each pipeline stage for one invocation.
///
/// Levels mirror what the stages need: `debug` for per-file detail, `info`
/// for the lines a build log should always carry, `warn` for advisory
/// conditions that do not stop the run.
pub trait Reporter {
    /// Per-location and per-file detail; hidden unless verbose.
    fn debug(&self, message: &str);

    /// Lines every build log should carry (summaries, created files).
    fn info(&self, message: &str);

    /// Advisory conditions that leave the run going.
    fn warn(&self, message: &str);
}

/// Production reporter: info to stdout, warnings to stderr, debug behind
/// the verbose flag.
pub struct Console {
    verbose: bool,
}

impl Console {
    pub fn new(verbose: bool) -> Self {
        Console { verbose }
    }
}

impl Reporter for Console {
    fn debug(&self, message: &str) {
        if self.verbose {
            println!("{}", message);
        }
    }

    fn info(&self, message: &str) {
        println!("{}", message);
    }

    fn warn(&self, message: &str) {
        eprintln!("warning: {}", message);
    }
}

// ============================================================================
// Collector lines
// ============================================================================

/// Debug line emitted once per resource location as it is scanned.
pub fn format_visit(location: &Path) -> String {
    format!("Visiting {}", location.display())
}

/// The collector's one summary line: location count, file count, elapsed time.
pub fn format_collect_summary(locations: usize, files: usize, elapsed_ms: u128) -> String {
    format!(
        "Visited {} resource location{} ({} file{}) in {} ms",
        locations,
        plural(locations),
        files,
        plural(files),
        elapsed_ms
    )
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

// ============================================================================
// Materializer lines
// ============================================================================

/// Debug line for a freshly created primary bundler config.
pub fn format_config_created(path: &Path) -> String {
    format!("Created bundler configuration file: {}", path.display())
}

/// Info line for a freshly created dev-server config.
pub fn format_devserver_created(path: &Path) -> String {
    format!("Created dev-server configuration file: {}", path.display())
}

/// Advisory warning for a pre-existing primary config that never imports the
/// generated companion. The file is left untouched; the user either wires the
/// import back in or deletes the file to get a fresh one.
pub fn format_marker_warning(config_path: &Path, marker: &str) -> String {
    format!(
        "{} does not reference '{}'. Verify that the generated settings are \
         merged into the exported configuration, or delete the file to have \
         a fresh one created.",
        config_path.display(),
        marker
    )
}

// ============================================================================
// Tests + recording reporter
// ============================================================================
