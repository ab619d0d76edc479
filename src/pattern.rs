//! Glob-style inclusion patterns for resource collection.
//!
//! Each resource root inside a location carries an ordered set of patterns
//! deciding which entries are copied out of it. Only two pattern shapes are
//! in use, so this module implements exactly those instead of pulling in a
//! full glob engine:
//!
//! - `**/*.<ext>` — match any entry, at any depth, by filename suffix
//!   (`**/*.js` matches `x.js` and `scripts/vendor/x.js`).
//! - `**/<dir>/**/*` — match any entry lying somewhere below a `<dir>`
//!   path component (`**/themes/**/*` matches `themes/dark/button.css` and
//!   `vendor/themes/logo.svg`, but not a plain file named `themes`).
//!
//! Paths are matched in their forward-slash rendering, relative to the
//! resource root they were found under.

/// A single parsed inclusion pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncludePattern {
    /// `**/*.<ext>` — filename suffix match, stored with the leading dot.
    Suffix(String),
    /// `**/<dir>/**/*` — anything below a directory component.
    Beneath(String),
}

impl IncludePattern {
    /// Parse one of the two supported pattern shapes.
    ///
    /// Returns `None` for anything else; the collector's pattern sets are
    /// fixed crate constants, so an unsupported shape is a programming error
    /// surfaced by [`PatternSet::parse`].
    pub fn parse(pattern: &str) -> Option<IncludePattern> {
        if let Some(suffix) = pattern.strip_prefix("**/*") {
            if suffix.starts_with('.') && !suffix.contains('/') && suffix.len() > 1 {
                return Some(IncludePattern::Suffix(suffix.to_string()));
            }
        }
        if let Some(rest) = pattern.strip_prefix("**/") {
            if let Some(dir) = rest.strip_suffix("/**/*") {
                if !dir.is_empty() && !dir.contains('/') && !dir.contains('*') {
                    return Some(IncludePattern::Beneath(dir.to_string()));
                }
            }
        }
        None
    }

    /// Test a forward-slash relative path against this pattern.
    pub fn matches(&self, path: &str) -> bool {
        match self {
            IncludePattern::Suffix(suffix) => {
                path.len() > suffix.len() && path.ends_with(suffix.as_str())
            }
            IncludePattern::Beneath(dir) => {
                let segments: Vec<&str> = path.split('/').collect();
                segments
                    .iter()
                    .take(segments.len().saturating_sub(1))
                    .any(|segment| segment == dir)
            }
        }
    }
}

/// An ordered set of inclusion patterns; an entry is copied if any matches.
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<IncludePattern>,
}

impl PatternSet {
    /// Parse a fixed list of pattern strings.
    ///
    /// Panics on an unsupported shape — the inputs are crate constants, so
    /// this is unreachable for well-formed code (same stance the config
    /// module takes on serializing its own defaults).
    pub fn parse(patterns: &[&str]) -> PatternSet {
        PatternSet {
            patterns: patterns
                .iter()
                .map(|p| {
                    IncludePattern::parse(p)
                        .unwrap_or_else(|| panic!("unsupported inclusion pattern: {p}"))
                })
                .collect(),
        }
    }

    /// True if any pattern in the set matches the path.
    pub fn matches(&self, path: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(path))
    }
}
