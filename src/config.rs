//! Project-layout configuration.
//!
//! Handles loading, merging, and validating `frontstage.toml`. One file at
//! the project root describes where frontend sources live, where build output
//! goes, and which resource locations the collector should visit.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! frontend_dir = "frontend"                          # project frontend sources
//! generated_dir = "frontend/generated"               # tool-generated sources
//! build_output_dir = "build/bundle"                  # bundler output
//! resource_output_dir = "build/resources"            # non-served build artifacts
//! entry_point = "build/frontend/generated-imports.js"
//! bundled_frontend_dir = "build/bundled-frontend"    # collector target
//! build_folder = "build"                             # top-level build folder name
//! legacy_bootstrap = false
//! locations = []                                     # dirs/archives to collect from
//!
//! [pwa]
//! enabled = false
//! offline = true
//! offline_path = "offline.html"
//! ```
//!
//! All paths are relative to the project root; the CLI resolves them before
//! handing them to the pipeline stages.
//!
//! ## Partial Configuration
//!
//! Config files are sparse — override just the values you want:
//!
//! ```toml
//! locations = ["libs/widgets.zip"]
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up under the project root.
pub const CONFIG_FILE_NAME: &str = "frontstage.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Project layout loaded from `frontstage.toml`.
///
/// All fields have defaults matching the conventional layout, so a missing
/// or empty config file is perfectly usable. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Directory holding the project's own frontend sources.
    pub frontend_dir: String,
    /// Directory for tool-generated frontend sources.
    pub generated_dir: String,
    /// Where the bundler writes its output.
    pub build_output_dir: String,
    /// Where build artifacts that are not served land.
    pub resource_output_dir: String,
    /// The generated main entry-point file.
    pub entry_point: String,
    /// Target directory for collected dependency resources.
    pub bundled_frontend_dir: String,
    /// Name of the top-level build folder (a plain name, not a path).
    pub build_folder: String,
    /// Use the legacy bootstrapping mode instead of the client-side index.
    pub legacy_bootstrap: bool,
    /// Resource locations (directories or zip archives) for the collector.
    pub locations: Vec<String>,
    /// Progressive-web-app switches.
    pub pwa: PwaConfig,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            frontend_dir: "frontend".to_string(),
            generated_dir: "frontend/generated".to_string(),
            build_output_dir: "build/bundle".to_string(),
            resource_output_dir: "build/resources".to_string(),
            entry_point: "build/frontend/generated-imports.js".to_string(),
            bundled_frontend_dir: "build/bundled-frontend".to_string(),
            build_folder: "build".to_string(),
            legacy_bootstrap: false,
            locations: Vec::new(),
            pwa: PwaConfig::default(),
        }
    }
}

impl ProjectConfig {
    /// Validate config values before any stage touches the filesystem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.build_folder.is_empty() {
            return Err(ConfigError::Validation(
                "build_folder must not be empty".into(),
            ));
        }
        if self.build_folder.contains('/') || self.build_folder.contains('\\') {
            return Err(ConfigError::Validation(
                "build_folder must be a plain directory name without separators".into(),
            ));
        }
        if self.bundled_frontend_dir.is_empty() {
            return Err(ConfigError::Validation(
                "bundled_frontend_dir must not be empty".into(),
            ));
        }
        if self.pwa.offline && self.pwa.offline_path.is_empty() {
            return Err(ConfigError::Validation(
                "pwa.offline_path must not be empty when pwa.offline is set".into(),
            ));
        }
        Ok(())
    }
}

/// Progressive-web-app switches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PwaConfig {
    /// Emit a service-worker entry point.
    pub enabled: bool,
    /// Serve a fallback page while offline.
    pub offline: bool,
    /// The fallback page, relative to the project root.
    pub offline_path: String,
}

impl Default for PwaConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            offline: true,
            offline_path: "offline.html".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ProjectConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if it exists but contains invalid TOML.
pub fn load_raw_config(config_path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ProjectConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ProjectConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the project config from the given file path.
///
/// Merges user values on top of stock defaults, rejects unknown keys, and
/// validates the result. A missing file yields the stock defaults.
pub fn load_config(config_path: &Path) -> Result<ProjectConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(config_path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `frontstage.toml` with all keys and
/// explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# frontstage configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Paths are relative to the project root. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Project layout
# ---------------------------------------------------------------------------
# Directory holding the project's own frontend sources.
frontend_dir = "frontend"

# Directory for tool-generated frontend sources (bootstrap files, imports).
generated_dir = "frontend/generated"

# Where the bundler writes its output.
build_output_dir = "build/bundle"

# Where build artifacts that are not served land (manifests, stats).
resource_output_dir = "build/resources"

# The generated main entry-point file the bundle starts from.
entry_point = "build/frontend/generated-imports.js"

# Target directory for frontend resources collected out of dependencies.
bundled_frontend_dir = "build/bundled-frontend"

# Name of the top-level build folder. A plain directory name, not a path.
build_folder = "build"

# Use the legacy bootstrapping mode instead of the client-side index file.
legacy_bootstrap = false

# ---------------------------------------------------------------------------
# Resource collection
# ---------------------------------------------------------------------------
# Locations the collector copies frontend resources from. Each entry is a
# directory or a zip archive; entries that do not exist are skipped.
locations = []

# ---------------------------------------------------------------------------
# Progressive web app
# ---------------------------------------------------------------------------
[pwa]
# Emit a service-worker entry point.
enabled = false

# Serve a fallback page while offline.
offline = true

# The fallback page, relative to the project root.
offline_path = "offline.html"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_matches_conventional_layout() {
        let config = ProjectConfig::default();
        assert_eq!(config.frontend_dir, "frontend");
        assert_eq!(config.generated_dir, "frontend/generated");
        assert_eq!(config.build_output_dir, "build/bundle");
        assert_eq!(config.bundled_frontend_dir, "build/bundled-frontend");
        assert_eq!(config.build_folder, "build");
        assert!(!config.legacy_bootstrap);
        assert!(config.locations.is_empty());
    }

    #[test]
    fn default_pwa_is_disabled_with_offline_fallback() {
        let config = ProjectConfig::default();
        assert!(!config.pwa.enabled);
        assert!(config.pwa.offline);
        assert_eq!(config.pwa.offline_path, "offline.html");
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
locations = ["libs/widgets.zip"]
"#;
        let config: ProjectConfig = toml::from_str(toml).unwrap();
        // Overridden value
        assert_eq!(config.locations, vec!["libs/widgets.zip".to_string()]);
        // Default values preserved
        assert_eq!(config.frontend_dir, "frontend");
        assert_eq!(config.build_folder, "build");
    }

    #[test]
    fn parse_pwa_section() {
        let toml = r#"
[pwa]
enabled = true
offline_path = "fallback.html"
"#;
        let config: ProjectConfig = toml::from_str(toml).unwrap();
        assert!(config.pwa.enabled);
        // Unspecified pwa default preserved
        assert!(config.pwa.offline);
        assert_eq!(config.pwa.offline_path, "fallback.html");
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join(CONFIG_FILE_NAME)).unwrap();

        assert_eq!(config.frontend_dir, "frontend");
        assert_eq!(config.entry_point, "build/frontend/generated-imports.js");
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(CONFIG_FILE_NAME);

        fs::write(
            &config_path,
            r#"
frontend_dir = "web"
locations = ["libs/a.zip", "modules/b"]
"#,
        )
        .unwrap();

        let config = load_config(&config_path).unwrap();
        assert_eq!(config.frontend_dir, "web");
        assert_eq!(config.locations.len(), 2);
        // Unspecified values should be defaults
        assert_eq!(config.build_output_dir, "build/bundle");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(CONFIG_FILE_NAME);

        fs::write(&config_path, "this is not valid toml [[[").unwrap();

        let result = load_config(&config_path);
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, r#"build_folder = """#).unwrap();

        let result = load_config(&config_path);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str(r#"build_folder = "build""#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"build_folder = "target""#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("build_folder").unwrap().as_str(), Some("target"));
    }

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str(
            r#"
[pwa]
enabled = false
offline = true
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[pwa]
enabled = true
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let pwa = merged.get("pwa").unwrap();
        assert_eq!(pwa.get("enabled").unwrap().as_bool(), Some(true));
        // offline preserved from base
        assert_eq!(pwa.get("offline").unwrap().as_bool(), Some(true));
    }

    #[test]
    fn merge_toml_preserves_base_keys() {
        let base: toml::Value = toml::from_str(
            r#"
a = 1
b = 2
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(r#"a = 10"#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("a").unwrap().as_integer(), Some(10));
        assert_eq!(merged.get("b").unwrap().as_integer(), Some(2));
    }

    #[test]
    fn merge_toml_replaces_arrays_entirely() {
        let base: toml::Value = toml::from_str(r#"locations = ["a", "b"]"#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"locations = ["c"]"#).unwrap();
        let merged = merge_toml(base, overlay);
        let locations = merged.get("locations").unwrap().as_array().unwrap();
        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0].as_str(), Some("c"));
    }

    // =========================================================================
    // Unknown key rejection tests
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let toml_str = r#"fronted_dir = "typo""#;
        let result: Result<ProjectConfig, _> = toml::from_str(toml_str);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_nested_key_rejected() {
        let toml_str = r#"
[pwa]
offline_page = "offline.html"
"#;
        let result: Result<ProjectConfig, _> = toml::from_str(toml_str);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_key_rejected_via_load_config() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, r#"fronted_dir = "typo""#).unwrap();

        let result = load_config(&config_path);
        assert!(result.is_err());
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        let config = ProjectConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_empty_build_folder() {
        let mut config = ProjectConfig::default();
        config.build_folder = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("build_folder"));
    }

    #[test]
    fn validate_build_folder_with_separator() {
        let mut config = ProjectConfig::default();
        config.build_folder = "build/out".to_string();
        assert!(config.validate().is_err());

        config.build_folder = "build\\out".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_empty_bundled_frontend_dir() {
        let mut config = ProjectConfig::default();
        config.bundled_frontend_dir = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_offline_path_required_when_offline() {
        let mut config = ProjectConfig::default();
        config.pwa.offline = true;
        config.pwa.offline_path = String::new();
        assert!(config.validate().is_err());

        // Not required once offline support is off.
        config.pwa.offline = false;
        assert!(config.validate().is_ok());
    }

    // =========================================================================
    // resolve_config / load_raw_config tests
    // =========================================================================

    #[test]
    fn load_raw_config_returns_none_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let result = load_raw_config(&tmp.path().join(CONFIG_FILE_NAME)).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn load_raw_config_returns_value_when_file_exists() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, r#"build_folder = "target""#).unwrap();

        let result = load_raw_config(&config_path).unwrap();
        assert!(result.is_some());
        let val = result.unwrap();
        assert_eq!(val.get("build_folder").unwrap().as_str(), Some("target"));
    }

    #[test]
    fn resolve_config_with_no_overlay() {
        let base = stock_defaults_value();
        let config = resolve_config(base, None).unwrap();
        assert_eq!(config.frontend_dir, "frontend");
        assert_eq!(config.build_folder, "build");
    }

    #[test]
    fn resolve_config_with_overlay() {
        let base = stock_defaults_value();
        let overlay: toml::Value = toml::from_str(
            r#"
legacy_bootstrap = true
"#,
        )
        .unwrap();
        let config = resolve_config(base, Some(overlay)).unwrap();
        assert!(config.legacy_bootstrap);
        // Other fields preserved from defaults
        assert_eq!(config.frontend_dir, "frontend");
    }

    #[test]
    fn resolve_config_rejects_invalid_values() {
        let base = stock_defaults_value();
        let overlay: toml::Value = toml::from_str(r#"bundled_frontend_dir = """#).unwrap();
        let result = resolve_config(base, Some(overlay));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // stock_config_toml tests
    // =========================================================================

    #[test]
    fn stock_config_toml_is_valid_toml() {
        let content = stock_config_toml();
        let _: toml::Value = toml::from_str(content).expect("stock config must be valid TOML");
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let content = stock_config_toml();
        let config: ProjectConfig = toml::from_str(content).unwrap();
        assert_eq!(config.frontend_dir, "frontend");
        assert_eq!(config.generated_dir, "frontend/generated");
        assert_eq!(config.build_output_dir, "build/bundle");
        assert_eq!(config.resource_output_dir, "build/resources");
        assert_eq!(config.entry_point, "build/frontend/generated-imports.js");
        assert_eq!(config.bundled_frontend_dir, "build/bundled-frontend");
        assert_eq!(config.build_folder, "build");
        assert!(!config.legacy_bootstrap);
        assert!(config.locations.is_empty());
        assert!(!config.pwa.enabled);
        assert_eq!(config.pwa.offline_path, "offline.html");
    }

    #[test]
    fn stock_config_toml_contains_all_sections() {
        let content = stock_config_toml();
        assert!(content.contains("frontend_dir"));
        assert!(content.contains("bundled_frontend_dir"));
        assert!(content.contains("locations"));
        assert!(content.contains("[pwa]"));
    }

    // =========================================================================
    // stock_defaults_value tests
    // =========================================================================

    #[test]
    fn stock_defaults_value_is_table() {
        let val = stock_defaults_value();
        assert!(val.is_table());
    }

    #[test]
    fn stock_defaults_value_has_all_keys() {
        let val = stock_defaults_value();
        assert!(val.get("frontend_dir").is_some());
        assert!(val.get("build_output_dir").is_some());
        assert!(val.get("locations").is_some());
        assert!(val.get("pwa").is_some());
    }
}
