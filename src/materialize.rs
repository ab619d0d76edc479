//! Bundler configuration materialization.
//!
//! Stage 2 of the frontstage pipeline. Puts the JavaScript bundler and
//! dev-server configuration files into the project's config directory and
//! patches the generated one to match the project layout.
//!
//! ## Output Structure
//!
//! ```text
//! <config dir>/
//! ├── bundler.config.js               # user-owned; created once, never touched again
//! ├── bundler.generated.js            # tool-owned; rewritten on every run
//! ├── devserver.config.js             # user-owned; created once
//! ├── devserver.generated.js          # tool-owned; rewritten on every run
//! └── devserver-plugin-inline-css.js  # tool-owned; rewritten on every run
//! ```
//!
//! ## Patching
//!
//! The generated template declares one `const` per project-layout value
//! (folders, entry points, PWA flags). Each declaration is rewritten from a
//! [`Replacement`] list built fresh per run; the values are computed from the
//! layout first and only serialized into the text at the end. A line is
//! rewritten only when its trimmed content starts with the identifier
//! followed by a space, so user-style lines never match by accident.
//!
//! Output is deterministic: identical layout in, byte-identical file out,
//! always with `\n` line endings. Downstream watchers rely on that.

use crate::config::ProjectConfig;
use crate::output::{self, Reporter};
use crate::paths::{config_relative_path, path_resolve_expr, strip_script_extension};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MaterializeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// File names written under the config directory.
pub const BUNDLER_CONFIG: &str = "bundler.config.js";
pub const BUNDLER_GENERATED: &str = "bundler.generated.js";
pub const DEVSERVER_CONFIG: &str = "devserver.config.js";
pub const DEVSERVER_GENERATED: &str = "devserver.generated.js";
pub const DEVSERVER_INLINE_CSS_PLUGIN: &str = "devserver-plugin-inline-css.js";

/// Import marker the primary config must carry to pick up generated settings.
const GENERATED_IMPORT: &str = "./bundler.generated.js";

/// Names probed under the frontend directory; their presence flips rules
/// between literal and computed forms.
const INDEX_HTML: &str = "index.html";
const SERVICE_WORKER_TS: &str = "sw.ts";
const SERVICE_WORKER_JS: &str = "sw.js";

/// The template set shipped inside the binary.
///
/// Tests swap in small literals to pin down the copy and skip policies
/// without dragging the full shipped templates through every assertion.
pub struct Templates {
    pub bundler_config: &'static str,
    pub bundler_generated: &'static str,
    pub devserver_config: &'static str,
    pub devserver_generated: &'static str,
    pub devserver_inline_css_plugin: &'static str,
}

impl Default for Templates {
    fn default() -> Self {
        Self {
            bundler_config: include_str!("../templates/bundler.config.js"),
            bundler_generated: include_str!("../templates/bundler.generated.js"),
            devserver_config: include_str!("../templates/devserver.config.js"),
            devserver_generated: include_str!("../templates/devserver.generated.js"),
            devserver_inline_css_plugin: include_str!(
                "../templates/devserver-plugin-inline-css.js"
            ),
        }
    }
}

/// PWA switches, read-only inputs to the replacement rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PwaSettings {
    pub enabled: bool,
    pub offline: bool,
    pub offline_path: String,
}

/// Resolved project layout the materializer works from.
///
/// The driver resolves every path against the project root before handing
/// this over; `config_dir` doubles as the base all path expressions are made
/// relative to.
#[derive(Debug, Clone)]
pub struct MaterializeOptions {
    pub config_dir: PathBuf,
    pub frontend_dir: PathBuf,
    pub generated_dir: PathBuf,
    pub build_output_dir: PathBuf,
    pub resource_output_dir: PathBuf,
    pub entry_point: PathBuf,
    pub bundled_frontend_dir: PathBuf,
    pub build_folder: String,
    pub legacy_bootstrap: bool,
    pub pwa: PwaSettings,
}

impl MaterializeOptions {
    /// Resolve a project config against its root directory.
    ///
    /// The root doubles as the config directory the bundler files land in.
    pub fn for_project(project_root: &Path, config: &ProjectConfig) -> Self {
        Self {
            config_dir: project_root.to_path_buf(),
            frontend_dir: project_root.join(&config.frontend_dir),
            generated_dir: project_root.join(&config.generated_dir),
            build_output_dir: project_root.join(&config.build_output_dir),
            resource_output_dir: project_root.join(&config.resource_output_dir),
            entry_point: project_root.join(&config.entry_point),
            bundled_frontend_dir: project_root.join(&config.bundled_frontend_dir),
            build_folder: config.build_folder.clone(),
            legacy_bootstrap: config.legacy_bootstrap,
            pwa: PwaSettings {
                enabled: config.pwa.enabled,
                offline: config.pwa.offline,
                offline_path: config.pwa.offline_path.clone(),
            },
        }
    }
}

/// One identifier rewrite in the generated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub identifier: &'static str,
    pub value: String,
}

impl Replacement {
    fn new(identifier: &'static str, value: String) -> Self {
        Replacement { identifier, value }
    }

    /// True when the line's trimmed content is this identifier's declaration:
    /// the identifier followed by a single space.
    fn matches(&self, line: &str) -> bool {
        let trimmed = line.trim_start();
        trimmed.len() > self.identifier.len()
            && trimmed.starts_with(self.identifier)
            && trimmed.as_bytes()[self.identifier.len()] == b' '
    }

    fn render(&self) -> String {
        format!("{} = {};", self.identifier, self.value)
    }
}

/// Build the replacement list for the current project layout.
///
/// Reads nothing but the layout and two existence probes under the frontend
/// directory (`index.html` and the service-worker source), which decide
/// whether those two rules render a literal or a computed path.
pub fn build_replacements(options: &MaterializeOptions) -> Vec<Replacement> {
    let dir = &options.config_dir;
    let expr = |path: &Path| path_resolve_expr(&config_relative_path(dir, path));

    vec![
        Replacement::new("const frontendFolder", expr(&options.frontend_dir)),
        Replacement::new("const frontendGeneratedFolder", expr(&options.generated_dir)),
        Replacement::new("const buildOutputFolder", expr(&options.build_output_dir)),
        Replacement::new(
            "const resourceOutputFolder",
            expr(&options.resource_output_dir),
        ),
        Replacement::new("const generatedMainEntryPoint", expr(&options.entry_point)),
        Replacement::new(
            "const useClientSideIndexFileForBootstrapping",
            (!options.legacy_bootstrap).to_string(),
        ),
        Replacement::new("const clientSideIndexHTML", index_html_value(options)),
        Replacement::new(
            "const clientSideIndexEntryPoint",
            bootstrap_entry_value(options),
        ),
        Replacement::new(
            "const devModeHelperScript",
            expr(&options.bundled_frontend_dir.join("devmode-helper.js")),
        ),
        Replacement::new("const pwaEnabled", options.pwa.enabled.to_string()),
        Replacement::new("const offlinePathEnabled", options.pwa.offline.to_string()),
        Replacement::new("const offlinePath", offline_path_value(options)),
        Replacement::new(
            "const clientServiceWorkerEntryPoint",
            service_worker_value(options),
        ),
        Replacement::new(
            "const bundledFrontendFolder",
            expr(&options.bundled_frontend_dir),
        ),
        Replacement::new(
            "const projectStaticAssetsOutputFolder",
            expr(&options.build_output_dir.join("static")),
        ),
    ]
}

/// `'./index.html'` when the project ships its own index file; otherwise the
/// generated one under the build folder.
fn index_html_value(options: &MaterializeOptions) -> String {
    if options.frontend_dir.join(INDEX_HTML).exists() {
        format!("'./{}'", INDEX_HTML)
    } else {
        let generated = options
            .config_dir
            .join(&options.build_folder)
            .join(INDEX_HTML);
        path_resolve_expr(&config_relative_path(&options.config_dir, &generated))
    }
}

/// The client bootstrap file is always the generated one under the frontend
/// directory, spelled out segment by segment.
fn bootstrap_entry_value(options: &MaterializeOptions) -> String {
    format!(
        "path.resolve(__dirname, '{}', 'generated', 'bootstrap.ts')",
        config_relative_path(&options.config_dir, &options.frontend_dir)
    )
}

fn offline_path_value(options: &MaterializeOptions) -> String {
    format!(
        "'{}'",
        config_relative_path(&options.config_dir, Path::new(&options.pwa.offline_path))
    )
}

/// `'./sw'` when the project ships a service-worker source (`sw.ts` or
/// `sw.js`); otherwise the generated one under the build folder, with the
/// script extension stripped so the bundler picks either.
fn service_worker_value(options: &MaterializeOptions) -> String {
    let provided = options.frontend_dir.join(SERVICE_WORKER_TS).exists()
        || options.frontend_dir.join(SERVICE_WORKER_JS).exists();
    if provided {
        "'./sw'".to_string()
    } else {
        let generated = options
            .config_dir
            .join(&options.build_folder)
            .join(SERVICE_WORKER_TS);
        let relative = config_relative_path(&options.config_dir, &generated);
        path_resolve_expr(strip_script_extension(&relative))
    }
}

/// Apply the rules to the generated template, line by line.
///
/// Each rule owns a distinct identifier, so at most one rule rewrites any
/// given line. Unmatched lines pass through untouched. The result always
/// uses `\n` endings and ends with exactly one newline.
pub fn apply_replacements(template: &str, replacements: &[Replacement]) -> String {
    let mut out = String::with_capacity(template.len());
    for line in template.lines() {
        match replacements.iter().find(|rule| rule.matches(line)) {
            Some(rule) => out.push_str(&rule.render()),
            None => out.push_str(line),
        }
        out.push('\n');
    }
    out
}

/// Materialize the bundler pair and the dev-server trio from the embedded
/// templates.
pub fn materialize(
    options: &MaterializeOptions,
    reporter: &impl Reporter,
) -> Result<(), MaterializeError> {
    materialize_with_templates(&Templates::default(), options, reporter)
}

/// Materialize using a specific template set (allows testing the copy and
/// skip policies with small fixtures).
pub fn materialize_with_templates(
    templates: &Templates,
    options: &MaterializeOptions,
    reporter: &impl Reporter,
) -> Result<(), MaterializeError> {
    fs::create_dir_all(&options.config_dir)?;
    write_bundler_pair(templates, options, reporter)?;
    write_devserver_files(templates, options, reporter)?;
    Ok(())
}

fn write_bundler_pair(
    templates: &Templates,
    options: &MaterializeOptions,
    reporter: &impl Reporter,
) -> Result<(), MaterializeError> {
    // An empty primary template turns the whole pair off.
    if templates.bundler_config.trim().is_empty() {
        return Ok(());
    }

    let config_path = options.config_dir.join(BUNDLER_CONFIG);
    if config_path.exists() {
        let contents = fs::read_to_string(&config_path)?;
        if !contents.contains(GENERATED_IMPORT) {
            reporter.warn(&output::format_marker_warning(&config_path, GENERATED_IMPORT));
        }
    } else {
        fs::write(&config_path, templates.bundler_config)?;
        reporter.debug(&output::format_config_created(&config_path));
    }

    let replacements = build_replacements(options);
    let patched = apply_replacements(templates.bundler_generated, &replacements);
    fs::write(options.config_dir.join(BUNDLER_GENERATED), patched)?;
    Ok(())
}

fn write_devserver_files(
    templates: &Templates,
    options: &MaterializeOptions,
    reporter: &impl Reporter,
) -> Result<(), MaterializeError> {
    let config_path = options.config_dir.join(DEVSERVER_CONFIG);
    if !config_path.exists() && !templates.devserver_config.trim().is_empty() {
        fs::write(&config_path, templates.devserver_config)?;
        reporter.info(&output::format_devserver_created(&config_path));
    }

    // The generated defaults and the plugin track the shipped template on
    // every run; user edits to them do not survive.
    fs::write(
        options.config_dir.join(DEVSERVER_GENERATED),
        templates.devserver_generated,
    )?;
    fs::write(
        options.config_dir.join(DEVSERVER_INLINE_CSS_PLUGIN),
        templates.devserver_inline_css_plugin,
    )?;
    Ok(())
}
