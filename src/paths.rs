//! Path expression rendering for generated bundler configuration.
//!
//! The generated config file refers to project folders through JavaScript
//! `path.resolve(__dirname, ...)` expressions, so every filesystem path the
//! materializer computes goes through the same three steps:
//!
//! 1. Absolute paths are relativized against the config directory (the
//!    directory the generated file lives in, i.e. its `__dirname`).
//!    Already-relative paths pass through unchanged.
//! 2. The result is rendered with forward slashes regardless of platform,
//!    so the emitted file is identical on Windows and Unix.
//! 3. The rendered string is wrapped in a `path.resolve(__dirname, '...')`
//!    call expression.
//!
//! Steps are exposed separately because a few replacement rules need only a
//! subset: the offline path is quoted but never wrapped, and the
//! service-worker fallback strips the source extension before wrapping.

use std::path::{Component, Path};

/// Render a path with forward slashes.
///
/// Used for paths that are already relative. On Unix this is a plain
/// stringification; on Windows it also normalizes the separators.
pub fn unix_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Compute `target` relative to `base`, rendered with forward slashes.
///
/// Walks off the shared component prefix and climbs out of the remainder of
/// `base` with `..` segments:
///
/// - base `/work/app`, target `/work/app/frontend` → `"frontend"`
/// - base `/work/app`, target `/work/deps/ui` → `"../deps/ui"`
/// - base `/work/app`, target `/work/app` → `""`
pub fn relative_unix_path(base: &Path, target: &Path) -> String {
    let base_parts: Vec<Component> = base.components().collect();
    let target_parts: Vec<Component> = target.components().collect();

    let common = base_parts
        .iter()
        .zip(target_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut segments: Vec<String> = Vec::new();
    for _ in common..base_parts.len() {
        segments.push("..".to_string());
    }
    for part in &target_parts[common..] {
        segments.push(part.as_os_str().to_string_lossy().replace('\\', "/"));
    }
    segments.join("/")
}

/// Resolve a path the way the generated config sees it.
///
/// Absolute paths become relative to `config_dir`; relative paths are taken
/// as given. Either way the result uses forward slashes.
pub fn config_relative_path(config_dir: &Path, path: &Path) -> String {
    if path.is_absolute() {
        relative_unix_path(config_dir, path)
    } else {
        unix_path(path)
    }
}

/// Wrap an already-rendered path in a `path.resolve` call expression.
pub fn path_resolve_expr(unix: &str) -> String {
    format!("path.resolve(__dirname, '{unix}')")
}

/// Strip a trailing `.ts` or `.js` source extension, if present.
///
/// The bundler appends its own extension when resolving the service-worker
/// entry point, so the fallback path must not carry one.
pub fn strip_script_extension(unix: &str) -> &str {
    unix.strip_suffix(".ts")
        .or_else(|| unix.strip_suffix(".js"))
        .unwrap_or(unix)
}
