//! # Frontstage
//!
//! A build-step tool that stages frontend assets for bundling. It pulls
//! frontend resources out of a project's dependencies — plain directories
//! and zip archives alike — into one flat folder, and materializes the
//! bundler and dev-server configuration files patched to match the project
//! layout. One command, repeatable output.
//!
//! # Architecture: Two-Stage Pipeline
//!
//! ```text
//! 1. Collect      locations      →  build/bundled-frontend/     (flattened resources)
//! 2. Materialize  layout config  →  bundler.*.js, devserver.*.js (copied / patched)
//! ```
//!
//! The stages are independent and idempotent:
//!
//! - **Collect** visits each configured location, extracts whatever lives
//!   under the conventional resource roots, and merges it into the target
//!   directory. Running it twice converges on the same tree.
//! - **Materialize** writes the generated configuration files from scratch
//!   on every run and leaves the user-owned ones alone once they exist.
//!
//! Either stage can run on its own (`frontstage collect`, `frontstage
//! config`) or both together (`frontstage build`).
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`collect`] | Stage 1 — visits resource locations and copies frontend files into the target |
//! | [`archive`] | Zip extraction behind the [`archive::ArchiveSource`] seam |
//! | [`pattern`] | The two inclusion pattern shapes archive filtering understands |
//! | [`materialize`] | Stage 2 — copies and patches the bundler and dev-server config files |
//! | [`paths`] | Path-expression rendering for the generated bundler config |
//! | [`config`] | `frontstage.toml` loading, defaults merging, and validation |
//! | [`output`] | Message formatting and the [`output::Reporter`] sink the stages log through |
//!
//! # Design Decisions
//!
//! ## Patch In Memory, Write Once
//!
//! The generated bundler config is never edited in place. Each run renders
//! the embedded template through the replacement rules in memory and writes
//! the result in one shot. There is no state to migrate between versions
//! and no way for a partial edit to survive: identical layout in,
//! byte-identical file out.
//!
//! ## Flat Target, Last Write Wins
//!
//! Collected resources from all locations merge into a single directory
//! with their root prefixes stripped, because that is the shape bundler
//! aliases want. Colliding relative paths resolve to whichever location was
//! visited last. Deduplicating or namespacing per dependency would push
//! complexity into every import path in user code.
//!
//! ## Config Files Are Either Owned Or Advisory
//!
//! Every materialized file is exactly one of: tool-owned (rewritten every
//! run, hand edits do not survive) or user-owned (created once from a
//! starter template, never touched again). The only middle ground is a
//! warning — if the user-owned bundler config stops importing the generated
//! one, the run says so and moves on. Nothing merges user edits with
//! generated content, so neither side can corrupt the other.
//!
//! ## Embedded Templates
//!
//! All shipped config templates are compiled into the binary with
//! `include_str!`. The tool is a single self-contained executable; there is
//! no template directory to locate at runtime or get out of sync with the
//! code that patches it.

pub mod archive;
pub mod collect;
pub mod config;
pub mod materialize;
pub mod output;
pub mod paths;
pub mod pattern;

#[cfg(test)]
pub(crate) mod test_helpers;
