//! # Align Manifest - Experiment Manifest Loader
//!
//! Parses the manifest document that backs the value-alignment demo: the
//! value dimensions, the triage scenarios, the presets, and the set of
//! precomputed experiments whose results the resolver looks up.
//!
//! ## Purpose
//!
//! 1. **Wire contract** - field names and nesting of the manifest document
//!    are parsed exactly, with lenient defaults where the builder omits
//!    optional data.
//!
//! 2. **Immutable model** - the result is a single [`Manifest`] value that is
//!    built once and passed by reference to every query. There is no global
//!    state.
//!
//! 3. **Family tagging** - every experiment is tagged `baseline` or
//!    `aligned` at ingestion time, so matching never inspects ADM names.
//!
//! 4. **Fingerprint** - a SHA-256 of the document identifies exactly which
//!    data a session answered from.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐    bytes    ┌──────────────────┐
//! │  ManifestSource  │────────────▶│     loader       │
//! │  (file / inline) │             │  (tokio::fs)     │
//! └──────────────────┘             └────────┬─────────┘
//!                                           │
//!                                           ▼
//!                                  ┌──────────────────┐
//!                                  │     Manifest     │
//!                                  │  catalog         │
//!                                  │  experiments     │
//!                                  │  by_scenario     │
//!                                  │  fingerprint     │
//!                                  └──────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use align_manifest::{load, ManifestSource};
//!
//! # async fn run() -> align_manifest::Result<()> {
//! let source = ManifestSource::Path("static/data/manifest.json".into());
//! let manifest = load(&source).await?;
//!
//! for scenario in manifest.scenarios() {
//!     println!("{} governs on {}", scenario.title, scenario.kdma_type);
//! }
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod manifest;
pub mod models;

pub use loader::{load, LoadReport, ManifestSource};
pub use manifest::{fingerprint, Manifest};
pub use models::{
    AdmInfo, Catalog, Character, Choice, DeciderFamily, Dimension, Experiment, ExperimentResult,
    KdmaValue, Level, ManifestError, ManifestMetadata, Preset, Result, Scenario, ValueProfile,
};

#[cfg(test)]
mod tests;
