//! Manifest loading.
//!
//! Reads the document from its source and builds a [`Manifest`]. This is
//! the only asynchronous step in the system; callers gate every query on
//! its completion.

use crate::manifest::Manifest;
use crate::models::{ManifestError, Result};
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Where the manifest document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestSource {
    /// A JSON file on disk.
    Path(PathBuf),
    /// A JSON document held in memory.
    Inline(String),
}

impl fmt::Display for ManifestSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestSource::Path(path) => write!(f, "{}", path.display()),
            ManifestSource::Inline(text) => write!(f, "<inline, {} bytes>", text.len()),
        }
    }
}

/// Loads and parses a manifest.
///
/// # Errors
///
/// Returns [`ManifestError::Io`] if the file cannot be read, and any parse
/// error from [`Manifest::from_slice`].
pub async fn load(source: &ManifestSource) -> Result<Manifest> {
    debug!("Loading manifest from {}", source);

    let manifest = match source {
        ManifestSource::Path(path) => {
            let bytes = tokio::fs::read(path)
                .await
                .map_err(|source| ManifestError::Io {
                    path: path.clone(),
                    source,
                })?;
            Manifest::from_slice(&bytes)?
        }
        ManifestSource::Inline(text) => Manifest::from_slice(text.as_bytes())?,
    };

    let report = LoadReport::from_manifest(&manifest);
    info!(
        "Manifest loaded: {} scenarios, {} experiments, {} presets (sha256 {})",
        report.scenarios, report.experiments, report.presets, report.fingerprint
    );
    if !report.skipped_experiments.is_empty() {
        warn!(
            "{} experiment(s) skipped as malformed",
            report.skipped_experiments.len()
        );
    }

    Ok(manifest)
}

/// Summary of a loaded manifest, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    /// Document format version.
    pub version: Option<String>,
    /// Hex SHA-256 of the document.
    pub fingerprint: String,
    /// Number of dimensions.
    pub dimensions: usize,
    /// Number of scenarios.
    pub scenarios: usize,
    /// Number of presets.
    pub presets: usize,
    /// Number of experiments that parsed.
    pub experiments: usize,
    /// Keys of experiments that did not parse.
    pub skipped_experiments: Vec<String>,
    /// Scenarios with no candidate experiments; these always resolve to
    /// the not-found result.
    pub unindexed_scenarios: Vec<String>,
}

impl LoadReport {
    /// Summarises a manifest.
    pub fn from_manifest(manifest: &Manifest) -> Self {
        Self {
            version: manifest.version().map(str::to_string),
            fingerprint: manifest.fingerprint().to_string(),
            dimensions: manifest.dimensions().len(),
            scenarios: manifest.scenarios().len(),
            presets: manifest.presets().len(),
            experiments: manifest.experiment_count(),
            skipped_experiments: manifest.skipped_experiments().to_vec(),
            unindexed_scenarios: manifest
                .scenarios()
                .iter()
                .filter(|s| manifest.candidates(&s.id).is_empty())
                .map(|s| s.id.clone())
                .collect(),
        }
    }

    /// True when nothing was skipped and every scenario has candidates.
    pub fn is_clean(&self) -> bool {
        self.skipped_experiments.is_empty() && self.unindexed_scenarios.is_empty()
    }
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "version:     {}",
            self.version.as_deref().unwrap_or("unversioned")
        )?;
        writeln!(f, "sha256:      {}", self.fingerprint)?;
        writeln!(f, "dimensions:  {}", self.dimensions)?;
        writeln!(f, "scenarios:   {}", self.scenarios)?;
        writeln!(f, "presets:     {}", self.presets)?;
        writeln!(f, "experiments: {}", self.experiments)?;
        if !self.skipped_experiments.is_empty() {
            writeln!(f, "skipped:     {}", self.skipped_experiments.join(", "))?;
        }
        if !self.unindexed_scenarios.is_empty() {
            writeln!(f, "no data for: {}", self.unindexed_scenarios.join(", "))?;
        }
        Ok(())
    }
}
