//! # The Loaded Manifest
//!
//! [`Manifest`] is the immutable, in-memory form of the manifest document.
//! It is built once at startup and then shared by reference with every
//! resolver query.
//!
//! ## Document Shape
//!
//! ```text
//! {
//!   "version": "1.0",                      optional
//!   "generated_at": "...",                 optional
//!   "metadata": { ... },                   optional
//!   "config": {
//!     "dimensions": [ {id, label, description?} ],
//!     "presets":    [ {id, label, tagline, values} ]   optional
//!   },
//!   "scenarios":   { "<id>": {title, description, choices, characters?, kdma_type} },
//!   "experiments": { "<key>": {parameters: {adm, kdma_values}, results: {...}} },
//!   "indices": {
//!     "by_scenario": { "<id>": ["<key>", ...] },
//!     "by_adm":      { ... },                optional
//!     "by_kdma":     { ... }                 optional
//!   }
//! }
//! ```
//!
//! ## Degradation Rules
//!
//! - A missing top-level key or an unusable `config`/`scenarios` section
//!   fails the whole load.
//! - A single experiment whose `parameters` do not parse is skipped with a
//!   warning. Queries that would have matched it fall through to the next
//!   candidate or to the not-found result.
//! - Inside a usable experiment, a malformed `kdma_values` entry or
//!   `results` entry drops only that entry. A bad result for one scenario
//!   never hides the experiment from queries on another.
//! - The candidate index is taken as written. Its order is the tie-break
//!   order for matching, so it is never re-sorted.

use crate::models::{
    AdmInfo, Catalog, DeciderFamily, Dimension, Experiment, ExperimentResult, KdmaValue,
    ManifestError, ManifestMetadata, Preset, Result, Scenario,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

/// Top-level keys every manifest must carry.
pub const REQUIRED_KEYS: [&str; 4] = ["config", "scenarios", "experiments", "indices"];

#[derive(Deserialize)]
struct WireConfig {
    dimensions: Vec<Dimension>,
    #[serde(default)]
    presets: Vec<Preset>,
}

#[derive(Deserialize, Default)]
struct WireIndices {
    #[serde(default)]
    by_scenario: HashMap<String, Vec<String>>,
    #[serde(default)]
    by_adm: HashMap<String, Vec<String>>,
    #[serde(default)]
    by_kdma: HashMap<String, Vec<String>>,
}

#[derive(Deserialize)]
struct WireParameters {
    adm: AdmInfo,
    // Entries are parsed one at a time so a bad one only drops itself.
    #[serde(default)]
    kdma_values: Vec<Value>,
    #[serde(default)]
    alignment_target_id: Option<String>,
    #[serde(default)]
    run_variant: Option<Value>,
}

#[derive(Deserialize)]
struct WireExperiment {
    parameters: WireParameters,
    #[serde(default)]
    results: Map<String, Value>,
}

impl WireExperiment {
    fn into_experiment(self, key: String) -> Experiment {
        let family = DeciderFamily::from_adm_name(&self.parameters.adm.name);

        let mut kdma_values = Vec::with_capacity(self.parameters.kdma_values.len());
        for (i, raw) in self.parameters.kdma_values.into_iter().enumerate() {
            match serde_json::from_value::<KdmaValue>(raw) {
                Ok(kv) => kdma_values.push(kv),
                Err(e) => warn!("Experiment '{}': skipping kdma_values[{}]: {}", key, i, e),
            }
        }

        let mut results = BTreeMap::new();
        for (scenario_id, raw) in self.results {
            match serde_json::from_value::<ExperimentResult>(raw) {
                Ok(result) => {
                    results.insert(scenario_id, result);
                }
                Err(e) => warn!(
                    "Experiment '{}': skipping result for '{}': {}",
                    key, scenario_id, e
                ),
            }
        }

        Experiment {
            key,
            family,
            adm: self.parameters.adm,
            kdma_values,
            alignment_target_id: self.parameters.alignment_target_id,
            run_variant: self.parameters.run_variant,
            results,
        }
    }
}

/// The loaded, read-only manifest.
///
/// # Example
///
/// ```rust
/// use align_manifest::Manifest;
/// use serde_json::json;
///
/// let manifest = Manifest::from_json(json!({
///     "config": { "dimensions": [{ "id": "merit", "label": "Merit" }] },
///     "scenarios": {},
///     "experiments": {},
///     "indices": { "by_scenario": {} }
/// }))
/// .unwrap();
///
/// assert_eq!(manifest.dimensions().len(), 1);
/// assert!(manifest.presets().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Manifest {
    version: Option<String>,
    generated_at: Option<String>,
    metadata: ManifestMetadata,
    catalog: Catalog,
    experiments: HashMap<String, Experiment>,
    by_scenario: HashMap<String, Vec<String>>,
    by_adm: HashMap<String, Vec<String>>,
    by_kdma: HashMap<String, Vec<String>>,
    skipped_experiments: Vec<String>,
    fingerprint: String,
}

impl Manifest {
    /// Parses a manifest from raw document bytes.
    ///
    /// The fingerprint is taken over exactly these bytes.
    ///
    /// # Errors
    ///
    /// - [`ManifestError::Parse`] if the bytes are not JSON
    /// - [`ManifestError::MissingKey`] if a required top-level key is absent
    /// - [`ManifestError::Invalid`] if `config` or a scenario is malformed
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let root: Value = serde_json::from_slice(bytes)?;
        Self::from_document(root, fingerprint(bytes))
    }

    /// Builds a manifest from an already-parsed document.
    ///
    /// The fingerprint is taken over the compact serialization of `value`.
    pub fn from_json(value: Value) -> Result<Self> {
        let bytes = serde_json::to_vec(&value)?;
        Self::from_document(value, fingerprint(&bytes))
    }

    fn from_document(root: Value, fingerprint: String) -> Result<Self> {
        let mut root = match root {
            Value::Object(map) => map,
            _ => {
                return Err(ManifestError::Invalid(
                    "document root must be an object".to_string(),
                ))
            }
        };

        for key in REQUIRED_KEYS {
            if !root.contains_key(key) {
                return Err(ManifestError::MissingKey(key));
            }
        }

        let config: WireConfig = take(&mut root, "config")?;
        let raw_scenarios: Map<String, Value> = take(&mut root, "scenarios")?;
        let raw_experiments: Map<String, Value> = take(&mut root, "experiments")?;
        let indices: WireIndices = take(&mut root, "indices")?;

        let mut scenarios = Vec::with_capacity(raw_scenarios.len());
        for (id, value) in raw_scenarios {
            let mut scenario: Scenario = serde_json::from_value(value)
                .map_err(|e| ManifestError::Invalid(format!("scenario '{}': {}", id, e)))?;
            scenario.id = id;
            scenarios.push(scenario);
        }

        let mut experiments = HashMap::with_capacity(raw_experiments.len());
        let mut skipped_experiments = Vec::new();
        for (key, value) in raw_experiments {
            match serde_json::from_value::<WireExperiment>(value) {
                Ok(wire) => {
                    experiments.insert(key.clone(), wire.into_experiment(key));
                }
                Err(e) => {
                    warn!("Skipping malformed experiment '{}': {}", key, e);
                    skipped_experiments.push(key);
                }
            }
        }

        let version = root
            .remove("version")
            .and_then(|v| v.as_str().map(str::to_string));
        let generated_at = root
            .remove("generated_at")
            .and_then(|v| v.as_str().map(str::to_string));
        let metadata = root
            .remove("metadata")
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default();

        Ok(Self {
            version,
            generated_at,
            metadata,
            catalog: Catalog {
                dimensions: config.dimensions,
                scenarios,
                presets: config.presets,
            },
            experiments,
            by_scenario: indices.by_scenario,
            by_adm: indices.by_adm,
            by_kdma: indices.by_kdma,
            skipped_experiments,
            fingerprint,
        })
    }

    /// Dimensions, scenarios and presets in document order.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Dimensions in document order.
    pub fn dimensions(&self) -> &[Dimension] {
        &self.catalog.dimensions
    }

    /// Scenarios in document order.
    pub fn scenarios(&self) -> &[Scenario] {
        &self.catalog.scenarios
    }

    /// Presets in document order. Empty when the document has none.
    pub fn presets(&self) -> &[Preset] {
        &self.catalog.presets
    }

    /// Looks up a scenario by id.
    pub fn scenario(&self, id: &str) -> Option<&Scenario> {
        self.catalog.scenario(id)
    }

    /// Looks up a preset by id.
    pub fn preset(&self, id: &str) -> Option<&Preset> {
        self.catalog.preset(id)
    }

    /// Looks up an experiment by key.
    pub fn experiment(&self, key: &str) -> Option<&Experiment> {
        self.experiments.get(key)
    }

    /// Number of experiments that parsed.
    pub fn experiment_count(&self) -> usize {
        self.experiments.len()
    }

    /// Candidate experiment keys for a scenario, in index order.
    ///
    /// A scenario with no index entry has no candidates.
    pub fn candidates(&self, scenario_id: &str) -> &[String] {
        self.by_scenario
            .get(scenario_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Experiment keys recorded for an ADM name.
    pub fn experiments_for_adm(&self, adm_name: &str) -> &[String] {
        self.by_adm.get(adm_name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Experiment keys recorded for an alignment target string.
    pub fn experiments_for_kdma(&self, combination: &str) -> &[String] {
        self.by_kdma
            .get(combination)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Keys of experiments that were skipped because they did not parse.
    pub fn skipped_experiments(&self) -> &[String] {
        &self.skipped_experiments
    }

    /// Hex SHA-256 of the source document.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Document format version.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Build timestamp recorded by the manifest builder.
    pub fn generated_at(&self) -> Option<&str> {
        self.generated_at.as_deref()
    }

    /// Builder summary block.
    pub fn metadata(&self) -> &ManifestMetadata {
        &self.metadata
    }
}

fn take<T: DeserializeOwned>(root: &mut Map<String, Value>, key: &'static str) -> Result<T> {
    let value = root.remove(key).ok_or(ManifestError::MissingKey(key))?;
    serde_json::from_value(value).map_err(|e| ManifestError::Invalid(format!("{}: {}", key, e)))
}

/// Computes the hex-encoded SHA-256 of a document.
pub fn fingerprint(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}
