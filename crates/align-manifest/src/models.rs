//! # Core Data Models for the Manifest
//!
//! This module defines the types that describe a demonstration session:
//! the value dimensions, the scenarios, the presets, and the precomputed
//! experiments the resolver searches over.
//!
//! Everything here is immutable after load. The only piece of state that
//! changes during a session is the [`ValueProfile`], which the caller owns
//! and passes into every query.
//!
//! ## Wire Names
//!
//! Field names follow the manifest document exactly (`kdma_type`,
//! `llm_backbone`, `choice_label`, ...) so the types deserialize straight
//! from the document without renames.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Marker substring that places an ADM in the baseline family.
pub const BASELINE_MARKER: &str = "baseline";

/// A named axis along which a decision can be steered (a KDMA).
///
/// # Example
///
/// ```rust
/// use align_manifest::Dimension;
///
/// let dim: Dimension = serde_json::from_str(r#"{"id": "merit", "label": "Merit"}"#).unwrap();
/// assert_eq!(dim.description, "");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    /// Stable identifier, e.g. `merit` or `personal_safety`.
    pub id: String,

    /// Display label.
    pub label: String,

    /// Longer explanation. Empty when the manifest omits it.
    #[serde(default)]
    pub description: String,
}

/// One discrete option a scenario offers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    /// Action identifier. Decisions are compared on this, never on `label`.
    pub id: String,

    /// Display text.
    pub label: String,

    /// Per-dimension association recorded by the experiment harness.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kdma_association: Option<serde_json::Value>,
}

/// A person involved in a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    /// Name as shown to the user.
    #[serde(default)]
    pub name: String,

    /// Free-text description.
    #[serde(default)]
    pub description: String,
}

/// A described ethical dilemma with a finite set of choices and one
/// governing dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario key (the manifest's map key).
    #[serde(default)]
    pub id: String,

    /// Short title.
    pub title: String,

    /// Full description. Paragraphs are separated by blank lines.
    #[serde(default)]
    pub description: String,

    /// Available choices.
    pub choices: Vec<Choice>,

    /// People involved. Empty when the manifest omits them.
    #[serde(default)]
    pub characters: Vec<Character>,

    /// The single dimension that governs this scenario's decision.
    pub kdma_type: String,

    /// Upstream scenario identifier, when the manifest records it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario_id: Option<String>,

    /// Upstream scene identifier, when the manifest records it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene_id: Option<String>,
}

impl Scenario {
    /// Returns the choice with the given identifier.
    pub fn choice(&self, id: &str) -> Option<&Choice> {
        self.choices.iter().find(|c| c.id == id)
    }

    /// Splits the description into its intro paragraph and the option
    /// paragraphs that follow it.
    ///
    /// ```rust
    /// # use align_manifest::Scenario;
    /// let scenario = Scenario {
    ///     id: "s".into(),
    ///     title: "S".into(),
    ///     description: "Intro.\n\nPatient A.\n\nPatient B.".into(),
    ///     choices: vec![],
    ///     characters: vec![],
    ///     kdma_type: "merit".into(),
    ///     scenario_id: None,
    ///     scene_id: None,
    /// };
    /// let (intro, options) = scenario.description_parts();
    /// assert_eq!(intro, "Intro.");
    /// assert_eq!(options, vec!["Patient A.", "Patient B."]);
    /// ```
    pub fn description_parts(&self) -> (&str, Vec<&str>) {
        let mut parts = self.description.split("\n\n");
        let intro = parts.next().unwrap_or("");
        (intro, parts.collect())
    }
}

/// Qualitative setting for a dimension.
///
/// Unknown input is kept as [`Level::Unrecognized`] instead of being
/// rejected; encoders treat it as [`Level::Medium`]. This covers any JSON
/// value, not just strings: a `null` or numeric level in a preset reads as
/// unrecognized rather than failing the load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "String")]
pub enum Level {
    /// Dimension barely matters.
    Low,
    /// Dimension is weighed against others.
    Medium,
    /// Dimension dominates.
    High,
    /// Anything else the caller supplied.
    Unrecognized(String),
}

impl Level {
    /// Parses a level name. Never fails.
    pub fn parse(s: &str) -> Self {
        match s {
            "low" => Level::Low,
            "medium" => Level::Medium,
            "high" => Level::High,
            other => Level::Unrecognized(other.to_string()),
        }
    }

    /// Returns the wire name of this level.
    pub fn as_str(&self) -> &str {
        match self {
            Level::Low => "low",
            Level::Medium => "medium",
            Level::High => "high",
            Level::Unrecognized(s) => s.as_str(),
        }
    }

    /// Returns true for `low`, `medium` and `high`.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Level::Unrecognized(_))
    }

    /// Collapses unrecognized input to `medium`.
    pub fn normalized(&self) -> Level {
        match self {
            Level::Unrecognized(_) => Level::Medium,
            known => known.clone(),
        }
    }

    /// Maps a three-stop slider position (0, 50, 100) to a level.
    ///
    /// Any other position reads as `medium`.
    pub fn from_slider(position: u8) -> Self {
        match position {
            0 => Level::Low,
            50 => Level::Medium,
            100 => Level::High,
            _ => Level::Medium,
        }
    }

    /// Maps a level to its slider position.
    pub fn to_slider(&self) -> u8 {
        match self {
            Level::Low => 0,
            Level::Medium => 50,
            Level::High => 100,
            Level::Unrecognized(_) => 50,
        }
    }
}

impl From<&str> for Level {
    fn from(s: &str) -> Self {
        Level::parse(s)
    }
}

impl From<String> for Level {
    fn from(s: String) -> Self {
        match s.as_str() {
            "low" => Level::Low,
            "medium" => Level::Medium,
            "high" => Level::High,
            _ => Level::Unrecognized(s),
        }
    }
}

impl From<serde_json::Value> for Level {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => Level::from(s),
            other => Level::Unrecognized(other.to_string()),
        }
    }
}

impl From<Level> for String {
    fn from(level: Level) -> Self {
        match level {
            Level::Unrecognized(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mapping from dimension id to [`Level`].
///
/// Only the entry for a scenario's governing dimension is consulted when
/// that scenario is resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueProfile(BTreeMap<String, Level>);

impl ValueProfile {
    /// Creates an empty profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a level and returns the profile.
    pub fn with(mut self, dimension: impl Into<String>, level: impl Into<Level>) -> Self {
        self.set(dimension, level);
        self
    }

    /// Sets the level for a dimension, replacing any previous value.
    pub fn set(&mut self, dimension: impl Into<String>, level: impl Into<Level>) {
        self.0.insert(dimension.into(), level.into());
    }

    /// Returns the level recorded for a dimension.
    pub fn get(&self, dimension: &str) -> Option<&Level> {
        self.0.get(dimension)
    }

    /// Iterates over `(dimension, level)` pairs in dimension order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Level)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns true when no dimension is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, L: Into<Level>> FromIterator<(K, L)> for ValueProfile {
    fn from_iter<I: IntoIterator<Item = (K, L)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, l)| (k.into(), l.into())).collect())
    }
}

/// A named bundle of levels offered as a starting point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    /// Identifier.
    pub id: String,

    /// Display label.
    pub label: String,

    /// One-line summary.
    #[serde(default)]
    pub tagline: String,

    /// Levels per dimension.
    #[serde(default)]
    pub values: ValueProfile,
}

/// Ordered dimensions, scenarios and presets.
///
/// Both resolution strategies expose one of these so callers can list
/// content without knowing which strategy backs the session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    /// Dimensions in document order.
    pub dimensions: Vec<Dimension>,
    /// Scenarios in document order.
    pub scenarios: Vec<Scenario>,
    /// Presets in document order.
    pub presets: Vec<Preset>,
}

impl Catalog {
    /// Finds a scenario by id.
    pub fn scenario(&self, id: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.id == id)
    }

    /// Finds a preset by id.
    pub fn preset(&self, id: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.id == id)
    }

    /// Finds a dimension by id.
    pub fn dimension(&self, id: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.id == id)
    }
}

/// Decider family an experiment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeciderFamily {
    /// Unaligned default behavior.
    Baseline,
    /// Behavior steered by a value profile.
    Aligned,
}

impl DeciderFamily {
    /// Classifies an ADM by name. Any name containing `baseline` is baseline.
    pub fn from_adm_name(name: &str) -> Self {
        if name.contains(BASELINE_MARKER) {
            DeciderFamily::Baseline
        } else {
            DeciderFamily::Aligned
        }
    }
}

impl fmt::Display for DeciderFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeciderFamily::Baseline => write!(f, "baseline"),
            DeciderFamily::Aligned => write!(f, "aligned"),
        }
    }
}

/// The decision-making configuration an experiment was run with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmInfo {
    /// ADM name, e.g. `pipeline_baseline` or `pipeline_comparative_regression`.
    pub name: String,

    /// Language model backbone, when recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_backbone: Option<String>,
}

/// Numeric target for one dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KdmaValue {
    /// Dimension id.
    pub kdma: String,
    /// Target value, nominally in `[0.0, 1.0]`.
    pub value: f64,
}

/// What an experiment chose for one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentResult {
    /// Identifier of the chosen option.
    pub choice_id: String,

    /// Display text of the chosen option.
    #[serde(default)]
    pub choice_label: String,

    /// The model's stated reasoning.
    #[serde(default)]
    pub justification: String,

    /// Wall-clock seconds the decision took.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timing_s: Option<f64>,

    /// Dimension association of the chosen option.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choice_kdma_association: Option<serde_json::Value>,
}

/// A precomputed run pairing a decider configuration with its results.
#[derive(Debug, Clone, PartialEq)]
pub struct Experiment {
    /// Experiment key from the manifest.
    pub key: String,

    /// ADM configuration.
    pub adm: AdmInfo,

    /// Family tag derived from the ADM name at load time.
    pub family: DeciderFamily,

    /// Alignment targets the run used.
    pub kdma_values: Vec<KdmaValue>,

    /// Alignment target identifier.
    pub alignment_target_id: Option<String>,

    /// Run variant as recorded by the harness.
    pub run_variant: Option<serde_json::Value>,

    /// Results keyed by scenario id.
    pub results: BTreeMap<String, ExperimentResult>,
}

impl Experiment {
    /// Returns the recorded value for a dimension.
    ///
    /// When the run lists a dimension more than once, the first entry wins.
    pub fn kdma_value(&self, kdma: &str) -> Option<f64> {
        self.kdma_values
            .iter()
            .find(|kv| kv.kdma == kdma)
            .map(|kv| kv.value)
    }

    /// Returns the result for a scenario.
    pub fn result_for(&self, scenario_id: &str) -> Option<&ExperimentResult> {
        self.results.get(scenario_id)
    }
}

/// Summary block the manifest builder writes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestMetadata {
    /// Experiments in the document.
    #[serde(default)]
    pub total_experiments: usize,
    /// Scenarios in the document.
    #[serde(default)]
    pub total_scenarios: usize,
    /// Distinct ADM names.
    #[serde(default)]
    pub adm_types: Vec<String>,
    /// Distinct LLM backbones.
    #[serde(default)]
    pub llm_backbones: Vec<String>,
    /// Distinct alignment target strings.
    #[serde(default)]
    pub kdma_combinations: Vec<String>,
}

/// Errors raised while loading a manifest.
///
/// Any of these is fatal to the session. They are surfaced to whoever
/// awaits readiness and never retried automatically.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The document could not be read.
    #[error("failed to read manifest {path}: {source}")]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON or has the wrong shape.
    #[error("malformed manifest: {0}")]
    Parse(#[from] serde_json::Error),

    /// A required top-level key is absent.
    #[error("manifest is missing required key '{0}'")]
    MissingKey(&'static str),

    /// The document parsed but a required section is unusable.
    #[error("invalid manifest: {0}")]
    Invalid(String),
}

/// Result type alias for manifest operations.
pub type Result<T> = std::result::Result<T, ManifestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_parse() {
        assert_eq!(Level::parse("low"), Level::Low);
        assert_eq!(Level::parse("medium"), Level::Medium);
        assert_eq!(Level::parse("high"), Level::High);
        assert_eq!(
            Level::parse("extreme"),
            Level::Unrecognized("extreme".to_string())
        );
    }

    #[test]
    fn test_level_serde_keeps_unknown_strings() {
        let levels: Vec<Level> = serde_json::from_str(r#"["high", "HIGH"]"#).unwrap();
        assert_eq!(levels[0], Level::High);
        assert_eq!(levels[1], Level::Unrecognized("HIGH".to_string()));

        let json = serde_json::to_string(&levels).unwrap();
        assert_eq!(json, r#"["high","HIGH"]"#);
    }

    #[test]
    fn test_level_from_non_string_values() {
        let levels: Vec<Level> = serde_json::from_str(r#"[null, 0.9, true]"#).unwrap();
        assert_eq!(levels[0], Level::Unrecognized("null".to_string()));
        assert_eq!(levels[1], Level::Unrecognized("0.9".to_string()));
        assert!(levels.iter().all(|l| l.normalized() == Level::Medium));
    }

    #[test]
    fn test_level_normalized() {
        assert_eq!(Level::parse("bogus").normalized(), Level::Medium);
        assert_eq!(Level::Low.normalized(), Level::Low);
        assert!(!Level::parse("").is_recognized());
    }

    #[test]
    fn test_slider_mapping() {
        assert_eq!(Level::from_slider(0), Level::Low);
        assert_eq!(Level::from_slider(50), Level::Medium);
        assert_eq!(Level::from_slider(100), Level::High);
        assert_eq!(Level::from_slider(75), Level::Medium);

        assert_eq!(Level::High.to_slider(), 100);
        assert_eq!(Level::parse("nope").to_slider(), 50);
    }

    #[test]
    fn test_value_profile_builder() {
        let profile = ValueProfile::new().with("merit", "high").with("affiliation", Level::Low);
        assert_eq!(profile.get("merit"), Some(&Level::High));
        assert_eq!(profile.get("affiliation"), Some(&Level::Low));
        assert_eq!(profile.get("search"), None);
    }

    #[test]
    fn test_value_profile_from_json() {
        let profile: ValueProfile =
            serde_json::from_str(r#"{"merit": "low", "personal_safety": "high"}"#).unwrap();
        assert_eq!(profile.get("personal_safety"), Some(&Level::High));
        assert_eq!(profile.iter().count(), 2);
    }

    #[test]
    fn test_decider_family_from_adm_name() {
        assert_eq!(
            DeciderFamily::from_adm_name("pipeline_baseline"),
            DeciderFamily::Baseline
        );
        assert_eq!(
            DeciderFamily::from_adm_name("pipeline_comparative_regression"),
            DeciderFamily::Aligned
        );
    }

    #[test]
    fn test_experiment_first_kdma_entry_wins() {
        let exp = Experiment {
            key: "e".to_string(),
            adm: AdmInfo {
                name: "aligned".to_string(),
                llm_backbone: None,
            },
            family: DeciderFamily::Aligned,
            kdma_values: vec![
                KdmaValue {
                    kdma: "merit".to_string(),
                    value: 0.2,
                },
                KdmaValue {
                    kdma: "merit".to_string(),
                    value: 0.9,
                },
            ],
            alignment_target_id: None,
            run_variant: None,
            results: BTreeMap::new(),
        };
        assert_eq!(exp.kdma_value("merit"), Some(0.2));
        assert_eq!(exp.kdma_value("affiliation"), None);
    }

    #[test]
    fn test_manifest_error_display() {
        assert_eq!(
            ManifestError::MissingKey("indices").to_string(),
            "manifest is missing required key 'indices'"
        );
    }
}
