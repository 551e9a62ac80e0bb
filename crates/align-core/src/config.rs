//! Configuration types for the decision facade.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Configuration for [`AlignService`](crate::AlignService).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Manifest location.
    pub manifest: ManifestConfig,

    /// Resolution strategy.
    pub resolver: ResolverConfig,

    /// Global settings.
    pub global: GlobalConfig,
}

impl EngineConfig {
    /// Reads a configuration from a JSON file.
    ///
    /// Missing sections and fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Config`] if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| CoreError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        serde_json::from_str(&text)
            .map_err(|e| CoreError::Config(format!("cannot parse {}: {}", path.display(), e)))
    }
}

/// Where the manifest lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestConfig {
    /// Path to `manifest.json`.
    pub path: PathBuf,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("static/data/manifest.json"),
        }
    }
}

/// Which strategy backs the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Nearest match over the manifest's experiments. Load failure is fatal.
    Manifest,
    /// The embedded rule table. No manifest is read.
    RuleTable,
    /// Manifest when the file exists, rule table when it cannot be read.
    /// A manifest that is present but malformed still fails the load.
    #[default]
    Auto,
}

impl Strategy {
    /// Whether this strategy reads the manifest.
    pub fn needs_manifest(self) -> bool {
        !matches!(self, Strategy::RuleTable)
    }
}

impl FromStr for Strategy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manifest" => Ok(Strategy::Manifest),
            "rule_table" | "rule-table" | "rules" => Ok(Strategy::RuleTable),
            "auto" => Ok(Strategy::Auto),
            other => Err(CoreError::Config(format!("unknown strategy '{}'", other))),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Manifest => write!(f, "manifest"),
            Strategy::RuleTable => write!(f, "rule_table"),
            Strategy::Auto => write!(f, "auto"),
        }
    }
}

/// Resolver configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Backing strategy.
    pub strategy: Strategy,
}

/// Global settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Log every resolved decision at `info`.
    pub audit_logging: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            audit_logging: true,
        }
    }
}
