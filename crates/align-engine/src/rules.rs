//! Rule-table resolution.
//!
//! The fallback strategy when no experiment data is available. Each
//! scenario has a fixed baseline choice and a single alternative that the
//! aligned decider switches to only when the governing dimension is
//! `high`. `low` and `medium` both keep the baseline choice; there is no
//! partial blend.
//!
//! ## Decision Table
//!
//! | Decider  | Level           | Choice              | Justification            |
//! |----------|-----------------|---------------------|--------------------------|
//! | baseline | (ignored)       | `baseline_choice_id`| `baseline_justification` |
//! | aligned  | low / medium    | `baseline_choice_id`| `justifications[level]`  |
//! | aligned  | high            | `flipped_choice_id` | `justifications.high`    |
//!
//! A level the profile omits, or one that is not recognized, reads as
//! `medium`, matching the level encoder.

use crate::error::ResolveError;
use crate::resolver::Resolver;
use crate::result::{Decider, DecisionResult};
use crate::Result;
use align_manifest::{Catalog, Dimension, Level, Preset, Scenario, ValueProfile};

/// Justification text for each level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelTexts {
    /// Shown when the governing dimension is `low`.
    pub low: String,
    /// Shown when the governing dimension is `medium`.
    pub medium: String,
    /// Shown when the governing dimension is `high`.
    pub high: String,
}

impl LevelTexts {
    /// Creates the three texts.
    pub fn new(low: impl Into<String>, medium: impl Into<String>, high: impl Into<String>) -> Self {
        Self {
            low: low.into(),
            medium: medium.into(),
            high: high.into(),
        }
    }

    /// Returns the text for a level. Unrecognized levels use `medium`.
    pub fn for_level(&self, level: &Level) -> &str {
        match level.normalized() {
            Level::Low => &self.low,
            Level::High => &self.high,
            _ => &self.medium,
        }
    }
}

/// One row of the decision table.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleEntry {
    /// The scenario this row decides.
    pub scenario: Scenario,
    /// The governing dimension.
    pub primary_kdma: String,
    /// What the baseline decider always picks.
    pub baseline_choice_id: String,
    /// What the aligned decider picks at `high`.
    pub flipped_choice_id: String,
    /// Reasoning shown for the baseline decision.
    pub baseline_justification: String,
    /// Reasoning shown for aligned decisions.
    pub justifications: LevelTexts,
}

impl RuleEntry {
    /// Whether a level switches the decision away from the baseline.
    pub fn flips_at(level: &Level) -> bool {
        matches!(level, Level::High)
    }

    fn label_for(&self, choice_id: &str) -> String {
        self.scenario
            .choice(choice_id)
            .map(|c| c.label.clone())
            .unwrap_or_else(|| choice_id.to_string())
    }

    fn baseline(&self) -> DecisionResult {
        DecisionResult::new(
            self.baseline_choice_id.clone(),
            self.label_for(&self.baseline_choice_id),
            self.baseline_justification.clone(),
        )
    }

    fn aligned(&self, profile: &ValueProfile) -> DecisionResult {
        let level = profile
            .get(&self.primary_kdma)
            .map(Level::normalized)
            .unwrap_or(Level::Medium);

        let choice_id = if Self::flips_at(&level) {
            &self.flipped_choice_id
        } else {
            &self.baseline_choice_id
        };

        DecisionResult::new(
            choice_id.clone(),
            self.label_for(choice_id),
            self.justifications.for_level(&level),
        )
    }
}

/// Rule-table [`Resolver`].
///
/// Fully synchronous and self-contained: it needs no data beyond its own
/// table.
///
/// # Example
///
/// ```rust
/// use align_engine::{Decider, Resolver, RuleTableResolver};
/// use align_manifest::ValueProfile;
///
/// let rules = RuleTableResolver::builtin();
/// let profile = ValueProfile::new().with("merit", "high");
///
/// let baseline = rules.decide("shooter-vs-victim", Decider::Baseline, None).unwrap();
/// let aligned = rules
///     .decide("shooter-vs-victim", Decider::Aligned, Some(&profile))
///     .unwrap();
/// assert_ne!(baseline.choice_id, aligned.choice_id);
/// ```
#[derive(Debug, Clone)]
pub struct RuleTableResolver {
    entries: Vec<RuleEntry>,
    catalog: Catalog,
}

impl RuleTableResolver {
    /// Creates a resolver from table rows plus the dimensions and presets
    /// offered alongside them.
    pub fn new(entries: Vec<RuleEntry>, dimensions: Vec<Dimension>, presets: Vec<Preset>) -> Self {
        let scenarios = entries.iter().map(|e| e.scenario.clone()).collect();
        Self {
            entries,
            catalog: Catalog {
                dimensions,
                scenarios,
                presets,
            },
        }
    }

    /// The table shipped with the demo.
    pub fn builtin() -> Self {
        crate::builtin::rule_table()
    }

    /// Returns the row for a scenario.
    pub fn entry(&self, scenario_id: &str) -> Option<&RuleEntry> {
        self.entries.iter().find(|e| e.scenario.id == scenario_id)
    }

    /// All rows in table order.
    pub fn entries(&self) -> &[RuleEntry] {
        &self.entries
    }
}

impl Resolver for RuleTableResolver {
    fn name(&self) -> &str {
        "rule_table"
    }

    fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn decide(
        &self,
        scenario_id: &str,
        decider: Decider,
        profile: Option<&ValueProfile>,
    ) -> Result<DecisionResult> {
        let entry = self
            .entry(scenario_id)
            .ok_or_else(|| ResolveError::UnknownScenario(scenario_id.to_string()))?;

        match decider {
            Decider::Baseline => Ok(entry.baseline()),
            Decider::Aligned => {
                let profile = profile.ok_or_else(|| ResolveError::MissingProfile {
                    scenario: scenario_id.to_string(),
                })?;
                Ok(entry.aligned(profile))
            }
        }
    }
}
