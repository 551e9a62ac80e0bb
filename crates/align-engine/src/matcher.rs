//! Nearest-experiment matching.
//!
//! The manifest-backed strategy. For a scenario, every candidate
//! experiment of the requested family that records a value for the
//! scenario's governing dimension is scored by its distance from the
//! target value. The closest one answers.
//!
//! ## Determinism
//!
//! Candidates are scanned in index order and only a strictly smaller
//! distance replaces the current best, so on a tie the first candidate in
//! the index wins. The index order is therefore part of the data contract
//! and must never be re-sorted.

use crate::error::ResolveError;
use crate::level::{profile_target, BASELINE_TARGET};
use crate::resolver::Resolver;
use crate::result::{Decider, DecisionResult};
use crate::Result;
use align_manifest::{Catalog, DeciderFamily, Experiment, Manifest, ValueProfile};
use std::sync::Arc;
use tracing::debug;

/// The experiment selected for a query.
#[derive(Debug, Clone, Copy)]
pub struct Match<'a> {
    /// The winning experiment.
    pub experiment: &'a Experiment,
    /// Its value on the governing dimension.
    pub value: f64,
    /// Absolute distance from the target.
    pub distance: f64,
}

/// Finds the candidate experiment closest to `target`.
///
/// Candidates whose family differs from `family`, that record no value
/// for `kdma`, or whose key is missing from the manifest are skipped.
pub fn nearest_experiment<'a>(
    manifest: &'a Manifest,
    scenario_id: &str,
    family: DeciderFamily,
    kdma: &str,
    target: f64,
) -> Option<Match<'a>> {
    let mut best: Option<Match<'a>> = None;
    let mut best_distance = f64::INFINITY;

    for key in manifest.candidates(scenario_id) {
        let Some(experiment) = manifest.experiment(key) else {
            debug!("Index entry '{}' has no experiment record", key);
            continue;
        };
        if experiment.family != family {
            continue;
        }
        let Some(value) = experiment.kdma_value(kdma) else {
            continue;
        };

        let distance = (value - target).abs();
        if distance < best_distance {
            best_distance = distance;
            best = Some(Match {
                experiment,
                value,
                distance,
            });
        }
    }

    best
}

/// Resolves a decision against a manifest.
///
/// # Errors
///
/// - [`ResolveError::UnknownScenario`] if the scenario is not in the manifest
/// - [`ResolveError::MissingProfile`] for an aligned query without a profile
pub fn resolve(
    manifest: &Manifest,
    scenario_id: &str,
    decider: Decider,
    profile: Option<&ValueProfile>,
) -> Result<DecisionResult> {
    let scenario = manifest
        .scenario(scenario_id)
        .ok_or_else(|| ResolveError::UnknownScenario(scenario_id.to_string()))?;
    let kdma = scenario.kdma_type.as_str();

    let target = match decider {
        Decider::Baseline => BASELINE_TARGET,
        Decider::Aligned => {
            let profile = profile.ok_or_else(|| ResolveError::MissingProfile {
                scenario: scenario_id.to_string(),
            })?;
            profile_target(profile, kdma)
        }
    };

    let Some(found) = nearest_experiment(manifest, scenario_id, decider.family(), kdma, target)
    else {
        debug!(
            "No {} experiment for '{}' on {}",
            decider, scenario_id, kdma
        );
        return Ok(DecisionResult::no_experiments(scenario_id));
    };

    debug!(
        "Matched '{}' for {} '{}': {}={} (target {}, distance {:.3})",
        found.experiment.key, decider, scenario_id, kdma, found.value, target, found.distance
    );

    Ok(match found.experiment.result_for(scenario_id) {
        Some(result) => DecisionResult::from_experiment(found.experiment, result),
        None => DecisionResult::no_result_in(&found.experiment.key),
    })
}

/// Manifest-backed [`Resolver`].
///
/// # Example
///
/// ```rust
/// use align_engine::{Decider, ManifestResolver, Resolver};
/// use align_manifest::Manifest;
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let manifest = Manifest::from_json(json!({
///     "config": { "dimensions": [] },
///     "scenarios": {
///         "s1": { "title": "S1", "kdma_type": "merit", "choices": [] }
///     },
///     "experiments": {},
///     "indices": { "by_scenario": {} }
/// }))
/// .unwrap();
///
/// let resolver = ManifestResolver::new(Arc::new(manifest));
/// let result = resolver.decide("s1", Decider::Baseline, None).unwrap();
/// assert!(result.is_not_found());
/// ```
#[derive(Debug, Clone)]
pub struct ManifestResolver {
    manifest: Arc<Manifest>,
}

impl ManifestResolver {
    /// Creates a resolver over a loaded manifest.
    pub fn new(manifest: Arc<Manifest>) -> Self {
        Self { manifest }
    }

    /// The manifest this resolver reads.
    pub fn manifest(&self) -> &Arc<Manifest> {
        &self.manifest
    }
}

impl Resolver for ManifestResolver {
    fn name(&self) -> &str {
        "manifest"
    }

    fn catalog(&self) -> &Catalog {
        self.manifest.catalog()
    }

    fn decide(
        &self,
        scenario_id: &str,
        decider: Decider,
        profile: Option<&ValueProfile>,
    ) -> Result<DecisionResult> {
        resolve(&self.manifest, scenario_id, decider, profile)
    }
}
