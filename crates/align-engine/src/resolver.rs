//! The resolver capability.
//!
//! Defines the [`Resolver`] trait that both resolution strategies
//! implement. Callers hold an `Arc<dyn Resolver>` chosen at construction
//! time and never branch on which strategy is behind it.

use crate::result::{Decider, DecisionResult};
use crate::Result;
use align_manifest::{Catalog, ValueProfile};

/// A decision resolution strategy.
///
/// # Implementors
///
/// - [`ManifestResolver`](crate::ManifestResolver): nearest match over
///   precomputed experiments
/// - [`RuleTableResolver`](crate::RuleTableResolver): fixed threshold table
///
/// # Contract
///
/// - `decide` is pure: same inputs, same output, no side effects.
/// - An unknown scenario fails with
///   [`ResolveError::UnknownScenario`](crate::ResolveError::UnknownScenario).
/// - An aligned query without a profile fails with
///   [`ResolveError::MissingProfile`](crate::ResolveError::MissingProfile).
/// - Baseline queries ignore the profile.
/// - Absence of data is the not-found [`DecisionResult`], not an error.
pub trait Resolver: Send + Sync {
    /// Short strategy name for logs.
    fn name(&self) -> &str;

    /// The dimensions, scenarios and presets this strategy can answer for.
    fn catalog(&self) -> &Catalog;

    /// Resolves one decision.
    fn decide(
        &self,
        scenario_id: &str,
        decider: Decider,
        profile: Option<&ValueProfile>,
    ) -> Result<DecisionResult>;

    /// Resolves one decision with the decider given by name.
    ///
    /// Fails with [`ResolveError::UnknownDecider`](crate::ResolveError::UnknownDecider)
    /// for anything other than `baseline` or `aligned`.
    fn decide_named(
        &self,
        scenario_id: &str,
        decider: &str,
        profile: Option<&ValueProfile>,
    ) -> Result<DecisionResult> {
        let decider: Decider = decider.parse()?;
        self.decide(scenario_id, decider, profile)
    }
}
