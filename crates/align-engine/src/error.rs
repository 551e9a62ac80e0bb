//! Error types for decision resolution.
//!
//! These are usage errors from the caller and fail fast. A query that
//! simply has no data is not an error: it resolves to the not-found
//! [`DecisionResult`](crate::DecisionResult).

use thiserror::Error;

/// Errors that can occur while resolving a decision.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The scenario id is not known to the active strategy.
    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),

    /// The decider string is neither `baseline` nor `aligned`.
    #[error("Unknown decider: {0}")]
    UnknownDecider(String),

    /// An aligned decision was requested without a value profile.
    #[error("Aligned decision for '{scenario}' requires a value profile")]
    MissingProfile {
        /// Scenario that was queried.
        scenario: String,
    },
}
