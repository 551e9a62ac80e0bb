//! Baseline-versus-aligned comparison.

use align_engine::DecisionResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Both decisions for one scenario plus whether alignment changed the
/// outcome.
///
/// `changed` compares choice identifiers only. Two not-found results
/// compare as unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionComparison {
    /// What the baseline decider chose.
    pub baseline: DecisionResult,

    /// What the aligned decider chose.
    pub aligned: DecisionResult,

    /// True when the two chose different options.
    pub changed: bool,
}

impl DecisionComparison {
    /// Builds a comparison and derives `changed`.
    pub fn new(baseline: DecisionResult, aligned: DecisionResult) -> Self {
        let changed = !baseline.same_choice(&aligned);
        Self {
            baseline,
            aligned,
            changed,
        }
    }

    /// Badge text for the comparison.
    pub fn status(&self) -> &'static str {
        if self.changed {
            "Changed"
        } else {
            "Same"
        }
    }
}

impl fmt::Display for DecisionComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} ({})",
            self.baseline.decision,
            self.aligned.decision,
            self.status()
        )
    }
}
