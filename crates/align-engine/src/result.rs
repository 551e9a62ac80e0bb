//! Decision results.
//!
//! Both strategies normalize their output into [`DecisionResult`], so the
//! presentation layer never needs to know which one answered.

use crate::error::ResolveError;
use align_manifest::{DeciderFamily, Experiment, ExperimentResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Decision text carried by every not-found result.
pub const NOT_FOUND_DECISION: &str = "No matching result";

/// Which decider a query asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decider {
    /// The unaligned default decider.
    Baseline,
    /// The decider steered by a value profile.
    Aligned,
}

impl Decider {
    /// The experiment family this decider draws from.
    pub fn family(self) -> DeciderFamily {
        match self {
            Decider::Baseline => DeciderFamily::Baseline,
            Decider::Aligned => DeciderFamily::Aligned,
        }
    }

    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Decider::Baseline => "baseline",
            Decider::Aligned => "aligned",
        }
    }
}

impl FromStr for Decider {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "baseline" => Ok(Decider::Baseline),
            "aligned" => Ok(Decider::Aligned),
            other => Err(ResolveError::UnknownDecider(other.to_string())),
        }
    }
}

impl fmt::Display for Decider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The uniform output of every resolution strategy.
///
/// A `choice_id` of `None` is the not-found result: a normal outcome that
/// means no data answers the query. It is rendered as a message, never
/// raised as an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionResult {
    /// Identifier of the selected choice.
    pub choice_id: Option<String>,

    /// Display text of the decision.
    pub decision: String,

    /// Reasoning shown alongside the decision.
    pub justification: String,

    /// ADM that produced the decision (manifest-backed only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adm_name: Option<String>,

    /// LLM backbone of that ADM (manifest-backed only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_backbone: Option<String>,
}

impl DecisionResult {
    /// Creates a decision with no ADM attribution.
    pub fn new(
        choice_id: impl Into<String>,
        decision: impl Into<String>,
        justification: impl Into<String>,
    ) -> Self {
        Self {
            choice_id: Some(choice_id.into()),
            decision: decision.into(),
            justification: justification.into(),
            adm_name: None,
            llm_backbone: None,
        }
    }

    /// Creates a decision from an experiment's recorded result.
    pub fn from_experiment(experiment: &Experiment, result: &ExperimentResult) -> Self {
        Self {
            choice_id: Some(result.choice_id.clone()),
            decision: result.choice_label.clone(),
            justification: result.justification.clone(),
            adm_name: Some(experiment.adm.name.clone()),
            llm_backbone: experiment.adm.llm_backbone.clone(),
        }
    }

    /// Creates a not-found result with the given explanation.
    pub fn not_found(justification: impl Into<String>) -> Self {
        Self {
            choice_id: None,
            decision: NOT_FOUND_DECISION.to_string(),
            justification: justification.into(),
            adm_name: None,
            llm_backbone: None,
        }
    }

    /// Not-found result for a scenario with no surviving candidates.
    pub fn no_experiments(scenario_id: &str) -> Self {
        Self::not_found(format!("No experiments found for scenario: {}", scenario_id))
    }

    /// Not-found result for an experiment that lacks the scenario.
    pub fn no_result_in(experiment_key: &str) -> Self {
        Self::not_found(format!(
            "No result for scenario in experiment: {}",
            experiment_key
        ))
    }

    /// Returns true for the not-found result.
    pub fn is_not_found(&self) -> bool {
        self.choice_id.is_none()
    }

    /// Compares selected choices by identifier.
    ///
    /// Labels are never compared: two different choices may share text.
    pub fn same_choice(&self, other: &DecisionResult) -> bool {
        self.choice_id == other.choice_id
    }
}

impl fmt::Display for DecisionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.decision)?;
        if let Some(ref id) = self.choice_id {
            write!(f, " [{}]", id)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decider_from_str() {
        assert_eq!("baseline".parse::<Decider>(), Ok(Decider::Baseline));
        assert_eq!("aligned".parse::<Decider>(), Ok(Decider::Aligned));
        assert_eq!(
            "Aligned".parse::<Decider>(),
            Err(ResolveError::UnknownDecider("Aligned".to_string()))
        );
    }

    #[test]
    fn test_decider_family() {
        assert_eq!(Decider::Baseline.family(), DeciderFamily::Baseline);
        assert_eq!(Decider::Aligned.family(), DeciderFamily::Aligned);
    }

    #[test]
    fn test_not_found_shape() {
        let result = DecisionResult::no_experiments("scene-7");
        assert!(result.is_not_found());
        assert_eq!(result.decision, NOT_FOUND_DECISION);
        assert!(result.justification.contains("scene-7"));
    }

    #[test]
    fn test_same_choice_ignores_labels() {
        let a = DecisionResult::new("treat_a", "Treat the patient", "x");
        let b = DecisionResult::new("treat_b", "Treat the patient", "y");
        let c = DecisionResult::new("treat_a", "Different text", "z");
        assert!(!a.same_choice(&b));
        assert!(a.same_choice(&c));
    }

    #[test]
    fn test_serializes_camel_case() {
        let result = DecisionResult::not_found("nothing");
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("choiceId").unwrap().is_null());
        assert!(json.get("admName").is_none());
    }

    #[test]
    fn test_display() {
        let result = DecisionResult::new("wait", "Wait in cover", "safe");
        assert_eq!(result.to_string(), "Wait in cover [wait]");
        assert_eq!(DecisionResult::not_found("x").to_string(), NOT_FOUND_DECISION);
    }
}
