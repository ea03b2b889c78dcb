//! The user-supplied business decision request.

use serde::{Deserialize, Serialize};

use crate::errors::RequestValidationError;

/// Structured input for one pipeline run.
///
/// Immutable once a run starts; the orchestrator takes it by reference and
/// renders it into a [`WorkflowContext`](super::WorkflowContext) exactly once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowRequest {
    /// What the business wants to achieve.
    #[serde(default)]
    pub business_goal: String,
    /// Industry or sector.
    #[serde(default)]
    pub industry: String,
    /// Budget range, free text.
    #[serde(default)]
    pub budget: String,
    /// Timeline, free text.
    #[serde(default)]
    pub timeline: String,
    /// Known constraints, free text.
    #[serde(default)]
    pub constraints: String,
}

impl WorkflowRequest {
    /// Creates a request from a goal and industry, leaving the rest empty.
    #[must_use]
    pub fn new(business_goal: impl Into<String>, industry: impl Into<String>) -> Self {
        Self {
            business_goal: business_goal.into(),
            industry: industry.into(),
            ..Default::default()
        }
    }

    /// Sets the budget.
    #[must_use]
    pub fn with_budget(mut self, budget: impl Into<String>) -> Self {
        self.budget = budget.into();
        self
    }

    /// Sets the timeline.
    #[must_use]
    pub fn with_timeline(mut self, timeline: impl Into<String>) -> Self {
        self.timeline = timeline.into();
        self
    }

    /// Sets the constraints.
    #[must_use]
    pub fn with_constraints(mut self, constraints: impl Into<String>) -> Self {
        self.constraints = constraints.into();
        self
    }

    /// Checks that the goal and industry are filled in.
    ///
    /// The pipeline itself accepts any request; this is for callers that
    /// want to refuse to start a run on an incomplete form.
    ///
    /// # Errors
    ///
    /// Returns `RequestValidationError` listing the blank fields.
    pub fn validate(&self) -> Result<(), RequestValidationError> {
        let mut missing = Vec::new();
        if self.business_goal.trim().is_empty() {
            missing.push("businessGoal".to_string());
        }
        if self.industry.trim().is_empty() {
            missing.push("industry".to_string());
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(RequestValidationError { missing })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let request = WorkflowRequest::new("Launch support bot", "SaaS")
            .with_budget("€100K")
            .with_timeline("6 months")
            .with_constraints("small team");

        assert_eq!(request.business_goal, "Launch support bot");
        assert_eq!(request.budget, "€100K");
        assert_eq!(request.constraints, "small team");
    }

    #[test]
    fn test_validate_requires_goal_and_industry() {
        assert!(WorkflowRequest::new("Goal", "Retail").validate().is_ok());

        let err = WorkflowRequest::new("  ", "").validate().unwrap_err();
        assert_eq!(err.missing, vec!["businessGoal", "industry"]);

        let err = WorkflowRequest::new("Goal", "").validate().unwrap_err();
        assert_eq!(err.missing, vec!["industry"]);
    }

    #[test]
    fn test_deserialize_camel_case_with_defaults() {
        let request: WorkflowRequest =
            serde_json::from_str(r#"{"businessGoal":"Expand","industry":"FinTech"}"#).unwrap();
        assert_eq!(request.business_goal, "Expand");
        assert_eq!(request.industry, "FinTech");
        assert!(request.timeline.is_empty());
    }
}
