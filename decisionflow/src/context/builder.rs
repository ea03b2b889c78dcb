//! Renders a request into the text block embedded in every stage prompt.

use std::fmt;

use super::WorkflowRequest;

/// Read-only text rendering of a [`WorkflowRequest`].
///
/// Lives for the duration of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowContext {
    rendered: String,
}

impl WorkflowContext {
    /// The rendered text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.rendered
    }
}

impl fmt::Display for WorkflowContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}

impl AsRef<str> for WorkflowContext {
    fn as_ref(&self) -> &str {
        &self.rendered
    }
}

/// Builds the context for a request.
///
/// Total: empty fields render as empty values and nothing is validated.
#[must_use]
pub fn build(request: &WorkflowRequest) -> WorkflowContext {
    let rendered = format!(
        "\nBusiness Goal: {}\nIndustry: {}\nBudget: {}\nTimeline: {}\nConstraints: {}\n",
        request.business_goal,
        request.industry,
        request.budget,
        request.timeline,
        request.constraints,
    );
    WorkflowContext { rendered }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_renders_fields_in_fixed_order() {
        let request = WorkflowRequest::new("Launch support bot", "SaaS")
            .with_budget("€100K")
            .with_timeline("6 months")
            .with_constraints("small team");

        let ctx = build(&request);
        assert_eq!(
            ctx.as_str(),
            "\nBusiness Goal: Launch support bot\nIndustry: SaaS\nBudget: €100K\nTimeline: 6 months\nConstraints: small team\n"
        );
    }

    #[test]
    fn test_empty_fields_render_empty() {
        let ctx = build(&WorkflowRequest::default());
        assert_eq!(
            ctx.to_string(),
            "\nBusiness Goal: \nIndustry: \nBudget: \nTimeline: \nConstraints: \n"
        );
    }

    #[test]
    fn test_build_is_deterministic() {
        let request = WorkflowRequest::new("Goal", "Health");
        assert_eq!(build(&request), build(&request));
    }
}
