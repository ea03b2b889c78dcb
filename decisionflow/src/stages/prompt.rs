//! Stage prompt construction.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::context::WorkflowContext;
use crate::core::{StageArtifact, StageKind};

const JSON_ONLY: &str = "IMPORTANT: Respond ONLY with valid JSON. No additional text.";

/// Fixed role/instruction header for a stage.
#[must_use]
pub fn header(stage: StageKind) -> &'static str {
    match stage {
        StageKind::Research => {
            "You are a Market Research Agent. Analyze the following business scenario and provide structured output."
        }
        StageKind::Analysis => {
            "You are a Risk Analysis Agent. Based on the research data, provide risk and opportunity assessment."
        }
        StageKind::Strategy => {
            "You are a Strategic Planning Agent. Create an actionable plan based on research and analysis."
        }
        StageKind::Validation => {
            "You are a Quality Validation Agent. Review all previous agent outputs and provide final validation."
        }
    }
}

/// Identifies which stage a prompt was built for, from its leading header.
#[must_use]
pub fn stage_of(prompt: &str) -> Option<StageKind> {
    StageKind::ALL
        .into_iter()
        .find(|stage| prompt.starts_with(header(*stage)))
}

/// The exact JSON shape the stage must answer with.
#[must_use]
pub fn response_template(stage: StageKind) -> &'static str {
    match stage {
        StageKind::Research => {
            r#"{
  "marketSize": "estimated market size with numbers",
  "competitors": ["competitor1", "competitor2", "competitor3"],
  "trends": ["trend1", "trend2", "trend3"],
  "opportunities": ["opportunity1", "opportunity2", "opportunity3"],
  "confidence": 0.85
}"#
        }
        StageKind::Analysis => {
            r#"{
  "risks": ["risk1", "risk2", "risk3"],
  "opportunities": ["opportunity1", "opportunity2", "opportunity3"],
  "feasibilityScore": 0.75,
  "recommendations": ["recommendation1", "recommendation2"],
  "confidence": 0.80
}"#
        }
        StageKind::Strategy => {
            r#"{
  "actionPlan": ["action1", "action2", "action3", "action4"],
  "timeline": "detailed timeline description",
  "budget": "budget breakdown and allocation",
  "kpis": ["kpi1", "kpi2", "kpi3"],
  "confidence": 0.85
}"#
        }
        StageKind::Validation => {
            r#"{
  "validationScore": 0.85,
  "issues": ["issue1", "issue2"],
  "improvements": ["improvement1", "improvement2"],
  "finalRecommendation": "detailed final recommendation",
  "confidence": 0.90
}"#
        }
    }
}

/// Builds the full prompt for `stage`.
///
/// Layout: role header, the rendered context, each prior artifact as compact
/// JSON in stage order, then the JSON-only instruction with the exact shape.
#[must_use]
pub fn build_prompt(
    stage: StageKind,
    context: &WorkflowContext,
    prior: &BTreeMap<StageKind, StageArtifact>,
) -> String {
    let mut prompt = String::new();
    let _ = writeln!(prompt, "{}", header(stage));
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "Context: {}", context.as_str());

    for (kind, artifact) in prior {
        let _ = writeln!(prompt, "{}: {}", kind.label(), artifact.to_json());
    }

    let _ = writeln!(prompt);
    if stage == StageKind::Validation {
        prompt.push_str("Validate the consistency, feasibility, and quality of the recommendations. ");
    }
    let _ = writeln!(
        prompt,
        "Provide your response as a JSON object with this exact structure:"
    );
    let _ = writeln!(prompt, "{}", response_template(stage));
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "{JSON_ONLY}");
    prompt
}
