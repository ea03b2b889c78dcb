//! Canned requests and responses.

use std::sync::Arc;

use super::ScriptedGenerationClient;
use crate::config::OrchestratorConfig;
use crate::context::WorkflowRequest;
use crate::events::CollectingEventSink;
use crate::pipeline::Orchestrator;

/// A fully populated request.
#[must_use]
pub fn sample_request() -> WorkflowRequest {
    WorkflowRequest::new("Launch support bot", "SaaS")
        .with_budget("€100K")
        .with_timeline("6 months")
        .with_constraints("small team")
}

/// A fenced live Research response with confidence 0.9.
#[must_use]
pub fn fenced_research_response() -> &'static str {
    "```json\n{\"marketSize\":\"$1B\",\"competitors\":[\"A\"],\"trends\":[\"B\"],\"opportunities\":[\"C\"],\"confidence\":0.9}\n```"
}

/// A valid bare Analysis response.
#[must_use]
pub fn analysis_response() -> &'static str {
    r#"{"risks":["Churn"],"opportunities":["Upsell"],"feasibilityScore":0.66,"recommendations":["Pilot first"],"confidence":0.7}"#
}

/// A valid bare Strategy response.
#[must_use]
pub fn strategy_response() -> &'static str {
    r#"{"actionPlan":["Hire","Build","Launch"],"timeline":"Two quarters","budget":"€80K build, €20K launch","kpis":["CSAT"],"confidence":0.8}"#
}

/// A valid bare Validation response.
#[must_use]
pub fn validation_response() -> &'static str {
    r#"{"validationScore":0.83,"issues":[],"improvements":["Add metrics"],"finalRecommendation":"Proceed","confidence":0.88}"#
}

/// An orchestrator with no inter-stage delay, wired to a collecting sink.
///
/// Returns the orchestrator, the client, and the sink so tests can inspect
/// prompts and events after a run.
#[must_use]
pub fn test_orchestrator(
    client: ScriptedGenerationClient,
) -> (Orchestrator, Arc<ScriptedGenerationClient>, Arc<CollectingEventSink>) {
    let client = Arc::new(client);
    let sink = Arc::new(CollectingEventSink::new());
    let orchestrator = Orchestrator::new(client.clone(), OrchestratorConfig::immediate())
        .with_event_sink(sink.clone());
    (orchestrator, client, sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::parse;
    use crate::core::StageKind;

    #[test]
    fn test_sample_request_is_valid() {
        assert!(sample_request().validate().is_ok());
    }

    #[test]
    fn test_canned_responses_parse() {
        assert!(parse(StageKind::Research, fenced_research_response()).is_ok());
        assert!(parse(StageKind::Analysis, analysis_response()).is_ok());
        assert!(parse(StageKind::Strategy, strategy_response()).is_ok());
        assert!(parse(StageKind::Validation, validation_response()).is_ok());
    }
}
