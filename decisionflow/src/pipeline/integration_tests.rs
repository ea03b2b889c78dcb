//! End-to-end pipeline scenarios against a scripted generation client.

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    use crate::config::OrchestratorConfig;
    use crate::contracts::fallback_for;
    use crate::core::{
        AgentStatus, Provenance, ResearchArtifact, StageArtifact, StageKind, WorkflowEvent,
    };
    use crate::errors::{FormatError, TransportError};
    use crate::events::ChannelEventSink;
    use crate::pipeline::Orchestrator;
    use crate::providers::MockGenerationClient;
    use crate::testing::{
        analysis_response, assert_fallback, assert_live, assert_schema_valid,
        assert_status_sequence, fenced_research_response, sample_request, strategy_response,
        test_orchestrator, validation_response, ScriptedGenerationClient,
    };

    #[tokio::test]
    async fn test_all_transport_failures_yield_fallback_catalog() {
        let client = ScriptedGenerationClient::failing(TransportError::http(500, "Internal"));
        let (mut orchestrator, _, sink) = test_orchestrator(client);

        let result = orchestrator.run_pipeline(&sample_request()).await;

        for stage in StageKind::ALL {
            assert_eq!(result.artifact(stage), Some(&fallback_for(stage)));
            assert_fallback(&result, stage);
        }
        assert_eq!(result.fallback_stages(), StageKind::ALL.to_vec());
        assert_eq!(sink.events_of_type("stage.fallback_substituted").len(), 4);
        assert_status_sequence(&sink.status_changes());
    }

    #[tokio::test]
    async fn test_fenced_research_response_is_used_verbatim() {
        let client = ScriptedGenerationClient::new()
            .respond(StageKind::Research, fenced_research_response());
        let (mut orchestrator, _, _) = test_orchestrator(client);

        let result = orchestrator.run_pipeline(&sample_request()).await;

        let expected = StageArtifact::Research(ResearchArtifact {
            market_size: "$1B".to_string(),
            competitors: vec!["A".to_string()],
            trends: vec!["B".to_string()],
            opportunities: vec!["C".to_string()],
            confidence: 0.9,
        });
        let research = result.artifact(StageKind::Research).unwrap();
        assert_eq!(research, &expected);
        assert!((research.confidence() - 0.9).abs() < f64::EPSILON);
        assert_live(&result, StageKind::Research);
        assert_fallback(&result, StageKind::Analysis);
    }

    #[tokio::test]
    async fn test_invalid_analysis_json_falls_back_in_isolation() {
        let client = ScriptedGenerationClient::new()
            .respond(StageKind::Research, fenced_research_response())
            .respond(StageKind::Analysis, "{\"risks\": [\"unterminated\"")
            .respond(StageKind::Strategy, strategy_response())
            .respond(StageKind::Validation, validation_response());
        let (mut orchestrator, _, sink) = test_orchestrator(client);

        let result = orchestrator.run_pipeline(&sample_request()).await;

        assert_live(&result, StageKind::Research);
        assert_fallback(&result, StageKind::Analysis);
        assert_live(&result, StageKind::Strategy);
        assert_live(&result, StageKind::Validation);

        let fallbacks = sink.events_of_type("stage.fallback_substituted");
        assert_eq!(fallbacks.len(), 1);
        assert_eq!(fallbacks[0].stage(), Some(StageKind::Analysis));
    }

    #[tokio::test]
    async fn test_all_live_responses() {
        let client = ScriptedGenerationClient::new()
            .respond(StageKind::Research, fenced_research_response())
            .respond(StageKind::Analysis, analysis_response())
            .respond(StageKind::Strategy, strategy_response())
            .respond(StageKind::Validation, validation_response());
        let (mut orchestrator, _, sink) = test_orchestrator(client);

        let result = orchestrator.run_pipeline(&sample_request()).await;

        assert!(result.fallback_stages().is_empty());
        for artifact in result.artifacts.values() {
            assert_schema_valid(artifact);
        }
        assert!(sink.events_of_type("stage.fallback_substituted").is_empty());
    }

    #[tokio::test]
    async fn test_stages_run_in_fixed_order() {
        let (mut orchestrator, client, _) = test_orchestrator(ScriptedGenerationClient::new());

        orchestrator.run_pipeline(&sample_request()).await;

        let called: Vec<StageKind> = client.stages_called().into_iter().flatten().collect();
        assert_eq!(called, StageKind::ALL.to_vec());
    }

    #[tokio::test]
    async fn test_prompt_k_contains_every_prior_artifact() {
        let client = ScriptedGenerationClient::new()
            .respond(StageKind::Research, fenced_research_response())
            .respond(StageKind::Strategy, strategy_response());
        let (mut orchestrator, client, _) = test_orchestrator(client);

        let result = orchestrator.run_pipeline(&sample_request()).await;
        let prompts = client.prompts();

        for (k, stage) in StageKind::ALL.into_iter().enumerate() {
            for earlier in stage.predecessors() {
                let serialized = result.artifact(*earlier).unwrap().to_json();
                assert!(
                    prompts[k].contains(&serialized),
                    "prompt for {stage} is missing the {earlier} artifact"
                );
            }
            for later in &StageKind::ALL[k..] {
                let serialized = result.artifact(*later).unwrap().to_json();
                assert!(!prompts[k].contains(&serialized));
            }
        }
    }

    #[tokio::test]
    async fn test_every_prompt_carries_the_rendered_context() {
        let (mut orchestrator, client, _) = test_orchestrator(ScriptedGenerationClient::new());

        orchestrator.run_pipeline(&sample_request()).await;

        let context = orchestrator.context().unwrap().as_str().to_string();
        assert!(context.contains("Constraints: small team"));
        for prompt in client.prompts() {
            assert!(prompt.contains(&context));
        }
    }

    #[tokio::test]
    async fn test_status_events_never_start_a_stage_early() {
        let (sink, mut rx) = ChannelEventSink::new();
        let client = Arc::new(ScriptedGenerationClient::new());
        let mut orchestrator =
            Orchestrator::new(client, OrchestratorConfig::immediate()).with_event_sink(Arc::new(sink));

        let result = orchestrator.run_pipeline(&sample_request()).await;

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }

        let changes: Vec<(StageKind, AgentStatus)> = events
            .iter()
            .filter_map(|e| match e {
                WorkflowEvent::StageStatusChanged { stage, status, .. } => Some((*stage, *status)),
                _ => None,
            })
            .collect();
        assert_status_sequence(&changes);

        for event in &events {
            if let WorkflowEvent::StageStatusChanged { run_id, .. } = event {
                assert_eq!(run_id, &result.run_id);
            }
        }
        match events.last() {
            Some(WorkflowEvent::RunCompleted { result: emitted }) => {
                assert_eq!(emitted.as_ref(), &result)
            }
            other => panic!("expected RunCompleted last, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fallback_event_precedes_completion_of_its_stage() {
        let client = ScriptedGenerationClient::new()
            .respond(StageKind::Research, fenced_research_response())
            .fail(StageKind::Analysis, FormatError::new("bad"));
        let (mut orchestrator, _, sink) = test_orchestrator(client);

        orchestrator.run_pipeline(&sample_request()).await;

        let types: Vec<(&'static str, Option<StageKind>)> = sink
            .events()
            .iter()
            .map(|e| (e.event_type(), e.stage()))
            .filter(|(_, s)| *s == Some(StageKind::Analysis))
            .collect();
        assert_eq!(
            types,
            vec![
                ("stage.status_changed", Some(StageKind::Analysis)),
                ("stage.status_changed", Some(StageKind::Analysis)),
                ("stage.fallback_substituted", Some(StageKind::Analysis)),
                ("stage.status_changed", Some(StageKind::Analysis)),
            ]
        );
    }

    #[tokio::test]
    async fn test_rerun_replaces_previous_result() {
        let client = ScriptedGenerationClient::new()
            .respond(StageKind::Research, fenced_research_response());
        let (mut orchestrator, client, sink) = test_orchestrator(client);

        let first = orchestrator.run_pipeline(&sample_request()).await;
        sink.clear();
        let second = orchestrator.run_pipeline(&sample_request()).await;

        assert_eq!(client.calls(), 8);
        assert_ne!(first.run_id, second.run_id);
        assert_eq!(first.artifacts, second.artifacts);
        assert_status_sequence(&sink.status_changes());
        assert_eq!(orchestrator.result().map(|r| &r.run_id), Some(&second.run_id));
    }

    #[tokio::test]
    async fn test_rerun_announces_idle_before_first_processing() {
        let (mut orchestrator, _, sink) = test_orchestrator(ScriptedGenerationClient::new());

        orchestrator.run_pipeline(&sample_request()).await;
        sink.clear();
        orchestrator.run_pipeline(&sample_request()).await;

        let changes = sink.status_changes();
        let first_processing = changes
            .iter()
            .position(|(_, status)| *status == AgentStatus::Processing)
            .unwrap();
        let idle_before: Vec<StageKind> = changes[..first_processing]
            .iter()
            .filter(|(_, status)| *status == AgentStatus::Idle)
            .map(|(stage, _)| *stage)
            .collect();
        assert_eq!(idle_before, StageKind::ALL.to_vec());

        for stage in StageKind::ALL {
            let per_stage: Vec<AgentStatus> = changes
                .iter()
                .filter(|(s, _)| *s == stage)
                .map(|(_, status)| *status)
                .collect();
            assert_eq!(
                per_stage,
                vec![AgentStatus::Idle, AgentStatus::Processing, AgentStatus::Completed]
            );
        }
    }

    #[tokio::test]
    async fn test_each_stage_calls_generation_exactly_once() {
        let mut client = MockGenerationClient::new();
        client
            .expect_generate()
            .times(4)
            .returning(|_| Err(TransportError::network("connection refused").into()));
        client.expect_describe().return_const("mock".to_string());

        let mut orchestrator =
            Orchestrator::new(Arc::new(client), OrchestratorConfig::immediate());
        let result = orchestrator.run_pipeline(&sample_request()).await;

        for stage in StageKind::ALL {
            match result.provenance_of(stage) {
                Some(Provenance::Fallback { reason }) => assert!(reason.contains("status 0")),
                other => panic!("expected fallback provenance, got {other:?}"),
            }
        }
    }
}
