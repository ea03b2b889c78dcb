//! Sequential four-stage pipeline orchestrator.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument};

use crate::config::OrchestratorConfig;
use crate::context::{build, WorkflowContext, WorkflowRequest};
use crate::core::{AgentStatus, Provenance, StageKind, WorkflowEvent, WorkflowResult};
use crate::events::{EventSink, NoOpEventSink};
use crate::providers::GenerationClient;
use crate::stages::StageRunner;
use crate::utils::new_run_id;

/// Step reported once every stage has completed.
pub const FINAL_STEP: usize = StageKind::ALL.len() + 1;

/// Drives Research, Analysis, Strategy and Validation in order.
///
/// Owns the per-stage status set, the rendered context and the accumulating
/// result of the current run. `run_pipeline` takes `&mut self`, so one
/// instance can only have one run in flight.
pub struct Orchestrator {
    runner: StageRunner,
    config: OrchestratorConfig,
    sink: Arc<dyn EventSink>,
    statuses: BTreeMap<StageKind, AgentStatus>,
    current_step: usize,
    context: Option<WorkflowContext>,
    result: Option<WorkflowResult>,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("runner", &self.runner)
            .field("config", &self.config)
            .field("statuses", &self.statuses)
            .field("current_step", &self.current_step)
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    /// Creates an orchestrator that discards events.
    #[must_use]
    pub fn new(client: Arc<dyn GenerationClient>, config: OrchestratorConfig) -> Self {
        Self {
            runner: StageRunner::new(client),
            config,
            sink: Arc::new(NoOpEventSink),
            statuses: idle_statuses(),
            current_step: 0,
            context: None,
            result: None,
        }
    }

    /// Sets the sink that receives status changes and the final result.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Returns every stage to `Idle` and discards the previous run.
    ///
    /// Emits an `Idle` status change per stage, tagged with the discarded
    /// run's id (empty if there was none).
    pub fn reset(&mut self) {
        let run_id = self
            .result
            .as_ref()
            .map(|r| r.run_id.clone())
            .unwrap_or_default();
        self.clear();
        for stage in StageKind::ALL {
            self.sink
                .try_emit(&WorkflowEvent::status_changed(&run_id, stage, AgentStatus::Idle));
        }
    }

    fn clear(&mut self) {
        self.statuses = idle_statuses();
        self.current_step = 0;
        self.context = None;
        self.result = None;
    }

    /// Status of every stage, in stage order.
    #[must_use]
    pub fn statuses(&self) -> &BTreeMap<StageKind, AgentStatus> {
        &self.statuses
    }

    /// Status of one stage.
    #[must_use]
    pub fn status(&self, stage: StageKind) -> AgentStatus {
        self.statuses.get(&stage).copied().unwrap_or_default()
    }

    /// Progress indicator: 0 before a run, `k` while the k-th stage runs,
    /// [`FINAL_STEP`] once the run has completed.
    #[must_use]
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Context rendered for the latest run.
    #[must_use]
    pub fn context(&self) -> Option<&WorkflowContext> {
        self.context.as_ref()
    }

    /// Result of the latest completed run.
    #[must_use]
    pub fn result(&self) -> Option<&WorkflowResult> {
        self.result.as_ref().filter(|r| r.is_complete())
    }

    /// Runs all four stages and returns their artifacts.
    ///
    /// Never fails: each stage yields either its live artifact or its
    /// fallback. Observers first receive an `Idle` status change for every
    /// stage, then `Processing` and `Completed` per stage in order, a
    /// `FallbackSubstituted` event per fallback, and a final `RunCompleted`.
    #[instrument(skip_all, fields(industry = %request.industry))]
    pub async fn run_pipeline(&mut self, request: &WorkflowRequest) -> WorkflowResult {
        self.clear();
        let start = Instant::now();
        let run_id = new_run_id();
        let context = build(request);
        let mut result = WorkflowResult::new(run_id.clone());

        info!(run_id = %run_id, "Pipeline started");
        for stage in StageKind::ALL {
            self.sink
                .emit(&WorkflowEvent::status_changed(&run_id, stage, AgentStatus::Idle))
                .await;
        }

        let last = StageKind::ALL.len() - 1;
        for (index, stage) in StageKind::ALL.into_iter().enumerate() {
            self.current_step = index + 1;
            self.transition(&run_id, stage, AgentStatus::Processing).await;

            let attempt = self
                .runner
                .attempt(stage, &context, &result.artifacts)
                .await;
            let (artifact, provenance) = attempt.into_parts();
            let fallback_reason = match &provenance {
                Provenance::Fallback { reason } => Some(reason.clone()),
                Provenance::Live => None,
            };
            result.insert(artifact, provenance);

            if let Some(reason) = fallback_reason {
                self.sink
                    .emit(&WorkflowEvent::fallback(&run_id, stage, reason))
                    .await;
            }
            self.transition(&run_id, stage, AgentStatus::Completed).await;

            if index < last && self.config.inter_stage_delay_ms > 0 {
                tokio::time::sleep(self.config.inter_stage_delay()).await;
            }
        }

        result.mark_completed();
        self.current_step = FINAL_STEP;
        self.context = Some(context);
        self.result = Some(result.clone());

        info!(
            run_id = %run_id,
            fallback_stages = result.fallback_stages().len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Pipeline completed"
        );
        self.sink
            .emit(&WorkflowEvent::completed(result.clone()))
            .await;
        result
    }

    async fn transition(&mut self, run_id: &str, stage: StageKind, status: AgentStatus) {
        let previous = self.status(stage);
        debug_assert!(
            previous.can_transition_to(status),
            "illegal transition {previous} -> {status} for {stage}"
        );
        self.statuses.insert(stage, status);
        debug!(stage = %stage, from = %previous, to = %status, "Stage status changed");
        self.sink
            .emit(&WorkflowEvent::status_changed(run_id, stage, status))
            .await;
    }
}

fn idle_statuses() -> BTreeMap<StageKind, AgentStatus> {
    StageKind::ALL
        .into_iter()
        .map(|stage| (stage, AgentStatus::Idle))
        .collect()
}
