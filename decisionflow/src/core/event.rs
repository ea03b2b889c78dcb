//! Workflow events emitted by the orchestrator.

use serde::Serialize;

use super::{AgentStatus, StageKind, WorkflowResult};

/// An event emitted during a pipeline run.
///
/// Events are consumed by event sinks; a presentation layer renders stage
/// status from `StageStatusChanged` and the final artifacts from
/// `RunCompleted`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkflowEvent {
    /// A stage moved to a new status.
    StageStatusChanged {
        /// Run the stage belongs to.
        run_id: String,
        /// The stage.
        stage: StageKind,
        /// Its new status.
        status: AgentStatus,
    },
    /// A stage's live attempt failed and the fallback artifact was used.
    FallbackSubstituted {
        /// Run the stage belongs to.
        run_id: String,
        /// The stage.
        stage: StageKind,
        /// Why the live attempt was abandoned.
        reason: String,
    },
    /// Every stage completed.
    RunCompleted {
        /// The full result.
        result: Box<WorkflowResult>,
    },
}

impl WorkflowEvent {
    /// Creates a status change event.
    #[must_use]
    pub fn status_changed(run_id: &str, stage: StageKind, status: AgentStatus) -> Self {
        Self::StageStatusChanged {
            run_id: run_id.to_string(),
            stage,
            status,
        }
    }

    /// Creates a fallback substitution event.
    #[must_use]
    pub fn fallback(run_id: &str, stage: StageKind, reason: impl Into<String>) -> Self {
        Self::FallbackSubstituted {
            run_id: run_id.to_string(),
            stage,
            reason: reason.into(),
        }
    }

    /// Creates a run completion event.
    #[must_use]
    pub fn completed(result: WorkflowResult) -> Self {
        Self::RunCompleted {
            result: Box::new(result),
        }
    }

    /// Dotted event type, e.g. `stage.status_changed`.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::StageStatusChanged { .. } => "stage.status_changed",
            Self::FallbackSubstituted { .. } => "stage.fallback_substituted",
            Self::RunCompleted { .. } => "pipeline.completed",
        }
    }

    /// The stage this event concerns, if any.
    #[must_use]
    pub fn stage(&self) -> Option<StageKind> {
        match self {
            Self::StageStatusChanged { stage, .. } | Self::FallbackSubstituted { stage, .. } => {
                Some(*stage)
            }
            Self::RunCompleted { .. } => None,
        }
    }

    /// Converts the event to a JSON value.
    #[must_use]
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
