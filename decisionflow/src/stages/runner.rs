//! Runs one stage: prompt, generate, parse, and fall back on any failure.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};

use super::prompt::build_prompt;
use crate::context::WorkflowContext;
use crate::contracts::{fallback_for, parse};
use crate::core::{Provenance, StageArtifact, StageKind};
use crate::errors::StageError;
use crate::providers::GenerationClient;

/// Outcome of one stage attempt.
///
/// Both variants carry a schema-valid artifact; the variant only records
/// where it came from.
#[derive(Debug, Clone, PartialEq)]
pub enum StageAttempt {
    /// The live response parsed and validated.
    Live(StageArtifact),
    /// The live path failed and the catalog artifact was substituted.
    Fallback {
        /// The fallback artifact.
        artifact: StageArtifact,
        /// What went wrong on the live path.
        reason: StageError,
    },
}

impl StageAttempt {
    /// The artifact, whichever path produced it.
    #[must_use]
    pub fn artifact(&self) -> &StageArtifact {
        match self {
            Self::Live(artifact) | Self::Fallback { artifact, .. } => artifact,
        }
    }

    /// Consumes the attempt, returning the artifact.
    #[must_use]
    pub fn into_artifact(self) -> StageArtifact {
        match self {
            Self::Live(artifact) | Self::Fallback { artifact, .. } => artifact,
        }
    }

    /// Returns true if the fallback catalog supplied the artifact.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    /// Splits the attempt into its artifact and provenance record.
    #[must_use]
    pub fn into_parts(self) -> (StageArtifact, Provenance) {
        match self {
            Self::Live(artifact) => (artifact, Provenance::Live),
            Self::Fallback { artifact, reason } => (
                artifact,
                Provenance::Fallback {
                    reason: reason.to_string(),
                },
            ),
        }
    }
}

/// Composes the generation client, response parser, and fallback catalog.
///
/// Stateless apart from the shared client; never fails.
#[derive(Clone)]
pub struct StageRunner {
    client: Arc<dyn GenerationClient>,
}

impl std::fmt::Debug for StageRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageRunner")
            .field("client", &self.client.describe())
            .finish()
    }
}

impl StageRunner {
    /// Creates a runner around a generation client.
    #[must_use]
    pub fn new(client: Arc<dyn GenerationClient>) -> Self {
        Self { client }
    }

    /// Runs a stage and returns its artifact.
    pub async fn run(
        &self,
        stage: StageKind,
        context: &WorkflowContext,
        prior: &BTreeMap<StageKind, StageArtifact>,
    ) -> StageArtifact {
        self.attempt(stage, context, prior).await.into_artifact()
    }

    /// Runs a stage and reports whether the artifact is live or fallback.
    #[instrument(skip_all, fields(stage = %stage, prior = prior.len()))]
    pub async fn attempt(
        &self,
        stage: StageKind,
        context: &WorkflowContext,
        prior: &BTreeMap<StageKind, StageArtifact>,
    ) -> StageAttempt {
        let start = Instant::now();
        let prompt = build_prompt(stage, context, prior);

        let outcome = match self.client.generate(&prompt).await {
            Ok(text) => parse(stage, &text).map_err(StageError::from),
            Err(e) => Err(e),
        };
        let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

        match outcome {
            Ok(artifact) => {
                info!(duration_ms, confidence = artifact.confidence(), "Stage produced live artifact");
                StageAttempt::Live(artifact)
            }
            Err(reason) => {
                warn!(
                    duration_ms,
                    error_kind = reason.kind(),
                    reason = %reason,
                    "Stage falling back to catalog artifact"
                );
                StageAttempt::Fallback {
                    artifact: fallback_for(stage),
                    reason,
                }
            }
        }
    }
}
