//! Aggregated result of a pipeline run.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{StageArtifact, StageKind};

/// Where a stage's artifact came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Provenance {
    /// Parsed from a live generation response.
    Live,
    /// Substituted from the fallback catalog.
    Fallback {
        /// Why the live attempt was abandoned.
        reason: String,
    },
}

impl Provenance {
    /// Returns true if the fallback catalog supplied the artifact.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// Artifacts of a run keyed by stage, plus run identity and timing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowResult {
    /// Unique identifier of the run.
    pub run_id: String,
    /// When the run started (RFC 3339).
    pub started_at: String,
    /// When the last stage completed (RFC 3339).
    pub completed_at: Option<String>,
    /// Artifact per completed stage.
    pub artifacts: BTreeMap<StageKind, StageArtifact>,
    /// Provenance per completed stage.
    pub provenance: BTreeMap<StageKind, Provenance>,
}

impl WorkflowResult {
    /// Creates an empty result for a run that is starting now.
    #[must_use]
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            started_at: crate::utils::iso_timestamp(),
            completed_at: None,
            artifacts: BTreeMap::new(),
            provenance: BTreeMap::new(),
        }
    }

    /// Records a stage's artifact and where it came from.
    pub fn insert(&mut self, artifact: StageArtifact, provenance: Provenance) {
        let stage = artifact.kind();
        self.artifacts.insert(stage, artifact);
        self.provenance.insert(stage, provenance);
    }

    /// Returns the artifact for a stage, if it has completed.
    #[must_use]
    pub fn artifact(&self, stage: StageKind) -> Option<&StageArtifact> {
        self.artifacts.get(&stage)
    }

    /// Returns the provenance for a stage, if it has completed.
    #[must_use]
    pub fn provenance_of(&self, stage: StageKind) -> Option<&Provenance> {
        self.provenance.get(&stage)
    }

    /// Artifacts of the stages that precede `stage`, in stage order.
    #[must_use]
    pub fn prior_to(&self, stage: StageKind) -> Vec<&StageArtifact> {
        stage
            .predecessors()
            .iter()
            .filter_map(|s| self.artifacts.get(s))
            .collect()
    }

    /// Returns true once every stage has an artifact.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        StageKind::ALL.iter().all(|s| self.artifacts.contains_key(s))
    }

    /// Stages whose artifact came from the fallback catalog.
    #[must_use]
    pub fn fallback_stages(&self) -> Vec<StageKind> {
        self.provenance
            .iter()
            .filter(|(_, p)| p.is_fallback())
            .map(|(s, _)| *s)
            .collect()
    }

    /// Stamps the completion time.
    pub fn mark_completed(&mut self) {
        self.completed_at = Some(crate::utils::iso_timestamp());
    }
}
