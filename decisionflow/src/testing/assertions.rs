//! Test assertions for artifacts and status sequences.

use crate::contracts::{fallback_for, validate_value};
use crate::core::{AgentStatus, StageArtifact, StageKind, WorkflowResult};

/// Asserts that an artifact satisfies its stage's schema.
pub fn assert_schema_valid(artifact: &StageArtifact) {
    let stage = artifact.kind();
    if let Err(e) = validate_value(stage, &artifact.to_value()) {
        panic!("Artifact for {stage} violates its schema: {e}");
    }
}

/// Asserts that a stage's artifact is its fallback.
pub fn assert_fallback(result: &WorkflowResult, stage: StageKind) {
    assert_eq!(
        result.artifact(stage),
        Some(&fallback_for(stage)),
        "Expected fallback artifact for {stage}"
    );
    assert!(
        result.provenance_of(stage).is_some_and(|p| p.is_fallback()),
        "Expected fallback provenance for {stage}, got {:?}",
        result.provenance_of(stage)
    );
}

/// Asserts that a stage's artifact came from a live response.
pub fn assert_live(result: &WorkflowResult, stage: StageKind) {
    assert!(
        result.provenance_of(stage).is_some_and(|p| !p.is_fallback()),
        "Expected live provenance for {stage}, got {:?}",
        result.provenance_of(stage)
    );
}

/// The status changes one run emits, in order.
///
/// Every stage is announced `Idle` first; then each stage goes `Processing`
/// then `Completed` before the next one starts.
#[must_use]
pub fn expected_status_sequence() -> Vec<(StageKind, AgentStatus)> {
    let idle = StageKind::ALL.iter().map(|s| (*s, AgentStatus::Idle));
    let running = StageKind::ALL
        .iter()
        .flat_map(|s| [(*s, AgentStatus::Processing), (*s, AgentStatus::Completed)]);
    idle.chain(running).collect()
}

/// Asserts that status changes match [`expected_status_sequence`], so each
/// stage sees exactly `Idle, Processing, Completed`.
pub fn assert_status_sequence(changes: &[(StageKind, AgentStatus)]) {
    let expected = expected_status_sequence();
    assert_eq!(changes, expected.as_slice(), "Unexpected status sequence");
}
