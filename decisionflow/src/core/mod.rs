//! Core domain model types for decisionflow.
//!
//! This module contains the fundamental types used throughout the crate:
//! - Stage kind and agent status enums
//! - Per-stage artifact types
//! - Workflow events and the aggregated run result

mod artifact;
mod event;
mod result;
mod status;

pub use artifact::{
    AnalysisArtifact, ResearchArtifact, StageArtifact, StrategyArtifact, ValidationArtifact,
};
pub use event::WorkflowEvent;
pub use result::{Provenance, WorkflowResult};
pub use status::{AgentStatus, StageKind};
