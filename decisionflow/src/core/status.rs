//! Stage kind and agent status enums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four fixed pipeline stages.
///
/// The declaration order is both execution order and data-dependency order:
/// every stage's prompt includes the artifacts of all stages before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    /// Market and industry research.
    Research,
    /// Risk and opportunity assessment.
    Analysis,
    /// Action plan generation.
    Strategy,
    /// Quality assurance of everything before it.
    Validation,
}

impl StageKind {
    /// All stages in execution order.
    pub const ALL: [Self; 4] = [
        Self::Research,
        Self::Analysis,
        Self::Strategy,
        Self::Validation,
    ];

    /// Zero-based position in the pipeline.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Research => 0,
            Self::Analysis => 1,
            Self::Strategy => 2,
            Self::Validation => 3,
        }
    }

    /// The stages that run before this one, in order.
    #[must_use]
    pub fn predecessors(self) -> &'static [Self] {
        &Self::ALL[..self.index()]
    }

    /// Display name of the agent that runs this stage.
    #[must_use]
    pub fn agent_name(self) -> &'static str {
        match self {
            Self::Research => "Research Agent",
            Self::Analysis => "Analysis Agent",
            Self::Strategy => "Strategy Agent",
            Self::Validation => "Validation Agent",
        }
    }

    /// One-line description of the agent's role.
    #[must_use]
    pub fn agent_role(self) -> &'static str {
        match self {
            Self::Research => "Market & Industry Analysis",
            Self::Analysis => "Risk & Opportunity Assessment",
            Self::Strategy => "Action Plan Generation",
            Self::Validation => "Quality Assurance & Validation",
        }
    }

    /// Label used when embedding this stage's artifact in later prompts.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Research => "Research",
            Self::Analysis => "Analysis",
            Self::Strategy => "Strategy",
            Self::Validation => "Validation",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Research => write!(f, "research"),
            Self::Analysis => write!(f, "analysis"),
            Self::Strategy => write!(f, "strategy"),
            Self::Validation => write!(f, "validation"),
        }
    }
}

/// Observable status of one stage within a run.
///
/// There is no failed state: a stage that fell back is still `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    /// Not yet attempted in this run.
    Idle,
    /// Currently running.
    Processing,
    /// Finished, with either a live or a fallback artifact.
    Completed,
}

impl Default for AgentStatus {
    fn default() -> Self {
        Self::Idle
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Processing => write!(f, "processing"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

impl AgentStatus {
    /// Returns true if the status is terminal within a run.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Returns true if `next` is the single legal successor of this status.
    #[must_use]
    pub fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Processing) | (Self::Processing, Self::Completed)
        )
    }
}
