//! Stage artifact types.
//!
//! Each stage produces one artifact with a fixed field set. The field names on
//! the wire are camelCase, matching the JSON the generation prompts ask for.

use serde::{Deserialize, Serialize};

use super::StageKind;

/// Output of the research stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchArtifact {
    /// Estimated market size, free text with numbers.
    pub market_size: String,
    /// Notable competitors.
    #[serde(default)]
    pub competitors: Vec<String>,
    /// Relevant market trends.
    #[serde(default)]
    pub trends: Vec<String>,
    /// Opportunities identified in the market.
    #[serde(default)]
    pub opportunities: Vec<String>,
    /// Confidence in [0, 1].
    pub confidence: f64,
}

/// Output of the risk analysis stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisArtifact {
    /// Identified risks.
    #[serde(default)]
    pub risks: Vec<String>,
    /// Identified opportunities.
    #[serde(default)]
    pub opportunities: Vec<String>,
    /// Feasibility in [0, 1].
    pub feasibility_score: f64,
    /// Recommendations derived from the assessment.
    #[serde(default)]
    pub recommendations: Vec<String>,
    /// Confidence in [0, 1].
    pub confidence: f64,
}

/// Output of the strategy stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyArtifact {
    /// Ordered action items.
    #[serde(default)]
    pub action_plan: Vec<String>,
    /// Timeline description.
    pub timeline: String,
    /// Budget breakdown and allocation.
    pub budget: String,
    /// Key performance indicators.
    #[serde(default)]
    pub kpis: Vec<String>,
    /// Confidence in [0, 1].
    pub confidence: f64,
}

/// Output of the validation stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationArtifact {
    /// Overall validation score in [0, 1].
    pub validation_score: f64,
    /// Issues found in earlier outputs.
    #[serde(default)]
    pub issues: Vec<String>,
    /// Suggested improvements.
    #[serde(default)]
    pub improvements: Vec<String>,
    /// The final recommendation.
    pub final_recommendation: String,
    /// Confidence in [0, 1].
    pub confidence: f64,
}

/// An artifact produced by a stage, either live-generated or fallback.
///
/// Serializes as the bare stage object, without a tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StageArtifact {
    /// Research stage output.
    Research(ResearchArtifact),
    /// Analysis stage output.
    Analysis(AnalysisArtifact),
    /// Strategy stage output.
    Strategy(StrategyArtifact),
    /// Validation stage output.
    Validation(ValidationArtifact),
}

impl StageArtifact {
    /// The stage this artifact belongs to.
    #[must_use]
    pub fn kind(&self) -> StageKind {
        match self {
            Self::Research(_) => StageKind::Research,
            Self::Analysis(_) => StageKind::Analysis,
            Self::Strategy(_) => StageKind::Strategy,
            Self::Validation(_) => StageKind::Validation,
        }
    }

    /// The stage's self-reported confidence.
    #[must_use]
    pub fn confidence(&self) -> f64 {
        match self {
            Self::Research(a) => a.confidence,
            Self::Analysis(a) => a.confidence,
            Self::Strategy(a) => a.confidence,
            Self::Validation(a) => a.confidence,
        }
    }

    /// Converts the artifact to a JSON value.
    #[must_use]
    pub fn to_value(&self) -> serde_json::Value {
        // Every field is a string, string list, or finite float.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Compact JSON form, as embedded in downstream prompts.
    #[must_use]
    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }

    /// Returns the research artifact, if this is one.
    #[must_use]
    pub fn as_research(&self) -> Option<&ResearchArtifact> {
        match self {
            Self::Research(a) => Some(a),
            _ => None,
        }
    }

    /// Returns the analysis artifact, if this is one.
    #[must_use]
    pub fn as_analysis(&self) -> Option<&AnalysisArtifact> {
        match self {
            Self::Analysis(a) => Some(a),
            _ => None,
        }
    }

    /// Returns the strategy artifact, if this is one.
    #[must_use]
    pub fn as_strategy(&self) -> Option<&StrategyArtifact> {
        match self {
            Self::Strategy(a) => Some(a),
            _ => None,
        }
    }

    /// Returns the validation artifact, if this is one.
    #[must_use]
    pub fn as_validation(&self) -> Option<&ValidationArtifact> {
        match self {
            Self::Validation(a) => Some(a),
            _ => None,
        }
    }
}

impl From<ResearchArtifact> for StageArtifact {
    fn from(a: ResearchArtifact) -> Self {
        Self::Research(a)
    }
}

impl From<AnalysisArtifact> for StageArtifact {
    fn from(a: AnalysisArtifact) -> Self {
        Self::Analysis(a)
    }
}

impl From<StrategyArtifact> for StageArtifact {
    fn from(a: StrategyArtifact) -> Self {
        Self::Strategy(a)
    }
}

impl From<ValidationArtifact> for StageArtifact {
    fn from(a: ValidationArtifact) -> Self {
        Self::Validation(a)
    }
}
