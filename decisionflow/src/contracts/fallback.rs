//! Canonical per-stage artifacts used whenever live generation fails.

use crate::core::{
    AnalysisArtifact, ResearchArtifact, StageArtifact, StageKind, StrategyArtifact,
    ValidationArtifact,
};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Returns the hard-coded artifact for a stage.
///
/// Never fails, and every artifact returned satisfies its stage's schema.
#[must_use]
pub fn fallback_for(stage: StageKind) -> StageArtifact {
    match stage {
        StageKind::Research => StageArtifact::Research(ResearchArtifact {
            market_size: "€2.5B+ European market with 15% YoY growth".to_string(),
            competitors: strings(&["Microsoft Teams", "Slack", "Zoom", "Salesforce"]),
            trends: strings(&[
                "AI-first customer service",
                "Omnichannel integration",
                "Self-service automation",
            ]),
            opportunities: strings(&[
                "EU data compliance focus",
                "SMB market gap",
                "Industry-specific solutions",
            ]),
            confidence: 0.75,
        }),
        StageKind::Analysis => StageArtifact::Analysis(AnalysisArtifact {
            risks: strings(&[
                "High competition from established players",
                "Regulatory compliance complexity",
                "Customer acquisition costs",
            ]),
            opportunities: strings(&[
                "Growing demand for AI-powered solutions",
                "EU data sovereignty requirements",
                "Underserved SMB segment",
            ]),
            feasibility_score: 0.72,
            recommendations: strings(&[
                "Start with pilot customers",
                "Focus on EU compliance as differentiator",
            ]),
            confidence: 0.78,
        }),
        StageKind::Strategy => StageArtifact::Strategy(StrategyArtifact {
            action_plan: strings(&[
                "Phase 1: MVP Development (Months 1-3)",
                "Phase 2: Beta Testing (Months 4-5)",
                "Phase 3: EU Launch (Months 6-7)",
                "Phase 4: Scale & Iterate (Months 8-9)",
            ]),
            timeline: "9-month roadmap with quarterly milestones and KPI checkpoints".to_string(),
            budget: "€300K total: €150K development, €75K marketing, €75K operations".to_string(),
            kpis: strings(&[
                "Customer acquisition rate",
                "Monthly recurring revenue",
                "Customer satisfaction score",
            ]),
            confidence: 0.81,
        }),
        StageKind::Validation => StageArtifact::Validation(ValidationArtifact {
            validation_score: 0.79,
            issues: strings(&[
                "Timeline may be aggressive for EU compliance",
                "Budget allocation needs marketing focus",
            ]),
            improvements: strings(&[
                "Add 2-month buffer for compliance",
                "Increase marketing spend to 35%",
            ]),
            final_recommendation: "Proceed with strategy but adjust timeline and budget allocation for realistic EU market entry".to_string(),
            confidence: 0.84,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::validate_value;

    #[test]
    fn test_fallback_matches_requested_stage() {
        for stage in StageKind::ALL {
            assert_eq!(fallback_for(stage).kind(), stage);
        }
    }

    #[test]
    fn test_every_fallback_satisfies_its_schema() {
        for stage in StageKind::ALL {
            let value = fallback_for(stage).to_value();
            if let Err(err) = validate_value(stage, &value) {
                panic!("fallback for {stage} violates schema: {err}");
            }
        }
    }

    #[test]
    fn test_fallback_lists_are_populated() {
        let value = fallback_for(StageKind::Strategy).to_value();
        assert_eq!(value["actionPlan"].as_array().map(Vec::len), Some(4));
        assert_eq!(value["kpis"].as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn test_fallback_is_stable() {
        assert_eq!(
            fallback_for(StageKind::Validation),
            fallback_for(StageKind::Validation)
        );
    }
}
