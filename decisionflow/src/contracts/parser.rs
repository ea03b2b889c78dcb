//! Turns generated text into a schema-valid stage artifact.
//!
//! There is no partial success: any validation failure discards the whole
//! parsed value and the caller substitutes the fallback artifact wholesale.

use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::LazyLock;

use super::schema::validate_value;
use crate::core::{
    AnalysisArtifact, ResearchArtifact, StageArtifact, StageKind, StrategyArtifact,
    ValidationArtifact,
};
use crate::errors::FormatError;

/// A fenced block on its own lines inside surrounding prose. The language
/// tag must be followed by a line break.
static FENCED_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)(?:^|\n)[ \t]*```[A-Za-z0-9_+\-]*[ \t]*\r?\n(.*?)```").expect("valid regex")
});

/// An opening fence at the very start of the payload. A language tag is only
/// consumed when a line break (or the end of text) follows it.
static LEADING_FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^```(?:[A-Za-z0-9_+\-]*[ \t]*(?:\r?\n|$))?").expect("valid regex")
});

/// A closing fence at the very end of the payload.
static TRAILING_FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n?[ \t]*```[ \t]*$").expect("valid regex"));

/// Strips code-fence wrapping and surrounding whitespace.
///
/// Text that already is valid JSON is returned trimmed and otherwise
/// untouched, even if a string value contains backticks. Otherwise fences
/// bounding the payload are removed; a fenced block is pulled out of
/// surrounding prose only when that still does not yield JSON.
#[must_use]
pub fn normalize(text: &str) -> &str {
    let trimmed = text.trim();
    if is_json(trimmed) {
        return trimmed;
    }

    let unwrapped = strip_bounding_fences(trimmed);
    if is_json(unwrapped) {
        return unwrapped;
    }

    FENCED_BLOCK_RE
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map_or(unwrapped, |inner| inner.as_str().trim())
}

fn strip_bounding_fences(text: &str) -> &str {
    let start = LEADING_FENCE_RE.find(text).map_or(0, |m| m.end());
    let rest = &text[start..];
    let end = TRAILING_FENCE_RE
        .find(rest)
        .map_or(rest.len(), |m| m.start());
    rest[..end].trim()
}

fn is_json(text: &str) -> bool {
    serde_json::from_str::<serde::de::IgnoredAny>(text).is_ok()
}

/// Parses generated text as the artifact for `stage`.
///
/// # Errors
///
/// Returns `FormatError` if the normalized text is not valid JSON or does not
/// satisfy the stage's schema.
pub fn parse(stage: StageKind, text: &str) -> Result<StageArtifact, FormatError> {
    let normalized = normalize(text);
    if normalized.is_empty() {
        return Err(FormatError::new(format!("{stage} response is empty")));
    }

    let value: serde_json::Value = serde_json::from_str(normalized)?;
    validate_value(stage, &value)?;

    let artifact = match stage {
        StageKind::Research => StageArtifact::Research(typed::<ResearchArtifact>(value)?),
        StageKind::Analysis => StageArtifact::Analysis(typed::<AnalysisArtifact>(value)?),
        StageKind::Strategy => StageArtifact::Strategy(typed::<StrategyArtifact>(value)?),
        StageKind::Validation => StageArtifact::Validation(typed::<ValidationArtifact>(value)?),
    };
    Ok(artifact)
}

fn typed<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, FormatError> {
    serde_json::from_value(value).map_err(|e| FormatError::new(format!("Deserialization error: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::fallback_for;
    use pretty_assertions::assert_eq;

    const RESEARCH_JSON: &str = r#"{"marketSize":"$1B","competitors":["A"],"trends":["B"],"opportunities":["C"],"confidence":0.9}"#;

    fn expected_research() -> StageArtifact {
        StageArtifact::Research(ResearchArtifact {
            market_size: "$1B".to_string(),
            competitors: vec!["A".to_string()],
            trends: vec!["B".to_string()],
            opportunities: vec!["C".to_string()],
            confidence: 0.9,
        })
    }

    #[test]
    fn test_normalize_plain_text_is_trimmed() {
        assert_eq!(normalize("  {\"a\":1}\n"), "{\"a\":1}");
    }

    #[test]
    fn test_normalize_strips_fence_with_language_tag() {
        let text = format!("```json\n{RESEARCH_JSON}\n```");
        assert_eq!(normalize(&text), RESEARCH_JSON);
    }

    #[test]
    fn test_normalize_strips_fence_without_language_tag() {
        let text = format!("```\n{RESEARCH_JSON}\n```");
        assert_eq!(normalize(&text), RESEARCH_JSON);
    }

    #[test]
    fn test_normalize_extracts_block_from_prose() {
        let text = format!("Here is the analysis:\n```json\n{RESEARCH_JSON}\n```\nLet me know!");
        assert_eq!(normalize(&text), RESEARCH_JSON);
    }

    #[test]
    fn test_normalize_handles_unterminated_fence() {
        let text = format!("```json\n{RESEARCH_JSON}");
        assert_eq!(normalize(&text), RESEARCH_JSON);
    }

    #[test]
    fn test_normalize_handles_dangling_closing_fence() {
        let text = format!("{RESEARCH_JSON}\n```");
        assert_eq!(normalize(&text), RESEARCH_JSON);
    }

    #[test]
    fn test_backticks_inside_string_value_are_preserved() {
        let text = r#"{"marketSize":"see ```table``` below","competitors":["A"],"trends":["B"],"opportunities":["C"],"confidence":0.9}"#;
        assert_eq!(normalize(text), text);

        let artifact = parse(StageKind::Research, text).unwrap();
        let research = artifact.as_research().unwrap();
        assert_eq!(research.market_size, "see ```table``` below");
        assert_eq!(research.competitors, vec!["A".to_string()]);
    }

    #[test]
    fn test_fenced_payload_with_backticks_inside_value() {
        let inner = r#"{"marketSize":"see ```table``` below","competitors":[],"trends":[],"opportunities":[],"confidence":0.5}"#;
        let text = format!("```json\n{inner}\n```");
        assert_eq!(normalize(&text), inner);
    }

    #[test]
    fn test_single_line_fence_without_tag() {
        let text = format!("```{RESEARCH_JSON}```");
        assert_eq!(normalize(&text), RESEARCH_JSON);
    }

    #[test]
    fn test_language_tag_requires_line_break() {
        // "json{...}" is not a tag followed by content, so nothing is swallowed.
        assert!(parse(StageKind::Research, &format!("```json{RESEARCH_JSON}```")).is_err());
    }

    #[test]
    fn test_parse_fenced_equals_unfenced() {
        let plain = parse(StageKind::Research, RESEARCH_JSON).unwrap();
        let tagged = parse(StageKind::Research, &format!("```json\n{RESEARCH_JSON}\n```")).unwrap();
        let bare = parse(StageKind::Research, &format!("```\n{RESEARCH_JSON}\n```")).unwrap();

        assert_eq!(plain, expected_research());
        assert_eq!(tagged, plain);
        assert_eq!(bare, plain);
    }

    #[test]
    fn test_round_trip_for_every_stage() {
        for stage in StageKind::ALL {
            let original = fallback_for(stage);
            let reparsed = parse(stage, &original.to_json()).unwrap();
            assert_eq!(reparsed, original);
        }
    }

    #[test]
    fn test_round_trip_pretty_printed() {
        let original = fallback_for(StageKind::Strategy);
        let pretty = serde_json::to_string_pretty(&original).unwrap();
        assert_eq!(parse(StageKind::Strategy, &pretty).unwrap(), original);
    }

    #[test]
    fn test_invalid_json_is_format_error() {
        let err = parse(StageKind::Analysis, "{\"risks\": [\"a\",").unwrap_err();
        assert!(err.field.is_none());
    }

    #[test]
    fn test_prose_is_format_error() {
        assert!(parse(StageKind::Research, "I cannot help with that.").is_err());
    }

    #[test]
    fn test_empty_is_format_error() {
        assert!(parse(StageKind::Research, "   ").is_err());
        assert!(parse(StageKind::Research, "```json\n```").is_err());
    }

    #[test]
    fn test_wrong_stage_shape_is_format_error() {
        let err = parse(StageKind::Validation, RESEARCH_JSON).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("validationScore"));
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let text = r#"{"marketSize":"$1B","competitors":["A"],"trends":["B"],"opportunities":["C"],"confidence":0.9,"notes":"extra"}"#;
        assert_eq!(parse(StageKind::Research, text).unwrap(), expected_research());
    }

    #[test]
    fn test_integer_score_is_accepted() {
        let text = r#"{"validationScore":1,"finalRecommendation":"Go","confidence":0}"#;
        let artifact = parse(StageKind::Validation, text).unwrap();
        let validation = artifact.as_validation().unwrap();
        assert!((validation.validation_score - 1.0).abs() < f64::EPSILON);
        assert!(validation.issues.is_empty());
    }
}
