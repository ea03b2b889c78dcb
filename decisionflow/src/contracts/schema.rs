//! Per-stage field schemas and value-level validation.

use serde::Serialize;

use crate::core::StageKind;
use crate::errors::FormatError;

/// Primitive type of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// A JSON string.
    Text,
    /// A JSON array of strings.
    TextList,
    /// A JSON number in [0, 1].
    Score,
}

impl FieldType {
    fn describe(self) -> &'static str {
        match self {
            Self::Text => "a string",
            Self::TextList => "a list of strings",
            Self::Score => "a number in [0, 1]",
        }
    }
}

/// One field of a stage schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    /// Wire name of the field.
    pub name: &'static str,
    /// Expected primitive type.
    pub field_type: FieldType,
}

impl FieldSpec {
    const fn new(name: &'static str, field_type: FieldType) -> Self {
        Self { name, field_type }
    }

    /// List fields may be absent and are then treated as empty.
    #[must_use]
    pub fn is_required(&self) -> bool {
        !matches!(self.field_type, FieldType::TextList)
    }
}

const RESEARCH: &[FieldSpec] = &[
    FieldSpec::new("marketSize", FieldType::Text),
    FieldSpec::new("competitors", FieldType::TextList),
    FieldSpec::new("trends", FieldType::TextList),
    FieldSpec::new("opportunities", FieldType::TextList),
    FieldSpec::new("confidence", FieldType::Score),
];

const ANALYSIS: &[FieldSpec] = &[
    FieldSpec::new("risks", FieldType::TextList),
    FieldSpec::new("opportunities", FieldType::TextList),
    FieldSpec::new("feasibilityScore", FieldType::Score),
    FieldSpec::new("recommendations", FieldType::TextList),
    FieldSpec::new("confidence", FieldType::Score),
];

const STRATEGY: &[FieldSpec] = &[
    FieldSpec::new("actionPlan", FieldType::TextList),
    FieldSpec::new("timeline", FieldType::Text),
    FieldSpec::new("budget", FieldType::Text),
    FieldSpec::new("kpis", FieldType::TextList),
    FieldSpec::new("confidence", FieldType::Score),
];

const VALIDATION: &[FieldSpec] = &[
    FieldSpec::new("validationScore", FieldType::Score),
    FieldSpec::new("issues", FieldType::TextList),
    FieldSpec::new("improvements", FieldType::TextList),
    FieldSpec::new("finalRecommendation", FieldType::Text),
    FieldSpec::new("confidence", FieldType::Score),
];

/// The field schema for a stage, in prompt order.
#[must_use]
pub fn schema_for(stage: StageKind) -> &'static [FieldSpec] {
    match stage {
        StageKind::Research => RESEARCH,
        StageKind::Analysis => ANALYSIS,
        StageKind::Strategy => STRATEGY,
        StageKind::Validation => VALIDATION,
    }
}

/// Checks a parsed JSON value against a stage's schema.
///
/// Unknown fields are ignored. Absent list fields are accepted; any other
/// absent field, or any present field of the wrong type, is rejected.
///
/// # Errors
///
/// Returns `FormatError` naming the first offending field.
pub fn validate_value(stage: StageKind, value: &serde_json::Value) -> Result<(), FormatError> {
    let object = value
        .as_object()
        .ok_or_else(|| FormatError::new(format!("{stage} response must be a JSON object")))?;

    for rule in schema_for(stage) {
        let Some(field) = object.get(rule.name) else {
            if rule.is_required() {
                return Err(FormatError::for_field(rule.name, "required field is missing"));
            }
            continue;
        };

        let ok = match rule.field_type {
            FieldType::Text => field.is_string(),
            FieldType::TextList => field
                .as_array()
                .is_some_and(|items| items.iter().all(serde_json::Value::is_string)),
            FieldType::Score => field
                .as_f64()
                .is_some_and(|n| n.is_finite() && (0.0..=1.0).contains(&n)),
        };

        if !ok {
            return Err(FormatError::for_field(
                rule.name,
                format!("expected {}, got {}", rule.field_type.describe(), field),
            ));
        }
    }

    Ok(())
}
