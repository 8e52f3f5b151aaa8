use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Text after date/unit canonicalization and sentence splitting
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedText {
    /// The record exactly as it was supplied
    pub original: String,
    /// Canonicalized text, sentences rejoined with `。`
    pub processed: String,
    /// Non-empty sentences of `processed`, in order
    pub sentences: Vec<String>,
}

impl NormalizedText {
    pub fn is_empty(&self) -> bool {
        self.processed.is_empty() || self.sentences.is_empty()
    }
}

/// Spans of normalized text that matched a keyword dictionary.
///
/// Each category holds unique spans in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedEntities {
    pub symptoms: Vec<String>,
    pub signs: Vec<String>,
    pub lab_values: Vec<String>,
}

impl ExtractedEntities {
    pub fn is_empty(&self) -> bool {
        self.symptoms.is_empty() && self.signs.is_empty() && self.lab_values.is_empty()
    }

    /// All spans in search priority order: symptoms, signs, lab values
    pub fn all_spans(&self) -> impl Iterator<Item = &str> {
        self.symptoms
            .iter()
            .chain(self.signs.iter())
            .chain(self.lab_values.iter())
            .map(String::as_str)
    }

    pub fn total(&self) -> usize {
        self.symptoms.len() + self.signs.len() + self.lab_values.len()
    }
}

/// A documentation gap found in a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Gap {
    /// A required field with no supporting span
    MissingField { field: String },
    /// A logic check that failed
    Inconsistency { check: String, message: String },
}

impl Gap {
    pub fn missing(field: impl Into<String>) -> Self {
        Gap::MissingField {
            field: field.into(),
        }
    }

    /// The human-readable gap message used as the knowledge-base lookup key
    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Gap::MissingField { .. } => "missing_field",
            Gap::Inconsistency { .. } => "inconsistency",
        }
    }
}

impl fmt::Display for Gap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gap::MissingField { field } => write!(f, "缺少{}记录", field),
            Gap::Inconsistency { message, .. } => write!(f, "{}", message),
        }
    }
}

/// A gap (or recognized symptom) paired with a remediation suggestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidanceItem {
    pub gap: String,
    pub suggestion: String,
}

/// Guidance for a whole record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidanceResult {
    pub gaps: Vec<String>,
    pub suggestions: Vec<String>,
    pub detailed: Vec<GuidanceItem>,
}

impl GuidanceResult {
    pub fn from_items(detailed: Vec<GuidanceItem>) -> Self {
        Self {
            gaps: detailed.iter().map(|item| item.gap.clone()).collect(),
            suggestions: detailed.iter().map(|item| item.suggestion.clone()).collect(),
            detailed,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.detailed.is_empty()
    }
}

/// The aggregate output of one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Unique id for this run
    pub report_id: Uuid,
    /// When the record was analyzed
    pub analyzed_at: DateTime<Utc>,
    /// Hex SHA-256 of the original text
    pub input_sha256: String,
    pub preprocessed_text: NormalizedText,
    pub extracted_entities: ExtractedEntities,
    pub gaps: Vec<Gap>,
    pub guidance: GuidanceResult,
}

impl AnalysisReport {
    /// Gap messages in order
    pub fn gap_messages(&self) -> Vec<String> {
        self.gaps.iter().map(Gap::message).collect()
    }

    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
