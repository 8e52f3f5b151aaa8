use std::collections::HashSet;

use regex::Regex;
use tracing::debug;

use crate::domain::{ExtractedEntities, NormalizedText};
use crate::error::{AuditError, Result};
use crate::lexicon::Lexicon;

/// Characters that end a clause and therefore a span
const CLAUSE_STOP: &str = "[^，。,;；]*";

/// Entity category a keyword dictionary feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityCategory {
    Symptom,
    Sign,
    LabValue,
}

impl EntityCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityCategory::Symptom => "symptom",
            EntityCategory::Sign => "sign",
            EntityCategory::LabValue => "lab_value",
        }
    }
}

/// A dictionary keyword with its compiled span pattern
#[derive(Debug)]
struct KeywordPattern {
    keyword: String,
    regex: Regex,
}

/// Dictionary-driven span extractor.
///
/// Patterns are compiled once per keyword when the extractor is built and
/// reused for every record.
#[derive(Debug)]
pub struct EntityExtractor {
    symptoms: Vec<KeywordPattern>,
    signs: Vec<KeywordPattern>,
    lab_values: Vec<KeywordPattern>,
}

impl EntityExtractor {
    pub fn new(lexicon: &Lexicon) -> Result<Self> {
        Ok(Self {
            symptoms: compile_category(&lexicon.symptoms, None)?,
            signs: compile_category(&lexicon.signs, Some(&lexicon.sign_units))?,
            lab_values: compile_category(&lexicon.lab_values, Some(&lexicon.lab_units))?,
        })
    }

    /// Extract symptom, sign and lab value spans from normalized text
    pub fn extract(&self, normalized: &NormalizedText) -> ExtractedEntities {
        if normalized.is_empty() {
            return ExtractedEntities::default();
        }

        let text = normalized.processed.as_str();
        let entities = ExtractedEntities {
            symptoms: collect_spans(&self.symptoms, text),
            signs: collect_spans(&self.signs, text),
            lab_values: collect_spans(&self.lab_values, text),
        };

        debug!(
            symptoms = entities.symptoms.len(),
            signs = entities.signs.len(),
            lab_values = entities.lab_values.len(),
            "extracted entities"
        );
        entities
    }

    pub fn keyword_count(&self, category: EntityCategory) -> usize {
        match category {
            EntityCategory::Symptom => self.symptoms.len(),
            EntityCategory::Sign => self.signs.len(),
            EntityCategory::LabValue => self.lab_values.len(),
        }
    }
}

fn compile_category(keywords: &[String], units: Option<&[String]>) -> Result<Vec<KeywordPattern>> {
    keywords
        .iter()
        .map(|keyword| {
            let pattern = span_pattern(keyword, units);
            let regex = Regex::new(&pattern).map_err(|source| AuditError::Pattern {
                keyword: keyword.clone(),
                source,
            })?;
            Ok(KeywordPattern {
                keyword: keyword.clone(),
                regex,
            })
        })
        .collect()
}

/// Clause containing the keyword, optionally followed by `<number><unit>`
fn span_pattern(keyword: &str, units: Option<&[String]>) -> String {
    let core = format!("{stop}{kw}{stop}", stop = CLAUSE_STOP, kw = regex::escape(keyword));
    match units {
        Some(units) if !units.is_empty() => {
            let alternatives: Vec<String> = units.iter().map(|u| regex::escape(u)).collect();
            format!(r"{}(?:[0-9]+\.?[0-9]*\s*(?:{}))?", core, alternatives.join("|"))
        }
        _ => core,
    }
}

/// All matches of all keywords, unique, in first-seen order
fn collect_spans(patterns: &[KeywordPattern], text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut spans = Vec::new();

    for pattern in patterns.iter().filter(|p| text.contains(&p.keyword)) {
        for found in pattern.regex.find_iter(text) {
            let span = found.as_str();
            if seen.insert(span.to_string()) {
                spans.push(span.to_string());
            }
        }
    }

    spans
}
