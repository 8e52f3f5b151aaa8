// Record analysis pipeline: normalize, extract, identify gaps, generate guidance

pub mod processing;

use std::time::Instant;

use chrono::Utc;
use sha2::{Digest, Sha256};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::config::Config;
use crate::domain::AnalysisReport;
use crate::error::Result;
use crate::knowledge::KnowledgeBase;
use crate::lexicon::Lexicon;
use crate::observability::metrics;
use crate::rules::Rules;
use processing::extract::EntityExtractor;
use processing::gap::identify_gaps;
use processing::guidance::generate;
use processing::normalize::normalize;

/// The four-stage analyzer, holding its read-only reference tables
#[derive(Debug)]
pub struct Pipeline {
    extractor: EntityExtractor,
    rules: Rules,
    knowledge: KnowledgeBase,
}

impl Pipeline {
    pub fn new(lexicon: &Lexicon, rules: Rules, knowledge: KnowledgeBase) -> Result<Self> {
        Ok(Self {
            extractor: EntityExtractor::new(lexicon)?,
            rules,
            knowledge,
        })
    }

    /// Pipeline over the built-in dictionaries, rules and knowledge base
    pub fn with_defaults() -> Result<Self> {
        Self::new(&Lexicon::default(), Rules::default(), KnowledgeBase::builtin())
    }

    /// Pipeline over the tables named in configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.lexicon()?, config.rules()?, config.knowledge()?)
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn extractor(&self) -> &EntityExtractor {
        &self.extractor
    }

    /// Analyze one record
    #[instrument(skip_all, fields(chars = text.chars().count()))]
    pub fn process(&self, text: &str) -> AnalysisReport {
        let started = Instant::now();

        let preprocessed_text = normalize(text);
        if preprocessed_text.is_empty() {
            metrics::pipeline::empty_record();
        }

        let extracted_entities = self.extractor.extract(&preprocessed_text);
        let gaps = identify_gaps(&extracted_entities, &self.rules);
        let guidance = generate(&gaps, &self.knowledge, Some(&extracted_entities));

        metrics::pipeline::entities_extracted("symptom", extracted_entities.symptoms.len());
        metrics::pipeline::entities_extracted("sign", extracted_entities.signs.len());
        metrics::pipeline::entities_extracted("lab_value", extracted_entities.lab_values.len());
        for gap in &gaps {
            metrics::pipeline::gap_detected(gap.kind());
        }
        metrics::pipeline::guidance_generated(guidance.detailed.len());
        metrics::pipeline::record_processed(started.elapsed().as_secs_f64());

        info!(
            entities = extracted_entities.total(),
            gaps = gaps.len(),
            suggestions = guidance.suggestions.len(),
            "record analyzed"
        );

        AnalysisReport {
            report_id: Uuid::new_v4(),
            analyzed_at: Utc::now(),
            input_sha256: hex::encode(Sha256::digest(text.as_bytes())),
            preprocessed_text,
            extracted_entities,
            gaps,
            guidance,
        }
    }
}
