//! Metrics for the record analysis pipeline.
//!
//! Recording goes through the `metrics` facade; without an installed
//! recorder every call is a no-op.

use std::fmt;

/// All metric names used by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    RecordsProcessed,
    EmptyRecords,
    EntitiesExtracted,
    GapsDetected,
    GuidanceItems,
    PipelineDuration,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::RecordsProcessed => "dialysis_audit_records_processed_total",
            MetricName::EmptyRecords => "dialysis_audit_empty_records_total",
            MetricName::EntitiesExtracted => "dialysis_audit_entities_extracted_total",
            MetricName::GapsDetected => "dialysis_audit_gaps_detected_total",
            MetricName::GuidanceItems => "dialysis_audit_guidance_items_total",
            MetricName::PipelineDuration => "dialysis_audit_pipeline_duration_seconds",
        }
    }

    pub fn all_metrics() -> impl Iterator<Item = MetricName> {
        use MetricName::*;
        [
            RecordsProcessed,
            EmptyRecords,
            EntitiesExtracted,
            GapsDetected,
            GuidanceItems,
            PipelineDuration,
        ]
        .into_iter()
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Pipeline Metrics
// ============================================================================

pub mod pipeline {
    use super::MetricName;

    /// Record that a record went through all four stages
    pub fn record_processed(duration_secs: f64) {
        ::metrics::counter!(MetricName::RecordsProcessed.as_str()).increment(1);
        ::metrics::histogram!(MetricName::PipelineDuration.as_str()).record(duration_secs);
    }

    /// Record that the input normalized to nothing
    pub fn empty_record() {
        ::metrics::counter!(MetricName::EmptyRecords.as_str()).increment(1);
    }

    pub fn entities_extracted(category: &'static str, count: usize) {
        ::metrics::counter!(MetricName::EntitiesExtracted.as_str(), "category" => category)
            .increment(count as u64);
    }

    pub fn gap_detected(kind: &'static str) {
        ::metrics::counter!(MetricName::GapsDetected.as_str(), "kind" => kind).increment(1);
    }

    pub fn guidance_generated(count: usize) {
        ::metrics::counter!(MetricName::GuidanceItems.as_str()).increment(count as u64);
    }
}
