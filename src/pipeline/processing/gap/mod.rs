pub mod checks;

use tracing::debug;

use crate::domain::{ExtractedEntities, Gap};
use crate::rules::Rules;

/// Find documentation gaps in a record's extracted entities.
///
/// Missing required fields come first in declaration order, followed by
/// failed logic checks in registry order.
pub fn identify_gaps(entities: &ExtractedEntities, rules: &Rules) -> Vec<Gap> {
    if rules.is_empty() {
        return Vec::new();
    }

    let mut gaps: Vec<Gap> = rules
        .fields()
        .filter(|field| !field_documented(entities, &rules.synonyms_for(field)))
        .map(Gap::missing)
        .collect();

    let missing = gaps.len();

    for check in &rules.checks {
        let outcome = check.evaluate(entities);
        if !outcome.is_valid && !outcome.message.is_empty() {
            debug!(check = check.key, "logic check failed");
            gaps.push(Gap::Inconsistency {
                check: check.key.to_string(),
                message: outcome.message,
            });
        }
    }

    debug!(
        missing_fields = missing,
        inconsistencies = gaps.len() - missing,
        "identified gaps"
    );
    gaps
}

/// True when any span, searched symptoms first, contains any of the keywords
fn field_documented(entities: &ExtractedEntities, keywords: &[&str]) -> bool {
    entities
        .all_spans()
        .any(|span| keywords.iter().any(|keyword| span.contains(keyword)))
}
