use tracing::debug;

use crate::domain::{ExtractedEntities, Gap, GuidanceItem, GuidanceResult};
use crate::knowledge::KnowledgeBase;

/// Prefix for guidance items derived from recognized symptoms
pub const SYMPTOM_PREFIX: &str = "症状：";

/// Pair each gap with a suggestion, then append symptom-specific advice.
///
/// Nothing is produced when there are no gaps or no knowledge to draw on.
pub fn generate(
    gaps: &[Gap],
    kb: &KnowledgeBase,
    entities: Option<&ExtractedEntities>,
) -> GuidanceResult {
    if gaps.is_empty() || kb.is_empty() {
        return GuidanceResult::default();
    }

    let mut items: Vec<GuidanceItem> = gaps
        .iter()
        .map(|gap| {
            let message = gap.message();
            let suggestion = match kb.suggestion_for(&message) {
                Some(known) => known.to_string(),
                None => format!("建议补充{}相关信息", message),
            };
            GuidanceItem {
                gap: message,
                suggestion,
            }
        })
        .collect();

    if let Some(entities) = entities {
        items.extend(symptom_guidance(&entities.symptoms, kb));
    }

    debug!(items = items.len(), "generated guidance");
    GuidanceResult::from_items(items)
}

fn symptom_guidance(symptoms: &[String], kb: &KnowledgeBase) -> Vec<GuidanceItem> {
    symptoms
        .iter()
        .filter_map(|span| {
            kb.match_symptom(span).map(|entry| GuidanceItem {
                gap: format!("{}{}", SYMPTOM_PREFIX, span),
                suggestion: format!(
                    "可能原因：{}。建议处理：{}",
                    entry.causes.join(", "),
                    entry.action
                ),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::SymptomKnowledge;
    use std::collections::HashMap;

    fn kb() -> KnowledgeBase {
        KnowledgeBase {
            gap_guidance: HashMap::from([(
                "缺少血流量记录".to_string(),
                "请记录血流量".to_string(),
            )]),
            symptoms: vec![SymptomKnowledge {
                symptom: "头晕".to_string(),
                causes: vec!["低血压".to_string(), "超滤过快".to_string()],
                action: "监测血压".to_string(),
            }],
        }
    }

    #[test]
    fn test_no_gaps_means_no_guidance() {
        let entities = ExtractedEntities {
            symptoms: vec!["患者头晕".to_string()],
            ..Default::default()
        };
        let result = generate(&[], &kb(), Some(&entities));
        assert!(result.is_empty());
        assert!(result.gaps.is_empty());
        assert!(result.suggestions.is_empty());
    }

    #[test]
    fn test_empty_knowledge_means_no_guidance() {
        let result = generate(&[Gap::missing("血流量")], &KnowledgeBase::default(), None);
        assert!(result.is_empty());
    }

    #[test]
    fn test_known_and_unknown_gaps_get_suggestions_in_order() {
        let gaps = vec![Gap::missing("血流量"), Gap::missing("日期")];
        let result = generate(&gaps, &kb(), None);
        assert_eq!(result.gaps, vec!["缺少血流量记录", "缺少日期记录"]);
        assert_eq!(
            result.suggestions,
            vec!["请记录血流量", "建议补充缺少日期记录相关信息"]
        );
    }

    #[test]
    fn test_symptom_items_are_appended_after_gap_items() {
        let entities = ExtractedEntities {
            symptoms: vec!["患者头晕".to_string(), "咳嗽".to_string()],
            ..Default::default()
        };
        let result = generate(&[Gap::missing("血流量")], &kb(), Some(&entities));

        assert_eq!(result.detailed.len(), 2);
        assert_eq!(result.detailed[1].gap, "症状：患者头晕");
        assert_eq!(
            result.detailed[1].suggestion,
            "可能原因：低血压, 超滤过快。建议处理：监测血压"
        );
    }
}
