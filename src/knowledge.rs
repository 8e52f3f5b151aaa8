use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AuditError, Result};

/// Background knowledge about a symptom
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomKnowledge {
    /// Keyword matched as a substring of symptom spans
    pub symptom: String,
    pub causes: Vec<String>,
    pub action: String,
}

/// Lookup tables used to turn gaps into suggestions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    /// Exact gap message to suggestion
    #[serde(default)]
    pub gap_guidance: HashMap<String, String>,
    /// Symptom entries, matched in order
    #[serde(default)]
    pub symptoms: Vec<SymptomKnowledge>,
}

const GAP_GUIDANCE: &[(&str, &str)] = &[
    ("缺少患者姓名记录", "请在病历首页补充患者姓名，确保与身份证件一致"),
    ("缺少患者ID记录", "请补充患者住院号或透析登记号，便于追溯"),
    ("缺少日期记录", "请补充本次透析治疗日期（格式：YYYY-MM-DD）"),
    ("缺少透析方式记录", "请注明透析方式，如血液透析(HD)、血液透析滤过(HDF)等"),
    ("缺少透析器型号记录", "请记录所用透析器型号，如FX80、F6等"),
    ("缺少血流量记录", "请记录血流量（通常为200-300ml/min）"),
    ("缺少透析液流量记录", "请记录透析液流量（通常为500ml/min）"),
    ("缺少抗凝剂记录", "请记录抗凝方式及所用抗凝剂，如普通肝素、低分子肝素或无肝素透析"),
    ("缺少抗凝剂剂量记录", "请记录抗凝剂首剂量及追加剂量（单位）"),
    ("缺少透析时间记录", "请记录实际透析时长（小时）"),
    ("缺少超滤量记录", "请记录目标超滤量及实际超滤量"),
    ("缺少透析前体重记录", "请记录透析前体重，用于评估容量负荷"),
    ("缺少透析后体重记录", "请记录透析后体重，并与干体重比较"),
    ("缺少透析前血压记录", "请记录透析前血压，评估透析耐受性"),
    ("缺少透析后血压记录", "请记录透析后血压，警惕透析后低血压"),
    ("缺少内瘘评估记录", "请记录内瘘杂音及震颤情况，评估血管通路功能"),
    ("缺少并发症记录记录", "请记录透析过程中是否出现并发症，如无请注明“无并发症”"),
    ("记录了体重变化但缺少超滤量记录", "体重变化应与超滤量相互印证，请补充超滤量记录"),
    ("记录了抗凝剂但缺少剂量记录", "请补充抗凝剂的具体剂量（单位），以便评估出血风险"),
];

const SYMPTOM_KNOWLEDGE: &[(&str, &[&str], &str)] = &[
    (
        "头晕",
        &["透析中低血压", "超滤过快", "贫血"],
        "监测血压，必要时降低超滤速度或补充生理盐水",
    ),
    (
        "头痛",
        &["失衡综合征", "高血压", "咖啡因戒断"],
        "监测血压，评估透析充分性，必要时对症处理",
    ),
    (
        "恶心",
        &["失衡综合征", "透析中低血压", "尿毒症毒素蓄积"],
        "减慢血流量，监测血压，必要时给予止吐药物",
    ),
    (
        "呕吐",
        &["失衡综合征", "透析中低血压", "胃肠道疾病"],
        "暂停超滤，监测血压，防止误吸",
    ),
    (
        "肌肉痉挛",
        &["超滤过快", "低钠", "低钙"],
        "降低超滤速度，必要时补充高渗盐水或葡萄糖",
    ),
    (
        "胸闷",
        &["容量负荷过重", "心肌缺血", "透析器反应"],
        "吸氧，监测心电图，必要时停止透析",
    ),
    (
        "胸痛",
        &["心肌缺血", "溶血", "空气栓塞"],
        "立即评估生命体征并行心电图检查",
    ),
    (
        "心悸",
        &["心律失常", "电解质紊乱", "低血压"],
        "监测心电图及血钾，必要时调整透析液钾浓度",
    ),
    (
        "乏力",
        &["贫血", "透析不充分", "营养不良"],
        "复查血红蛋白及白蛋白，评估透析充分性",
    ),
    (
        "呼吸困难",
        &["容量负荷过重", "肺水肿", "透析器过敏反应"],
        "吸氧，评估干体重，必要时增加超滤量",
    ),
    (
        "水肿",
        &["容量负荷过重", "干体重设定过高", "低蛋白血症"],
        "重新评估干体重，限制水钠摄入",
    ),
    (
        "失眠",
        &["尿毒症毒素蓄积", "皮肤瘙痒", "焦虑"],
        "评估透析充分性，必要时心理疏导或药物干预",
    ),
];

impl KnowledgeBase {
    /// The built-in dialysis knowledge tables
    pub fn builtin() -> Self {
        let gap_guidance = GAP_GUIDANCE
            .iter()
            .map(|(gap, suggestion)| (gap.to_string(), suggestion.to_string()))
            .collect();

        let symptoms = SYMPTOM_KNOWLEDGE
            .iter()
            .map(|(symptom, causes, action)| SymptomKnowledge {
                symptom: symptom.to_string(),
                causes: causes.iter().map(|c| c.to_string()).collect(),
                action: action.to_string(),
            })
            .collect();

        Self {
            gap_guidance,
            symptoms,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.gap_guidance.is_empty() && self.symptoms.is_empty()
    }

    /// Load a knowledge base from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            AuditError::Config(format!(
                "Failed to read knowledge file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn suggestion_for(&self, gap: &str) -> Option<&str> {
        self.gap_guidance.get(gap).map(String::as_str)
    }

    /// First entry whose keyword occurs in the span
    pub fn match_symptom(&self, span: &str) -> Option<&SymptomKnowledge> {
        self.symptoms.iter().find(|entry| span.contains(&entry.symptom))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_covers_every_default_missing_field() {
        let kb = KnowledgeBase::builtin();
        let rules = crate::rules::Rules::default();
        for field in rules.fields() {
            let gap = format!("缺少{}记录", field);
            assert!(kb.suggestion_for(&gap).is_some(), "no guidance for {}", gap);
        }
    }

    #[test]
    fn test_first_matching_symptom_wins() {
        let kb = KnowledgeBase::builtin();
        let entry = kb.match_symptom("透析过程中出现头晕、恶心症状").unwrap();
        assert_eq!(entry.symptom, "头晕");
        assert!(kb.match_symptom("精神可").is_none());
    }

    #[test]
    fn test_knowledge_loads_from_toml_in_order() {
        let kb = KnowledgeBase::from_toml(
            r#"
            [gap_guidance]
            "缺少血流量记录" = "补充血流量"

            [[symptoms]]
            symptom = "恶心"
            causes = ["失衡综合征"]
            action = "减慢血流量"

            [[symptoms]]
            symptom = "头晕"
            causes = ["低血压"]
            action = "监测血压"
            "#,
        )
        .unwrap();

        assert_eq!(kb.suggestion_for("缺少血流量记录"), Some("补充血流量"));
        assert_eq!(kb.match_symptom("头晕、恶心").unwrap().symptom, "恶心");
    }

    #[test]
    fn test_default_knowledge_is_empty() {
        assert!(KnowledgeBase::default().is_empty());
        assert!(!KnowledgeBase::builtin().is_empty());
    }
}
