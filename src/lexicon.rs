use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AuditError, Result};

/// Keyword dictionaries and unit vocabularies used by the entity extractor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lexicon {
    pub symptoms: Vec<String>,
    pub signs: Vec<String>,
    pub lab_values: Vec<String>,
    /// Units that may trail a sign span
    #[serde(default = "default_sign_units")]
    pub sign_units: Vec<String>,
    /// Units that may trail a lab value span
    #[serde(default = "default_lab_units")]
    pub lab_units: Vec<String>,
}

const SYMPTOM_KEYWORDS: &[&str] = &[
    "头晕", "头痛", "恶心", "呕吐", "乏力", "疲劳", "胸闷", "胸痛", "腹痛",
    "腹胀", "咳嗽", "咳痰", "发热", "发烧", "畏寒", "寒战", "多汗", "盗汗",
    "食欲不振", "失眠", "心悸", "气短", "呼吸困难", "水肿", "浮肿",
];

const SIGN_KEYWORDS: &[&str] = &[
    "体重", "体温", "血压", "脉搏", "呼吸", "心率", "意识", "瞳孔",
    "皮肤", "黄疸", "水肿", "肺部", "心脏", "腹部", "肝脏", "脾脏",
    "透析器", "血流量", "透析液流量", "抗凝剂", "肝素", "透析时间", "超滤量", "内瘘",
    "透析前体重", "透析后体重", "透析前血压", "透析后血压", "并发症",
];

const LAB_VALUE_KEYWORDS: &[&str] = &[
    "血红蛋白", "白细胞", "血小板", "肌酐", "尿素氮", "血糖", "血钾",
    "血钠", "血氯", "血钙", "血磷", "血白蛋白", "总蛋白", "谷丙转氨酶",
    "谷草转氨酶", "总胆红素", "直接胆红素", "C反应蛋白", "降钙素原",
];

const SIGN_UNITS: &[&str] = &["kg", "℃", "mmHg", "次/分", "bpm", "ml/min", "小时", "单位"];

const LAB_UNITS: &[&str] = &["g/L", "mmol/L", "U/L", "mg/dL", "mg/L"];

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn default_sign_units() -> Vec<String> {
    owned(SIGN_UNITS)
}

fn default_lab_units() -> Vec<String> {
    owned(LAB_UNITS)
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            symptoms: owned(SYMPTOM_KEYWORDS),
            signs: owned(SIGN_KEYWORDS),
            lab_values: owned(LAB_VALUE_KEYWORDS),
            sign_units: default_sign_units(),
            lab_units: default_lab_units(),
        }
    }
}

impl Lexicon {
    /// Load a lexicon from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            AuditError::Config(format!("Failed to read lexicon file '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let lexicon: Lexicon = toml::from_str(content)?;
        lexicon.validate()?;
        Ok(lexicon)
    }

    fn validate(&self) -> Result<()> {
        let mut all = self.symptoms.iter().chain(&self.signs).chain(&self.lab_values);
        if all.any(|k| k.is_empty()) {
            return Err(AuditError::Config("Lexicon contains an empty keyword".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lexicon_has_all_dictionaries() {
        let lexicon = Lexicon::default();
        assert_eq!(lexicon.symptoms.len(), 25);
        assert_eq!(lexicon.signs.len(), 29);
        assert_eq!(lexicon.lab_values.len(), 19);
        assert!(lexicon.sign_units.contains(&"次/分".to_string()));
        assert!(lexicon.lab_units.contains(&"mmol/L".to_string()));
    }

    #[test]
    fn test_toml_units_fall_back_to_defaults() {
        let lexicon = Lexicon::from_toml(
            r#"
            symptoms = ["头晕"]
            signs = ["血压"]
            lab_values = ["血钾"]
            "#,
        )
        .unwrap();
        assert_eq!(lexicon.symptoms, vec!["头晕"]);
        assert_eq!(lexicon.sign_units, default_sign_units());
        assert_eq!(lexicon.lab_units, default_lab_units());
    }

    #[test]
    fn test_empty_keyword_is_rejected() {
        let result = Lexicon::from_toml(
            r#"
            symptoms = [""]
            signs = []
            lab_values = []
            "#,
        );
        assert!(matches!(result, Err(AuditError::Config(_))));
    }
}
