use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{AuditError, Result};
use crate::pipeline::processing::gap::checks::{builtin_checks, lookup_check, LogicCheck};

/// Required documentation fields for one section of a record
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldCategory {
    pub category: String,
    pub fields: Vec<String>,
}

/// Documentation rules evaluated by the gap identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rules {
    /// Required fields, grouped and ordered by category
    pub required_fields: Vec<FieldCategory>,
    /// Canonical field name to accepted keywords
    pub field_synonyms: HashMap<String, Vec<String>>,
    /// Logic checks in evaluation order
    pub checks: Vec<LogicCheck>,
}

/// On-disk shape of a rules file; checks are referenced by registry key
#[derive(Debug, Deserialize)]
struct RulesFile {
    #[serde(default)]
    required_fields: Vec<FieldCategory>,
    #[serde(default)]
    field_synonyms: HashMap<String, Vec<String>>,
    #[serde(default)]
    checks: Vec<String>,
}

const REQUIRED_FIELDS: &[(&str, &[&str])] = &[
    ("basic", &["患者姓名", "患者ID", "日期", "透析方式"]),
    (
        "dialysis_parameters",
        &["透析器型号", "血流量", "透析液流量", "抗凝剂", "抗凝剂剂量", "透析时间", "超滤量"],
    ),
    ("vital_signs", &["透析前体重", "透析后体重", "透析前血压", "透析后血压"]),
    ("assessment", &["内瘘评估", "并发症记录"]),
];

const FIELD_SYNONYMS: &[(&str, &[&str])] = &[
    ("抗凝剂", &["抗凝剂", "肝素"]),
    ("抗凝剂剂量", &["单位抗凝", "剂量"]),
    ("内瘘评估", &["内瘘杂音", "内瘘震颤"]),
    ("并发症记录", &["并发症", "无并发症"]),
    ("透析器型号", &["透析器型号"]),
    ("血流量", &["血流量"]),
    ("透析液流量", &["透析液流量"]),
    ("透析时间", &["透析时间"]),
    ("超滤量", &["超滤量"]),
    ("透析前体重", &["透析前体重"]),
    ("透析后体重", &["透析后体重"]),
    ("透析前血压", &["透析前血压"]),
    ("透析后血压", &["透析后血压"]),
];

impl Default for Rules {
    fn default() -> Self {
        let required_fields = REQUIRED_FIELDS
            .iter()
            .map(|(category, fields)| FieldCategory {
                category: category.to_string(),
                fields: fields.iter().map(|f| f.to_string()).collect(),
            })
            .collect();

        let field_synonyms = FIELD_SYNONYMS
            .iter()
            .map(|(field, keywords)| {
                (
                    field.to_string(),
                    keywords.iter().map(|k| k.to_string()).collect(),
                )
            })
            .collect();

        Self {
            required_fields,
            field_synonyms,
            checks: builtin_checks(),
        }
    }
}

impl Rules {
    /// Rules with nothing to check
    pub fn empty() -> Self {
        Self {
            required_fields: Vec::new(),
            field_synonyms: HashMap::new(),
            checks: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty() && self.required_fields.iter().all(|c| c.fields.is_empty())
    }

    /// Load rules from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            AuditError::Config(format!("Failed to read rules file '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let file: RulesFile = toml::from_str(content)?;

        let checks = file
            .checks
            .iter()
            .map(|key| lookup_check(key).ok_or_else(|| AuditError::UnknownCheck(key.clone())))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            required_fields: file.required_fields,
            field_synonyms: file.field_synonyms,
            checks,
        })
    }

    /// Required fields in declaration order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.required_fields
            .iter()
            .flat_map(|category| category.fields.iter().map(String::as_str))
    }

    /// Keywords accepted as evidence for a field; a field with no entry is its own keyword
    pub fn synonyms_for<'a>(&'a self, field: &'a str) -> Vec<&'a str> {
        match self.field_synonyms.get(field) {
            Some(keywords) => keywords.iter().map(String::as_str).collect(),
            None => vec![field],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules_declare_seventeen_fields() {
        let rules = Rules::default();
        let fields: Vec<&str> = rules.fields().collect();
        assert_eq!(fields.len(), 17);
        assert_eq!(fields[0], "患者姓名");
        assert_eq!(fields[16], "并发症记录");
        assert_eq!(rules.checks.len(), 3);
    }

    #[test]
    fn test_field_without_entry_maps_to_itself() {
        let rules = Rules::default();
        assert_eq!(rules.synonyms_for("患者姓名"), vec!["患者姓名"]);
        assert_eq!(rules.synonyms_for("抗凝剂"), vec!["抗凝剂", "肝素"]);
    }

    #[test]
    fn test_rules_load_from_toml() {
        let rules = Rules::from_toml(
            r#"
            checks = ["dialysis_duration"]

            [[required_fields]]
            category = "dialysis_parameters"
            fields = ["血流量", "抗凝剂"]

            [field_synonyms]
            "抗凝剂" = ["肝素"]
            "#,
        )
        .unwrap();

        assert_eq!(rules.fields().collect::<Vec<_>>(), vec!["血流量", "抗凝剂"]);
        assert_eq!(rules.synonyms_for("抗凝剂"), vec!["肝素"]);
        assert_eq!(rules.checks.len(), 1);
        assert_eq!(rules.checks[0].key, "dialysis_duration");
    }

    #[test]
    fn test_unknown_check_is_rejected() {
        let result = Rules::from_toml(r#"checks = ["blood_type"]"#);
        assert!(matches!(result, Err(AuditError::UnknownCheck(name)) if name == "blood_type"));
    }

    #[test]
    fn test_empty_rules_report_empty() {
        assert!(Rules::empty().is_empty());
        assert!(!Rules::default().is_empty());
    }
}
