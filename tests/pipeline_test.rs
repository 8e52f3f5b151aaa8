use std::collections::HashSet;

use anyhow::Result;
use dialysis_audit::domain::{ExtractedEntities, Gap};
use dialysis_audit::knowledge::KnowledgeBase;
use dialysis_audit::lexicon::Lexicon;
use dialysis_audit::pipeline::processing::normalize::normalize;
use dialysis_audit::pipeline::Pipeline;
use dialysis_audit::rules::Rules;
use dialysis_audit::samples;

const COMPLETE_RECORD: &str = "患者姓名张三体温36℃，患者ID 10086心率78次/分，日期2023年11月05日体重记录完整，\
透析方式HD透析器型号FX80，血流量250ml/min，透析液流量500ml/min，使用低分子肝素4000单位抗凝，\
透析时间4小时，超滤量2kg。透析前体重65kg，透析后体重63kg，透析前血压150/90mmHg，\
透析后血压130/80mmHg。内瘘杂音清晰，无并发症。";

fn messages(gaps: &[Gap]) -> Vec<String> {
    gaps.iter().map(Gap::message).collect()
}

fn as_sets(entities: &ExtractedEntities) -> [HashSet<String>; 3] {
    [
        entities.symptoms.iter().cloned().collect(),
        entities.signs.iter().cloned().collect(),
        entities.lab_values.iter().cloned().collect(),
    ]
}

#[test]
fn test_vital_signs_record() -> Result<()> {
    let pipeline = Pipeline::with_defaults()?;
    let report = pipeline.process("血压120/80mmHg，脉搏80次/分。");

    let signs = &report.extracted_entities.signs;
    assert!(signs.contains(&"血压120/80mmHg".to_string()));
    assert!(signs.contains(&"脉搏80次/分".to_string()));
    assert!(report.extracted_entities.symptoms.is_empty());
    assert!(messages(&report.gaps).contains(&"缺少透析器型号记录".to_string()));
    Ok(())
}

#[test]
fn test_plausible_duration_has_no_duration_gap() -> Result<()> {
    let pipeline = Pipeline::with_defaults()?;
    let report = pipeline.process("透析时间4小时");

    assert!(!messages(&report.gaps).iter().any(|m| m.contains("不在合理范围内")));
    assert!(!messages(&report.gaps).contains(&"缺少透析时间记录".to_string()));
    Ok(())
}

#[test]
fn test_short_duration_is_flagged() -> Result<()> {
    let pipeline = Pipeline::with_defaults()?;
    let report = pipeline.process("透析时间1小时");

    assert!(messages(&report.gaps).contains(&"透析时间 1.0 小时不在合理范围内(2-6小时)".to_string()));
    Ok(())
}

#[test]
fn test_weight_change_without_ultrafiltration() -> Result<()> {
    let pipeline = Pipeline::with_defaults()?;
    let report = pipeline.process("体重下降6kg");

    assert_eq!(report.preprocessed_text.processed, "体重下降6 kg");
    assert!(messages(&report.gaps).contains(&"记录了体重变化但缺少超滤量记录".to_string()));
    Ok(())
}

#[test]
fn test_complete_record_has_no_gaps() -> Result<()> {
    let pipeline = Pipeline::with_defaults()?;
    let report = pipeline.process(COMPLETE_RECORD);

    assert!(report.gaps.is_empty(), "unexpected gaps: {:?}", messages(&report.gaps));
    assert!(report.guidance.is_empty());
    Ok(())
}

#[test]
fn test_incomplete_sample_gets_dose_gap_and_symptom_advice() -> Result<()> {
    let pipeline = Pipeline::with_defaults()?;
    let report = pipeline.process(samples::INCOMPLETE_DIALYSIS.text);

    assert!(messages(&report.gaps).contains(&"记录了抗凝剂但缺少剂量记录".to_string()));
    assert_eq!(report.extracted_entities.symptoms, vec!["透析过程中出现头晕、恶心症状"]);
    assert!(report
        .guidance
        .detailed
        .iter()
        .any(|item| item.gap == "症状：透析过程中出现头晕、恶心症状"));
    assert_eq!(report.guidance.suggestions.len(), report.guidance.detailed.len());
    Ok(())
}

#[test]
fn test_results_are_deterministic() -> Result<()> {
    let pipeline = Pipeline::with_defaults()?;

    for sample in samples::all() {
        let first = pipeline.process(sample.text);
        let second = pipeline.process(sample.text);

        assert_eq!(as_sets(&first.extracted_entities), as_sets(&second.extracted_entities));
        assert_eq!(first.gaps, second.gaps);
        assert_eq!(first.guidance, second.guidance);
        assert_eq!(first.input_sha256, second.input_sha256);
    }
    Ok(())
}

#[test]
fn test_no_duplicate_spans_within_a_category() -> Result<()> {
    let pipeline = Pipeline::with_defaults()?;
    let report = pipeline.process("透析前体重65kg，透析后体重63kg，头晕伴恶心，头晕");

    for category in [
        &report.extracted_entities.symptoms,
        &report.extracted_entities.signs,
        &report.extracted_entities.lab_values,
    ] {
        let unique: HashSet<&String> = category.iter().collect();
        assert_eq!(unique.len(), category.len(), "duplicates in {:?}", category);
    }
    Ok(())
}

#[test]
fn test_normalization_is_idempotent_on_samples() {
    for sample in samples::all() {
        let once = normalize(sample.text);
        let twice = normalize(&once.processed);
        assert_eq!(once.processed, twice.processed);
    }
}

#[test]
fn test_documenting_a_field_removes_exactly_its_gap() -> Result<()> {
    let pipeline = Pipeline::with_defaults()?;
    let base = "2023年10月15日，患者头晕";

    let before = messages(&pipeline.process(base).gaps);
    let after = messages(&pipeline.process(&format!("{}，血流量250ml/min", base)).gaps);

    let expected: Vec<String> = before
        .into_iter()
        .filter(|m| m != "缺少血流量记录")
        .collect();
    assert_eq!(after, expected);
    Ok(())
}

#[test]
fn test_empty_rules_produce_no_gaps_or_guidance() -> Result<()> {
    let pipeline = Pipeline::new(&Lexicon::default(), Rules::empty(), KnowledgeBase::builtin())?;
    let report = pipeline.process(samples::BASIC.text);

    assert!(!report.extracted_entities.is_empty());
    assert!(report.gaps.is_empty());
    assert!(report.guidance.is_empty());
    Ok(())
}

#[test]
fn test_report_serializes_to_json() -> Result<()> {
    let pipeline = Pipeline::with_defaults()?;
    let report = pipeline.process("透析时间1小时");

    let value: serde_json::Value = serde_json::from_str(&report.to_json()?)?;
    assert_eq!(value["report_id"], report.report_id.to_string());
    assert_eq!(value["input_sha256"].as_str().map(str::len), Some(64));

    let gaps = value["gaps"].as_array().expect("gaps array");
    assert!(gaps
        .iter()
        .any(|g| g["kind"] == "missing_field" && g["field"] == "患者姓名"));
    assert!(gaps
        .iter()
        .any(|g| g["kind"] == "inconsistency" && g["check"] == "dialysis_duration"));
    Ok(())
}

#[test]
fn test_bundled_rules_file_limits_required_fields() -> Result<()> {
    let rules = Rules::load(std::path::Path::new("config/rules.toml"))?;
    let pipeline = Pipeline::new(&Lexicon::default(), rules, KnowledgeBase::builtin())?;
    let report = pipeline.process("透析器型号FX80，血流量250ml/min");

    assert_eq!(
        messages(&report.gaps),
        vec!["缺少透析液流量记录", "缺少抗凝剂记录", "缺少抗凝剂剂量记录", "缺少透析时间记录", "缺少超滤量记录"]
    );
    Ok(())
}
