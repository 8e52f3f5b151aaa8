use std::fs;
use std::path::Path;

use tracing::info;

use crate::domain::AnalysisReport;
use crate::error::Result;

/// Render a report as the fixed plain-text layout
pub fn format_report(report: &AnalysisReport) -> String {
    let mut output: Vec<String> = Vec::new();
    let entities = &report.extracted_entities;

    output.push("=== 原始病历文本 ===".to_string());
    output.push(report.preprocessed_text.original.clone());
    output.push(String::new());

    output.push("=== 提取的医疗实体 ===".to_string());

    output.push("症状:".to_string());
    push_items(&mut output, &entities.symptoms, "未提取到症状");

    output.push("\n体征:".to_string());
    push_items(&mut output, &entities.signs, "未提取到体征");

    output.push("\n检验值:".to_string());
    push_items(&mut output, &entities.lab_values, "未提取到检验值");

    output.push(String::new());

    output.push("=== 识别的缺口 ===".to_string());
    push_items(&mut output, &report.gap_messages(), "未识别到缺口");

    output.push(String::new());

    output.push("=== 指导意见 ===".to_string());
    push_items(&mut output, &report.guidance.suggestions, "无指导意见");

    output.join("\n")
}

fn push_items(output: &mut Vec<String>, items: &[String], placeholder: &str) {
    if items.is_empty() {
        output.push(format!("- {}", placeholder));
    } else {
        output.extend(items.iter().map(|item| format!("- {}", item)));
    }
}

/// Write formatted text as UTF-8, creating parent directories as needed
pub fn save_report(path: &Path, formatted: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, formatted)?;
    info!(path = %path.display(), bytes = formatted.len(), "saved report");
    Ok(())
}
