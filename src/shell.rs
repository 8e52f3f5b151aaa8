use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use tracing::{error, info};

use crate::constants::EXIT_COMMAND;
use crate::pipeline::Pipeline;
use crate::report::{format_report, save_report};

/// Line-mode interactive loop over any input and output stream.
///
/// Returns when the user types `exit` or the input is exhausted.
pub struct Shell<'a> {
    pipeline: &'a Pipeline,
    default_file: PathBuf,
}

impl<'a> Shell<'a> {
    pub fn new(pipeline: &'a Pipeline, default_file: impl Into<PathBuf>) -> Self {
        Self {
            pipeline,
            default_file: default_file.into(),
        }
    }

    pub fn run<R: BufRead, W: Write>(&self, mut input: R, mut output: W) -> Result<()> {
        writeln!(output, "=== 非结构化病历分析系统 ===")?;
        writeln!(output, "请输入病历文本（输入'exit'退出）：")?;

        loop {
            let Some(text) = prompt(&mut input, &mut output, "> ")? else {
                break;
            };

            if text.eq_ignore_ascii_case(EXIT_COMMAND) {
                writeln!(output, "感谢使用，再见！")?;
                break;
            }

            if text.trim().is_empty() {
                writeln!(output, "请输入有效的病历文本！")?;
                continue;
            }

            if let Err(e) = self.handle_record(&text, &mut input, &mut output) {
                error!("record handling failed: {}", e);
                writeln!(output, "处理过程中出现错误: {}", e)?;
            }

            writeln!(output, "\n请输入下一条病历文本（输入'exit'退出）：")?;
        }

        Ok(())
    }

    fn handle_record<R: BufRead, W: Write>(&self, text: &str, input: &mut R, output: &mut W) -> Result<()> {
        let report = self.pipeline.process(text);
        let formatted = format_report(&report);
        writeln!(output, "\n{}", formatted)?;

        let answer = prompt(input, output, "\n是否保存结果？(y/n): ")?.unwrap_or_default();
        if !answer.eq_ignore_ascii_case("y") {
            return Ok(());
        }

        let prompt_text = format!("请输入文件名（默认为'{}'）: ", self.default_file.display());
        let name = prompt(input, output, &prompt_text)?.unwrap_or_default();
        let path = if name.is_empty() {
            self.default_file.clone()
        } else {
            PathBuf::from(name)
        };

        save_report(&path, &formatted)?;
        info!(report_id = %report.report_id, "report saved from shell");
        writeln!(output, "结果已保存到 {}", path.display())?;
        Ok(())
    }
}

/// Print a prompt and read one line without its line terminator; `None` at end of input
fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, text: &str) -> Result<Option<String>> {
    write!(output, "{}", text)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(&['\r', '\n'][..]).to_string()))
}
