use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::info;

use crate::app::ports::ReportOutputPort;
use crate::domain::AnalysisReport;
use crate::report::{format_report, save_report};

/// How a report is rendered for output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn render(&self, report: &AnalysisReport) -> anyhow::Result<String> {
        match self {
            ReportFormat::Text => Ok(format_report(report)),
            ReportFormat::Json => Ok(report.to_json()?),
        }
    }
}

/// Writes rendered reports to a stream such as stdout
pub struct WriterReportOutputAdapter<W: Write + Send> {
    writer: Mutex<W>,
    format: ReportFormat,
}

impl<W: Write + Send> WriterReportOutputAdapter<W> {
    pub fn new(writer: W, format: ReportFormat) -> Self {
        Self {
            writer: Mutex::new(writer),
            format,
        }
    }

    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write + Send> ReportOutputPort for WriterReportOutputAdapter<W> {
    fn write_report(&self, report: &AnalysisReport) -> anyhow::Result<()> {
        let rendered = self.format.render(report)?;

        let mut writer = self
            .writer
            .lock()
            .map_err(|_| anyhow::anyhow!("report writer lock poisoned"))?;
        writeln!(writer, "{}", rendered)?;
        writer.flush()?;

        Ok(())
    }
}

/// Saves each rendered report to a file, replacing previous contents
pub struct FileReportOutputAdapter {
    path: PathBuf,
    format: ReportFormat,
}

impl FileReportOutputAdapter {
    pub fn new(path: impl Into<PathBuf>, format: ReportFormat) -> Self {
        let path = path.into();
        info!("Report output file: {}", path.display());
        Self { path, format }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportOutputPort for FileReportOutputAdapter {
    fn write_report(&self, report: &AnalysisReport) -> anyhow::Result<()> {
        let rendered = self.format.render(report)?;
        save_report(&self.path, &rendered)?;
        Ok(())
    }
}
