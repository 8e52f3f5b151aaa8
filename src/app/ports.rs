use crate::domain::AnalysisReport;

/// Destination for finished analysis reports
pub trait ReportOutputPort: Send + Sync {
    fn write_report(&self, report: &AnalysisReport) -> anyhow::Result<()>;
}
