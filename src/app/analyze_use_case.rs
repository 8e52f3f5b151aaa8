use anyhow::Result;
use tracing::{info_span, warn};

use crate::app::ports::ReportOutputPort;
use crate::domain::AnalysisReport;
use crate::pipeline::Pipeline;

/// Use case for analyzing records and routing reports to outputs
pub struct AnalyzeUseCase<'a> {
    pipeline: &'a Pipeline,
    outputs: Vec<Box<dyn ReportOutputPort + 'a>>,
}

impl<'a> AnalyzeUseCase<'a> {
    pub fn new(pipeline: &'a Pipeline) -> Self {
        Self {
            pipeline,
            outputs: Vec::new(),
        }
    }

    /// Add an output; reports are written to outputs in the order added
    pub fn with_output(mut self, output: Box<dyn ReportOutputPort + 'a>) -> Self {
        self.outputs.push(output);
        self
    }

    /// Analyze a single record and write it to every output
    pub fn analyze_record(&self, text: &str) -> Result<AnalysisReport> {
        let report = self.pipeline.process(text);

        for output in &self.outputs {
            output.write_report(&report)?;
        }

        Ok(report)
    }

    /// Analyze independent records one after another.
    ///
    /// A failing output does not stop the remaining records; the first error
    /// is returned once every record has been attempted.
    pub fn analyze_batch(&self, records: &[&str]) -> Result<Vec<AnalysisReport>> {
        let mut reports = Vec::with_capacity(records.len());
        let mut first_error = None;

        for (index, text) in records.iter().enumerate() {
            let span = info_span!("record", index);
            let _enter = span.enter();

            match self.analyze_record(text) {
                Ok(report) => reports.push(report),
                Err(e) => {
                    warn!("failed to write report for record {}: {}", index, e);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(reports),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct MockReportOutput {
        pub reports: Arc<Mutex<Vec<AnalysisReport>>>,
    }

    impl ReportOutputPort for MockReportOutput {
        fn write_report(&self, report: &AnalysisReport) -> Result<()> {
            self.reports.lock().unwrap().push(report.clone());
            Ok(())
        }
    }

    struct FailingOutput;

    impl ReportOutputPort for FailingOutput {
        fn write_report(&self, _report: &AnalysisReport) -> Result<()> {
            anyhow::bail!("disk full")
        }
    }

    #[test]
    fn test_analyze_use_case_writes_each_report() {
        let pipeline = Pipeline::with_defaults().unwrap();
        let written = Arc::new(Mutex::new(Vec::new()));
        let use_case = AnalyzeUseCase::new(&pipeline).with_output(Box::new(MockReportOutput {
            reports: written.clone(),
        }));

        let reports = use_case.analyze_batch(&["患者头晕", "透析时间4小时"]).unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(written.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_batch_without_outputs_keeps_record_order() {
        let pipeline = Pipeline::with_defaults().unwrap();
        let records = crate::samples::all();
        let texts: Vec<&str> = records.iter().map(|sample| sample.text).collect();

        let reports = AnalyzeUseCase::new(&pipeline).analyze_batch(&texts).unwrap();
        let originals: Vec<&str> = reports
            .iter()
            .map(|report| report.preprocessed_text.original.as_str())
            .collect();
        assert_eq!(originals, texts);
    }

    #[test]
    fn test_failing_output_surfaces_error() {
        let pipeline = Pipeline::with_defaults().unwrap();
        let use_case = AnalyzeUseCase::new(&pipeline).with_output(Box::new(FailingOutput));

        let result = use_case.analyze_batch(&["患者头晕", "血压120/80mmHg"]);
        assert!(result.unwrap_err().to_string().contains("disk full"));
    }
}
