pub mod report_output_adapter;

pub use report_output_adapter::{FileReportOutputAdapter, ReportFormat, WriterReportOutputAdapter};
