use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};

use dialysis_audit::app::analyze_use_case::AnalyzeUseCase;
use dialysis_audit::config::Config;
use dialysis_audit::constants;
use dialysis_audit::infra::{FileReportOutputAdapter, ReportFormat, WriterReportOutputAdapter};
use dialysis_audit::observability::init_logging;
use dialysis_audit::observability::metrics::MetricName;
use dialysis_audit::pipeline::processing::extract::EntityCategory;
use dialysis_audit::pipeline::Pipeline;
use dialysis_audit::report::format_report;
use dialysis_audit::samples;
use dialysis_audit::shell::Shell;

#[derive(Parser)]
#[command(name = "dialysis_audit")]
#[command(about = "Documentation gap analysis for dialysis clinical records")]
#[command(version = "0.1.0")]
struct Cli {
    /// Configuration file; built-in defaults are used when it does not exist
    #[arg(long, global = true, default_value = constants::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one record and print the report
    Analyze {
        /// Record text
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,
        /// Read the record from a UTF-8 file
        #[arg(long)]
        file: Option<PathBuf>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
        /// Also save the report to this file
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Interactive line-mode session
    Shell,
    /// Analyze the built-in sample records
    Demo,
    /// Load configuration and print a summary of the reference tables
    CheckConfig,
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::load_or_default(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?;

    let _guard = init_logging(&config.logging);
    config.log_sources();

    let pipeline = Pipeline::from_config(&config).context("failed to build analysis pipeline")?;

    let result = match cli.command {
        Commands::Analyze {
            text,
            file,
            json,
            output,
        } => run_analyze(&pipeline, text, file.as_deref(), json, output),
        Commands::Shell => {
            let stdin = io::stdin();
            Shell::new(&pipeline, &config.output.default_file).run(stdin.lock(), io::stdout())
        }
        Commands::Demo => run_demo(&pipeline),
        Commands::CheckConfig => {
            print_config_summary(&cli.config, &config, &pipeline);
            Ok(())
        }
    };

    if let Err(e) = &result {
        error!("command failed: {:#}", e);
    }
    result
}

fn run_analyze(
    pipeline: &Pipeline,
    text: Option<String>,
    file: Option<&Path>,
    json: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    let record = match (text, file) {
        (Some(text), _) => text,
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("failed to read record from {}", path.display()))?,
        (None, None) => read_stdin_line()?,
    };

    if record.trim().is_empty() {
        bail!("record text is empty");
    }

    let format = if json { ReportFormat::Json } else { ReportFormat::Text };
    let mut use_case =
        AnalyzeUseCase::new(pipeline).with_output(Box::new(WriterReportOutputAdapter::new(io::stdout(), format)));
    if let Some(path) = output {
        use_case = use_case.with_output(Box::new(FileReportOutputAdapter::new(path, format)));
    }

    let report = use_case.analyze_record(&record)?;
    info!(report_id = %report.report_id, gaps = report.gaps.len(), "analysis complete");
    Ok(())
}

fn read_stdin_line() -> Result<String> {
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read record from stdin")?;
    Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
}

fn run_demo(pipeline: &Pipeline) -> Result<()> {
    let records = samples::all();
    let texts: Vec<&str> = records.iter().map(|sample| sample.text).collect();
    let reports = AnalyzeUseCase::new(pipeline).analyze_batch(&texts)?;

    for (index, (sample, report)) in records.iter().zip(&reports).enumerate() {
        println!("\n示例 {}: {}", index + 1, sample.name);
        println!("{}", "=".repeat(50));
        println!("{}", format_report(report));
    }
    Ok(())
}

fn print_config_summary(path: &Path, config: &Config, pipeline: &Pipeline) {
    let rules = pipeline.rules();
    let knowledge = pipeline.knowledge();
    let extractor = pipeline.extractor();

    let source = if path.exists() { "file" } else { "built-in defaults" };
    println!("Configuration: {} ({})", path.display(), source);
    println!("Default output file: {}", config.output.default_file.display());
    println!("Log directory: {}", config.logging.directory.display());

    println!("\nRequired fields:");
    for category in &rules.required_fields {
        println!("  {}: {}", category.category, category.fields.join(", "));
    }

    println!("\nLogic checks:");
    if rules.checks.is_empty() {
        println!("  (none)");
    }
    for check in &rules.checks {
        println!("  {} - {}", check.key, check.description);
    }

    println!("\nDictionaries:");
    for category in [EntityCategory::Symptom, EntityCategory::Sign, EntityCategory::LabValue] {
        println!("  {}: {} keywords", category.as_str(), extractor.keyword_count(category));
    }

    println!("\nKnowledge base:");
    println!("  gap guidance entries: {}", knowledge.gap_guidance.len());
    println!("  symptom entries: {}", knowledge.symptoms.len());

    println!("\nMetrics:");
    for metric in MetricName::all_metrics() {
        println!("  {}", metric);
    }
}
