//! Parse command - extract active debts from a single BIK report.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use bik_core::{BikParser, ParseReport};

use super::config::load_config;
use super::input::parse_file;
use super::output::{OutputFormat, format_report};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Input file (PDF or extracted .txt)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Label stored in the source column (default: input file name)
    #[arg(short, long)]
    source: Option<String>,

    /// Include parse diagnostics in the output
    #[arg(long)]
    diagnostics: bool,

    /// Validate extracted records
    #[arg(long)]
    validate: bool,
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let parser = BikParser::new(&config)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.set_message(format!("Parsing {}...", args.input.display()));
    pb.enable_steady_tick(Duration::from_millis(100));

    let report = parse_file(&args.input, &parser, &config, args.source.as_deref());
    pb.finish_and_clear();
    let report = report?;

    report_empty(&report, config.pdf.min_lines);

    if args.validate {
        report_issues(&report);
    }

    let output = format_report(&report, args.format, args.diagnostics)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Explain on stderr why a report produced no records.
fn report_empty(report: &ParseReport, min_lines: usize) {
    if let Some(reason) = report.empty_reason(min_lines) {
        eprintln!(
            "{} No active obligations found: {}",
            style("⚠").yellow(),
            reason.describe(&report.diagnostics)
        );
    }
}

fn report_issues(report: &ParseReport) {
    let mut header_printed = false;
    for (i, record) in report.records.iter().enumerate() {
        let issues = record.validate();
        if issues.is_empty() {
            continue;
        }
        if !header_printed {
            eprintln!("{}", style("Validation issues:").yellow());
            header_printed = true;
        }
        for issue in issues {
            eprintln!("  - record {} ({}): {}", i + 1, record.contract_date, issue);
        }
    }
}
