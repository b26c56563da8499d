//! Batch processing command for multiple BIK reports.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use futures_util::StreamExt;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use bik_core::{BikParser, DebtRecord, ParseReport};

use super::config::load_config;
use super::input::{InputKind, parse_file, source_name};
use super::output::{OutputFormat, format_report, write_csv_file};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also write a combined records CSV and a per-file status CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Include parse diagnostics in each output file
    #[arg(long)]
    diagnostics: bool,
}

const RECORDS_STEM: &str = "records";
const STATUS_STEM: &str = "status";

/// Result of processing a single file.
struct FileResult {
    path: PathBuf,
    report: Option<ParseReport>,
    error: Option<String>,
    processing_time_ms: u64,
}

impl FileResult {
    fn status(&self, min_lines: usize) -> (&'static str, String) {
        match (&self.report, &self.error) {
            (_, Some(error)) => ("error", error.clone()),
            (Some(report), None) => match report.empty_reason(min_lines) {
                Some(reason) => ("empty", reason.describe(&report.diagnostics)),
                None => ("ok", String::new()),
            },
            (None, None) => ("error", "unknown error".to_string()),
        }
    }
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = Arc::new(load_config(config_path)?);
    let parser = Arc::new(BikParser::new(&config)?);

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| InputKind::from_path(p).is_some())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    // Files are parsed on blocking workers; `buffered` keeps input order
    let mut parsed = futures_util::stream::iter(files.into_iter().map(|path| {
        let parser = Arc::clone(&parser);
        let config = Arc::clone(&config);
        tokio::task::spawn_blocking(move || {
            let file_start = Instant::now();
            let result = parse_file(&path, &parser, &config, None);
            (path, result, file_start.elapsed().as_millis() as u64)
        })
    }))
    .buffered(args.jobs.max(1));

    let mut results = Vec::new();
    while let Some(joined) = parsed.next().await {
        let (path, result, processing_time_ms) = joined?;

        match result {
            Ok(report) => {
                results.push(FileResult {
                    path,
                    report: Some(report),
                    error: None,
                    processing_time_ms,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(FileResult {
                        path,
                        report: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    overall_pb.abandon();
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
                }
            }
        }

        overall_pb.inc(1);
    }

    overall_pb.finish_and_clear();

    if let Some(output_dir) = &args.output_dir {
        write_outputs(output_dir, &results, args.format, args.diagnostics, args.summary)?;
    }

    if args.summary {
        let summary_dir = args.output_dir.clone().unwrap_or_else(|| PathBuf::from("."));
        let records: Vec<DebtRecord> = results
            .iter()
            .filter_map(|r| r.report.as_ref())
            .flat_map(|report| report.records.iter().cloned())
            .collect();

        let records_path = summary_dir.join(format!("{}.csv", RECORDS_STEM));
        write_csv_file(&records_path, &records)?;

        let status_path = summary_dir.join(format!("{}.csv", STATUS_STEM));
        write_status(&status_path, &results, config.pdf.min_lines)?;

        println!(
            "{} Summary written to {} and {}",
            style("✓").green(),
            records_path.display(),
            status_path.display()
        );
    }

    let record_count: usize = results
        .iter()
        .filter_map(|r| r.report.as_ref())
        .map(|report| report.records.len())
        .sum();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();
    let empty: Vec<_> = results
        .iter()
        .filter(|r| r.report.as_ref().is_some_and(|report| report.records.is_empty()))
        .collect();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} records, {} files without records, {} failed",
        style(record_count).green(),
        style(empty.len()).yellow(),
        style(failed.len()).red()
    );

    if !empty.is_empty() {
        println!();
        println!("{}", style("Files without active obligations:").yellow());
        for result in &empty {
            println!("  - {}: {}", result.path.display(), result.status(config.pdf.min_lines).1);
        }
    }

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// Unique output file stems, one per input path.
///
/// A stem already taken (or reserved) gets its parent directory name
/// prefixed, then a numeric suffix.
fn output_stems(paths: &[&Path], reserved: &[&str]) -> Vec<String> {
    let mut used: HashSet<String> = reserved.iter().map(|s| s.to_string()).collect();

    paths
        .iter()
        .map(|path| {
            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("report");
            let mut candidate = stem.to_string();

            if used.contains(&candidate) {
                if let Some(parent) = path.parent().and_then(|p| p.file_name()).and_then(|s| s.to_str()) {
                    candidate = format!("{}_{}", parent, stem);
                }
            }

            let base = candidate.clone();
            let mut n = 2;
            while used.contains(&candidate) {
                candidate = format!("{}_{}", base, n);
                n += 1;
            }

            used.insert(candidate.clone());
            candidate
        })
        .collect()
}

fn write_outputs(
    output_dir: &Path,
    results: &[FileResult],
    format: OutputFormat,
    diagnostics: bool,
    summary: bool,
) -> anyhow::Result<()> {
    let written: Vec<(&Path, &ParseReport)> = results
        .iter()
        .filter_map(|r| r.report.as_ref().map(|report| (r.path.as_path(), report)))
        .collect();

    // Summary files share the directory with per-file CSV outputs
    let reserved: &[&str] = if summary && format == OutputFormat::Csv {
        &[RECORDS_STEM, STATUS_STEM]
    } else {
        &[]
    };
    let paths: Vec<&Path> = written.iter().map(|(path, _)| *path).collect();
    let stems = output_stems(&paths, reserved);

    for ((path, report), stem) in written.iter().zip(stems) {
        let output_path = output_dir.join(format!("{}.{}", stem, format.extension()));
        fs::write(&output_path, format_report(report, format, diagnostics)?)?;
        debug!("Wrote output for {} to {}", path.display(), output_path.display());
    }
    Ok(())
}

fn write_status(path: &Path, results: &[FileResult], min_lines: usize) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "records",
        "lines_read",
        "anchors_found",
        "processing_time_ms",
        "message",
    ])?;

    for result in results {
        let (status, message) = result.status(min_lines);
        let (records, lines_read, anchors) = result
            .report
            .as_ref()
            .map(|r| {
                (
                    r.records.len().to_string(),
                    r.diagnostics.lines_read.to_string(),
                    r.diagnostics.anchors_found.to_string(),
                )
            })
            .unwrap_or_default();

        wtr.write_record([
            source_name(&result.path).as_str(),
            status,
            &records,
            &lines_read,
            &anchors,
            &result.processing_time_ms.to_string(),
            &message,
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_output_stems_are_unique() {
        let paths = [
            Path::new("anna/raport.txt"),
            Path::new("jan/raport.txt"),
            Path::new("jan/raport.pdf"),
            Path::new("inne.txt"),
        ];
        assert_eq!(
            output_stems(&paths, &[]),
            vec!["raport", "jan_raport", "jan_raport_2", "inne"]
        );
    }

    #[test]
    fn test_output_stems_avoid_reserved_names() {
        let paths = [Path::new("wyniki/records.txt")];
        assert_eq!(output_stems(&paths, &[RECORDS_STEM, STATUS_STEM]), vec!["wyniki_records"]);
    }
}
