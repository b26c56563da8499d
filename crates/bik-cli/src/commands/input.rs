//! Reading report files into text lines.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use bik_core::models::config::BikConfig;
use bik_core::pdf::PdfExtractor;
use bik_core::statement::ensure_text;
use bik_core::{BikParser, ParseReport, StatementParser};

/// Kind of input file, decided by extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKind {
    /// PDF with a text layer.
    Pdf,
    /// Text already extracted from a report.
    Text,
}

impl InputKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "pdf" => Some(Self::Pdf),
            "txt" | "text" => Some(Self::Text),
            _ => None,
        }
    }
}

/// Read the page-ordered text lines of a report.
pub fn read_lines(path: &Path, config: &BikConfig) -> anyhow::Result<Vec<String>> {
    let Some(kind) = InputKind::from_path(path) else {
        anyhow::bail!("Unsupported file format: {}", path.display());
    };

    let data = fs::read(path)?;

    let lines = match kind {
        InputKind::Pdf => {
            let mut extractor = PdfExtractor::new().with_min_text_length(config.pdf.min_text_length);
            let content = extractor.extract_all(&data)?;
            debug!(
                "PDF {} has {} pages ({:?})",
                path.display(),
                content.page_count,
                content.pdf_type
            );
            content.lines
        }
        InputKind::Text => ensure_text(&data)?.lines().map(String::from).collect(),
    };

    Ok(cap_lines(lines, config.parsing.max_lines))
}

/// Truncate overly long input. A limit of zero disables the cap.
pub fn cap_lines(mut lines: Vec<String>, max_lines: usize) -> Vec<String> {
    if max_lines > 0 && lines.len() > max_lines {
        warn!(
            "Input has {} lines, only the first {} are parsed",
            lines.len(),
            max_lines
        );
        lines.truncate(max_lines);
    }
    lines
}

/// Name recorded in the `source` field of every record from a file.
pub fn source_name(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(String::from)
        .unwrap_or_else(|| path.display().to_string())
}

/// Read and parse one report file.
pub fn parse_file(
    path: &Path,
    parser: &BikParser,
    config: &BikConfig,
    source: Option<&str>,
) -> anyhow::Result<ParseReport> {
    let lines = read_lines(path, config)?;
    let source = source.map(String::from).unwrap_or_else(|| source_name(path));
    Ok(parser.parse_lines(lines, &source))
}
