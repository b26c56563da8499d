//! BIK statement parser wiring the rule stages together.

use tracing::{debug, info};

use super::StatementParser;
use super::assembler::assemble_record;
use super::rules::{Dialect, classify_block, normalize_lines, parse_amounts, segment, slice_active};
use crate::error::{InputError, Result};
use crate::models::config::{AmountLayout, AnchorRule, BikConfig, ParsingConfig, ScanDirection};
use crate::models::record::{Diagnostics, ParseReport};

/// Rule-based parser for the active obligations section of a BIK report.
///
/// Holds only immutable state, so one instance can serve any number of
/// threads.
#[derive(Debug, Clone)]
pub struct BikParser {
    dialect: Dialect,
    parsing: ParsingConfig,
}

impl BikParser {
    /// Create a parser from configuration. Fails on an invalid dialect.
    pub fn new(config: &BikConfig) -> Result<Self> {
        Ok(Self {
            dialect: Dialect::new(&config.dialect)?,
            parsing: config.parsing.clone(),
        })
    }

    /// Set the classifier scan direction.
    pub fn with_scan_direction(mut self, direction: ScanDirection) -> Self {
        self.parsing.scan_direction = direction;
        self
    }

    /// Set the anchor matching rule.
    pub fn with_anchor_rule(mut self, rule: AnchorRule) -> Self {
        self.parsing.anchor_rule = rule;
        self
    }

    /// Set the amount column layout.
    pub fn with_amount_layout(mut self, layout: AmountLayout) -> Self {
        self.parsing.amount_layout = layout;
        self
    }

    /// Set the maximum number of lines joined into a creditor name.
    pub fn with_max_creditor_lines(mut self, max: usize) -> Self {
        self.parsing.max_creditor_lines = max;
        self
    }

    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    pub fn parsing(&self) -> &ParsingConfig {
        &self.parsing
    }
}

impl StatementParser for BikParser {
    fn parse_lines<I, S>(&self, lines: I, source: &str) -> ParseReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lines = normalize_lines(lines, &self.dialect);
        info!("Parsing BIK report {:?} from {} lines", source, lines.len());

        let section = slice_active(&lines);
        let segmentation = segment(&section.lines, self.parsing.anchor_rule);

        let mut diagnostics = Diagnostics {
            lines_read: lines.len(),
            section_found: section.found,
            section_lines: section.lines.len(),
            anchors_found: segmentation.blocks.len(),
            ..Diagnostics::default()
        };

        let mut records = Vec::with_capacity(segmentation.blocks.len());
        let mut last_continuation = 0;

        for block in &segmentation.blocks {
            let fields = classify_block(block, &self.dialect, &self.parsing);
            let amounts = parse_amounts(
                block.anchor_rest(),
                segmentation.after(block),
                self.parsing.amount_layout,
                &self.dialect,
            );

            if fields.creditor_name.is_empty() {
                diagnostics.records_without_creditor += 1;
            }
            diagnostics.unparsed_amounts += amounts.unparsed;
            last_continuation = amounts.continuation_lines;

            records.push(assemble_record(block, fields, &amounts, source));
        }

        // Amount lines wrapped below the last anchor belong to its record.
        diagnostics.trailing_lines = segmentation.trailing.len().saturating_sub(last_continuation);

        debug!(
            "Extracted {} records ({} without creditor, {} unparsed amounts, {} orphan lines)",
            records.len(),
            diagnostics.records_without_creditor,
            diagnostics.unparsed_amounts,
            diagnostics.trailing_lines
        );

        ParseReport {
            records,
            diagnostics,
        }
    }
}

/// Check that a byte buffer holds extracted text rather than a document.
pub fn ensure_text(bytes: &[u8]) -> std::result::Result<&str, InputError> {
    if bytes.starts_with(b"%PDF") {
        return Err(InputError::RawPdf);
    }

    let text = std::str::from_utf8(bytes).map_err(|e| InputError::NotUtf8(e.valid_up_to()))?;

    if let Some(b) = bytes
        .iter()
        .find(|b| **b < 0x20 && !matches!(**b, b'\n' | b'\r' | b'\t' | 0x0c))
    {
        return Err(InputError::Binary(*b));
    }

    Ok(text.trim_start_matches('\u{feff}'))
}
