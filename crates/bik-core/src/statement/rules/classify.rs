//! Creditor name and product type classification within one block.

use tracing::trace;

use super::amounts::is_amount_only;
use super::dialect::Dialect;
use super::patterns::{ACTIVE_HEADING, DATE_ANY, is_section_end};
use super::segment::RecordBlock;
use crate::models::config::{AnchorRule, ParsingConfig, ScanDirection};

/// Text fields of one obligation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockFields {
    pub creditor_name: String,
    pub product_type: String,
}

/// Whether a line looks like (part of) a creditor name.
///
/// Rules, applied in order:
/// 1. a line containing a date is never a creditor;
/// 2. a line containing a column legend keyword (e.g. "KREDYTODAWCA") is never a creditor;
/// 3. digits, sentinel words and currency markers are ignored;
/// 4. what remains must contain a letter and no lower-case letter.
pub fn is_creditor_like(line: &str, dialect: &Dialect) -> bool {
    if DATE_ANY.is_match(line) || dialect.is_legend(line) {
        return false;
    }

    let mut has_letter = false;
    for word in line.split_whitespace().filter(|w| !dialect.is_noise_word(w)) {
        for c in word.chars().filter(|c| c.is_alphabetic()) {
            if c.is_lowercase() {
                return false;
            }
            has_letter = true;
        }
    }
    has_letter
}

/// Whether a line may be taken as the product description.
pub fn is_product_candidate(line: &str, dialect: &Dialect) -> bool {
    !line.is_empty()
        && line.chars().any(|c| c.is_alphabetic())
        && !is_creditor_like(line, dialect)
        && !DATE_ANY.is_match(line)
        && !is_amount_only(line, dialect)
        && !dialect.is_legend(line)
        && !ACTIVE_HEADING.is_match(line)
        && !is_section_end(line)
}

/// Split a block into creditor name and product type.
///
/// The creditor is a run of contiguous creditor-like lines chosen by the
/// configured scan direction, capped at `max_creditor_lines`. The product is
/// the nearest candidate line above that run; the upward search stops at any
/// creditor-like line so text never crosses into another name. Without a
/// creditor run both fields are empty.
pub fn classify_block(block: &RecordBlock<'_>, dialect: &Dialect, parsing: &ParsingConfig) -> BlockFields {
    let mut candidates: Vec<&str> = block.head().iter().map(|l| l.text.as_str()).collect();
    if parsing.anchor_rule == AnchorRule::Embedded && !block.anchor_prefix().is_empty() {
        candidates.push(block.anchor_prefix());
    }

    let max = parsing.max_creditor_lines.max(1);
    let run = match parsing.scan_direction {
        ScanDirection::Backward => backward_run(&candidates, dialect, max),
        ScanDirection::Forward => forward_run(&candidates, dialect, max),
    };

    let Some((start, end)) = run else {
        trace!("No creditor run in block ending at line {}", block.anchor().index);
        return BlockFields::default();
    };

    let creditor_name = collapse(&candidates[start..end].join(" "));

    let product_type = candidates[..start]
        .iter()
        .rev()
        .take_while(|l| !is_creditor_like(l, dialect))
        .find(|l| is_product_candidate(l, dialect))
        .map(|l| collapse(l))
        .unwrap_or_default();

    BlockFields {
        creditor_name,
        product_type,
    }
}

/// Creditor lines directly above the anchor, collected upwards.
fn backward_run(candidates: &[&str], dialect: &Dialect, max: usize) -> Option<(usize, usize)> {
    let end = candidates.len();
    let mut start = end;
    while start > 0 && end - start < max && is_creditor_like(candidates[start - 1], dialect) {
        start -= 1;
    }
    (start < end).then_some((start, end))
}

/// First creditor lines from the block start, collected downwards.
fn forward_run(candidates: &[&str], dialect: &Dialect, max: usize) -> Option<(usize, usize)> {
    let start = candidates.iter().position(|l| is_creditor_like(l, dialect))?;
    let mut end = start;
    while end < candidates.len() && end - start < max && is_creditor_like(candidates[end], dialect) {
        end += 1;
    }
    Some((start, end))
}

fn collapse(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
