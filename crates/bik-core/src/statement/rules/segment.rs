//! Splitting the section into date-anchored record blocks.

use regex::Match;
use tracing::debug;

use super::Line;
use super::patterns::{DATE_ANY, DATE_AT_START};
use crate::models::config::AnchorRule;

/// Lines describing one obligation, ending with the line that carries its date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordBlock<'a> {
    /// Block lines; the last one is the anchor.
    pub lines: &'a [Line],
    /// Position of the first block line within the section.
    pub offset: usize,
    date_start: usize,
    date_end: usize,
}

impl<'a> RecordBlock<'a> {
    /// The anchor line.
    pub fn anchor(&self) -> &'a Line {
        &self.lines[self.lines.len() - 1]
    }

    /// Lines above the anchor.
    pub fn head(&self) -> &'a [Line] {
        &self.lines[..self.lines.len() - 1]
    }

    /// Contract date as printed.
    pub fn date(&self) -> &'a str {
        &self.anchor().text[self.date_start..self.date_end]
    }

    /// Anchor line text before the date.
    pub fn anchor_prefix(&self) -> &'a str {
        self.anchor().text[..self.date_start].trim()
    }

    /// Anchor line text after the date.
    pub fn anchor_rest(&self) -> &'a str {
        self.anchor().text[self.date_end..].trim()
    }

    /// Position just past the anchor within the section.
    pub fn end(&self) -> usize {
        self.offset + self.lines.len()
    }
}

/// Result of splitting a section into blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segmentation<'a> {
    /// Blocks in document order.
    pub blocks: Vec<RecordBlock<'a>>,
    /// Lines after the last anchor.
    pub trailing: &'a [Line],
    section: &'a [Line],
}

impl<'a> Segmentation<'a> {
    /// Section lines following a block's anchor (later blocks and trailing lines).
    pub fn after(&self, block: &RecordBlock<'a>) -> &'a [Line] {
        &self.section[block.end()..]
    }
}

/// Find the contract date that turns a line into an anchor.
pub fn find_anchor(text: &str, rule: AnchorRule) -> Option<Match<'_>> {
    match rule {
        AnchorRule::LineStart => DATE_AT_START.find(text),
        AnchorRule::Embedded => DATE_ANY.find(text),
    }
}

/// Partition the section into blocks, one per anchor line.
///
/// With `k` anchors exactly `k` non-empty blocks are produced; together with
/// the trailing lines they reconstruct the section.
pub fn segment(section: &[Line], rule: AnchorRule) -> Segmentation<'_> {
    let mut blocks = Vec::new();
    let mut start = 0;

    for (i, line) in section.iter().enumerate() {
        if let Some(m) = find_anchor(&line.text, rule) {
            blocks.push(RecordBlock {
                lines: &section[start..=i],
                offset: start,
                date_start: m.start(),
                date_end: m.end(),
            });
            start = i + 1;
        }
    }

    debug!(
        "Segmented {} section lines into {} blocks ({} trailing)",
        section.len(),
        blocks.len(),
        section.len() - start
    );

    Segmentation {
        blocks,
        trailing: &section[start..],
        section,
    }
}
