//! Locating the active obligations section.

use tracing::debug;

use super::Line;
use super::patterns::{ACTIVE_HEADING, is_section_end};

/// Lines of the "Zobowiązania finansowe - w trakcie spłaty" section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    /// Whether the heading was found at all.
    pub found: bool,
    /// Section body, heading excluded.
    pub lines: Vec<Line>,
}

impl Section {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Slice the active obligations section out of the normalized lines.
///
/// The heading line is excluded, but text following the heading on the same
/// line is kept as the first section line. The section ends before the first
/// closed-obligations, additional-information or "Łącznie" line, or at the end
/// of the document.
pub fn slice_active(lines: &[Line]) -> Section {
    let Some((start, heading)) = lines
        .iter()
        .enumerate()
        .find_map(|(i, l)| ACTIVE_HEADING.find(&l.text).map(|m| (i, m)))
    else {
        debug!("Active obligations heading not found in {} lines", lines.len());
        return Section::default();
    };

    let mut body = Vec::new();

    let remainder = lines[start].text[heading.end()..]
        .trim_matches(|c: char| c.is_whitespace() || c == ':');
    if !remainder.is_empty() {
        if is_section_end(remainder) {
            return Section {
                found: true,
                lines: body,
            };
        }
        body.push(Line::new(lines[start].index, remainder));
    }

    for line in &lines[start + 1..] {
        if is_section_end(&line.text) {
            debug!("Active section ends at line {}: {:?}", line.index, line.text);
            break;
        }
        body.push(line.clone());
    }

    debug!(
        "Active section starts at line {} with {} lines",
        lines[start].index,
        body.len()
    );

    Section {
        found: true,
        lines: body,
    }
}
