//! Debt record extraction from BIK statements.

mod assembler;
mod parser;
pub mod rules;

pub use assembler::assemble_record;
pub use parser::{BikParser, ensure_text};

use crate::error::Result;
use crate::models::record::ParseReport;

/// Trait for statement parsing.
pub trait StatementParser {
    /// Parse page-ordered text lines. Never fails: a report without an active
    /// obligations section yields an empty record list.
    fn parse_lines<I, S>(&self, lines: I, source: &str) -> ParseReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>;

    /// Parse extracted text with embedded line breaks.
    fn parse_text(&self, text: &str, source: &str) -> ParseReport {
        self.parse_lines(text.lines(), source)
    }

    /// Parse a byte buffer that must hold extracted UTF-8 text.
    ///
    /// Fails fast on raw PDF or binary input.
    fn parse_bytes(&self, bytes: &[u8], source: &str) -> Result<ParseReport> {
        let text = ensure_text(bytes)?;
        Ok(self.parse_text(text, source))
    }
}
