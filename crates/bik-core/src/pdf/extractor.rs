//! PDF text extraction using lopdf and pdf-extract.

use lopdf::{Document, Object};
use tracing::{debug, trace};

use super::{PdfProcessor, PdfType, Result};
use crate::error::PdfError;

/// Default number of text characters below which a PDF counts as textless.
const DEFAULT_MIN_TEXT_LENGTH: usize = 50;

/// PDF text extractor using lopdf.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
    min_text_length: usize,
}

/// Extracted content from a PDF.
#[derive(Debug, Clone)]
pub struct PdfContent {
    /// Type of PDF content.
    pub pdf_type: PdfType,
    /// Number of pages.
    pub page_count: u32,
    /// Page-ordered text lines.
    pub lines: Vec<String>,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
            min_text_length: DEFAULT_MIN_TEXT_LENGTH,
        }
    }

    /// Set the text length threshold used by [`PdfProcessor::analyze`].
    pub fn with_min_text_length(mut self, min: usize) -> Self {
        self.min_text_length = min;
        self
    }

    /// Load a PDF and extract its lines in one step.
    ///
    /// The text layer is extracted and the images counted once, then
    /// shared by the type analysis and the line split.
    pub fn extract_all(&mut self, data: &[u8]) -> Result<PdfContent> {
        self.load(data)?;
        let text = self.extract_text()?;
        let pdf_type = self.classify(text_length(&text), self.count_images());
        Ok(PdfContent {
            pdf_type,
            page_count: self.page_count(),
            lines: split_lines(&text, pdf_type)?,
        })
    }

    /// Count image XObjects across the whole document.
    fn count_images(&self) -> usize {
        let Some(doc) = self.document.as_ref() else {
            return 0;
        };

        let count = doc
            .objects
            .values()
            .filter(|object| match object {
                Object::Stream(stream) => stream
                    .dict
                    .get(b"Subtype")
                    .and_then(|s| s.as_name())
                    .map(|name| name == b"Image")
                    .unwrap_or(false),
                _ => false,
            })
            .count();

        trace!("Found {} image objects in document", count);
        count
    }

    fn classify(&self, text_length: usize, images: usize) -> PdfType {
        let has_text = text_length > self.min_text_length;
        let has_images = images > 0;

        let pdf_type = match (has_text, has_images) {
            (true, false) => PdfType::Text,
            (false, true) => PdfType::Image,
            (true, true) => PdfType::Hybrid,
            (false, false) => PdfType::Empty,
        };

        debug!("PDF analysis: has_text={}, has_images={} -> {:?}", has_text, has_images, pdf_type);
        pdf_type
    }
}

/// Trimmed non-empty lines of an extracted text layer.
fn split_lines(text: &str, pdf_type: PdfType) -> Result<Vec<String>> {
    if pdf_type == PdfType::Image {
        return Err(PdfError::ImageOnly);
    }

    let lines: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect();

    debug!("Extracted {} text lines", lines.len());
    Ok(lines)
}

/// Number of non-whitespace characters in extracted text.
fn text_length(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Statements are often protected with an empty user password
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn analyze(&self) -> PdfType {
        let text_length = self.extract_text().map(|t| text_length(&t)).unwrap_or(0);
        self.classify(text_length, self.count_images())
    }

    fn extract_text(&self) -> Result<String> {
        if self.document.is_none() {
            return Err(PdfError::Parse("No document loaded".to_string()));
        }
        pdf_extract::extract_text_from_mem(&self.raw_data).map_err(|e| PdfError::TextExtraction(e.to_string()))
    }

    fn extract_lines(&self) -> Result<Vec<String>> {
        let text = self.extract_text()?;
        split_lines(&text, self.classify(text_length(&text), self.count_images()))
    }
}
