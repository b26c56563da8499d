//! Error types for the bik-core library.

use thiserror::Error;

/// Main error type for the bik library.
#[derive(Error, Debug)]
pub enum BikError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// The parser was handed something other than extracted text.
    #[error("input error: {0}")]
    Input(#[from] InputError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// The PDF only contains scanned images, there is no text layer to parse.
    #[error("PDF contains only images (scanned document), OCR is not supported")]
    ImageOnly,
}

/// Contract violations when feeding the statement parser.
#[derive(Error, Debug)]
pub enum InputError {
    /// Raw PDF bytes were passed where extracted text lines were expected.
    #[error("expected extracted text lines, got raw PDF bytes; run text extraction first")]
    RawPdf,

    /// The input is not valid UTF-8 text.
    #[error("expected UTF-8 text lines, got invalid UTF-8 at byte {0}")]
    NotUtf8(usize),

    /// The input contains NUL or other binary control bytes.
    #[error("expected text lines, got binary data (control byte 0x{0:02x})")]
    Binary(u8),
}

/// Result type for the bik library.
pub type Result<T> = std::result::Result<T, BikError>;
