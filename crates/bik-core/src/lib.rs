//! Core library for BIK credit report processing.
//!
//! This crate provides:
//! - PDF text extraction with scan/encryption detection
//! - Line normalization for Polish number formatting
//! - Extraction of active obligations ("w trakcie spłaty") into debt records
//! - Diagnostics explaining why a report produced no records

pub mod error;
pub mod models;
pub mod pdf;
pub mod statement;

pub use error::{BikError, Result};
pub use models::config::BikConfig;
pub use models::record::{AmountSlot, DebtRecord, Diagnostics, EmptyReason, ParseReport};
pub use pdf::{PdfContent, PdfExtractor, PdfProcessor, PdfType};
pub use statement::{BikParser, StatementParser};
