//! Rule-based stages of the BIK statement pipeline.

pub mod amounts;
pub mod classify;
pub mod dialect;
pub mod normalize;
pub mod patterns;
pub mod section;
pub mod segment;

pub use amounts::{AmountToken, BlockAmounts, is_amount_only, is_continuation, parse_amount_token, parse_amounts, parse_numeral, tokenize};
pub use classify::{BlockFields, classify_block, is_creditor_like, is_product_candidate};
pub use dialect::Dialect;
pub use normalize::{normalize_line, normalize_lines};
pub use section::{Section, slice_active};
pub use segment::{RecordBlock, Segmentation, find_anchor, segment};

use serde::{Deserialize, Serialize};

/// A normalized line with its position in the page-ordered stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    /// Zero-based index in the normalized stream.
    pub index: usize,
    /// Normalized text.
    pub text: String,
}

impl Line {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }
}
