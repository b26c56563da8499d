//! Debt records extracted from the active obligations section.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One active obligation as listed in a BIK report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebtRecord {
    /// Caller supplied label of the document this row came from.
    pub source: String,

    /// Product description (e.g. "Kredyt gotówkowy"), empty if undetected.
    pub product_type: String,

    /// Creditor name, possibly joined from several physical lines.
    pub creditor_name: String,

    /// Contract date exactly as printed (DD.MM.YYYY).
    pub contract_date: String,

    /// Original amount of the obligation.
    #[serde(with = "rust_decimal::serde::float_option", default)]
    pub original_amount: Option<Decimal>,

    /// Amount still to be repaid.
    #[serde(with = "rust_decimal::serde::float_option", default)]
    pub remaining_balance: Option<Decimal>,

    /// Installment amount.
    #[serde(with = "rust_decimal::serde::float_option", default)]
    pub installment_amount: Option<Decimal>,

    /// Sum of overdue payments.
    #[serde(with = "rust_decimal::serde::float_option", default)]
    pub overdue_total: Option<Decimal>,
}

/// Fixed order of the amount columns of an obligation row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountSlot {
    /// Pierwotna kwota.
    OriginalAmount,
    /// Pozostało do spłaty.
    RemainingBalance,
    /// Kwota raty.
    InstallmentAmount,
    /// Suma zaległości.
    OverdueTotal,
}

impl AmountSlot {
    /// All slots in column order.
    pub const ALL: [AmountSlot; 4] = [
        AmountSlot::OriginalAmount,
        AmountSlot::RemainingBalance,
        AmountSlot::InstallmentAmount,
        AmountSlot::OverdueTotal,
    ];

    /// Zero-based column position.
    pub fn index(self) -> usize {
        match self {
            AmountSlot::OriginalAmount => 0,
            AmountSlot::RemainingBalance => 1,
            AmountSlot::InstallmentAmount => 2,
            AmountSlot::OverdueTotal => 3,
        }
    }

    /// Spreadsheet column header.
    pub fn header(self) -> &'static str {
        match self {
            AmountSlot::OriginalAmount => "Pierwotna_kwota",
            AmountSlot::RemainingBalance => "Pozostało_do_spłaty",
            AmountSlot::InstallmentAmount => "Kwota_raty",
            AmountSlot::OverdueTotal => "Suma_zaległości",
        }
    }
}

impl DebtRecord {
    /// Spreadsheet column headers, in field order.
    pub const COLUMNS: [&'static str; 8] = [
        "Źródło",
        "Rodzaj_produktu",
        "Kredytodawca",
        "Zawarcie_umowy",
        "Pierwotna_kwota",
        "Pozostało_do_spłaty",
        "Kwota_raty",
        "Suma_zaległości",
    ];

    /// Amount stored in the given slot.
    pub fn amount(&self, slot: AmountSlot) -> Option<Decimal> {
        match slot {
            AmountSlot::OriginalAmount => self.original_amount,
            AmountSlot::RemainingBalance => self.remaining_balance,
            AmountSlot::InstallmentAmount => self.installment_amount,
            AmountSlot::OverdueTotal => self.overdue_total,
        }
    }

    /// Row cells in `COLUMNS` order; absent amounts are empty cells.
    pub fn to_row(&self) -> Vec<String> {
        let mut row = vec![
            self.source.clone(),
            self.product_type.clone(),
            self.creditor_name.clone(),
            self.contract_date.clone(),
        ];
        row.extend(
            AmountSlot::ALL
                .iter()
                .map(|slot| self.amount(*slot).map(|a| a.to_string()).unwrap_or_default()),
        );
        row
    }

    /// Contract date as a calendar date, if it is one.
    pub fn contract_date_parsed(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.contract_date, "%d.%m.%Y").ok()
    }

    /// Check the record for suspicious content and return any issues found.
    ///
    /// Issues are informational; the record is still valid output.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.contract_date_parsed().is_none() {
            issues.push(format!("Contract date {} is not a calendar date", self.contract_date));
        }

        if self.creditor_name.is_empty() {
            issues.push("Missing creditor name".to_string());
        }

        if self.product_type.is_empty() {
            issues.push("Missing product type".to_string());
        }

        if AmountSlot::ALL.iter().all(|slot| self.amount(*slot).is_none()) {
            issues.push("No amounts recognized".to_string());
        }

        if let (Some(original), Some(remaining)) = (self.original_amount, self.remaining_balance) {
            if remaining > original {
                issues.push(format!(
                    "Remaining balance ({}) exceeds original amount ({})",
                    remaining, original
                ));
            }
        }

        issues
    }
}

/// Counters computed alongside a parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Non-empty lines after normalization.
    pub lines_read: usize,
    /// Whether the active obligations heading was found.
    pub section_found: bool,
    /// Lines inside the active section.
    pub section_lines: usize,
    /// Date anchors found inside the section.
    pub anchors_found: usize,
    /// Section lines after the last anchor (no home record).
    pub trailing_lines: usize,
    /// Records emitted without a creditor name.
    pub records_without_creditor: usize,
    /// Numeral-looking tokens that failed numeric conversion.
    pub unparsed_amounts: usize,
}

/// Why a parse produced no records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyReason {
    /// Almost no text was read; the upstream extraction is likely broken or the file is a scan.
    NoText,
    /// Text was read but the active obligations heading is missing.
    SectionMissing,
    /// The section exists but holds no date anchors.
    NoAnchors,
}

impl EmptyReason {
    /// Human readable diagnosis.
    pub fn describe(self, diagnostics: &Diagnostics) -> String {
        match self {
            EmptyReason::NoText => format!(
                "only {} lines of text were read; the document is most likely a scan or text extraction failed",
                diagnostics.lines_read
            ),
            EmptyReason::SectionMissing => format!(
                "read {} lines but found no 'Zobowiązania finansowe - w trakcie spłaty' section",
                diagnostics.lines_read
            ),
            EmptyReason::NoAnchors => format!(
                "found the active obligations section ({} lines) but no DD.MM.YYYY dates inside it",
                diagnostics.section_lines
            ),
        }
    }
}

/// Records plus diagnostics for one parsed document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseReport {
    /// Extracted records in document order.
    pub records: Vec<DebtRecord>,
    /// Diagnostic counters.
    pub diagnostics: Diagnostics,
}

impl ParseReport {
    /// Explain an empty result. Returns `None` when records were found.
    ///
    /// `min_lines` is the line count below which the text is considered missing.
    pub fn empty_reason(&self, min_lines: usize) -> Option<EmptyReason> {
        if !self.records.is_empty() {
            return None;
        }
        let d = &self.diagnostics;
        if !d.section_found && d.lines_read < min_lines {
            Some(EmptyReason::NoText)
        } else if !d.section_found {
            Some(EmptyReason::SectionMissing)
        } else {
            Some(EmptyReason::NoAnchors)
        }
    }
}
