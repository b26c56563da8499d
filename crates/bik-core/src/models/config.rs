//! Configuration structures for the parsing pipeline.

use serde::{Deserialize, Serialize};

/// Main configuration for the bik pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BikConfig {
    /// Locale-specific literals and separators.
    pub dialect: DialectConfig,

    /// Heuristics controlling how blocks are read.
    pub parsing: ParsingConfig,

    /// PDF processing configuration.
    pub pdf: PdfConfig,
}

/// Number formatting and sentinel literals of a report dialect.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DialectConfig {
    /// Decimal separator used in amounts.
    pub decimal_separator: char,

    /// Characters used to group thousands.
    pub thousands_separators: Vec<char>,

    /// Literal meaning "no data" (always absent).
    pub not_available: String,

    /// Literal meaning "none" (absent or zero depending on the slot).
    pub none: String,

    /// Slots (0-3) where the "none" literal reads as zero.
    pub none_as_zero_slots: Vec<usize>,

    /// Currency markers that may follow an amount.
    pub currency_markers: Vec<String>,

    /// Column legend fragments that never describe a product or a creditor.
    pub legend_keywords: Vec<String>,
}

impl Default for DialectConfig {
    fn default() -> Self {
        Self {
            decimal_separator: ',',
            thousands_separators: vec![' ', '.'],
            not_available: "ND".to_string(),
            none: "BRAK".to_string(),
            none_as_zero_slots: vec![3],
            currency_markers: vec!["PLN".to_string(), "zł".to_string()],
            legend_keywords: [
                "rodzaj produktu",
                "kredytodawca",
                "zawarcie",
                "pierwotna",
                "pozostało",
                "kwota raty",
                "suma zaległości",
                "historia",
                "ostatnia płatność",
                "łącznie",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Which direction the classifier scans a block in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanDirection {
    /// Upwards from the date anchor.
    Backward,
    /// Downwards from the start of the block.
    Forward,
}

/// Where a date is allowed to appear for a line to become an anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorRule {
    /// Date must open the line.
    LineStart,
    /// Date may appear anywhere in the line.
    Embedded,
}

/// Where the amount columns of an obligation may be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountLayout {
    /// Only on the anchor line, after the date.
    SameLine,
    /// On the anchor line, continuing into amount-only lines below it.
    Wrapped,
}

/// Parsing heuristics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ParsingConfig {
    /// Scan direction for creditor/product association.
    pub scan_direction: ScanDirection,

    /// Anchor matching rule.
    pub anchor_rule: AnchorRule,

    /// Amount column layout.
    pub amount_layout: AmountLayout,

    /// Maximum number of physical lines joined into one creditor name.
    pub max_creditor_lines: usize,

    /// Maximum number of input lines handed to the parser (0 = unlimited).
    pub max_lines: usize,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            scan_direction: ScanDirection::Backward,
            anchor_rule: AnchorRule::LineStart,
            amount_layout: AmountLayout::Wrapped,
            max_creditor_lines: 8,
            max_lines: 20_000,
        }
    }
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PdfConfig {
    /// Minimum text length to consider PDF as text-based.
    pub min_text_length: usize,

    /// Minimum number of lines below which an empty result is blamed on extraction.
    pub min_lines: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            min_text_length: 50,
            min_lines: 10,
        }
    }
}

impl BikConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = BikConfig::default();
        config.parsing.scan_direction = ScanDirection::Forward;
        config.dialect.none_as_zero_slots = vec![2, 3];
        config.save(&path).unwrap();

        let loaded = BikConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: BikConfig =
            serde_json::from_str(r#"{"parsing": {"amount_layout": "same_line"}}"#).unwrap();

        assert_eq!(config.parsing.amount_layout, AmountLayout::SameLine);
        assert_eq!(config.parsing.max_creditor_lines, 8);
        assert_eq!(config.dialect.none, "BRAK");
    }

    #[test]
    fn test_invalid_file_is_invalid_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = BikConfig::from_file(&path).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }
}
