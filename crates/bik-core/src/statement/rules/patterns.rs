//! Common regex patterns for BIK report extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Section headings. Diacritics and the hyphen are optional because text
    // extraction sometimes drops or substitutes them.
    pub static ref ACTIVE_HEADING: Regex = Regex::new(
        r"(?i)zobowi[aą]zania\s+finansowe\s*[-‐‑–—]?\s*w\s*trakcie\s*sp[lł]aty"
    ).unwrap();

    pub static ref CLOSED_HEADING: Regex = Regex::new(
        r"(?i)zobowi[aą]zania\s+finansowe\s*[-‐‑–—]?\s*zamkni[eę]te"
    ).unwrap();

    pub static ref INFO_HEADING: Regex = Regex::new(
        r"(?i)informacje\s+(?:dodatkowe|szczeg[oó][lł]owe)"
    ).unwrap();

    pub static ref TOTAL_HEADING: Regex = Regex::new(
        r"(?i)^[łl][aą]cznie\b"
    ).unwrap();

    // Contract date anchors (DD.MM.YYYY)
    pub static ref DATE_AT_START: Regex = Regex::new(
        r"^\d{2}\.\d{2}\.\d{4}\b"
    ).unwrap();

    pub static ref DATE_ANY: Regex = Regex::new(
        r"\b\d{2}\.\d{2}\.\d{4}\b"
    ).unwrap();

    // Dot-grouped integer such as 1.234.567
    pub static ref DOT_GROUPED: Regex = Regex::new(
        r"^\d{1,3}(?:\.\d{3})+$"
    ).unwrap();
}

/// Whether a line closes the active obligations section.
pub fn is_section_end(line: &str) -> bool {
    CLOSED_HEADING.is_match(line) || INFO_HEADING.is_match(line) || TOTAL_HEADING.is_match(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_heading_variants() {
        assert!(ACTIVE_HEADING.is_match("Zobowiązania finansowe - w trakcie spłaty"));
        assert!(ACTIVE_HEADING.is_match("ZOBOWIĄZANIA FINANSOWE – W TRAKCIE SPŁATY"));
        assert!(ACTIVE_HEADING.is_match("Zobowiazania finansowe w trakcie splaty"));
        assert!(ACTIVE_HEADING.is_match("Zobowiązania finansowe—w trakcie spłaty"));
        assert!(!ACTIVE_HEADING.is_match("Zobowiązania finansowe - zamknięte"));
    }

    #[test]
    fn test_section_end() {
        assert!(is_section_end("Zobowiązania finansowe - zamknięte"));
        assert!(is_section_end("Zobowiazania finansowe zamkniete"));
        assert!(is_section_end("Informacje dodatkowe"));
        assert!(is_section_end("Informacje szczegółowe"));
        assert!(is_section_end("Łącznie 15000,00 PLN"));
        assert!(is_section_end("ŁĄCZNIE"));
        assert!(!is_section_end("Kwota łącznie"));
        assert!(!is_section_end("Łącznik"));
    }

    #[test]
    fn test_date_patterns() {
        assert!(DATE_AT_START.is_match("01.02.2020 10000,00 PLN"));
        assert!(!DATE_AT_START.is_match("Umowa z 01.02.2020"));
        assert!(DATE_ANY.is_match("Umowa z 01.02.2020"));
        assert!(!DATE_ANY.is_match("1.2.2020"));
    }
}
