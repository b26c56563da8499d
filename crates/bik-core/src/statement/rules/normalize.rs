//! Line normalization: whitespace, quotes and thousands separators.

use unicode_normalization::UnicodeNormalization;

use super::Line;
use super::dialect::Dialect;

/// Unicode spaces produced by PDF text extraction.
const SPACE_VARIANTS: [char; 3] = ['\u{00a0}', '\u{202f}', '\u{2009}'];

/// Quote characters stripped from line edges.
const QUOTES: [char; 7] = ['"', '\'', '„', '”', '“', '‘', '’'];

/// Normalize one raw line. Returns `None` when nothing but whitespace remains.
///
/// Decomposed diacritics (`a` + U+0328) are composed first, so "ą" always
/// reaches the rules as one character.
pub fn normalize_line(raw: &str, dialect: &Dialect) -> Option<String> {
    let mut collapsed = String::with_capacity(raw.len());
    let mut prev_space = false;

    for c in raw.nfc() {
        let c = if c == '\t' || SPACE_VARIANTS.contains(&c) { ' ' } else { c };
        if c == ' ' {
            if prev_space {
                continue;
            }
            prev_space = true;
        } else {
            prev_space = false;
        }
        collapsed.push(c);
    }

    let trimmed = trim_edges(&collapsed);
    let cleaned = strip_thousands(trimmed, dialect);

    if cleaned.is_empty() { None } else { Some(cleaned) }
}

/// Normalize a page-ordered sequence of raw lines, dropping empty ones.
///
/// Embedded line breaks are split first, so whole page texts may be passed in.
pub fn normalize_lines<I, S>(raw: I, dialect: &Dialect) -> Vec<Line>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut lines = Vec::new();
    for chunk in raw {
        for part in chunk.as_ref().lines() {
            if let Some(text) = normalize_line(part, dialect) {
                lines.push(Line::new(lines.len(), text));
            }
        }
    }
    lines
}

fn trim_edges(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || QUOTES.contains(&c))
}

/// Remove group separators sitting between digit groups of three.
///
/// A separator is dropped only when the digit run on its left has 1-3 digits
/// and is not a decimal fraction, and the run on its right has exactly three
/// digits followed by a non-word character or the end of the line. Dates
/// (`01.02.2020`) and a year followed by an amount (`2020 100 000`) are kept.
fn strip_thousands(s: &str, dialect: &Dialect) -> String {
    let chars: Vec<char> = s.chars().collect();
    let decimal = dialect.config().decimal_separator;
    let mut out = String::with_capacity(s.len());

    for (i, &c) in chars.iter().enumerate() {
        if dialect.is_group_separator(c) && separates_groups(&chars, i, decimal) {
            continue;
        }
        out.push(c);
    }
    out
}

fn separates_groups(chars: &[char], i: usize, decimal: char) -> bool {
    let left = chars[..i]
        .iter()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .count();
    if !(1..=3).contains(&left) {
        return false;
    }
    if i > left && chars[i - left - 1] == decimal {
        return false;
    }

    let right = &chars[i + 1..];
    if right.len() < 3 || !right[..3].iter().all(|c| c.is_ascii_digit()) {
        return false;
    }
    match right.get(3) {
        None => true,
        Some(next) => !(next.is_alphanumeric() || *next == '_'),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::DialectConfig;
    use pretty_assertions::assert_eq;

    fn dialect() -> Dialect {
        Dialect::new(&DialectConfig::default()).unwrap()
    }

    fn norm(s: &str) -> Option<String> {
        normalize_line(s, &dialect())
    }

    #[test]
    fn test_whitespace_variants() {
        assert_eq!(norm("BANK\u{00a0}\u{00a0}POLSKI\tS.A."), Some("BANK POLSKI S.A.".to_string()));
        assert_eq!(norm("  Kredyt\u{202f}gotówkowy  "), Some("Kredyt gotówkowy".to_string()));
        assert_eq!(norm("\u{2009}\t "), None);
        assert_eq!(norm(""), None);
    }

    #[test]
    fn test_composes_decomposed_diacritics() {
        assert_eq!(
            norm("Zobowia\u{0328}zania finansowe - w trakcie spłaty"),
            Some("Zobowiązania finansowe - w trakcie spłaty".to_string())
        );
        assert_eq!(norm("SPO\u{0301}ŁKA AKCYJNA"), Some("SPÓŁKA AKCYJNA".to_string()));
    }

    #[test]
    fn test_strips_quotes() {
        assert_eq!(norm("\"BANK S.A.\""), Some("BANK S.A.".to_string()));
        assert_eq!(norm("„Karta kredytowa”"), Some("Karta kredytowa".to_string()));
        assert_eq!(norm("' \"'"), None);
    }

    #[test]
    fn test_thousands_separators() {
        assert_eq!(norm("10 000,00 PLN"), Some("10000,00 PLN".to_string()));
        assert_eq!(norm("25.298,50"), Some("25298,50".to_string()));
        assert_eq!(norm("1 234 567,89"), Some("1234567,89".to_string()));
        assert_eq!(norm("1\u{00a0}234,00"), Some("1234,00".to_string()));
    }

    #[test]
    fn test_keeps_dates_and_decimals() {
        assert_eq!(
            norm("01.02.2020 100 000,00 PLN"),
            Some("01.02.2020 100000,00 PLN".to_string())
        );
        assert_eq!(norm("5 000,00 250,00"), Some("5000,00 250,00".to_string()));
        assert_eq!(norm("0,50 100"), Some("0,50 100".to_string()));
        assert_eq!(norm("1234 567"), Some("1234 567".to_string()));
        assert_eq!(norm("1 000PLN"), Some("1 000PLN".to_string()));
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "01.02.2020 10 000,00 PLN 5 000,00 PLN 250,00 PLN BRAK",
            "  \"BANK\u{00a0}PRZYKŁADOWY  S.A.\" ",
            "12 345 6789",
            "1 2 345",
            "1234 000 000",
            ",12 000 000",
            "Zobowiązania finansowe - w trakcie spłaty",
        ];
        for sample in samples {
            let once = norm(sample).unwrap();
            assert_eq!(norm(&once), Some(once.clone()), "not idempotent for {:?}", sample);
        }
    }

    #[test]
    fn test_normalize_lines_splits_and_indexes() {
        let lines = normalize_lines(["Kredyt\n\nBANK S.A.", "  ", "01.02.2020"], &dialect());
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["Kredyt", "BANK S.A.", "01.02.2020"]);
        assert_eq!(lines[2].index, 2);
    }
}
