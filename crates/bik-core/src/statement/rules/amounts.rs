//! Amount tokenization and slot-aware conversion.

use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::trace;

use super::Line;
use super::dialect::Dialect;
use super::patterns::{DATE_ANY, DOT_GROUPED};
use crate::models::config::AmountLayout;
use crate::models::record::AmountSlot;

/// Number of amount columns per obligation.
pub const SLOT_COUNT: usize = 4;

/// One lexical amount token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountToken<'a> {
    /// "ND": value not available.
    NotAvailable,
    /// "BRAK": none.
    None,
    /// A numeral, without its currency marker.
    Numeral(&'a str),
}

/// Amounts of one block in slot order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockAmounts {
    /// Values for original amount, remaining balance, installment, overdue total.
    pub values: [Option<Decimal>; SLOT_COUNT],
    /// Tokens consumed from the lines below the anchor.
    pub continuation_lines: usize,
    /// Numerals that failed conversion.
    pub unparsed: usize,
}

impl BlockAmounts {
    pub fn get(&self, slot: AmountSlot) -> Option<Decimal> {
        self.values[slot.index()]
    }
}

/// Extract amount tokens from text in order. Dates are skipped.
pub fn tokenize<'a>(text: &'a str, dialect: &Dialect) -> Vec<AmountToken<'a>> {
    let dates: Vec<(usize, usize)> = DATE_ANY
        .find_iter(text)
        .map(|m| (m.start(), m.end()))
        .collect();

    dialect
        .amount_token()
        .captures_iter(text)
        .filter(|caps| {
            let Some(whole) = caps.get(0) else {
                return false;
            };
            !dates
                .iter()
                .any(|(s, e)| whole.start() < *e && *s < whole.end())
        })
        .filter_map(|caps| {
            if caps.name("na").is_some() {
                Some(AmountToken::NotAvailable)
            } else if caps.name("none").is_some() {
                Some(AmountToken::None)
            } else {
                caps.name("num").map(|m| AmountToken::Numeral(m.as_str()))
            }
        })
        .collect()
}

/// Whether a line holds nothing but amount tokens and punctuation.
pub fn is_amount_only(line: &str, dialect: &Dialect) -> bool {
    if DATE_ANY.is_match(line) || tokenize(line, dialect).is_empty() {
        return false;
    }
    dialect
        .amount_token()
        .replace_all(line, "")
        .chars()
        .all(|c| !c.is_alphanumeric())
}

/// Whether an amount-only line below the anchor continues its amount columns.
///
/// Every token must look like a money column: a sentinel, or a numeral with a
/// decimal part or a currency marker. A bare integer such as a page number is
/// not a continuation.
pub fn is_continuation(line: &str, dialect: &Dialect) -> bool {
    if !is_amount_only(line, dialect) {
        return false;
    }
    let decimal = dialect.config().decimal_separator;
    dialect.amount_token().captures_iter(line).all(|caps| {
        let Some(num) = caps.name("num") else {
            return true;
        };
        let has_currency = caps.get(0).is_some_and(|whole| whole.end() > num.end());
        has_currency || num.as_str().contains(decimal) || num.as_str().contains('.')
    })
}

/// Parse a numeral using the dialect's decimal separator.
///
/// Remaining group separators are removed. Returns `None` when the value does
/// not fit a `Decimal` or is otherwise malformed.
pub fn parse_numeral(raw: &str, dialect: &Dialect) -> Option<Decimal> {
    let decimal = dialect.config().decimal_separator;
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

    let (int_part, frac) = if let Some(pos) = compact.rfind(decimal) {
        (&compact[..pos], Some(&compact[pos + decimal.len_utf8()..]))
    } else if decimal != '.' && compact.contains('.') && !DOT_GROUPED.is_match(&compact) {
        let pos = compact.rfind('.')?;
        (&compact[..pos], Some(&compact[pos + 1..]))
    } else {
        (compact.as_str(), None)
    };

    let digits: String = int_part
        .chars()
        .filter(|c| !dialect.is_group_separator(*c))
        .collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let value = match frac {
        Some(f) if !f.is_empty() && f.chars().all(|c| c.is_ascii_digit()) => format!("{}.{}", digits, f),
        Some(_) => return None,
        None => digits,
    };

    Decimal::from_str(&value).ok()
}

/// Convert one token according to the slot it occupies.
pub fn parse_amount_token(token: &AmountToken<'_>, slot: AmountSlot, dialect: &Dialect) -> Option<Decimal> {
    match token {
        AmountToken::NotAvailable => None,
        AmountToken::None if dialect.none_is_zero(slot.index()) => Some(Decimal::ZERO),
        AmountToken::None => None,
        AmountToken::Numeral(raw) => parse_numeral(raw, dialect),
    }
}

/// Read up to four amounts for a block.
///
/// `rest` is the anchor line text after the date. With
/// [`AmountLayout::Wrapped`], amount-only lines directly below the anchor
/// (`following`) are read too until four tokens are found, as long as they
/// pass [`is_continuation`]. Missing slots stay
/// absent; tokens beyond the fourth are ignored.
pub fn parse_amounts(
    rest: &str,
    following: &[Line],
    layout: AmountLayout,
    dialect: &Dialect,
) -> BlockAmounts {
    let mut tokens = tokenize(rest, dialect);
    let mut continuation_lines = 0;

    if layout == AmountLayout::Wrapped {
        for line in following {
            if tokens.len() >= SLOT_COUNT || !is_continuation(&line.text, dialect) {
                break;
            }
            tokens.extend(tokenize(&line.text, dialect));
            continuation_lines += 1;
        }
    }

    let mut amounts = BlockAmounts {
        continuation_lines,
        ..BlockAmounts::default()
    };

    for (token, slot) in tokens.iter().zip(AmountSlot::ALL) {
        let value = parse_amount_token(token, slot, dialect);
        if value.is_none() {
            if let AmountToken::Numeral(raw) = token {
                trace!("Could not convert amount {:?} in slot {:?}", raw, slot);
                amounts.unparsed += 1;
            }
        }
        amounts.values[slot.index()] = value;
    }

    amounts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::DialectConfig;
    use pretty_assertions::assert_eq;
    use rust_decimal::prelude::ToPrimitive;

    fn dialect() -> Dialect {
        Dialect::new(&DialectConfig::default()).unwrap()
    }

    fn dec(s: &str) -> Option<Decimal> {
        Some(Decimal::from_str(s).unwrap())
    }

    fn lines(texts: &[&str]) -> Vec<Line> {
        texts.iter().enumerate().map(|(i, t)| Line::new(i, *t)).collect()
    }

    #[test]
    fn test_tokenize() {
        let d = dialect();
        let tokens = tokenize("10000,00 PLN 5 000,00 PLN nd BRAK", &d);
        assert_eq!(
            tokens,
            vec![
                AmountToken::Numeral("10000,00"),
                AmountToken::Numeral("5 000,00"),
                AmountToken::NotAvailable,
                AmountToken::None,
            ]
        );
    }

    #[test]
    fn test_tokenize_ignores_words_and_dates() {
        let d = dialect();
        assert!(tokenize("BRAKUJE NDA", &d).is_empty());
        assert_eq!(
            tokenize("31.12.2025 250,00 zł", &d),
            vec![AmountToken::Numeral("250,00")]
        );
    }

    #[test]
    fn test_parse_numeral() {
        let d = dialect();
        assert_eq!(parse_numeral("10000,00", &d), dec("10000.00"));
        assert_eq!(parse_numeral("1 234,56", &d), dec("1234.56"));
        assert_eq!(parse_numeral("1.234.567,89", &d), dec("1234567.89"));
        assert_eq!(parse_numeral("5000.50", &d), dec("5000.50"));
        assert_eq!(parse_numeral("5.000", &d), dec("5000"));
        assert_eq!(parse_numeral("0", &d), dec("0"));
        assert_eq!(parse_numeral("99999999999999999999999999999999", &d), None);
    }

    #[test]
    fn test_round_trip_grouped_amounts() {
        let d = dialect();
        for (int_part, int_part2, frac) in [(1, 234, 56), (12, 0, 5), (999, 999, 99), (7, 1, 10)] {
            let token = format!("{} {:03},{:02} PLN", int_part, int_part2, frac);
            let expected = (int_part * 1000 + int_part2) as f64 + frac as f64 / 100.0;

            let tokens = tokenize(&token, &d);
            assert_eq!(tokens.len(), 1, "token {:?}", token);
            let AmountToken::Numeral(raw) = tokens[0] else {
                panic!("expected numeral for {:?}", token);
            };
            let value = parse_numeral(raw, &d).unwrap().to_f64().unwrap();
            assert!((value - expected).abs() < 1e-9, "{} != {}", value, expected);
        }
    }

    #[test]
    fn test_sentinel_semantics() {
        let d = dialect();
        for slot in AmountSlot::ALL {
            assert_eq!(parse_amount_token(&AmountToken::NotAvailable, slot, &d), None);
        }
        assert_eq!(parse_amount_token(&AmountToken::None, AmountSlot::OriginalAmount, &d), None);
        assert_eq!(parse_amount_token(&AmountToken::None, AmountSlot::RemainingBalance, &d), None);
        assert_eq!(parse_amount_token(&AmountToken::None, AmountSlot::InstallmentAmount, &d), None);
        assert_eq!(
            parse_amount_token(&AmountToken::None, AmountSlot::OverdueTotal, &d),
            Some(Decimal::ZERO)
        );
    }

    #[test]
    fn test_none_as_zero_slots_configurable() {
        let config = DialectConfig {
            none_as_zero_slots: vec![2, 3],
            ..DialectConfig::default()
        };
        let d = Dialect::new(&config).unwrap();
        assert_eq!(
            parse_amount_token(&AmountToken::None, AmountSlot::InstallmentAmount, &d),
            Some(Decimal::ZERO)
        );
    }

    #[test]
    fn test_parse_amounts_pads_and_truncates() {
        let d = dialect();

        let amounts = parse_amounts("1000,00 PLN", &[], AmountLayout::SameLine, &d);
        assert_eq!(amounts.values, [dec("1000.00"), None, None, None]);

        let amounts = parse_amounts("1 2 3 4 5 6", &[], AmountLayout::SameLine, &d);
        assert_eq!(amounts.values, [dec("1"), dec("2"), dec("3"), dec("4")]);
    }

    #[test]
    fn test_wrapped_amounts() {
        let d = dialect();
        let following = lines(&["250,00 PLN BRAK", "Karta kredytowa", "100,00 PLN"]);

        let amounts = parse_amounts("10000,00 PLN 5000,00 PLN", &following, AmountLayout::Wrapped, &d);
        assert_eq!(
            amounts.values,
            [dec("10000.00"), dec("5000.00"), dec("250.00"), Some(Decimal::ZERO)]
        );
        assert_eq!(amounts.continuation_lines, 1);

        let amounts = parse_amounts("10000,00 PLN 5000,00 PLN", &following, AmountLayout::SameLine, &d);
        assert_eq!(amounts.values, [dec("10000.00"), dec("5000.00"), None, None]);
        assert_eq!(amounts.continuation_lines, 0);
    }

    #[test]
    fn test_wrapped_stops_at_text() {
        let d = dialect();
        let following = lines(&["Kredyt", "100,00"]);
        let amounts = parse_amounts("", &following, AmountLayout::Wrapped, &d);
        assert_eq!(amounts.values, [None, None, None, None]);
    }

    #[test]
    fn test_page_number_is_not_wrapped_into_amounts() {
        let d = dialect();
        let following = lines(&["2", "Karta kredytowa"]);

        let amounts = parse_amounts(
            "1000,00 PLN 500,00 PLN 100,00 PLN",
            &following,
            AmountLayout::Wrapped,
            &d,
        );
        assert_eq!(amounts.values, [dec("1000.00"), dec("500.00"), dec("100.00"), None]);
        assert_eq!(amounts.continuation_lines, 0);
    }

    #[test]
    fn test_is_continuation() {
        let d = dialect();
        assert!(is_continuation("250,00 PLN BRAK", &d));
        assert!(is_continuation("ND", &d));
        assert!(is_continuation("100 zł", &d));
        assert!(is_continuation("12.50", &d));
        assert!(!is_continuation("2", &d));
        assert!(!is_continuation("3 4", &d));
        assert!(!is_continuation("BANK 24", &d));
    }

    #[test]
    fn test_is_amount_only() {
        let d = dialect();
        assert!(is_amount_only("250,00 PLN BRAK", &d));
        assert!(is_amount_only("ND / ND", &d));
        assert!(!is_amount_only("BANK 24 S.A.", &d));
        assert!(!is_amount_only("01.02.2020 100,00", &d));
        assert!(!is_amount_only("PLN", &d));
    }

    #[test]
    fn test_unparsed_counted() {
        let d = dialect();
        let amounts = parse_amounts("99999999999999999999999999999999 ND", &[], AmountLayout::SameLine, &d);
        assert_eq!(amounts.values, [None, None, None, None]);
        assert_eq!(amounts.unparsed, 1);
    }
}
