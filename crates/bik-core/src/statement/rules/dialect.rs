//! Compiled form of a report dialect.

use regex::Regex;

use crate::error::{BikError, Result};
use crate::models::config::DialectConfig;

/// Dialect literals plus the regexes derived from them.
///
/// Built once per parser; every rule that needs separators, sentinels or
/// currency markers reads them from here.
#[derive(Debug, Clone)]
pub struct Dialect {
    config: DialectConfig,
    amount_token: Regex,
    noise: Vec<String>,
    legend: Vec<String>,
}

impl Dialect {
    /// Validate the configuration and compile its patterns.
    pub fn new(config: &DialectConfig) -> Result<Self> {
        validate(config)?;

        let na = regex::escape(&config.not_available);
        let none = regex::escape(&config.none);
        let markers: Vec<String> = config
            .currency_markers
            .iter()
            .filter(|m| !m.trim().is_empty())
            .map(|m| regex::escape(m.trim()))
            .collect();

        let currency = if markers.is_empty() {
            String::new()
        } else {
            format!(r"(?:\s*(?:{}))?", markers.join("|"))
        };

        let grouped = if config.thousands_separators.is_empty() {
            String::new()
        } else {
            format!(r"\d{{1,3}}(?:{}\d{{3}})+|", char_class(&config.thousands_separators))
        };
        let decimal = char_class(&[config.decimal_separator, '.']);

        let amount_token = format!(
            r"(?i)(?:\b(?P<na>{na})\b|\b(?P<none>{none})\b|\b(?P<num>(?:{grouped}\d+)(?:{decimal}\d+)?)){currency}"
        );

        let noise = [config.not_available.as_str(), config.none.as_str()]
            .into_iter()
            .chain(config.currency_markers.iter().map(String::as_str))
            .map(|w| w.trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();

        let legend = config
            .legend_keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        Ok(Self {
            config: config.clone(),
            amount_token: compile(&amount_token)?,
            noise,
            legend,
        })
    }

    /// Source configuration.
    pub fn config(&self) -> &DialectConfig {
        &self.config
    }

    /// Matches one amount token (`ND`, `BRAK` or a numeral with optional currency).
    pub fn amount_token(&self) -> &Regex {
        &self.amount_token
    }

    /// Whether a whitespace-separated word is a sentinel or currency marker.
    ///
    /// Surrounding punctuation is ignored, so `PLN,` counts as `PLN`. Markers
    /// made of symbols such as `€` match as whole words.
    pub fn is_noise_word(&self, word: &str) -> bool {
        let lower = word.to_lowercase();
        let core = lower.trim_matches(|c: char| !c.is_alphanumeric());
        self.noise.iter().any(|n| *n == lower || (!core.is_empty() && *n == core))
    }

    /// Whether the line contains a column legend keyword.
    pub fn is_legend(&self, line: &str) -> bool {
        let lower = line.to_lowercase();
        self.legend.iter().any(|k| lower.contains(k.as_str()))
    }

    /// Whether `c` groups thousands in this dialect.
    pub fn is_group_separator(&self, c: char) -> bool {
        self.config.thousands_separators.contains(&c)
    }

    /// Whether the "none" literal reads as zero in the given slot.
    pub fn none_is_zero(&self, slot: usize) -> bool {
        self.config.none_as_zero_slots.contains(&slot)
    }
}

fn validate(config: &DialectConfig) -> Result<()> {
    if config.not_available.trim().is_empty() || config.none.trim().is_empty() {
        return Err(BikError::Config("sentinel literals must not be empty".to_string()));
    }
    if config.not_available.eq_ignore_ascii_case(&config.none) {
        return Err(BikError::Config(format!(
            "sentinel literals must differ, both are {:?}",
            config.none
        )));
    }
    if config.decimal_separator.is_alphanumeric() {
        return Err(BikError::Config(format!(
            "invalid decimal separator {:?}",
            config.decimal_separator
        )));
    }
    if let Some(c) = config
        .thousands_separators
        .iter()
        .find(|c| c.is_alphanumeric() || **c == config.decimal_separator)
    {
        return Err(BikError::Config(format!("invalid thousands separator {:?}", c)));
    }
    if let Some(slot) = config.none_as_zero_slots.iter().find(|s| **s > 3) {
        return Err(BikError::Config(format!("amount slot {} out of range 0-3", slot)));
    }
    Ok(())
}

fn char_class(chars: &[char]) -> String {
    let mut class = String::from("[");
    for c in chars {
        class.push_str(&regex::escape(&c.to_string()));
    }
    class.push(']');
    class
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| BikError::Config(format!("invalid dialect pattern: {}", e)))
}
