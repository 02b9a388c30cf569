//! Price extraction from raw markup fragments

use std::sync::OnceLock;

use regex::Regex;

/// A fare in whole currency units
pub type Fare = u32;

/// First digit run after a `$`, allowing thousands separators inside the run
fn price_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?s)\$.*?(\d[\d,]*)").expect("price pattern is a valid regex")
    })
}

/// Parse a raw price fragment such as `"$</sup>129"` into a fare.
///
/// Fragments without a currency-prefixed digit run fail rather than
/// reading as a zero fare, so callers can drop them from aggregation.
pub fn extract(raw: &str) -> Result<Fare, ParseFailure> {
    let captures = price_pattern()
        .captures(raw)
        .ok_or_else(|| ParseFailure::NoPrice(truncate(raw)))?;

    let digits: String = captures[1].chars().filter(|c| c.is_ascii_digit()).collect();

    digits
        .parse::<Fare>()
        .map_err(|_| ParseFailure::OutOfRange(digits))
}

fn truncate(raw: &str) -> String {
    const MAX: usize = 48;
    let trimmed = raw.trim();
    if trimmed.chars().count() <= MAX {
        trimmed.to_string()
    } else {
        let head: String = trimmed.chars().take(MAX).collect();
        format!("{}...", head)
    }
}

/// Extraction errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseFailure {
    #[error("No currency-prefixed price in fragment: {0:?}")]
    NoPrice(String),

    #[error("Price out of range: {0}")]
    OutOfRange(String),
}
