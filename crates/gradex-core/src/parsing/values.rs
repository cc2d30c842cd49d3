use rust_decimal::Decimal;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid number '{0}'")]
pub struct InvalidNumber(pub String);

/// Parse a units or grade column into a Decimal.
///
/// Handles formats like:
/// - "3" -> 3
/// - "3.00" -> 3.00
/// - "1,75" -> 1.75 (decimal comma)
/// - "0.00" -> 0.00 (ongoing course, kept as-is)
pub fn parse_decimal(s: &str) -> Result<Decimal, InvalidNumber> {
    let s = s.trim();
    let normalized = s.replace(',', ".");
    Decimal::from_str(&normalized).map_err(|_| InvalidNumber(s.to_string()))
}

/// Collapse every run of whitespace (tabs included) into a single space.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
