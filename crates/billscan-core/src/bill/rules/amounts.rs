//! Decimal-comma amount parsing.

use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

use super::{ExtractionMatch, FieldExtractor};

/// A label-anchored decimal-comma field.
///
/// The regex must capture the numeric part in group 1.
pub struct DecimalField<'a> {
    name: &'static str,
    pattern: &'a Regex,
}

impl<'a> DecimalField<'a> {
    pub fn new(name: &'static str, pattern: &'a Regex) -> Self {
        Self { name, pattern }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl FieldExtractor for DecimalField<'_> {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        let caps = self.pattern.captures(text)?;
        let start = caps.get(0)?.start();
        let number = caps.get(1)?;
        Some(
            ExtractionMatch::new(
                parse_decimal_comma(number.as_str()),
                &text[start..number.end()],
            )
            .with_position(start, number.end()),
        )
    }
}

/// Parse a decimal-comma number (e.g. "0,150000" or "1.234,56").
///
/// Thousands separators are dropped and the comma becomes a period before
/// parsing. Anything unparsable, including the empty string, is zero.
pub fn parse_decimal_comma(s: &str) -> Decimal {
    let mut normalized = strip_grouping(s.trim());
    if normalized.contains(',') {
        normalized = normalized.replace('.', "").replace(',', ".");
    }
    Decimal::from_str(&normalized).unwrap_or(Decimal::ZERO)
}

/// Drop space and NBSP digit grouping ("12 500" -> "12500").
pub fn strip_grouping(s: &str) -> String {
    s.replace([' ', '\u{00a0}'], "")
}

/// Format an amount with a decimal comma and two fractional digits.
pub fn format_decimal_comma(amount: Decimal) -> String {
    format!("{:.2}", amount).replace('.', ",")
}
