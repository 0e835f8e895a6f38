//! Billing period extraction.

use super::patterns::PERIOD;
use super::{ExtractionMatch, FieldExtractor};
use crate::error::{ExtractionError, Stage};

/// Whitespace token positions inside a matched period.
const MONTH_TOKEN: usize = 1;
const YEAR_TOKEN: usize = 2;

/// Billing period split into its record fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingPeriod {
    /// Period exactly as matched.
    pub raw: String,
    /// Canonical month name (or the untranslated token).
    pub month: String,
    pub year: i32,
}

impl BillingPeriod {
    /// Split a matched period into month and year.
    pub fn parse(raw: &str) -> Result<Self, ExtractionError> {
        let tokens: Vec<&str> = raw.split_whitespace().collect();

        let month_token = tokens
            .get(MONTH_TOKEN)
            .ok_or_else(|| ExtractionError::missing(Stage::Period, "month"))?;
        let year_token = tokens
            .get(YEAR_TOKEN)
            .ok_or_else(|| ExtractionError::missing(Stage::Period, "year"))?;

        let year = year_token
            .parse::<i32>()
            .map_err(|_| ExtractionError::parse(Stage::Period, "year", *year_token))?;

        Ok(Self {
            raw: raw.to_string(),
            month: translate_month(month_token),
            year,
        })
    }
}

/// Period field extractor.
pub struct PeriodExtractor;

impl PeriodExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PeriodExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for PeriodExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        let m = PERIOD.captures(text)?.get(1)?;
        Some(
            ExtractionMatch::new(m.as_str().to_string(), m.as_str())
                .with_position(m.start(), m.end()),
        )
    }
}

/// Translate a 3-letter Portuguese month abbreviation to its English name.
///
/// Matching is case-insensitive. Unknown tokens are returned unchanged.
pub fn translate_month(abbrev: &str) -> String {
    let name = match abbrev.to_lowercase().as_str() {
        "jan" => "January",
        "fev" => "February",
        "mar" => "March",
        "abr" => "April",
        "mai" => "May",
        "jun" => "June",
        "jul" => "July",
        "ago" => "August",
        "set" => "September",
        "out" => "October",
        "nov" => "November",
        "dez" => "December",
        _ => return abbrev.to_string(),
    };
    name.to_string()
}
