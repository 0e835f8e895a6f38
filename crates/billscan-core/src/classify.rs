//! Offered (promotional, zero-cost) period classification.

use crate::models::bill::{Consumption, Financial};

/// Labels bills print on promotional periods.
pub const DEFAULT_OFFERED_KEYWORDS: &[&str] = &[
    "oferta",
    "gratuito",
    "gratuita",
    "promoção",
    "promocional",
];

/// Decides whether a billing period cost the consumer nothing.
#[derive(Debug, Clone)]
pub struct OfferedPeriodClassifier {
    /// Lowercased keywords.
    keywords: Vec<String>,
}

impl OfferedPeriodClassifier {
    pub fn new() -> Self {
        Self::with_keywords(DEFAULT_OFFERED_KEYWORDS.iter().copied())
    }

    pub fn with_keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// Offered if the text carries a promotional label, or nothing is owed for
    /// a period with real usage.
    pub fn classify(&self, text: &str, financial: &Financial, consumption: &Consumption) -> bool {
        self.has_keyword(text)
            || (financial.total_amount.is_zero() && consumption.total_units() > 0)
    }

    fn has_keyword(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.keywords.iter().any(|k| text.contains(k.as_str()))
    }
}

impl Default for OfferedPeriodClassifier {
    fn default() -> Self {
        Self::new()
    }
}
