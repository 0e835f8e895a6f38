//! Rule-based bill parser running the extraction stages in order.

use std::time::Instant;

use tracing::{debug, info};

use crate::models::bill::ExtractedFields;

use super::rules::{
    consumption::extract_consumption,
    financial::extract_financial,
    period::{BillingPeriod, PeriodExtractor},
    FieldExtractor, MissingFieldPolicy,
};
use super::Result;
use crate::error::{ExtractionError, Stage};

/// Result of bill extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted fields.
    pub fields: ExtractedFields,
    /// Consumption and financial fields that were absent and set to zero.
    pub defaulted: Vec<&'static str>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for bill parsing.
pub trait BillParser {
    /// Parse bill fields from page text.
    fn parse(&self, text: &str) -> Result<ExtractionResult>;
}

/// Parser matching label-anchored patterns: period, then consumption, then financial.
#[derive(Debug, Clone, Default)]
pub struct BillTextParser {
    missing_fields: MissingFieldPolicy,
}

impl BillTextParser {
    /// Create a parser that defaults missing amounts to zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the policy for absent consumption and financial fields.
    pub fn with_missing_field_policy(mut self, policy: MissingFieldPolicy) -> Self {
        self.missing_fields = policy;
        self
    }

    pub fn missing_field_policy(&self) -> MissingFieldPolicy {
        self.missing_fields
    }
}

impl BillParser for BillTextParser {
    fn parse(&self, text: &str) -> Result<ExtractionResult> {
        let start = Instant::now();
        let mut defaulted = Vec::new();

        info!("Parsing bill from {} characters of text", text.len());

        // Without a period there is no month or year, so nothing else is worth reading.
        let raw_period = PeriodExtractor::new()
            .extract(text)
            .ok_or_else(|| ExtractionError::missing(Stage::Period, "period"))?;
        let period = BillingPeriod::parse(&raw_period.value)?;
        debug!("Found period {:?} -> {} {}", period.raw, period.month, period.year);

        let consumption = extract_consumption(text, self.missing_fields, &mut defaulted)?;
        let financial = extract_financial(text, self.missing_fields, &mut defaulted)?;

        debug!(
            "Extracted {} units, total {} ({} fields defaulted)",
            consumption.total_units(),
            financial.total_amount,
            defaulted.len()
        );

        Ok(ExtractionResult {
            fields: ExtractedFields {
                period: period.raw,
                month: period.month,
                year: period.year,
                consumption,
                financial,
            },
            defaulted,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }
}
