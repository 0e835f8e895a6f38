//! Rule-based field extractors for utility bills.

pub mod amounts;
pub mod consumption;
pub mod financial;
pub mod patterns;
pub mod period;

pub use amounts::{format_decimal_comma, parse_decimal_comma, DecimalField};
pub use consumption::extract_consumption;
pub use financial::extract_financial;
pub use period::{translate_month, BillingPeriod, PeriodExtractor};

use tracing::warn;

use crate::error::{ExtractionError, Stage};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;
}

/// A matched field with its location in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Position in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}

/// What to do when a consumption or financial label is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingFieldPolicy {
    /// Use zero and note the field as defaulted.
    #[default]
    Zero,
    /// Fail the stage.
    Reject,
}

impl MissingFieldPolicy {
    pub fn from_zero_default(zero_default: bool) -> Self {
        if zero_default {
            MissingFieldPolicy::Zero
        } else {
            MissingFieldPolicy::Reject
        }
    }

    /// Resolve an optional match under this policy.
    pub(crate) fn resolve<T: Default>(
        &self,
        found: Option<T>,
        stage: Stage,
        field: &'static str,
        defaulted: &mut Vec<&'static str>,
    ) -> Result<T, ExtractionError> {
        match (found, self) {
            (Some(value), _) => Ok(value),
            (None, MissingFieldPolicy::Zero) => {
                warn!("No match for {} ({} stage), defaulting to zero", field, stage);
                defaulted.push(field);
                Ok(T::default())
            }
            (None, MissingFieldPolicy::Reject) => Err(ExtractionError::missing(stage, field)),
        }
    }
}
