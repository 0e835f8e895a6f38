//! Assembly and validation of bill records.

use std::path::{Path, PathBuf};

use crate::error::{BillError, Result};
use crate::models::bill::{BillRecord, ExtractedFields};

/// Records must be for a year after this one unless configured otherwise.
pub const DEFAULT_MIN_VALID_YEAR: i32 = 2000;

/// Builds a [`BillRecord`] from extracted fields and checks its invariant.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    fields: ExtractedFields,
    source_path: PathBuf,
    is_offered_period: bool,
    min_valid_year: i32,
}

impl RecordBuilder {
    pub fn new(fields: ExtractedFields) -> Self {
        Self {
            fields,
            source_path: PathBuf::new(),
            is_offered_period: false,
            min_valid_year: DEFAULT_MIN_VALID_YEAR,
        }
    }

    pub fn source_path(mut self, path: impl AsRef<Path>) -> Self {
        self.source_path = path.as_ref().to_path_buf();
        self
    }

    /// Classifier output.
    pub fn offered_period(mut self, offered: bool) -> Self {
        self.is_offered_period = offered;
        self
    }

    /// Exclusive lower bound for the year.
    pub fn min_valid_year(mut self, year: i32) -> Self {
        self.min_valid_year = year;
        self
    }

    pub fn build(self) -> Result<BillRecord> {
        if self.fields.period.trim().is_empty() {
            return Err(BillError::Validation {
                field: "period",
                reason: "period is empty".to_string(),
            });
        }
        if self.fields.month.trim().is_empty() {
            return Err(BillError::Validation {
                field: "month",
                reason: "month is empty".to_string(),
            });
        }
        if self.fields.year <= self.min_valid_year {
            return Err(BillError::Validation {
                field: "year",
                reason: format!("{} is not after {}", self.fields.year, self.min_valid_year),
            });
        }

        Ok(BillRecord::new(
            self.fields,
            self.is_offered_period,
            self.source_path,
        ))
    }
}
