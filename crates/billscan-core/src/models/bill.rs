//! Bill record data model.

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Serialize;

/// A validated utility bill.
///
/// Only [`RecordBuilder`](crate::record::RecordBuilder) creates these, after the
/// validity check has passed; there are no mutators.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillRecord {
    period: String,
    month: String,
    year: i32,
    is_offered_period: bool,
    consumption: Consumption,
    financial: Financial,
    source_path: PathBuf,
}

impl BillRecord {
    pub(crate) fn new(
        fields: ExtractedFields,
        is_offered_period: bool,
        source_path: PathBuf,
    ) -> Self {
        Self {
            period: fields.period,
            month: fields.month,
            year: fields.year,
            is_offered_period,
            consumption: fields.consumption,
            financial: fields.financial,
            source_path,
        }
    }

    /// Billing period exactly as it appears in the document.
    pub fn period(&self) -> &str {
        &self.period
    }

    /// Canonical English month name.
    pub fn month(&self) -> &str {
        &self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Whether the period was free of charge.
    pub fn is_offered_period(&self) -> bool {
        self.is_offered_period
    }

    pub fn consumption(&self) -> &Consumption {
        &self.consumption
    }

    pub fn financial(&self) -> &Financial {
        &self.financial
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }
}

/// Consumption block of a bill.
///
/// `price_after_discount` is always `base_price - discount_value`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Consumption {
    total_units: u32,
    base_price: Decimal,
    discount_value: Decimal,
    price_after_discount: Decimal,
}

impl Consumption {
    pub fn new(total_units: u32, base_price: Decimal, discount_value: Decimal) -> Self {
        Self {
            total_units,
            base_price,
            discount_value,
            price_after_discount: base_price - discount_value,
        }
    }

    /// Consumed units (kWh).
    pub fn total_units(&self) -> u32 {
        self.total_units
    }

    /// Unit price before discount.
    pub fn base_price(&self) -> Decimal {
        self.base_price
    }

    pub fn discount_value(&self) -> Decimal {
        self.discount_value
    }

    pub fn price_after_discount(&self) -> Decimal {
        self.price_after_discount
    }
}

/// Financial totals of a bill.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Financial {
    /// Charge for the energy itself.
    pub energy_value: Decimal,
    /// Taxes, levies and fees.
    pub taxes_and_fees: Decimal,
    /// Amount due.
    pub total_amount: Decimal,
}

/// Fields recovered from document text, before classification and validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedFields {
    pub period: String,
    pub month: String,
    pub year: i32,
    pub consumption: Consumption,
    pub financial: Financial,
}
