//! Financial block extraction.

use rust_decimal::Decimal;

use super::amounts::DecimalField;
use super::patterns::{ENERGY_VALUE, TAXES_AND_FEES, TOTAL_AMOUNT};
use super::{FieldExtractor, MissingFieldPolicy};
use crate::error::{ExtractionError, Stage};
use crate::models::bill::Financial;

/// Extract energy value, taxes and the amount due.
pub fn extract_financial(
    text: &str,
    policy: MissingFieldPolicy,
    defaulted: &mut Vec<&'static str>,
) -> Result<Financial, ExtractionError> {
    let fields = [
        DecimalField::new("energyValue", &ENERGY_VALUE),
        DecimalField::new("taxesAndFees", &TAXES_AND_FEES),
        DecimalField::new("totalAmount", &TOTAL_AMOUNT),
    ];

    let mut values = [Decimal::ZERO; 3];
    for (field, slot) in fields.iter().zip(values.iter_mut()) {
        *slot = policy.resolve(
            field.extract(text).map(|m| m.value),
            Stage::Financial,
            field.name(),
            defaulted,
        )?;
    }
    let [energy_value, taxes_and_fees, total_amount] = values;

    Ok(Financial {
        energy_value,
        taxes_and_fees,
        total_amount,
    })
}
