//! Consumption block extraction.

use super::amounts::{strip_grouping, DecimalField};
use super::patterns::{BASE_PRICE, DISCOUNT_VALUE, TOTAL_UNITS};
use super::{FieldExtractor, MissingFieldPolicy};
use crate::error::{ExtractionError, Stage};
use crate::models::bill::Consumption;

/// Extract units, base price and discount.
///
/// Names of fields that fell back to zero are appended to `defaulted`.
pub fn extract_consumption(
    text: &str,
    policy: MissingFieldPolicy,
    defaulted: &mut Vec<&'static str>,
) -> Result<Consumption, ExtractionError> {
    let units = match TOTAL_UNITS.captures(text) {
        Some(caps) => Some(
            strip_grouping(&caps[1])
                .replace('.', "")
                .parse::<u32>()
                .map_err(|_| ExtractionError::parse(Stage::Consumption, "totalUnits", &caps[1]))?,
        ),
        None => None,
    };
    let total_units = policy.resolve(units, Stage::Consumption, "totalUnits", defaulted)?;

    let base_price_field = DecimalField::new("basePrice", &BASE_PRICE);
    let base_price = policy.resolve(
        base_price_field.extract(text).map(|m| m.value),
        Stage::Consumption,
        base_price_field.name(),
        defaulted,
    )?;

    let discount_field = DecimalField::new("discountValue", &DISCOUNT_VALUE);
    let discount_value = policy.resolve(
        discount_field.extract(text).map(|m| m.value),
        Stage::Consumption,
        discount_field.name(),
        defaulted,
    )?;

    Ok(Consumption::new(total_units, base_price, discount_value))
}
