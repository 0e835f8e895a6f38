//! Common regex patterns for utility bill extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Billing period: "01 Jan 2025 to 31 Jan 2025" (or the local "a" connective).
    // Group 1 is the period; the next character may be a letter when text
    // extraction glues lines together.
    pub static ref PERIOD: Regex = Regex::new(
        r"(?i)(?:^|[^\d])(\d{2}\s+\p{L}{3}\s+\d{4}\s+(?:to|a)\s+\d{2}\s+\p{L}{3}\s+\d{4})(?:[^\d]|$)"
    ).unwrap();

    // Consumption block. Integer parts may be grouped with '.', space or NBSP.
    pub static ref TOTAL_UNITS: Regex = Regex::new(
        r"(?i)consumo\s+total[\s:]*(\d+(?:[. \u{00a0}]\d{3})*)(?:[^\d]|$)"
    ).unwrap();

    pub static ref BASE_PRICE: Regex = Regex::new(
        r"(?i)pre[çc]o\s+(?:unit[áa]rio|base)[\s:]*(\d+(?:[. \u{00a0}]\d{3})*,\d+)"
    ).unwrap();

    pub static ref DISCOUNT_VALUE: Regex = Regex::new(
        r"(?i)desconto[\s:]*(\d+(?:[. \u{00a0}]\d{3})*,\d+)"
    ).unwrap();

    // Financial block (two fractional digits)
    pub static ref ENERGY_VALUE: Regex = Regex::new(
        r"(?i)valor\s+(?:da\s+)?energia[\s:]*(\d+(?:[. \u{00a0}]\d{3})*,\d{2})(?:[^\d]|$)"
    ).unwrap();

    pub static ref TAXES_AND_FEES: Regex = Regex::new(
        r"(?i)taxas\s+e\s+impostos[\s:]*(\d+(?:[. \u{00a0}]\d{3})*,\d{2})(?:[^\d]|$)"
    ).unwrap();

    pub static ref TOTAL_AMOUNT: Regex = Regex::new(
        r"(?i)total\s+a\s+pagar[\s:]*(\d+(?:[. \u{00a0}]\d{3})*,\d{2})(?:[^\d]|$)"
    ).unwrap();
}
