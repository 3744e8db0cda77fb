// src/formatters.rs
use crate::types::FieldValue;

pub const CURRENCY: &str = "R$";
pub const PERCENTAGE: &str = "%";

/// Renders an extracted value for display next to its unit.
pub type Formatter = fn(&FieldValue) -> String;

pub fn fmt_currency(value: &FieldValue) -> String {
    format!("{}{}", CURRENCY, value)
}

pub fn fmt_percentage(value: &FieldValue) -> String {
    format!("{} {}", value, PERCENTAGE)
}
