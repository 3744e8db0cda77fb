// src/parsers.rs
//! Text-to-value converters applied to raw selector matches.
//!
//! Numbers on the site use the Brazilian convention: `.` groups thousands and
//! `,` marks decimals, optionally prefixed by `R$` or suffixed by `%`.
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::types::FieldValue;

static NUMBER_NOISE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"R\$|%|\.").expect("Failed to compile number noise regex"));

static CURRENCY_AMOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+(?:,\d+)?").expect("Failed to compile currency amount regex"));

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("not a number: {0:?}")]
    InvalidNumber(String),

    #[error("no amount found in {0:?}")]
    NoAmount(String),

    #[error("missing `-` separated segment in {0:?}")]
    MissingSegment(String),

    #[error("expected text, got {0}")]
    NotText(&'static str),
}

/// One step of a field's transform chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    Number,
    Currency,
    Ticker,
    Name,
}

impl Transform {
    pub fn apply(self, value: FieldValue) -> Result<FieldValue, ParseError> {
        let text = match value {
            FieldValue::Text(text) => text,
            other => return Err(ParseError::NotText(other.kind_name())),
        };

        match self {
            Self::Number => number_parser(&text),
            Self::Currency => currency_parser(&text).map(FieldValue::Float),
            Self::Ticker => Ok(FieldValue::Text(ticker_parser(&text))),
            Self::Name => name_parser(&text).map(FieldValue::Text),
        }
    }
}

/// Integer unless a decimal comma survives stripping, then float.
pub fn number_parser(value: &str) -> Result<FieldValue, ParseError> {
    let stripped = NUMBER_NOISE.replace_all(value, "");
    let stripped = stripped.trim();

    if stripped.contains(',') {
        stripped
            .replace(',', ".")
            .parse::<f64>()
            .map(FieldValue::Float)
            .map_err(|_| ParseError::InvalidNumber(value.to_string()))
    } else {
        stripped
            .parse::<i64>()
            .map(FieldValue::Integer)
            .map_err(|_| ParseError::InvalidNumber(value.to_string()))
    }
}

/// First `digits[,digits]` run as a float, thousands separators ignored.
pub fn currency_parser(value: &str) -> Result<f64, ParseError> {
    let stripped = value.replace('.', "");
    let amount = CURRENCY_AMOUNT
        .find(&stripped)
        .ok_or_else(|| ParseError::NoAmount(value.to_string()))?;

    amount
        .as_str()
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|_| ParseError::InvalidNumber(value.to_string()))
}

/// `"FLRY3 - Fleury S.A."` -> `"FLRY3"`
pub fn ticker_parser(value: &str) -> String {
    value.split('-').next().unwrap_or_default().trim().to_string()
}

/// `"FLRY3 - Fleury S.A."` -> `"Fleury S.A."`
pub fn name_parser(value: &str) -> Result<String, ParseError> {
    value
        .split('-')
        .nth(1)
        .map(|name| name.trim().to_string())
        .ok_or_else(|| ParseError::MissingSegment(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_with_decimal_comma_is_float() {
        assert_eq!(number_parser("1.234,56"), Ok(FieldValue::Float(1234.56)));
        assert_eq!(number_parser("R$ 1.234,56"), Ok(FieldValue::Float(1234.56)));
        assert_eq!(number_parser("4,87%"), Ok(FieldValue::Float(4.87)));
        assert_eq!(number_parser("-12,34"), Ok(FieldValue::Float(-12.34)));
    }

    #[test]
    fn number_without_decimal_comma_is_integer() {
        assert_eq!(number_parser("1234"), Ok(FieldValue::Integer(1234)));
        assert_eq!(number_parser("1.234"), Ok(FieldValue::Integer(1234)));
        assert_eq!(number_parser(" 12.345.678 "), Ok(FieldValue::Integer(12_345_678)));
    }

    #[test]
    fn number_placeholder_dash_fails() {
        assert!(matches!(number_parser("-"), Err(ParseError::InvalidNumber(_))));
        assert!(number_parser("").is_err());
        assert!(number_parser("n/a").is_err());
    }

    #[test]
    fn currency_takes_first_amount() {
        assert_eq!(currency_parser("R$ 1.234,56"), Ok(1234.56));
        assert_eq!(currency_parser("R$ 16,45 (+2,10%)"), Ok(16.45));
        assert_eq!(currency_parser("300"), Ok(300.0));
    }

    #[test]
    fn currency_without_digits_fails() {
        assert_eq!(
            currency_parser("no digits here"),
            Err(ParseError::NoAmount("no digits here".into()))
        );
    }

    #[test]
    fn heading_splits_into_ticker_and_name() {
        assert_eq!(ticker_parser(" FLRY3 - Fleury S.A. "), "FLRY3");
        assert_eq!(name_parser(" FLRY3 - Fleury S.A. ").as_deref(), Ok("Fleury S.A."));
    }

    #[test]
    fn name_needs_a_separator() {
        assert_eq!(ticker_parser("FLRY3"), "FLRY3");
        assert!(name_parser("FLRY3").is_err());
    }

    #[test]
    fn transforms_reject_non_text_input() {
        let err = Transform::Number.apply(FieldValue::Integer(3)).unwrap_err();
        assert_eq!(err, ParseError::NotText("integer"));
    }

    #[test]
    fn transform_dispatches_to_parser() {
        assert_eq!(
            Transform::Currency.apply("R$ 10,50".into()),
            Ok(FieldValue::Float(10.5))
        );
        assert_eq!(
            Transform::Ticker.apply("LREN3 - Lojas Renner".into()),
            Ok(FieldValue::Text("LREN3".into()))
        );
        assert_eq!(
            Transform::Name.apply("LREN3 - Lojas Renner".into()),
            Ok(FieldValue::Text("Lojas Renner".into()))
        );
    }
}
