//! Validation and normalization of submitted menu item fields.
//!
//! Every entry point that creates or edits a menu item (the HTML forms and
//! the JSON API) runs its raw input through [`normalize`] before anything
//! reaches storage. Checks run in a fixed order: name, price format, price
//! sign. The first failing check decides the error.

use thiserror::Error;

/// A price exactly as it was submitted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawPrice<'a> {
    /// Text from a form field or a JSON string, possibly with a `$` marker.
    Text(&'a str),
    /// A JSON number.
    Number(f64),
    /// Field absent, `null`, or a JSON value that is neither text nor number.
    Missing,
}

impl<'a> From<&'a str> for RawPrice<'a> {
    fn from(value: &'a str) -> Self {
        RawPrice::Text(value)
    }
}

impl<'a> From<&'a String> for RawPrice<'a> {
    fn from(value: &'a String) -> Self {
        RawPrice::Text(value.as_str())
    }
}

impl<'a> From<Option<&'a str>> for RawPrice<'a> {
    fn from(value: Option<&'a str>) -> Self {
        value.map_or(RawPrice::Missing, RawPrice::Text)
    }
}

impl From<f64> for RawPrice<'_> {
    fn from(value: f64) -> Self {
        RawPrice::Number(value)
    }
}

impl From<i64> for RawPrice<'_> {
    fn from(value: i64) -> Self {
        RawPrice::Number(value as f64)
    }
}

impl<'a> From<&'a serde_json::Value> for RawPrice<'a> {
    fn from(value: &'a serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(text) => RawPrice::Text(text),
            serde_json::Value::Number(number) => {
                number.as_f64().map_or(RawPrice::Missing, RawPrice::Number)
            }
            _ => RawPrice::Missing,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    NameMissing,
    #[error("price must be a number")]
    InvalidPrice,
    #[error("price must be positive")]
    NegativePrice,
}

impl ValidationError {
    pub fn code(self) -> crate::error::ErrorCode {
        use crate::error::ErrorCode;
        match self {
            ValidationError::NameMissing => ErrorCode::NameMissing,
            ValidationError::InvalidPrice => ErrorCode::InvalidPrice,
            ValidationError::NegativePrice => ErrorCode::NegativePrice,
        }
    }
}

/// A menu item payload that passed validation and may be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedItem {
    pub name: String,
    pub price: f64,
}

/// Validates a submitted dish name and price.
///
/// The name is trimmed and must not end up empty. The price is cleaned (one
/// leading `$` removed, whitespace trimmed), parsed as a plain decimal with
/// `.` as separator and must be greater than zero once rounded to cents.
pub fn normalize<'a>(
    raw_name: &str,
    raw_price: impl Into<RawPrice<'a>>,
) -> Result<NormalizedItem, ValidationError> {
    let name = raw_name.trim();
    if name.is_empty() {
        return Err(ValidationError::NameMissing);
    }

    let price = match raw_price.into() {
        RawPrice::Text(text) => parse_price_text(text)?,
        RawPrice::Number(value) if value.is_finite() => value,
        RawPrice::Number(_) | RawPrice::Missing => return Err(ValidationError::InvalidPrice),
    };

    Ok(NormalizedItem {
        name: name.to_string(),
        price: positive_cents(price)?,
    })
}

fn parse_price_text(text: &str) -> Result<f64, ValidationError> {
    let trimmed = text.trim();
    let cleaned = trimmed.strip_prefix('$').unwrap_or(trimmed).trim();
    if cleaned.is_empty() || !is_plain_decimal(cleaned) {
        return Err(ValidationError::InvalidPrice);
    }

    let value: f64 = cleaned
        .parse()
        .map_err(|_| ValidationError::InvalidPrice)?;
    if !value.is_finite() {
        return Err(ValidationError::InvalidPrice);
    }
    Ok(value)
}

/// Optional sign, then digits with at most one `.`. No exponents, no
/// `inf`/`nan`, no grouping separators.
fn is_plain_decimal(text: &str) -> bool {
    let unsigned = text.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(text);
    let mut digits = 0usize;
    let mut dots = 0usize;
    for c in unsigned.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return false,
        }
    }
    digits > 0 && dots <= 1
}

// Prices are stored with two fractional digits, so a value that rounds to
// zero cents is not positive.
fn positive_cents(value: f64) -> Result<f64, ValidationError> {
    if value <= 0.0 {
        return Err(ValidationError::NegativePrice);
    }
    let scaled = (value * 100.0).round();
    if !scaled.is_finite() {
        return Ok(value);
    }
    if scaled <= 0.0 {
        return Err(ValidationError::NegativePrice);
    }
    Ok(scaled / 100.0)
}

#[cfg(test)]
#[path = "tests/normalize_tests.rs"]
mod tests;
