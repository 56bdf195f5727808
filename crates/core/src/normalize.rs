//! Field normalization for raw export cells.
//!
//! Search Console exports ship CTR as either a bare number or a
//! `%`-suffixed string, counts occasionally with thousands separators,
//! and dates in ISO form. Each parser here returns the normalized
//! value or a structured error; a failed parse is never coerced to
//! zero.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::limits::{MAX_CTR, MAX_POSITION};

/// Why a cell failed to normalize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseError {
    #[error("empty value")]
    Empty,
    #[error("not a number")]
    NotANumber,
    #[error("out of range")]
    OutOfRange,
    #[error("unrecognized date format")]
    BadDateFormat,
}

/// Accepted date formats, tried in order. ISO is what GSC exports;
/// the long form shows up in spreadsheets re-saved by hand.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%b %d, %Y"];

/// Parse a CTR cell into a float percentage in [0, 100].
///
/// `"25.0%"` and `"25.0"` both normalize to `25.0`; for bare numeric
/// input the parse is the identity.
pub fn parse_ctr(raw: &str) -> Result<f64, ParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }

    let body = trimmed
        .strip_suffix('%')
        .map(str::trim_end)
        .unwrap_or(trimmed);

    let value: f64 = body.parse().map_err(|_| ParseError::NotANumber)?;
    if !value.is_finite() {
        return Err(ParseError::NotANumber);
    }
    if !(0.0..=MAX_CTR).contains(&value) {
        return Err(ParseError::OutOfRange);
    }
    Ok(value)
}

/// Parse a date cell into a calendar date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, ParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .ok_or(ParseError::BadDateFormat)
}

/// Parse a clicks/impressions cell into a count.
///
/// Thousands separators are tolerated (`"1,234"`).
pub fn parse_count(raw: &str) -> Result<u64, ParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }

    let digits: String = trimmed.replace(',', "");
    digits.parse().map_err(|_| ParseError::NotANumber)
}

/// Parse an average-position cell into a positive float.
pub fn parse_position(raw: &str) -> Result<f64, ParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }

    let value: f64 = trimmed.parse().map_err(|_| ParseError::NotANumber)?;
    if !value.is_finite() {
        return Err(ParseError::NotANumber);
    }
    if value <= 0.0 || value > MAX_POSITION {
        return Err(ParseError::OutOfRange);
    }
    Ok(value)
}
