//! Flexible date parsing
//!
//! Every date that crosses the system boundary arrives as text in one of a
//! small set of formats, with the Brazilian `DD/MM/YYYY` as the canonical
//! one.

use crate::error::{RateError, Result};
use chrono::NaiveDate;

/// Accepted input date formats, tried in order
pub const ACCEPTED_FORMATS: &[&str] = &["%d/%m/%Y", "%Y-%m-%d", "%d-%m-%Y"];

/// Parse a date string, trying each accepted format in turn.
///
/// # Examples
/// ```
/// use servfaz_selic::parse_flex_date;
///
/// let a = parse_flex_date("01/03/2025").unwrap();
/// let b = parse_flex_date("2025-03-01").unwrap();
/// assert_eq!(a, b);
/// assert!(parse_flex_date("not-a-date").is_err());
/// ```
pub fn parse_flex_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    for fmt in ACCEPTED_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date);
        }
    }
    Err(RateError::DateParse(s.to_string()))
}
