//! Calendar-month keys and correction-window derivation

use crate::error::{RateError, Result};
use chrono::{Datelike, NaiveDate};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A calendar month, keyed `YYYY-MM`.
///
/// Derives `Ord` so that chronological order and key order coincide, which
/// keeps the persisted cache sorted and window derivation comparable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    /// Calendar year
    pub year: i32,
    /// Calendar month, 1..=12
    pub month: u32,
}

impl MonthKey {
    /// Create a month key, validating the month number
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(RateError::InvalidMonth(format!("{}-{}", year, month)));
        }
        Ok(Self { year, month })
    }

    /// The month a date falls in
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The following calendar month, wrapping December into January
    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// The first day of the month, in the canonical `DD/MM/YYYY` input form.
    ///
    /// This is the probe string handed to [`RateLookup::ensure`] when a
    /// month has to be fetched on demand.
    ///
    /// [`RateLookup::ensure`]: crate::lookup::RateLookup::ensure
    pub fn first_day_br(&self) -> String {
        format!("01/{:02}/{:04}", self.month, self.year)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = RateError;

    fn from_str(s: &str) -> Result<Self> {
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| RateError::InvalidMonth(s.to_string()))?;
        let year: i32 = year
            .parse()
            .map_err(|_| RateError::InvalidMonth(s.to_string()))?;
        let month: u32 = month
            .parse()
            .map_err(|_| RateError::InvalidMonth(s.to_string()))?;
        Self::new(year, month)
    }
}

// Month keys serialize as their display string so the persisted cache is a
// plain `{"YYYY-MM": rate}` JSON object.
impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        struct MonthKeyVisitor;

        impl Visitor<'_> for MonthKeyVisitor {
            type Value = MonthKey;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a month key of the form YYYY-MM")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<MonthKey, E> {
                v.parse().map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_str(MonthKeyVisitor)
    }
}

/// The ordered correction window: every month strictly after `baseline`'s
/// month, up to and including `target`'s month.
///
/// The baseline's own month is never part of the window. A target inside
/// the baseline month yields an empty window.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use servfaz_selic::month_window;
///
/// let baseline = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
/// let target = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
/// let window: Vec<String> = month_window(baseline, target)
///     .iter()
///     .map(|m| m.to_string())
///     .collect();
/// assert_eq!(window, ["2025-02", "2025-03"]);
/// ```
pub fn month_window(baseline: NaiveDate, target: NaiveDate) -> Vec<MonthKey> {
    let last = MonthKey::from_date(target);
    let mut months = Vec::new();
    let mut cursor = MonthKey::from_date(baseline);

    loop {
        cursor = cursor.next();
        if cursor > last {
            break;
        }
        months.push(cursor);
    }

    months
}
