//! Cell value types and the coercion into table values

use crate::block::TableValue;
use chrono::NaiveDate;
use std::fmt;

/// Substring of a number format string that marks a cell as percent-styled
/// (e.g. `0.00%`). The grid stores the displayed percentage, so numeric
/// values from such cells are divided by 100 on read.
pub const PERCENT_MARKER: char = '%';

/// Represents the value stored in a cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Empty cell (no value)
    Empty,

    /// Numeric value (all numbers stored as f64)
    Number(f64),

    /// String value
    Text(String),

    /// Calendar date value
    Date(NaiveDate),
}

impl CellValue {
    /// Create a new text value
    pub fn text<S: Into<String>>(s: S) -> Self {
        CellValue::Text(s.into())
    }

    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Check whether the cell is empty or contains only whitespace
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Try to get the value as a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get the value as a string
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Try to get the value as a date
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            CellValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Get the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Empty => "empty",
            CellValue::Number(_) => "number",
            CellValue::Text(_) => "text",
            CellValue::Date(_) => "date",
        }
    }

    /// The cell's display text, trimmed. Empty cells yield `""`.
    ///
    /// This is what sentinel matching and title extraction operate on.
    pub fn display_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }

    /// Coerce this cell into a [`TableValue`] under the typing rule:
    ///
    /// - empty or whitespace-only cells become [`TableValue::Null`], never 0
    /// - numeric cells in percent-formatted cells are divided by 100
    ///   (the grid stores the displayed percentage, not the fraction)
    /// - date cells become ISO-8601 text
    pub fn to_table_value(&self, percent_format: bool) -> TableValue {
        match self {
            CellValue::Empty => TableValue::Null,
            CellValue::Number(n) => {
                if percent_format && *n != 0.0 {
                    TableValue::Number(n / 100.0)
                } else {
                    TableValue::Number(*n)
                }
            }
            CellValue::Text(s) => {
                if s.trim().is_empty() {
                    TableValue::Null
                } else {
                    TableValue::Text(s.clone())
                }
            }
            CellValue::Date(d) => TableValue::Text(d.format("%Y-%m-%d").to_string()),
        }
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Empty
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => write!(f, ""),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::text(s)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(d: NaiveDate) -> Self {
        CellValue::Date(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_detection() {
        assert!(CellValue::Empty.is_blank());
        assert!(CellValue::text("   ").is_blank());
        assert!(!CellValue::text("x").is_blank());
        assert!(!CellValue::Number(0.0).is_blank());
    }

    #[test]
    fn test_percent_coercion() {
        // Underlying 20 in a percent-formatted cell is exposed as 0.20
        let v = CellValue::Number(20.0).to_table_value(true);
        assert_eq!(v, TableValue::Number(0.20));

        // The same value without percent formatting passes through
        let v = CellValue::Number(20.0).to_table_value(false);
        assert_eq!(v, TableValue::Number(20.0));

        // Zero stays zero either way
        let v = CellValue::Number(0.0).to_table_value(true);
        assert_eq!(v, TableValue::Number(0.0));
    }

    #[test]
    fn test_null_coercion() {
        assert_eq!(CellValue::Empty.to_table_value(false), TableValue::Null);
        assert_eq!(
            CellValue::text("  ").to_table_value(false),
            TableValue::Null
        );
    }

    #[test]
    fn test_date_coercion() {
        let d = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(
            CellValue::Date(d).to_table_value(false),
            TableValue::Text("2025-01-01".into())
        );
    }
}
