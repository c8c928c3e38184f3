//! The table-block model produced by the grid parser
//!
//! A [`Block`] is one titled table lifted out of the result range of the
//! spreadsheet. Blocks are plain value objects: the parser produces them,
//! the correction engine rebuilds new ones, and the persistence layer
//! serializes them. The JSON shape (`titulo`, `header`, `rows`, optional
//! `total`) matches the records the system has always persisted.

use serde::{Deserialize, Serialize};

/// A single cell of a parsed table row.
///
/// `Null` stands for an empty or unparsable cell and must never be coerced
/// to 0. Serialized untagged, so JSON sees plain `null` / number / string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TableValue {
    /// Empty or unparsable cell
    Null,
    /// Numeric cell (percent cells already divided by 100)
    Number(f64),
    /// Text cell (dates appear as ISO-8601 text)
    Text(String),
}

impl TableValue {
    /// Numeric view of the value, if it has one
    pub fn as_number(&self) -> Option<f64> {
        match self {
            TableValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Whether this value is `Null`
    pub fn is_null(&self) -> bool {
        matches!(self, TableValue::Null)
    }
}

impl From<f64> for TableValue {
    fn from(n: f64) -> Self {
        TableValue::Number(n)
    }
}

impl From<&str> for TableValue {
    fn from(s: &str) -> Self {
        TableValue::Text(s.to_string())
    }
}

/// One parsed table row, in configured-column order
pub type Row = Vec<TableValue>;

/// One titled table extracted from the grid.
///
/// Invariant: `header.len() == row.len()` for every row and for `total`
/// when present; the parser establishes this from its configured column
/// set and nothing downstream changes arity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Trimmed, non-empty table title (the cell above the header row)
    #[serde(rename = "titulo")]
    pub title: String,
    /// Column labels; always strings, missing header cells become `""`
    pub header: Vec<String>,
    /// Data rows in grid order; may be empty
    pub rows: Vec<Row>,
    /// The sentinel-marked total line, when one closes the block
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub total: Option<Row>,
}

impl Block {
    /// Number of columns in this block
    pub fn arity(&self) -> usize {
        self.header.len()
    }
}
