//! Cell address and row range types

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// A cell address (e.g., "A1", "AB21")
///
/// Addresses combine column letters (A-XFD) and 1-based row numbers. The
/// engine-facing grids in this system never use `$`-absolute references, so
/// the address carries none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellAddress {
    /// Row index (0-based internally, 1-based in display)
    pub row: u32,
    /// Column index (0-based, A=0, B=1, ..., XFD=16383)
    pub col: u16,
}

impl CellAddress {
    /// Create a new cell address from 0-based indices
    pub fn new(row: u32, col: u16) -> Self {
        Self { row, col }
    }

    /// Create an address from column letters and a 1-based row number
    pub fn at(col_letters: &str, row_1based: u32) -> Result<Self> {
        if row_1based == 0 {
            return Err(Error::InvalidAddress(format!(
                "row number must be >= 1, got {} for column '{}'",
                row_1based, col_letters
            )));
        }
        let col = Self::letters_to_column(col_letters)?;
        let row = row_1based - 1;
        if row >= MAX_ROWS {
            return Err(Error::RowOutOfBounds(row, MAX_ROWS - 1));
        }
        Ok(Self { row, col })
    }

    /// Parse a cell address from A1-style notation
    ///
    /// # Examples
    /// ```
    /// use servfaz_core::CellAddress;
    ///
    /// let addr = CellAddress::parse("A1").unwrap();
    /// assert_eq!(addr.row, 0);
    /// assert_eq!(addr.col, 0);
    ///
    /// let addr = CellAddress::parse("AB21").unwrap();
    /// assert_eq!(addr.row, 20);
    /// assert_eq!(addr.col, 27);
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidAddress("empty address".into()));
        }

        let bytes = s.as_bytes();
        let mut pos = 0;
        while pos < bytes.len() && bytes[pos].is_ascii_alphabetic() {
            pos += 1;
        }

        if pos == 0 {
            return Err(Error::InvalidAddress(format!(
                "no column letters in '{}'",
                s
            )));
        }

        let col = Self::letters_to_column(&s[..pos])?;

        let row_str = &s[pos..];
        if row_str.is_empty() {
            return Err(Error::InvalidAddress(format!("no row number in '{}'", s)));
        }

        let row: u32 = row_str
            .parse()
            .map_err(|_| Error::InvalidAddress(format!("invalid row number in '{}'", s)))?;

        if row == 0 {
            return Err(Error::InvalidAddress(format!(
                "row number must be >= 1 in '{}'",
                s
            )));
        }

        let row = row - 1;
        if row >= MAX_ROWS {
            return Err(Error::RowOutOfBounds(row, MAX_ROWS - 1));
        }

        Ok(Self { row, col })
    }

    /// Convert column index to letters (0 = A, 25 = Z, 26 = AA, etc.)
    pub fn column_to_letters(col: u16) -> String {
        let mut result = String::new();
        let mut n = col as u32 + 1; // 1-based for calculation

        while n > 0 {
            n -= 1;
            let c = ((n % 26) as u8 + b'A') as char;
            result.insert(0, c);
            n /= 26;
        }

        result
    }

    /// Convert column letters to index (A = 0, Z = 25, AA = 26, AB = 27, etc.)
    pub fn letters_to_column(letters: &str) -> Result<u16> {
        if letters.is_empty() {
            return Err(Error::InvalidAddress("empty column letters".into()));
        }

        let mut col: u32 = 0;
        for c in letters.chars() {
            if !c.is_ascii_alphabetic() {
                return Err(Error::InvalidAddress(format!(
                    "invalid column letter '{}'",
                    c
                )));
            }
            col = col * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
        }

        let col = col - 1; // Convert to 0-based

        if col >= MAX_COLS as u32 {
            return Err(Error::ColumnOutOfBounds(col as u16, MAX_COLS - 1));
        }

        Ok(col as u16)
    }

    /// Format as A1-style string
    pub fn to_a1_string(&self) -> String {
        format!("{}{}", Self::column_to_letters(self.col), self.row + 1)
    }

    /// The address directly below this one
    pub fn below(&self) -> CellAddress {
        CellAddress::new(self.row + 1, self.col)
    }

    /// Same column, different 0-based row
    pub fn with_row(&self, row: u32) -> CellAddress {
        CellAddress::new(row, self.col)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// An inclusive range of grid rows, held 0-based internally.
///
/// The result tables of the mother spreadsheet live in a fixed band of rows
/// (21..=104 in production); the range bounds the scan, while block
/// boundaries inside it come from content sentinels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    /// First row of the range (0-based)
    pub first: u32,
    /// Last row of the range (0-based, inclusive)
    pub last: u32,
}

impl RowRange {
    /// Build from 1-based inclusive bounds, as rows are written in A1 notation
    pub fn from_1based(first: u32, last: u32) -> Result<Self> {
        if first == 0 || last == 0 {
            return Err(Error::Configuration(format!(
                "row bounds are 1-based, got {}..={}",
                first, last
            )));
        }
        if first > last {
            return Err(Error::Configuration(format!(
                "row range {}..={} is inverted",
                first, last
            )));
        }
        if last - 1 >= MAX_ROWS {
            return Err(Error::RowOutOfBounds(last - 1, MAX_ROWS - 1));
        }
        Ok(Self {
            first: first - 1,
            last: last - 1,
        })
    }

    /// Whether a 0-based row index falls inside the range
    pub fn contains(&self, row: u32) -> bool {
        row >= self.first && row <= self.last
    }

    /// Number of rows in the range
    pub fn len(&self) -> u32 {
        self.last - self.first + 1
    }

    /// A row range is never empty by construction
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl fmt::Display for RowRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rows {}..={}", self.first + 1, self.last + 1)
    }
}
