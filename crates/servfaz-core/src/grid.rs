//! The cell grid contract and its in-memory implementation
//!
//! The production grid is owned by the external calculation engine; this
//! crate only depends on the narrow read/write surface below. [`SheetGrid`]
//! implements it in memory so the parser, the field writer and the whole
//! pipeline stay testable without an engine process.

use crate::block::TableValue;
use crate::cell::{CellAddress, CellValue, PERCENT_MARKER};
use crate::error::Result;
use std::collections::HashMap;

/// Read/write access to an addressable 2-D surface of typed cells.
///
/// Cells outside the written set read as [`CellValue::Empty`]. Format
/// metadata is exposed only as far as the typing rule needs it: whether a
/// cell is percent-styled.
pub trait CellGrid {
    /// Read the value of a cell (empty cells yield [`CellValue::Empty`])
    fn value(&self, addr: CellAddress) -> CellValue;

    /// The cell's number format string, if one is set (e.g. `"0.00%"`)
    fn number_format(&self, addr: CellAddress) -> Option<String>;

    /// Write a value to a cell
    fn set_value(&mut self, addr: CellAddress, value: CellValue);

    /// Whether the cell's display format marks it as a percentage
    fn percent_format(&self, addr: CellAddress) -> bool {
        self.number_format(addr)
            .map(|f| f.contains(PERCENT_MARKER))
            .unwrap_or(false)
    }

    /// Read a cell through the typing rule (percent division, blank→null,
    /// dates as ISO text)
    fn table_value(&self, addr: CellAddress) -> TableValue {
        self.value(addr).to_table_value(self.percent_format(addr))
    }
}

/// Sparse in-memory cell grid with per-cell number formats.
#[derive(Debug, Default, Clone)]
pub struct SheetGrid {
    cells: HashMap<CellAddress, CellValue>,
    formats: HashMap<CellAddress, String>,
}

impl SheetGrid {
    /// Create a new empty grid
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a value at an A1-style address
    pub fn set<V: Into<CellValue>>(&mut self, addr: &str, value: V) -> Result<()> {
        let addr = CellAddress::parse(addr)?;
        self.set_value(addr, value.into());
        Ok(())
    }

    /// Set the number format of a cell at an A1-style address
    pub fn set_format(&mut self, addr: &str, format: &str) -> Result<()> {
        let addr = CellAddress::parse(addr)?;
        self.formats.insert(addr, format.to_string());
        Ok(())
    }

    /// Read the value at an A1-style address
    pub fn get(&self, addr: &str) -> Result<CellValue> {
        let addr = CellAddress::parse(addr)?;
        Ok(self.value(addr))
    }

    /// Number of cells holding a value
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cell holds a value
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl CellGrid for SheetGrid {
    fn value(&self, addr: CellAddress) -> CellValue {
        self.cells.get(&addr).cloned().unwrap_or(CellValue::Empty)
    }

    fn number_format(&self, addr: CellAddress) -> Option<String> {
        self.formats.get(&addr).cloned()
    }

    fn set_value(&mut self, addr: CellAddress, value: CellValue) {
        if value.is_empty() {
            self.cells.remove(&addr);
        } else {
            self.cells.insert(addr, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_cells_read_empty() {
        let grid = SheetGrid::new();
        assert!(grid.get("A1").unwrap().is_empty());
    }

    #[test]
    fn test_set_and_get() {
        let mut grid = SheetGrid::new();
        grid.set("B6", "Recife").unwrap();
        grid.set("B12", 1500.0).unwrap();

        assert_eq!(grid.get("B6").unwrap().as_text(), Some("Recife"));
        assert_eq!(grid.get("B12").unwrap().as_number(), Some(1500.0));
        assert_eq!(grid.len(), 2);
    }

    #[test]
    fn test_percent_format_detection() {
        let mut grid = SheetGrid::new();
        grid.set("B11", 20.0).unwrap();
        grid.set_format("B11", "0.00%").unwrap();
        grid.set("B12", 20.0).unwrap();

        let b11 = CellAddress::parse("B11").unwrap();
        let b12 = CellAddress::parse("B12").unwrap();
        assert!(grid.percent_format(b11));
        assert!(!grid.percent_format(b12));

        assert_eq!(grid.table_value(b11), TableValue::Number(0.20));
        assert_eq!(grid.table_value(b12), TableValue::Number(20.0));
    }

    #[test]
    fn test_writing_empty_clears() {
        let mut grid = SheetGrid::new();
        grid.set("A1", 1.0).unwrap();
        let a1 = CellAddress::parse("A1").unwrap();
        grid.set_value(a1, CellValue::Empty);
        assert!(grid.is_empty());
    }
}
