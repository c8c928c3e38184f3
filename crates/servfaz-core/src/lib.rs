//! # servfaz-core
//!
//! Core data structures for the servfaz calculation pipeline.
//!
//! The actual legal/financial arithmetic lives in an external spreadsheet
//! engine; this crate provides the pieces that make orchestrating it
//! useful:
//! - [`CellAddress`] and [`RowRange`] - A1-style cell addressing
//! - [`CellValue`] and [`TableValue`] - typed cell values and the
//!   JSON-facing value type they coerce into
//! - [`CellGrid`] - the read/write contract over the engine-owned grid,
//!   with [`SheetGrid`] as the in-memory implementation
//! - [`BlockParser`] - turns an unstructured cell range into a sequence of
//!   titled [`Block`] tables using content sentinels only
//!
//! ## Example
//!
//! ```rust
//! use servfaz_core::{BlockParser, ScanConfig, SheetGrid};
//!
//! let mut grid = SheetGrid::new();
//! grid.set("A2", "JUROS DEVIDOS").unwrap();
//! grid.set("A3", "Descrição").unwrap();
//! grid.set("B3", "Valor").unwrap();
//! grid.set("A4", "Principal").unwrap();
//! grid.set("B4", 1234.5).unwrap();
//!
//! let config = ScanConfig::new(2, 10, &["A", "B"]).unwrap();
//! let blocks = BlockParser::new(config).parse(&grid).unwrap();
//! assert_eq!(blocks.len(), 1);
//! assert_eq!(blocks[0].title, "JUROS DEVIDOS");
//! ```

pub mod block;
pub mod cell;
pub mod error;
pub mod extract;
pub mod grid;

// Re-exports for convenience
pub use block::{Block, Row, TableValue};
pub use cell::{CellAddress, CellValue, RowRange};
pub use error::{Error, Result};
pub use extract::{BlockParser, ScanConfig};
pub use grid::{CellGrid, SheetGrid};

/// Maximum number of rows in a grid (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a grid (Excel limit)
pub const MAX_COLS: u16 = 16_384;
