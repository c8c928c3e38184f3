//! Cell addressing and value types

pub mod address;
pub mod value;

pub use address::{CellAddress, RowRange};
pub use value::{CellValue, PERCENT_MARKER};
