//! Grid-to-block extraction
//!
//! The spreadsheet writes its result tables into a fixed band of rows with
//! no structural markers beyond content: a title cell, a header row whose
//! first column contains the header sentinel, data rows, and optionally a
//! total row whose first column contains the total sentinel. The parser
//! walks the band once, forward only, and lifts each table into a
//! [`Block`].

use crate::block::{Block, Row};
use crate::cell::{CellAddress, RowRange};
use crate::error::{Error, Result};
use crate::grid::CellGrid;
use tracing::debug;

/// Marker identifying a header row ("Descrição" is the first column label
/// of every result table in the mother spreadsheet)
pub const HEADER_SENTINEL: &str = "Descrição";

/// Marker identifying a total row; matched case-insensitively as substring
pub const TOTAL_SENTINEL: &str = "TOTAL";

/// Configuration of one scan: row band, column set, sentinels.
///
/// The column set fixes the arity of every produced block. Its addresses
/// need not be contiguous; the production layout reads A-F plus the
/// distant AB column.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Row band to scan (inclusive)
    pub rows: RowRange,
    /// Configured columns, in block-column order (0-based indices)
    pub columns: Vec<u16>,
    /// Substring marking a header row in the first configured column
    pub header_sentinel: String,
    /// Substring marking a total row (matched case-insensitively)
    pub total_sentinel: String,
}

impl ScanConfig {
    /// Build a config from 1-based inclusive row bounds and column letters.
    ///
    /// Fails with [`Error::Configuration`] on an empty column set, bad
    /// column letters, or an invalid row range.
    pub fn new(first_row: u32, last_row: u32, columns: &[&str]) -> Result<Self> {
        if columns.is_empty() {
            return Err(Error::Configuration("empty column set".into()));
        }
        let rows = RowRange::from_1based(first_row, last_row)
            .map_err(|e| Error::Configuration(e.to_string()))?;
        let columns = columns
            .iter()
            .map(|c| {
                CellAddress::letters_to_column(c)
                    .map_err(|e| Error::Configuration(format!("column '{}': {}", c, e)))
            })
            .collect::<Result<Vec<u16>>>()?;

        Ok(Self {
            rows,
            columns,
            header_sentinel: HEADER_SENTINEL.to_string(),
            total_sentinel: TOTAL_SENTINEL.to_string(),
        })
    }

    /// The production configuration: the result band of the RESUMO sheet,
    /// rows 21..=104, columns A-F plus the extended AB column.
    pub fn resumo() -> Self {
        // The constants are fixed by the mother spreadsheet's layout; the
        // parser itself never assumes them.
        Self::new(21, 104, &["A", "B", "C", "D", "E", "F", "AB"])
            .expect("production scan config is valid")
    }

    /// Number of columns every produced block will have
    pub fn arity(&self) -> usize {
        self.columns.len()
    }

    fn first_column(&self) -> u16 {
        self.columns[0]
    }
}

/// Single-pass, forward-only parser from a [`CellGrid`] to [`Block`]s.
///
/// Parsing is a pure function of the grid's current values: re-parsing an
/// unchanged grid yields an identical block sequence.
#[derive(Debug, Clone)]
pub struct BlockParser {
    config: ScanConfig,
}

impl BlockParser {
    /// Create a parser over the given scan configuration
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Scan the configured row band and return the blocks found, in grid
    /// order.
    pub fn parse<G: CellGrid + ?Sized>(&self, grid: &G) -> Result<Vec<Block>> {
        let cfg = &self.config;
        let first_col = cfg.first_column();
        let total_upper = cfg.total_sentinel.to_uppercase();

        let mut blocks = Vec::new();
        let mut row = cfg.rows.first;

        while row <= cfg.rows.last {
            let title_cell = grid.value(CellAddress::new(row, first_col));
            if title_cell.is_blank() {
                // Spacer row between tables
                row += 1;
                continue;
            }

            let title = title_cell.display_text();

            let header_row = row + 1;
            if header_row > cfg.rows.last {
                break;
            }

            let head_cell = grid.value(CellAddress::new(header_row, first_col));
            if !head_cell.display_text().contains(&cfg.header_sentinel) {
                // Incidental text, not a table start. Skip the title row
                // only; the next row may itself start a table.
                row += 1;
                continue;
            }

            let header: Vec<String> = cfg
                .columns
                .iter()
                .map(|&col| {
                    let v = grid.value(CellAddress::new(header_row, col));
                    if v.is_blank() {
                        String::new()
                    } else {
                        v.display_text()
                    }
                })
                .collect();

            // Collect data rows until a blank first column or the total
            // sentinel stops us.
            let mut rows_out: Vec<Row> = Vec::new();
            let mut cursor = header_row + 1;
            let mut hit_total = false;

            while cursor <= cfg.rows.last {
                let first = grid.value(CellAddress::new(cursor, first_col));
                if first.is_blank() {
                    break;
                }
                if first.display_text().to_uppercase().contains(&total_upper) {
                    hit_total = true;
                    break;
                }
                rows_out.push(self.read_row(grid, cursor));
                cursor += 1;
            }

            let total = if hit_total && cursor <= cfg.rows.last {
                Some(self.read_row(grid, cursor))
            } else {
                None
            };

            debug!(
                title = %title,
                rows = rows_out.len(),
                has_total = total.is_some(),
                "parsed block"
            );

            blocks.push(Block {
                title,
                header,
                rows: rows_out,
                total,
            });

            // Resume after the block: past the total row and its spacer,
            // or past the blank row that ended collection.
            row = if hit_total { cursor + 2 } else { cursor + 1 };
        }

        Ok(blocks)
    }

    /// Read all configured columns of one grid row through the typing rule
    fn read_row<G: CellGrid + ?Sized>(&self, grid: &G, row: u32) -> Row {
        self.config
            .columns
            .iter()
            .map(|&col| grid.table_value(CellAddress::new(row, col)))
            .collect()
    }
}
