//! The calculation engine session
//!
//! The grid belongs to an external spreadsheet engine. A session is the
//! explicitly acquired handle over one open document: the pipeline writes
//! through it, asks for a recompute, reads the results, and the handle is
//! released when it goes out of scope. No part of the system touches the
//! engine as ambient global state.

use crate::error::Result;
use servfaz_core::{CellGrid, SheetGrid};
use tracing::debug;

/// An open handle on the calculation engine's document.
///
/// Implementations wrap whatever transport reaches the real engine; the
/// pipeline only needs grid access and a recompute trigger. Releasing the
/// handle happens on drop, on every exit path.
pub trait EngineSession {
    /// Read access to the engine-owned grid
    fn grid(&self) -> &dyn CellGrid;

    /// Write access to the engine-owned grid
    fn grid_mut(&mut self) -> &mut dyn CellGrid;

    /// Recompute the document so formula cells reflect the written inputs
    fn recalculate(&mut self) -> Result<()>;
}

/// Recompute hook for [`InMemoryEngine`]
pub type RecalcHook = Box<dyn FnMut(&mut SheetGrid) + Send>;

/// In-process engine over a [`SheetGrid`].
///
/// Stands in for the external engine in tests and offline runs: the
/// optional recompute hook plays the role of the document's formulas,
/// deriving result cells from input cells.
pub struct InMemoryEngine {
    grid: SheetGrid,
    recalc: Option<RecalcHook>,
    recalc_count: usize,
}

impl InMemoryEngine {
    /// Engine over a prepared grid, with recompute as a no-op
    pub fn new(grid: SheetGrid) -> Self {
        Self {
            grid,
            recalc: None,
            recalc_count: 0,
        }
    }

    /// Engine whose recompute runs the given hook over the grid
    pub fn with_recalc(grid: SheetGrid, hook: RecalcHook) -> Self {
        Self {
            grid,
            recalc: Some(hook),
            recalc_count: 0,
        }
    }

    /// How many times the document was recomputed
    pub fn recalc_count(&self) -> usize {
        self.recalc_count
    }

    /// Consume the session and take the grid back
    pub fn into_grid(self) -> SheetGrid {
        self.grid
    }
}

impl EngineSession for InMemoryEngine {
    fn grid(&self) -> &dyn CellGrid {
        &self.grid
    }

    fn grid_mut(&mut self) -> &mut dyn CellGrid {
        &mut self.grid
    }

    fn recalculate(&mut self) -> Result<()> {
        if let Some(hook) = self.recalc.as_mut() {
            hook(&mut self.grid);
        }
        self.recalc_count += 1;
        debug!(count = self.recalc_count, "grid recomputed");
        Ok(())
    }
}
