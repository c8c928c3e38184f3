//! The calculation pipeline
//!
//! One run: make sure the target month's rate is obtainable (tolerantly),
//! write the inputs, recompute, parse the result band, and correct the
//! blocks when the target date lies past the baseline.

use crate::error::Result;
use crate::fields::{write_inputs, CalculationInput};
use crate::session::EngineSession;
use serde::Serialize;
use servfaz_core::{Block, BlockParser, ScanConfig};
use servfaz_selic::{Corrector, RateLookup};
use tracing::{info, warn};

/// Everything one calculation run produces.
///
/// Serializes into the shape the system has always persisted:
/// `results_base`, optional `results_atualizados`, `correcao_ate`.
#[derive(Debug, Clone, Serialize)]
pub struct CalculationOutcome {
    /// Blocks as the spreadsheet produced them, priced at the baseline
    #[serde(rename = "results_base")]
    pub base: Vec<Block>,
    /// Corrected blocks, present only when the target date required a
    /// correction pass
    #[serde(rename = "results_atualizados")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corrected: Option<Vec<Block>>,
    /// The caller's target date, verbatim
    #[serde(rename = "correcao_ate")]
    pub correction_until: String,
    /// Months that degraded to a neutral factor during correction (0 when
    /// no correction ran). Non-zero means the corrected values may be
    /// understated.
    pub neutral_months: usize,
}

/// Run one calculation against an open engine session.
///
/// Engine and parse failures are fatal; a missing or unfetchable rate for
/// the target month is not (the correction pass degrades per month and
/// reports it via `neutral_months`).
pub fn run_calculation<S: EngineSession + ?Sized>(
    session: &mut S,
    input: &CalculationInput,
    scan: &ScanConfig,
    corrector: &Corrector,
    lookup: &mut dyn RateLookup,
) -> Result<CalculationOutcome> {
    // Warm the cache for the target month up front so the correction pass
    // rarely needs the network. Failures here are tolerated: the grid may
    // already hold everything the caller needs.
    match lookup.ensure(&input.correction_until) {
        Ok(Some(rate)) => info!(rate, until = %input.correction_until, "target month rate available"),
        Ok(None) => warn!(until = %input.correction_until, "target month rate not yet published"),
        Err(e) => warn!(error = %e, "rate pre-check failed, continuing"),
    }

    write_inputs(session.grid_mut(), input)?;
    info!("inputs written");

    session.recalculate()?;
    info!("engine recomputed");

    let blocks = BlockParser::new(scan.clone()).parse(session.grid())?;
    info!(blocks = blocks.len(), "result blocks parsed");

    let (corrected, neutral_months) = if corrector.needs_correction(&input.correction_until) {
        let correction = corrector.correct(&blocks, &input.correction_until, lookup)?;
        if correction.neutral_months > 0 {
            warn!(
                neutral_months = correction.neutral_months,
                "correction degraded to neutral for some months"
            );
        }
        info!(
            months = correction.window.len(),
            until = %input.correction_until,
            "blocks corrected"
        );
        (Some(correction.blocks), correction.neutral_months)
    } else {
        info!(until = %input.correction_until, "target within baseline, no correction");
        (None, 0)
    };

    Ok(CalculationOutcome {
        base: blocks,
        corrected,
        correction_until: input.correction_until.clone(),
        neutral_months,
    })
}
