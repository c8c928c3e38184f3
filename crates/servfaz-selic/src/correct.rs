//! The monetary correction engine
//!
//! The spreadsheet's output is priced at a fixed baseline date. For a later
//! target date, [`Corrector::correct`] rebuilds every block with the
//! monetary columns compounded by the monthly SELIC rate across the
//! correction window. Input blocks are never mutated.

use crate::dates::parse_flex_date;
use crate::error::Result;
use crate::lookup::RateLookup;
use crate::month::{month_window, MonthKey};
use chrono::NaiveDate;
use servfaz_core::{Block, Row, TableValue};
use tracing::{debug, warn};

/// Default monetary column positions: Juros (C), Valor Atualizado (D),
/// Honorários (E) in the production block layout.
pub const DEFAULT_COLUMNS: [usize; 3] = [2, 3, 4];

/// The result of one correction pass.
#[derive(Debug, Clone)]
pub struct Correction {
    /// The rebuilt blocks, in input order
    pub blocks: Vec<Block>,
    /// The month window the compounding covered (chronological)
    pub window: Vec<MonthKey>,
    /// How many window months fell back to a neutral (×1) factor because
    /// no rate could be resolved even after an on-demand fetch attempt.
    ///
    /// A non-zero count means the corrected values may be understated;
    /// nothing else in the output signals it.
    pub neutral_months: usize,
}

/// Re-prices block columns by compounded monthly rates.
#[derive(Debug, Clone)]
pub struct Corrector {
    baseline: NaiveDate,
    columns: Vec<usize>,
}

impl Corrector {
    /// Corrector for a given baseline date and set of affected column
    /// positions (within each [`Row`], not header labels)
    pub fn new(baseline: NaiveDate, columns: Vec<usize>) -> Self {
        Self { baseline, columns }
    }

    /// The baseline the spreadsheet's native output is priced at
    pub fn baseline(&self) -> NaiveDate {
        self.baseline
    }

    /// Whether a target date calls for a correction pass.
    ///
    /// True iff the date parses and is strictly after the baseline. An
    /// unparseable date deliberately means "no correction" rather than an
    /// error; the write path validates dates before they get here.
    pub fn needs_correction(&self, target: &str) -> bool {
        match parse_flex_date(target) {
            Ok(date) => date > self.baseline,
            Err(_) => false,
        }
    }

    /// Produce a corrected copy of `blocks` for `target`.
    ///
    /// Each distinct window month is resolved once: cache lookup first,
    /// then a single on-demand fetch attempt; a month that still has no
    /// rate (or a fetch that fails outright) degrades to a neutral ×1
    /// factor and is counted in [`Correction::neutral_months`]. Affected
    /// columns are multiplied left to right in window order; null and zero
    /// base values, and non-numeric cells, pass through unchanged.
    pub fn correct(
        &self,
        blocks: &[Block],
        target: &str,
        lookup: &mut dyn RateLookup,
    ) -> Result<Correction> {
        let target_date = parse_flex_date(target)?;
        let window = month_window(self.baseline, target_date);

        if window.is_empty() {
            // Target still inside the baseline month: nothing to compound.
            return Ok(Correction {
                blocks: blocks.to_vec(),
                window,
                neutral_months: 0,
            });
        }

        let (factors, neutral_months) = self.resolve_factors(&window, lookup);
        debug!(
            window = %format_args!("{}..{}", window[0], window[window.len() - 1]),
            months = window.len(),
            neutral_months,
            "correcting blocks"
        );

        let corrected = blocks
            .iter()
            .map(|block| self.correct_block(block, target, &factors))
            .collect();

        Ok(Correction {
            blocks: corrected,
            window,
            neutral_months,
        })
    }

    /// Resolve one multiplier per window month, in chronological order.
    fn resolve_factors(
        &self,
        window: &[MonthKey],
        lookup: &mut dyn RateLookup,
    ) -> (Vec<f64>, usize) {
        let mut factors = Vec::with_capacity(window.len());
        let mut neutral = 0usize;

        for &month in window {
            let rate = match lookup.get(month) {
                Some(rate) => Some(rate),
                None => match lookup.ensure(&month.first_day_br()) {
                    Ok(rate) => rate,
                    Err(e) => {
                        warn!(%month, error = %e, "rate fetch failed, applying neutral factor");
                        None
                    }
                },
            };

            match rate {
                Some(rate) => {
                    // A published rate of exactly zero compounds to ×1 but
                    // is not a degradation.
                    factors.push(if rate != 0.0 { 1.0 + rate / 100.0 } else { 1.0 });
                }
                None => {
                    factors.push(1.0);
                    neutral += 1;
                }
            }
        }

        (factors, neutral)
    }

    fn correct_block(&self, block: &Block, target: &str, factors: &[f64]) -> Block {
        Block {
            title: format!("{} - ATUALIZADO ATÉ {}", block.title, target),
            header: block.header.clone(),
            rows: block
                .rows
                .iter()
                .map(|row| self.correct_row(row, factors))
                .collect(),
            total: block
                .total
                .as_ref()
                .map(|total| self.correct_row(total, factors)),
        }
    }

    fn correct_row(&self, row: &Row, factors: &[f64]) -> Row {
        let mut out = row.clone();
        for &idx in &self.columns {
            if let Some(TableValue::Number(base)) = out.get(idx) {
                let base = *base;
                if base != 0.0 {
                    out[idx] = TableValue::Number(compound(base, factors));
                }
            }
        }
        out
    }
}

impl Default for Corrector {
    fn default() -> Self {
        // The mother spreadsheet's native output is fixed at 01/01/2025.
        let baseline = NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid baseline date");
        Self::new(baseline, DEFAULT_COLUMNS.to_vec())
    }
}

/// Left-to-right compounding in window order, for reproducibility
fn compound(base: f64, factors: &[f64]) -> f64 {
    factors.iter().fold(base, |value, factor| value * factor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    /// Cache-only stub lookup
    struct FixedRates(BTreeMap<MonthKey, f64>);

    impl FixedRates {
        fn new(rates: &[(&str, f64)]) -> Self {
            Self(
                rates
                    .iter()
                    .map(|(k, v)| (k.parse().unwrap(), *v))
                    .collect(),
            )
        }
    }

    impl RateLookup for FixedRates {
        fn get(&self, month: MonthKey) -> Option<f64> {
            self.0.get(&month).copied()
        }

        fn ensure(&mut self, _date: &str) -> Result<Option<f64>> {
            Ok(None)
        }
    }

    fn sample_block() -> Block {
        Block {
            title: "NT7 SELIC".into(),
            header: vec![
                "Descrição".into(),
                "Período".into(),
                "Juros".into(),
                "Atualizado".into(),
                "Honorários".into(),
            ],
            rows: vec![
                vec![
                    TableValue::Text("Principal".into()),
                    TableValue::Text("2020-2024".into()),
                    TableValue::Number(1000.0),
                    TableValue::Number(5000.0),
                    TableValue::Number(500.0),
                ],
                vec![
                    TableValue::Text("Reflexos".into()),
                    TableValue::Null,
                    TableValue::Number(0.0),
                    TableValue::Null,
                    TableValue::Number(50.0),
                ],
            ],
            total: Some(vec![
                TableValue::Text("TOTAL".into()),
                TableValue::Null,
                TableValue::Number(1000.0),
                TableValue::Number(5000.0),
                TableValue::Number(550.0),
            ]),
        }
    }

    #[test]
    fn test_correction_gate() {
        let corrector = Corrector::default();
        assert!(!corrector.needs_correction("01/01/2025"));
        assert!(corrector.needs_correction("01/03/2025"));
        assert!(corrector.needs_correction("02/01/2025"));
        assert!(!corrector.needs_correction("31/12/2024"));
        assert!(!corrector.needs_correction("not-a-date"));
    }

    #[test]
    fn test_compounding_arithmetic() {
        let corrector = Corrector::default();
        let mut rates = FixedRates::new(&[("2025-02", 0.99), ("2025-03", 0.96)]);

        let result = corrector
            .correct(&[sample_block()], "15/03/2025", &mut rates)
            .unwrap();

        // 1000 × 1.0099 × 1.0096
        let juros = result.blocks[0].rows[0][2].as_number().unwrap();
        assert!((juros - 1019.49).abs() < 0.01);
        assert_eq!(result.neutral_months, 0);
        assert_eq!(result.window.len(), 2);
    }

    #[test]
    fn test_zero_and_null_pass_through() {
        let corrector = Corrector::default();
        let mut rates = FixedRates::new(&[("2025-02", 0.99), ("2025-03", 0.96)]);

        let result = corrector
            .correct(&[sample_block()], "15/03/2025", &mut rates)
            .unwrap();

        let reflexos = &result.blocks[0].rows[1];
        assert_eq!(reflexos[2], TableValue::Number(0.0));
        assert_eq!(reflexos[3], TableValue::Null);
        // Column 4 is affected and non-zero, so it moves
        assert!(reflexos[4].as_number().unwrap() > 50.0);
    }

    #[test]
    fn test_untouched_columns_and_header_copied() {
        let corrector = Corrector::default();
        let mut rates = FixedRates::new(&[("2025-02", 0.99), ("2025-03", 0.96)]);
        let input = sample_block();

        let result = corrector.correct(&[input.clone()], "15/03/2025", &mut rates).unwrap();
        let block = &result.blocks[0];

        assert_eq!(block.header, input.header);
        assert_eq!(block.rows[0][0], input.rows[0][0]);
        assert_eq!(block.rows[0][1], input.rows[0][1]);
        assert!(block.title.contains("ATUALIZADO ATÉ 15/03/2025"));
    }

    #[test]
    fn test_total_row_is_corrected() {
        let corrector = Corrector::default();
        let mut rates = FixedRates::new(&[("2025-02", 0.99), ("2025-03", 0.96)]);

        let result = corrector
            .correct(&[sample_block()], "15/03/2025", &mut rates)
            .unwrap();

        let total = result.blocks[0].total.as_ref().unwrap();
        assert!((total[2].as_number().unwrap() - 1019.49).abs() < 0.01);
    }

    #[test]
    fn test_input_is_never_mutated() {
        let corrector = Corrector::default();
        let mut rates = FixedRates::new(&[("2025-02", 0.99)]);
        let input = vec![sample_block()];
        let snapshot = input.clone();

        corrector.correct(&input, "15/03/2025", &mut rates).unwrap();
        assert_eq!(input, snapshot);
    }

    #[test]
    fn test_missing_rates_degrade_to_neutral_and_are_counted() {
        let corrector = Corrector::default();
        // Only February is known; March falls back to ×1
        let mut rates = FixedRates::new(&[("2025-02", 0.99)]);

        let result = corrector
            .correct(&[sample_block()], "15/03/2025", &mut rates)
            .unwrap();

        assert_eq!(result.neutral_months, 1);
        let juros = result.blocks[0].rows[0][2].as_number().unwrap();
        assert!((juros - 1009.9).abs() < 0.01); // 1000 × 1.0099 × 1
    }

    #[test]
    fn test_published_zero_rate_is_not_a_degradation() {
        let corrector = Corrector::default();
        let mut rates = FixedRates::new(&[("2025-02", 0.0), ("2025-03", 0.96)]);

        let result = corrector
            .correct(&[sample_block()], "15/03/2025", &mut rates)
            .unwrap();

        assert_eq!(result.neutral_months, 0);
        let juros = result.blocks[0].rows[0][2].as_number().unwrap();
        assert!((juros - 1009.6).abs() < 0.01); // 1000 × 1 × 1.0096
    }

    #[test]
    fn test_empty_window_returns_unchanged_copy() {
        let corrector = Corrector::default();
        let mut rates = FixedRates::new(&[]);
        let input = vec![sample_block()];

        // Later day, same month as baseline
        let result = corrector.correct(&input, "20/01/2025", &mut rates).unwrap();
        assert!(result.window.is_empty());
        assert_eq!(result.blocks, input);
    }

    #[test]
    fn test_bad_target_date_is_an_error() {
        let corrector = Corrector::default();
        let mut rates = FixedRates::new(&[]);
        assert!(corrector
            .correct(&[sample_block()], "someday", &mut rates)
            .is_err());
    }
}
