//! Full pipeline runs against the in-memory engine: write inputs,
//! recompute, parse, correct, persist.

use pretty_assertions::assert_eq;
use servfaz_core::{ScanConfig, SheetGrid, TableValue};
use servfaz_engine::{
    run_calculation, CalculationInput, InMemoryEngine, MemoryStore, OutcomeStore,
};
use servfaz_selic::{Corrector, MonthKey, RateLookup};

struct CachedRates(Vec<(MonthKey, f64)>);

impl RateLookup for CachedRates {
    fn get(&self, month: MonthKey) -> Option<f64> {
        self.0
            .iter()
            .find(|(m, _)| *m == month)
            .map(|(_, rate)| *rate)
    }

    fn ensure(&mut self, date: &str) -> servfaz_selic::Result<Option<f64>> {
        let month = MonthKey::from_date(servfaz_selic::parse_flex_date(date)?);
        Ok(self.get(month))
    }
}

fn sample_input(correction_until: &str) -> CalculationInput {
    CalculationInput {
        municipality: "Recife".into(),
        filing_date: "10/05/2018".into(),
        citation_date: "20/06/2018".into(),
        calc_start: "01/01/2020".into(),
        calc_end: "31/12/2024".into(),
        fee_percent: 20.0,
        fee_fixed: 1500.0,
        principal_discount: 10.0,
        fee_discount: 5.0,
        correction_until: correction_until.into(),
    }
}

/// Plays the part of the mother spreadsheet's formulas: derives the result
/// band from the input cells on every recompute.
fn spreadsheet_formulas(grid: &mut SheetGrid) {
    let fee_fixed = grid.get("B12").unwrap().as_number().unwrap_or(0.0);

    grid.set("A21", "NT7 SELIC - JUROS DE MORA").unwrap();
    grid.set("A22", "Descrição").unwrap();
    grid.set("B22", "Período").unwrap();
    grid.set("C22", "Juros").unwrap();
    grid.set("D22", "Atualizado").unwrap();
    grid.set("E22", "Honorários").unwrap();
    grid.set("F22", "Percentual").unwrap();
    grid.set("AB22", "Observação").unwrap();

    grid.set("A23", "Principal").unwrap();
    grid.set("B23", "01/2020 a 12/2024").unwrap();
    grid.set("C23", 1000.0).unwrap();
    grid.set("D23", 5000.0).unwrap();
    grid.set("E23", fee_fixed).unwrap();
    grid.set("F23", 20.0).unwrap();
    grid.set_format("F23", "0.00%").unwrap();

    grid.set("A24", "TOTAL").unwrap();
    grid.set("C24", 1000.0).unwrap();
    grid.set("D24", 5000.0).unwrap();
    grid.set("E24", fee_fixed).unwrap();
}

#[test]
fn run_with_future_target_produces_corrected_blocks() {
    let mut session =
        InMemoryEngine::with_recalc(SheetGrid::new(), Box::new(spreadsheet_formulas));
    let mut rates = CachedRates(vec![
        ("2025-02".parse().unwrap(), 0.99),
        ("2025-03".parse().unwrap(), 0.96),
    ]);
    let input = sample_input("01/03/2025");

    let outcome = run_calculation(
        &mut session,
        &input,
        &ScanConfig::resumo(),
        &Corrector::default(),
        &mut rates,
    )
    .unwrap();

    assert_eq!(session.recalc_count(), 1);
    assert_eq!(outcome.base.len(), 1);
    assert_eq!(outcome.neutral_months, 0);

    let base = &outcome.base[0];
    assert_eq!(base.title, "NT7 SELIC - JUROS DE MORA");
    // The recompute consumed the written fee input
    assert_eq!(base.rows[0][4], TableValue::Number(1500.0));
    // Percent cell typed through the coercion rule
    assert_eq!(base.rows[0][5], TableValue::Number(0.20));

    let corrected = outcome.corrected.as_ref().unwrap();
    let expected = 1000.0 * 1.0099 * 1.0096;
    let juros = corrected[0].rows[0][2].as_number().unwrap();
    assert!((juros - expected).abs() < 0.01);
    assert!(corrected[0].title.contains("01/03/2025"));
}

#[test]
fn run_at_baseline_skips_correction() {
    let mut session =
        InMemoryEngine::with_recalc(SheetGrid::new(), Box::new(spreadsheet_formulas));
    let mut rates = CachedRates(vec![("2025-01".parse().unwrap(), 1.01)]);
    let input = sample_input("01/01/2025");

    let outcome = run_calculation(
        &mut session,
        &input,
        &ScanConfig::resumo(),
        &Corrector::default(),
        &mut rates,
    )
    .unwrap();

    assert_eq!(outcome.base.len(), 1);
    assert!(outcome.corrected.is_none());
    assert_eq!(outcome.neutral_months, 0);
}

#[test]
fn unfetchable_rates_degrade_but_do_not_fail_the_run() {
    let mut session =
        InMemoryEngine::with_recalc(SheetGrid::new(), Box::new(spreadsheet_formulas));
    // No rates available at all
    let mut rates = CachedRates(Vec::new());
    let input = sample_input("01/03/2025");

    let outcome = run_calculation(
        &mut session,
        &input,
        &ScanConfig::resumo(),
        &Corrector::default(),
        &mut rates,
    )
    .unwrap();

    // Correction still ran; every month fell back to neutral, corrected
    // values equal the base values, and the degradation is visible.
    assert_eq!(outcome.neutral_months, 2);
    let corrected = outcome.corrected.as_ref().unwrap();
    assert_eq!(
        corrected[0].rows[0][2],
        outcome.base[0].rows[0][2]
    );
}

#[test]
fn outcome_serializes_into_the_persisted_shape() {
    let mut session =
        InMemoryEngine::with_recalc(SheetGrid::new(), Box::new(spreadsheet_formulas));
    let mut rates = CachedRates(vec![
        ("2025-02".parse().unwrap(), 0.99),
        ("2025-03".parse().unwrap(), 0.96),
    ]);
    let input = sample_input("01/03/2025");

    let outcome = run_calculation(
        &mut session,
        &input,
        &ScanConfig::resumo(),
        &Corrector::default(),
        &mut rates,
    )
    .unwrap();

    let json = serde_json::to_value(&outcome).unwrap();
    assert!(json["results_base"].is_array());
    assert!(json["results_atualizados"].is_array());
    assert_eq!(json["correcao_ate"], "01/03/2025");

    let mut store = MemoryStore::new();
    let record = store.save(&input, &outcome).unwrap();
    let payload = store.get(&record.id).unwrap();
    assert_eq!(payload["output"]["correcao_ate"], "01/03/2025");
}

#[test]
fn bad_input_date_fails_before_recompute() {
    let mut session =
        InMemoryEngine::with_recalc(SheetGrid::new(), Box::new(spreadsheet_formulas));
    let mut rates = CachedRates(Vec::new());
    let mut input = sample_input("01/03/2025");
    input.calc_start = "sem data".into();

    let result = run_calculation(
        &mut session,
        &input,
        &ScanConfig::resumo(),
        &Corrector::default(),
        &mut rates,
    );

    assert!(result.is_err());
    assert_eq!(session.recalc_count(), 0);
}
