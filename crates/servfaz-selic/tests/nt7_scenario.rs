//! The NT7 SELIC reference scenario: one block priced at the baseline,
//! corrected to a later target date.

use pretty_assertions::assert_eq;
use servfaz_core::{Block, TableValue};
use servfaz_selic::{Corrector, MonthKey, RateLookup};

struct CachedRates(Vec<(MonthKey, f64)>);

impl RateLookup for CachedRates {
    fn get(&self, month: MonthKey) -> Option<f64> {
        self.0
            .iter()
            .find(|(m, _)| *m == month)
            .map(|(_, rate)| *rate)
    }

    fn ensure(&mut self, _date: &str) -> servfaz_selic::Result<Option<f64>> {
        Ok(None)
    }
}

fn nt7_block() -> Block {
    Block {
        title: "NT7 SELIC - JUROS DE MORA".into(),
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
                TableValue::Text("01/2020 a 12/2024".into()),
                TableValue::Number(1000.0),
                TableValue::Number(5000.0),
                TableValue::Number(500.0),
            ],
            vec![
                TableValue::Text("Reflexos".into()),
                TableValue::Text("01/2020 a 12/2024".into()),
                TableValue::Number(200.0),
                TableValue::Number(800.0),
                TableValue::Null,
            ],
        ],
        total: Some(vec![
            TableValue::Text("TOTAL".into()),
            TableValue::Null,
            TableValue::Number(1200.0),
            TableValue::Number(5800.0),
            TableValue::Number(500.0),
        ]),
    }
}

#[test]
fn corrected_block_moves_monetary_columns_forward() {
    let corrector = Corrector::default();
    let mut rates = CachedRates(vec![
        ("2025-02".parse().unwrap(), 0.99),
        ("2025-03".parse().unwrap(), 0.96),
    ]);

    let input = vec![nt7_block()];
    let target = "01/03/2025";
    assert!(corrector.needs_correction(target));

    let result = corrector.correct(&input, target, &mut rates).unwrap();
    assert_eq!(result.blocks.len(), 1);
    assert_eq!(result.neutral_months, 0);

    let before = &input[0];
    let after = &result.blocks[0];

    // Title identifies the target; header is copied verbatim
    assert!(after.title.contains(target));
    assert_eq!(after.header, before.header);

    // Juros (2) and Atualizado (3) are strictly greater in every row and
    // in the total
    for (row_before, row_after) in before.rows.iter().zip(&after.rows) {
        for col in [2usize, 3] {
            let b = row_before[col].as_number().unwrap();
            let a = row_after[col].as_number().unwrap();
            assert!(a > b, "column {} did not grow: {} -> {}", col, b, a);
        }
    }
    let total_before = before.total.as_ref().unwrap();
    let total_after = after.total.as_ref().unwrap();
    assert!(total_after[2].as_number().unwrap() > total_before[2].as_number().unwrap());
    assert!(total_after[3].as_number().unwrap() > total_before[3].as_number().unwrap());

    // The input sequence is untouched
    assert_eq!(input[0], nt7_block());
}
