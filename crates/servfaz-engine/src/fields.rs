//! Input-field-to-cell mapping and the cell writer
//!
//! The mother spreadsheet takes its ten inputs in the fixed cells B6..B15
//! of the RESUMO sheet. Three of them are percent-styled cells (the grid
//! stores the fraction, the caller sends the displayed percentage), five
//! are dates, and the calculation period is mirrored into the E6/F6 pair
//! the formulas actually read.

use crate::error::Result;
use servfaz_core::{CellAddress, CellGrid, CellValue};
use servfaz_selic::parse_flex_date;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How a field's raw value is converted before it is written to its cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Written as-is
    Text,
    /// Parsed from `DD/MM/YYYY` (or ISO / dashed) into a native date
    Date,
    /// Displayed percentage, divided by 100 for the percent-styled cell
    Percent,
    /// Plain numeric value
    Number,
}

/// The ten logical input fields, in cell order B6..B15.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    /// Nome do município (B6)
    Municipality,
    /// Data de ajuizamento (B7)
    FilingDate,
    /// Data de citação (B8)
    CitationDate,
    /// Início do cálculo (B9, mirrored to E6)
    CalcStart,
    /// Final do cálculo (B10, mirrored to F6)
    CalcEnd,
    /// Honorários sobre o valor da condenação, % (B11)
    FeePercent,
    /// Honorários em valor fixo (B12)
    FeeFixed,
    /// Deságio sobre o principal, % (B13)
    PrincipalDiscount,
    /// Deságio em honorários, % (B14)
    FeeDiscount,
    /// Correção até (B15)
    CorrectionUntil,
}

impl InputField {
    /// All fields, in cell order
    pub const ALL: [InputField; 10] = [
        InputField::Municipality,
        InputField::FilingDate,
        InputField::CitationDate,
        InputField::CalcStart,
        InputField::CalcEnd,
        InputField::FeePercent,
        InputField::FeeFixed,
        InputField::PrincipalDiscount,
        InputField::FeeDiscount,
        InputField::CorrectionUntil,
    ];

    /// The field's target cell in the RESUMO sheet
    pub fn cell(&self) -> CellAddress {
        // B6..B15, 0-based rows 5..=14
        let row = match self {
            InputField::Municipality => 5,
            InputField::FilingDate => 6,
            InputField::CitationDate => 7,
            InputField::CalcStart => 8,
            InputField::CalcEnd => 9,
            InputField::FeePercent => 10,
            InputField::FeeFixed => 11,
            InputField::PrincipalDiscount => 12,
            InputField::FeeDiscount => 13,
            InputField::CorrectionUntil => 14,
        };
        CellAddress::new(row, 1)
    }

    /// Conversion applied before the write
    pub fn kind(&self) -> FieldKind {
        match self {
            InputField::Municipality => FieldKind::Text,
            InputField::FilingDate
            | InputField::CitationDate
            | InputField::CalcStart
            | InputField::CalcEnd
            | InputField::CorrectionUntil => FieldKind::Date,
            InputField::FeePercent
            | InputField::PrincipalDiscount
            | InputField::FeeDiscount => FieldKind::Percent,
            InputField::FeeFixed => FieldKind::Number,
        }
    }

    /// The yellow period cells the formulas actually read, for the two
    /// fields that are mirrored there
    pub fn mirror(&self) -> Option<CellAddress> {
        match self {
            InputField::CalcStart => Some(CellAddress::new(5, 4)), // E6
            InputField::CalcEnd => Some(CellAddress::new(5, 5)),   // F6
            _ => None,
        }
    }
}

/// One calculation request, field names matching the original input schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationInput {
    #[serde(rename = "município")]
    pub municipality: String,
    #[serde(rename = "ajuizamento")]
    pub filing_date: String,
    #[serde(rename = "citação")]
    pub citation_date: String,
    #[serde(rename = "início_cálculo")]
    pub calc_start: String,
    #[serde(rename = "final_cálculo")]
    pub calc_end: String,
    #[serde(rename = "honorários_s_valor_da_condenação")]
    pub fee_percent: f64,
    #[serde(rename = "honorários_em_valor_fixo")]
    pub fee_fixed: f64,
    #[serde(rename = "deságio_a_aplicar_sobre_o_principal")]
    pub principal_discount: f64,
    #[serde(rename = "deságio_em_a_aplicar_em_honorários")]
    pub fee_discount: f64,
    #[serde(rename = "correção_até")]
    pub correction_until: String,
}

impl CalculationInput {
    fn text_of(&self, field: InputField) -> &str {
        match field {
            InputField::Municipality => &self.municipality,
            InputField::FilingDate => &self.filing_date,
            InputField::CitationDate => &self.citation_date,
            InputField::CalcStart => &self.calc_start,
            InputField::CalcEnd => &self.calc_end,
            InputField::CorrectionUntil => &self.correction_until,
            _ => unreachable!("numeric field has no text value"),
        }
    }

    fn number_of(&self, field: InputField) -> f64 {
        match field {
            InputField::FeePercent => self.fee_percent,
            InputField::FeeFixed => self.fee_fixed,
            InputField::PrincipalDiscount => self.principal_discount,
            InputField::FeeDiscount => self.fee_discount,
            _ => unreachable!("text field has no numeric value"),
        }
    }
}

/// Write every input field (and its mirrors) into the grid.
///
/// Date fields that parse in none of the accepted formats are a fatal
/// error: a half-written input sheet must never be recomputed.
pub fn write_inputs<G: CellGrid + ?Sized>(grid: &mut G, input: &CalculationInput) -> Result<()> {
    for field in InputField::ALL {
        let value = match field.kind() {
            FieldKind::Text => CellValue::text(input.text_of(field)),
            FieldKind::Date => CellValue::Date(parse_flex_date(input.text_of(field))?),
            FieldKind::Percent => CellValue::Number(input.number_of(field) / 100.0),
            FieldKind::Number => CellValue::Number(input.number_of(field)),
        };

        grid.set_value(field.cell(), value.clone());
        if let Some(mirror) = field.mirror() {
            grid.set_value(mirror, value);
        }
    }

    debug!(cells = InputField::ALL.len(), "input fields written");
    Ok(())
}
