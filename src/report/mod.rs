//! Report tables and workbook export
//!
//! The four output sheets are plain tables of named columns. Building them
//! is pure marshaling; writing them is delegated to a `WorkbookExporter`.

pub mod csv_output;
pub mod json_output;

use crate::aggregate::{GlobalResults, SummaryKind, SummaryRow};
use crate::comparison::{ComparisonRow, KernelWidthPair};
use crate::error::ReportError;
use crate::metrics::Metric;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub use csv_output::CsvExporter;
pub use json_output::JsonExporter;

/// Name of the comparison sheet
pub const COMPARISON_SHEET: &str = "kernel_width_comparison";

/// One table cell
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReportCell {
    Text(String),
    Integer(i64),
    Number(f64),
    NotAvailable,
}

impl From<Option<f64>> for ReportCell {
    fn from(value: Option<f64>) -> Self {
        value.map_or(ReportCell::NotAvailable, ReportCell::Number)
    }
}

/// A named table with a fixed column schema
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sheet {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<ReportCell>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row, rejecting rows that do not match the schema
    pub fn push_row(&mut self, row: Vec<ReportCell>) -> Result<(), ReportError> {
        if row.len() != self.columns.len() {
            return Err(ReportError::ShapeMismatch {
                sheet: self.name.clone(),
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }
}

/// Ordered collection of sheets
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

/// Writes a workbook somewhere under `output_dir`
pub trait WorkbookExporter {
    /// Write the workbook, returning every file written
    fn export(
        &self,
        workbook: &Workbook,
        output_dir: &Path,
        basename: &str,
    ) -> Result<Vec<PathBuf>, ReportError>;
}

/// Columns of the mean/std/median sheets
pub fn summary_columns() -> Vec<String> {
    ["model", "rf", "kernel_width"]
        .into_iter()
        .map(String::from)
        .chain(Metric::ALL.iter().map(|m| m.key().to_string()))
        .collect()
}

/// Columns of the comparison sheet
pub fn comparison_columns(pairs: &[KernelWidthPair]) -> Vec<String> {
    ["model", "compared_variable"]
        .into_iter()
        .map(String::from)
        .chain(pairs.iter().map(KernelWidthPair::label))
        .collect()
}

fn summary_sheet(kind: SummaryKind, rows: &[SummaryRow]) -> Result<Sheet, ReportError> {
    let mut sheet = Sheet::new(kind.sheet_name(), summary_columns());
    for row in rows {
        let mut cells = vec![
            ReportCell::Text(row.key.model_name.clone()),
            ReportCell::Integer(row.key.receptive_field),
            ReportCell::Integer(row.key.kernel_width),
        ];
        cells.extend(row.values.iter().map(|(_, v)| ReportCell::from(*v)));
        sheet.push_row(cells)?;
    }
    Ok(sheet)
}

fn comparison_sheet(
    rows: &[ComparisonRow],
    pairs: &[KernelWidthPair],
) -> Result<Sheet, ReportError> {
    let mut sheet = Sheet::new(COMPARISON_SHEET, comparison_columns(pairs));
    for row in rows {
        let mut cells = vec![
            ReportCell::Text(row.model_base.clone()),
            ReportCell::Text(row.compared_variable.key().to_string()),
        ];
        cells.extend(row.cells.iter().map(|(_, p)| ReportCell::from(*p)));
        sheet.push_row(cells)?;
    }
    Ok(sheet)
}

/// Assemble the mean, std, median and comparison sheets
pub fn build_workbook(
    results: &GlobalResults,
    comparisons: &[ComparisonRow],
    pairs: &[KernelWidthPair],
) -> Result<Workbook, ReportError> {
    let mut sheets = SummaryKind::ALL
        .iter()
        .map(|&kind| summary_sheet(kind, results.rows(kind)))
        .collect::<Result<Vec<_>, _>>()?;
    sheets.push(comparison_sheet(comparisons, pairs)?);
    Ok(Workbook { sheets })
}
