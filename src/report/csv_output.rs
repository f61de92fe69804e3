//! CSV export: one file per sheet
//!
//! Writes `<output_dir>/<basename>/<sheet>.csv`. Not-available cells are
//! left empty, as a spreadsheet would show them.

use super::{ReportCell, Sheet, Workbook, WorkbookExporter};
use crate::error::ReportError;
use std::fs;
use std::path::{Path, PathBuf};

/// CSV workbook exporter
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvExporter;

impl CsvExporter {
    pub fn new() -> Self {
        Self
    }

    /// Escape CSV field (handle commas, quotes, newlines)
    fn escape_field(field: &str) -> String {
        if field.contains(',') || field.contains('"') || field.contains('\n') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    fn format_cell(cell: &ReportCell) -> String {
        match cell {
            ReportCell::Text(text) => Self::escape_field(text),
            ReportCell::Integer(i) => i.to_string(),
            ReportCell::Number(x) => x.to_string(),
            ReportCell::NotAvailable => String::new(),
        }
    }

    /// Render one sheet as CSV text, header first
    pub fn to_csv(sheet: &Sheet) -> String {
        let mut output = String::new();

        let header: Vec<String> = sheet
            .columns
            .iter()
            .map(|c| Self::escape_field(c))
            .collect();
        output.push_str(&header.join(","));
        output.push('\n');

        for row in &sheet.rows {
            let fields: Vec<String> = row.iter().map(Self::format_cell).collect();
            output.push_str(&fields.join(","));
            output.push('\n');
        }

        output
    }
}

impl WorkbookExporter for CsvExporter {
    fn export(
        &self,
        workbook: &Workbook,
        output_dir: &Path,
        basename: &str,
    ) -> Result<Vec<PathBuf>, ReportError> {
        let dir = output_dir.join(basename);
        fs::create_dir_all(&dir).map_err(|source| ReportError::Io {
            path: dir.clone(),
            source,
        })?;

        let mut written = Vec::with_capacity(workbook.sheets.len());
        for sheet in &workbook.sheets {
            let path = dir.join(format!("{}.csv", sheet.name));
            fs::write(&path, Self::to_csv(sheet)).map_err(|source| ReportError::Io {
                path: path.clone(),
                source,
            })?;
            written.push(path);
        }
        Ok(written)
    }
}
