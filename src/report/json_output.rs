//! JSON export: the whole workbook in one file
//!
//! Each sheet becomes an array of row objects keyed by column name, so
//! rows stay self-describing; not-available cells become `null`.

use super::{Sheet, Workbook, WorkbookExporter};
use crate::error::ReportError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Format version identifier
pub const FORMAT_VERSION: &str = "1.0";

/// One exported sheet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSheet {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Map<String, Value>>,
}

/// Root JSON output structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonWorkbook {
    /// Format version identifier
    pub version: String,
    /// Format name
    pub format: String,
    pub sheets: Vec<JsonSheet>,
}

impl JsonWorkbook {
    pub fn from_workbook(workbook: &Workbook) -> Result<Self, ReportError> {
        let sheets = workbook
            .sheets
            .iter()
            .map(JsonSheet::from_sheet)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            version: FORMAT_VERSION.to_string(),
            format: "kernel-sweep-json-v1".to_string(),
            sheets,
        })
    }

    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl JsonSheet {
    fn from_sheet(sheet: &Sheet) -> Result<Self, ReportError> {
        let mut rows = Vec::with_capacity(sheet.rows.len());
        for row in &sheet.rows {
            let mut object = Map::new();
            for (column, cell) in sheet.columns.iter().zip(row) {
                object.insert(column.clone(), serde_json::to_value(cell)?);
            }
            rows.push(object);
        }
        Ok(Self {
            name: sheet.name.clone(),
            columns: sheet.columns.clone(),
            rows,
        })
    }
}

/// JSON workbook exporter
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonExporter;

impl JsonExporter {
    pub fn new() -> Self {
        Self
    }
}

impl WorkbookExporter for JsonExporter {
    fn export(
        &self,
        workbook: &Workbook,
        output_dir: &Path,
        basename: &str,
    ) -> Result<Vec<PathBuf>, ReportError> {
        let path = output_dir.join(format!("{}.json", basename));
        let json = JsonWorkbook::from_workbook(workbook)?.to_json()?;
        fs::write(&path, json).map_err(|source| ReportError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(vec![path])
    }
}
