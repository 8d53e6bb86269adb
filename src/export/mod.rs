//! Reshape an ingestion dataset into CSV and XLSX tables.

pub mod preview;
pub mod table;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Workbook, XlsxError};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::ExportConfig;
use preview::{PREVIEW_ROWS, format_preview};
use table::Table;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("malformed dataset: {0}")]
    MalformedResponse(String),

    #[error("failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to write CSV {}: {source}", .path.display())]
    Csv { path: PathBuf, source: csv::Error },

    #[error("failed to write spreadsheet {}: {source}", .path.display())]
    Spreadsheet { path: PathBuf, source: XlsxError },
}

#[derive(Debug)]
pub struct ExportReport {
    pub rows: usize,
    pub columns: usize,
    pub preview: String,
    pub csv: PathBuf,
    pub xlsx: PathBuf,
}

impl ExportReport {
    pub fn summary(&self) -> String {
        format!(
            "Table preview:\n{}\nTotal rows: {}\n\nSaved:\n- CSV: {}\n- Excel: {}",
            self.preview,
            self.rows,
            self.csv.display(),
            self.xlsx.display()
        )
    }
}

/// Load the dataset at `config.input` and write it as CSV and XLSX.
pub fn build_table(config: &ExportConfig) -> Result<ExportReport, ExportError> {
    let table = load_table(&config.input)?;
    debug!(
        rows = table.rows.len(),
        columns = table.columns.len(),
        "table built"
    );

    write_csv(&table, &config.csv)?;
    write_xlsx(&table, &config.xlsx)?;

    let report = ExportReport {
        rows: table.rows.len(),
        columns: table.columns.len(),
        preview: format_preview(&table, PREVIEW_ROWS),
        csv: config.csv.clone(),
        xlsx: config.xlsx.clone(),
    };
    info!(
        rows = report.rows,
        columns = report.columns,
        csv = %report.csv.display(),
        xlsx = %report.xlsx.display(),
        "export complete"
    );
    Ok(report)
}

pub fn load_table(path: &Path) -> Result<Table, ExportError> {
    let text = fs::read_to_string(path).map_err(|source| ExportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&text)
        .map_err(|e| ExportError::MalformedResponse(format!("{}: {e}", path.display())))?;
    Table::from_json(value)
}

pub fn write_csv(table: &Table, path: &Path) -> Result<(), ExportError> {
    ensure_parent(path)?;
    let csv_err = |source: csv::Error| ExportError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    if !table.columns.is_empty() {
        writer.write_record(&table.columns).map_err(csv_err)?;
    }
    for row in &table.rows {
        writer.write_record(row).map_err(csv_err)?;
    }
    writer.flush().map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_xlsx(table: &Table, path: &Path) -> Result<(), ExportError> {
    ensure_parent(path)?;
    let xlsx_err = |source: XlsxError| ExportError::Spreadsheet {
        path: path.to_path_buf(),
        source,
    };

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, name) in table.columns.iter().enumerate() {
        sheet
            .write_string(0, column_index(col).map_err(xlsx_err)?, name)
            .map_err(xlsx_err)?;
    }
    for (i, row) in table.rows.iter().enumerate() {
        let row_num = u32::try_from(i + 1)
            .map_err(|_| xlsx_err(XlsxError::RowColumnLimitError))?;
        for (col, cell) in row.iter().enumerate() {
            sheet
                .write_string(row_num, column_index(col).map_err(xlsx_err)?, cell)
                .map_err(xlsx_err)?;
        }
    }

    workbook.save(path).map_err(xlsx_err)
}

fn column_index(col: usize) -> Result<u16, XlsxError> {
    u16::try_from(col).map_err(|_| XlsxError::RowColumnLimitError)
}

fn ensure_parent(path: &Path) -> Result<(), ExportError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|source| ExportError::Write {
                path: path.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}
