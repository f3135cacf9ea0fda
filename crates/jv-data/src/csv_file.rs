//! CSV input.
//!
//! All rows are read as strings first, then each column is typed: a column
//! whose non-empty cells all parse as `f64` becomes numeric (empty cells are
//! missing), anything else stays text.

use std::io::Read;
use std::path::Path;

use jv_core::{Error, Result};

use crate::table::{Column, Table};

/// Read a comma-separated file with a header row.
pub fn read_csv(path: impl AsRef<Path>) -> Result<Table> {
    let path = path.as_ref();
    let rdr = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;
    let table = read_records(rdr)?;
    log::debug!("read {} rows from {}", table.n_rows(), path.display());
    Ok(table)
}

/// Read CSV text from any reader.
pub fn read_csv_from_reader<R: Read>(reader: R) -> Result<Table> {
    read_records(csv::ReaderBuilder::new().has_headers(true).from_reader(reader))
}

fn read_records<R: Read>(mut rdr: csv::Reader<R>) -> Result<Table> {
    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();
    if headers.is_empty() {
        return Err(Error::Format("CSV file has no columns".into()));
    }

    let n_cols = headers.len();
    let mut columns: Vec<Vec<String>> = vec![Vec::new(); n_cols];
    for record in rdr.records() {
        let record = record?;
        for (j, field) in record.iter().enumerate().take(n_cols) {
            columns[j].push(field.trim().to_string());
        }
    }

    let mut table = Table::new();
    for (name, cells) in headers.into_iter().zip(columns) {
        let column = if cells.iter().all(|s| s.is_empty() || s.parse::<f64>().is_ok()) {
            Column::Numeric(cells.iter().map(|s| s.parse::<f64>().ok()).collect())
        } else {
            Column::Text(cells)
        };
        table.push_column(name, column)?;
    }
    Ok(table)
}
