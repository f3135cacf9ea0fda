//! Typed loading of the aggregate and industry tables.

use std::path::Path;

use jv_core::{Error, IndustryRecord, Result, VacancyRecord};

use crate::csv_file::read_csv;
use crate::dta::DtaFile;
use crate::table::Table;

const YEAR: &str = "year";
const WEEK: &str = "week";
const POSTINGS: &str = "job_postings_count";
const GROUP: &str = "group_name";

/// Read a `.dta` or `.csv` file into a [`Table`], dispatching on the extension.
pub fn read_table(path: impl AsRef<Path>) -> Result<Table> {
    let path = path.as_ref();
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();
    match ext.as_str() {
        "dta" => Ok(DtaFile::open(path)?.into_table()),
        "csv" => read_csv(path),
        _ => Err(Error::Validation(format!(
            "unsupported file extension '.{ext}' for {} (expected .dta or .csv)",
            path.display()
        ))),
    }
}

/// Load the aggregate table `{year, week, job_postings_count}`.
pub fn load_totals(path: impl AsRef<Path>) -> Result<Vec<VacancyRecord>> {
    let path = path.as_ref();
    let records = totals_from_table(&read_table(path)?)?;
    log::info!("loaded {} aggregate rows from {}", records.len(), path.display());
    Ok(records)
}

/// Load the industry table `{year, week, group_name, job_postings_count}`.
pub fn load_industries(path: impl AsRef<Path>) -> Result<Vec<IndustryRecord>> {
    let path = path.as_ref();
    let records = industries_from_table(&read_table(path)?)?;
    log::info!("loaded {} industry rows from {}", records.len(), path.display());
    Ok(records)
}

/// Type the aggregate columns. Rows with a missing key value are dropped.
pub fn totals_from_table(table: &Table) -> Result<Vec<VacancyRecord>> {
    let years = table.numeric(YEAR)?;
    let weeks = table.numeric(WEEK)?;
    let counts = table.numeric(POSTINGS)?;

    let mut out = Vec::with_capacity(table.n_rows());
    let mut dropped = 0usize;
    for i in 0..table.n_rows() {
        let (Some(year), Some(week), Some(count)) = (years[i], weeks[i], counts[i]) else {
            dropped += 1;
            continue;
        };
        out.push(VacancyRecord {
            year: as_year(year, i)?,
            week: as_week(week, i)?,
            job_postings_count: count,
        });
    }
    if dropped > 0 {
        log::warn!("dropped {dropped} aggregate rows with missing values");
    }
    Ok(out)
}

/// Type the industry columns. `group_name` may be text or a labelled numeric.
pub fn industries_from_table(table: &Table) -> Result<Vec<IndustryRecord>> {
    let years = table.numeric(YEAR)?;
    let weeks = table.numeric(WEEK)?;
    let counts = table.numeric(POSTINGS)?;
    let groups = table.text(GROUP)?;

    let mut out = Vec::with_capacity(table.n_rows());
    let mut dropped = 0usize;
    for (i, group) in groups.into_iter().enumerate() {
        let (Some(year), Some(week), Some(count), Some(group_name)) =
            (years[i], weeks[i], counts[i], group)
        else {
            dropped += 1;
            continue;
        };
        if group_name.is_empty() {
            dropped += 1;
            continue;
        }
        out.push(IndustryRecord {
            year: as_year(year, i)?,
            week: as_week(week, i)?,
            group_name,
            job_postings_count: count,
        });
    }
    if dropped > 0 {
        log::warn!("dropped {dropped} industry rows with missing values");
    }
    Ok(out)
}

fn as_year(v: f64, row: usize) -> Result<i32> {
    if v.fract() != 0.0 || v < i32::MIN as f64 || v > i32::MAX as f64 {
        return Err(Error::Validation(format!("row {row}: year {v} is not an integer")));
    }
    Ok(v as i32)
}

fn as_week(v: f64, row: usize) -> Result<u32> {
    if v.fract() != 0.0 || !(1.0..=53.0).contains(&v) {
        return Err(Error::Validation(format!("row {row}: week {v} is not in 1..=53")));
    }
    Ok(v as u32)
}
