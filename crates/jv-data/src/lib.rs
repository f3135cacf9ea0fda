//! # jv-data
//!
//! Input side of jobvac: a native Stata `.dta` reader, CSV input, typed
//! loading of the aggregate and industry tables, and the row preparation
//! shared by the chart and model pipelines.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod csv_file;
pub mod dta;
pub mod loader;
pub mod prepare;
pub mod table;

pub use dta::DtaFile;
pub use loader::{load_industries, load_totals, read_table};
pub use prepare::{
    IndicatorRow, drop_partial_weeks, indicator_rows, industry_rows, select_window, year_series,
    years_present,
};
pub use table::{Column, Table};
