//! # jv-core
//!
//! Core types for jobvac: the weekly vacancy data model, analysis windows,
//! the fixed study constants and the shared error type.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod study;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use traits::WeeklyObservation;
pub use types::{AnalysisWindow, IndustryRecord, ModelScope, Response, VacancyRecord};

/// Crate version, shared by every workspace member.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
