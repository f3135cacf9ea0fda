//! # jv-inference
//!
//! Statistical side of jobvac:
//!
//! - [`econometrics`]: fixed-effects absorption, PanelOLS, OLS and inference.
//! - [`spline`]: not-a-knot cubic B-spline smoothing of weekly series.
//! - [`study`]: the aggregate and per-industry model set.
//! - [`summary`]: text summaries of fitted models.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod econometrics;
pub mod spline;
pub mod study;
pub mod summary;

pub use econometrics::{CovarianceType, RegressionResult};
pub use spline::{CubicSpline, SmoothCurve, linspace, smooth_series};
pub use study::{ModelFit, StudyResults, fit_window, percent_effect, run_models};
pub use summary::render_report;
