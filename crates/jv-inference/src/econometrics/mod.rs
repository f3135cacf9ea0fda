//! Econometrics for the vacancy study.
//!
//! - Two-way fixed-effects absorption by alternating projections.
//! - PanelOLS with a recovered constant and unadjusted, debiased or
//!   entity-clustered covariance.
//! - OLS with classical Student-t inference.

pub mod hdfe;
pub mod inference;
pub mod ols;
pub mod panel;
pub mod result;

pub use hdfe::FixedEffectsSolver;
pub use inference::Reference;
pub use ols::{INTERCEPT_NAME, LinearData, ols_fit};
pub use panel::{CONST_NAME, PanelData, cluster_robust_cov, panel_ols};
pub use result::{Coefficient, CovarianceType, Estimator, FTest, RegressionResult};
