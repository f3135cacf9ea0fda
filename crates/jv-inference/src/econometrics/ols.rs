//! Ordinary least squares with an intercept and classical inference.

use nalgebra::{DMatrix, DVector};

use jv_core::{Error, Result};

use super::inference::Reference;
use super::result::{
    CovarianceType, Estimator, FTest, RegressionResult, coefficient_table, gaussian_loglik,
};

/// Name of the intercept in OLS summaries.
pub const INTERCEPT_NAME: &str = "Intercept";

/// Cross-sectional sample for `y ~ 1 + exog`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearData {
    /// Dependent variable name.
    pub dependent: String,
    /// Dependent variable.
    pub y: Vec<f64>,
    /// Regressor names (intercept excluded).
    pub exog_names: Vec<String>,
    /// Regressor columns.
    pub exog: Vec<Vec<f64>>,
}

/// Fit `y ~ 1 + exog` with the nonrobust covariance `s² (X'X)⁻¹`,
/// `s² = RSS / (n − k)`, and Student-t inference on `n − k` degrees of freedom.
pub fn ols_fit(data: &LinearData) -> Result<RegressionResult> {
    let n = data.y.len();
    let p = data.exog.len();
    let k = p + 1;
    if data.exog_names.len() != p {
        return Err(Error::Validation(format!(
            "{} regressor names for {p} columns",
            data.exog_names.len()
        )));
    }
    if let Some((name, col)) = data.exog_names.iter().zip(&data.exog).find(|(_, c)| c.len() != n)
    {
        return Err(Error::Validation(format!(
            "regressor '{name}' has {} entries, expected {n}",
            col.len()
        )));
    }
    if n <= k {
        return Err(Error::Validation(format!(
            "OLS for '{}' needs more than {k} observations, got {n}",
            data.dependent
        )));
    }
    if data.y.iter().chain(data.exog.iter().flatten()).any(|v| !v.is_finite()) {
        return Err(Error::Validation(format!(
            "sample for '{}' contains non-finite values",
            data.dependent
        )));
    }

    let mut x = DMatrix::from_element(n, k, 1.0);
    for (j, col) in data.exog.iter().enumerate() {
        for (i, &v) in col.iter().enumerate() {
            x[(i, j + 1)] = v;
        }
    }
    let y = DVector::from_column_slice(&data.y);

    let xtx = x.transpose() * &x;
    let beta = xtx
        .clone()
        .lu()
        .solve(&(x.transpose() * &y))
        .ok_or_else(|| Error::Computation("OLS solve failed (singular X'X)".into()))?;
    let xtx_inv = xtx
        .try_inverse()
        .ok_or_else(|| Error::Computation("OLS covariance failed (singular X'X)".into()))?;

    let resid = &y - &x * &beta;
    let rss = resid.norm_squared();
    let df_resid = (n - k) as f64;
    let s2 = rss / df_resid;
    let reference = Reference::StudentT { df: df_resid };

    let mut names = vec![INTERCEPT_NAME.to_string()];
    names.extend(data.exog_names.iter().cloned());
    let beta: Vec<f64> = beta.iter().copied().collect();
    let coefficients = coefficient_table(&names, &beta, &(xtx_inv * s2), reference)?;

    let y_bar = data.y.iter().sum::<f64>() / n as f64;
    let tss: f64 = data.y.iter().map(|v| (v - y_bar).powi(2)).sum();
    let r_squared = if tss > 0.0 { 1.0 - rss / tss } else { 0.0 };
    let r_squared_adj = 1.0 - (1.0 - r_squared) * (n - 1) as f64 / df_resid;
    let f_test = if p > 0 { Some(FTest::from_rss(tss, rss, p as f64, df_resid)?) } else { None };

    log::debug!("OLS {}: n={n} rss={rss:.6e} r2={r_squared:.4}", data.dependent);

    Ok(RegressionResult {
        estimator: Estimator::Ols,
        dependent: data.dependent.clone(),
        covariance: CovarianceType::Unadjusted,
        reference,
        coefficients,
        n_obs: n,
        n_entities: None,
        n_time_periods: None,
        df_absorbed: 0,
        df_resid,
        df_model: p as f64,
        r_squared,
        r_squared_adj: Some(r_squared_adj),
        f_test,
        rss,
        log_likelihood: gaussian_loglik(rss, n),
    })
}
