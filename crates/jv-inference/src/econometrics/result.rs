//! Fitted-model output shared by the panel and OLS estimators.

use std::fmt;

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use jv_core::{Error, Result};

use super::inference::{Reference, f_p_value};

/// Confidence level of the reported intervals.
pub const CONFIDENCE_LEVEL: f64 = 0.95;

/// Estimator that produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Estimator {
    /// Two-way fixed-effects panel regression.
    PanelOls,
    /// Ordinary least squares.
    Ols,
}

impl Estimator {
    /// Title line of a summary table.
    pub fn title(self) -> &'static str {
        match self {
            Estimator::PanelOls => "PanelOLS Estimation Summary",
            Estimator::Ols => "OLS Regression Results",
        }
    }
}

/// Covariance estimator for coefficient standard errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CovarianceType {
    /// Homoskedastic; panel fits use large-sample (normal) inference.
    #[default]
    Unadjusted,
    /// Homoskedastic with a small-sample degrees-of-freedom correction and t inference.
    Debiased,
    /// Cluster-robust by entity.
    Clustered,
}

impl CovarianceType {
    /// Parse a covariance name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "unadjusted" | "homoskedastic" => Some(Self::Unadjusted),
            "debiased" => Some(Self::Debiased),
            "clustered" => Some(Self::Clustered),
            _ => None,
        }
    }

    /// Summary label.
    pub fn label(self) -> &'static str {
        match self {
            CovarianceType::Unadjusted => "Unadjusted",
            CovarianceType::Debiased => "Debiased",
            CovarianceType::Clustered => "Clustered",
        }
    }
}

impl fmt::Display for CovarianceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One estimated parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coefficient {
    /// Parameter name.
    pub name: String,
    /// Point estimate.
    pub estimate: f64,
    /// Standard error.
    pub std_error: f64,
    /// Wald statistic `estimate / std_error`.
    pub statistic: f64,
    /// Two-sided p-value.
    pub p_value: f64,
    /// Lower 95% confidence bound.
    pub ci_lower: f64,
    /// Upper 95% confidence bound.
    pub ci_upper: f64,
}

impl Coefficient {
    /// Whether the estimate is significant at `alpha`.
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// Overall F test of the non-constant regressors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FTest {
    /// Statistic.
    pub stat: f64,
    /// Numerator degrees of freedom.
    pub df_num: f64,
    /// Denominator degrees of freedom.
    pub df_den: f64,
    /// Upper-tail p-value.
    pub p_value: f64,
}

impl FTest {
    /// F test from restricted/unrestricted residual sums of squares.
    pub fn from_rss(rss_restricted: f64, rss: f64, df_num: f64, df_den: f64) -> Result<Self> {
        let stat = ((rss_restricted - rss) / df_num) / (rss / df_den);
        Ok(Self { stat, df_num, df_den, p_value: f_p_value(stat, df_num, df_den)? })
    }
}

/// A fitted regression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionResult {
    /// Estimator used.
    pub estimator: Estimator,
    /// Dependent variable name.
    pub dependent: String,
    /// Covariance estimator.
    pub covariance: CovarianceType,
    /// Reference distribution for the coefficient tests.
    pub reference: Reference,
    /// Parameters, constant first.
    pub coefficients: Vec<Coefficient>,
    /// Observations used.
    pub n_obs: usize,
    /// Number of entities (panel fits only).
    pub n_entities: Option<usize>,
    /// Number of time periods (panel fits only).
    pub n_time_periods: Option<usize>,
    /// Degrees of freedom absorbed by fixed effects.
    pub df_absorbed: usize,
    /// Residual degrees of freedom.
    pub df_resid: f64,
    /// Model degrees of freedom (non-constant regressors).
    pub df_model: f64,
    /// R² (within R² for panel fits).
    pub r_squared: f64,
    /// Adjusted R² (OLS only).
    pub r_squared_adj: Option<f64>,
    /// Overall F test.
    pub f_test: Option<FTest>,
    /// Residual sum of squares.
    pub rss: f64,
    /// Gaussian log-likelihood.
    pub log_likelihood: f64,
}

impl RegressionResult {
    /// Look a parameter up by name.
    pub fn coefficient(&self, name: &str) -> Result<&Coefficient> {
        self.coefficients.iter().find(|c| c.name == name).ok_or_else(|| {
            Error::Validation(format!("model of '{}' has no parameter '{name}'", self.dependent))
        })
    }

    /// Akaike information criterion.
    pub fn aic(&self) -> f64 {
        -2.0 * self.log_likelihood + 2.0 * self.coefficients.len() as f64
    }

    /// Bayesian information criterion.
    pub fn bic(&self) -> f64 {
        -2.0 * self.log_likelihood + self.coefficients.len() as f64 * (self.n_obs as f64).ln()
    }
}

/// Gaussian log-likelihood at the ML variance `rss / n`.
pub(crate) fn gaussian_loglik(rss: f64, n: usize) -> f64 {
    let n = n as f64;
    -0.5 * n * ((2.0 * std::f64::consts::PI).ln() + (rss / n).ln() + 1.0)
}

/// Build the parameter table from estimates and their covariance matrix.
pub(crate) fn coefficient_table(
    names: &[String],
    beta: &[f64],
    cov: &DMatrix<f64>,
    reference: Reference,
) -> Result<Vec<Coefficient>> {
    let crit = reference.critical(CONFIDENCE_LEVEL)?;
    names
        .iter()
        .zip(beta)
        .enumerate()
        .map(|(j, (name, &estimate))| {
            let std_error = cov[(j, j)].max(0.0).sqrt();
            let statistic = estimate / std_error;
            Ok(Coefficient {
                name: name.clone(),
                estimate,
                std_error,
                statistic,
                p_value: reference.two_sided_p(statistic)?,
                ci_lower: estimate - crit * std_error,
                ci_upper: estimate + crit * std_error,
            })
        })
        .collect()
}
